//! Row mapping shared by the repository and the exporter

use crate::errors::Result;
use enfermaria_core::errors::{EnfError, EnfErrorKind};
use enfermaria_core::model::{
    AdministeredMedication, Conduct, ConductSummary, MedicalHistory, PatientIdentity,
    PrincipalComplaint, RecordedAt, Region, SecondaryComplaint, Symptom, Visit, VisitDetails,
    Vitals,
};
use rusqlite::Row;

/// Visit columns, aliased where the conduct table reuses a name
pub(crate) const VISIT_SELECT: &str = "a.id AS visit_id, a.badge_number, a.nome, a.login, \
     a.gestor, a.turno, a.setor, a.processo, a.tenure, \
     a.queixa_principal_sintoma, a.queixa_principal_regiao, \
     a.queixa_secundaria_sintomas, a.queixa_secundaria_regioes, \
     a.hqa, a.tax, a.pa_sistolica, a.pa_diastolica, a.fc, a.sat, \
     a.doencas_preexistentes, a.alergias, a.medicamentos_em_uso, \
     a.observacoes AS visit_observacoes, \
     a.data_atendimento, a.hora_atendimento, a.semana_iso";

pub(crate) const CONDUCT_SELECT: &str = "c.id AS conduct_id, c.hipotese_diagnostica, \
     c.conduta_adotada, c.resumo_conduta, c.medicamento_administrado, c.medicamento, \
     c.posologia, c.horario_medicacao, c.observacoes AS conduct_observacoes";

/// Nullable text column; legacy rows carry NULL where newer ones carry ''
pub(crate) fn text(row: &Row<'_>, column: &str) -> rusqlite::Result<String> {
    Ok(row.get::<_, Option<String>>(column)?.unwrap_or_default())
}

/// Parse a stored label; unknown labels are logged and dropped
pub(crate) fn stored_label<T>(
    raw: &str,
    column: &str,
    parse: fn(&str) -> enfermaria_core::Result<T>,
) -> Option<T> {
    if raw.trim().is_empty() {
        return None;
    }
    match parse(raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(column = column, error = %e, "Ignoring unknown stored label");
            None
        }
    }
}

/// Parse a JSON list of labels; malformed documents read as empty
pub(crate) fn stored_labels<T>(
    raw: &str,
    column: &str,
    parse: fn(&str) -> enfermaria_core::Result<T>,
) -> Vec<T> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    let items: Vec<String> = match serde_json::from_str(raw) {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(column = column, error = %e, "Ignoring malformed label list");
            return Vec::new();
        }
    };
    items
        .iter()
        .filter_map(|item| stored_label(item, column, parse))
        .collect()
}

pub(crate) fn label_text<T: std::fmt::Display>(value: &Option<T>) -> String {
    value.as_ref().map(|v| v.to_string()).unwrap_or_default()
}

/// JSON list of labels for the secondary-complaint columns
pub(crate) fn labels_json<T: std::fmt::Display>(values: &[T]) -> Result<String> {
    let labels: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    serde_json::to_string(&labels).map_err(|e| {
        EnfError::new(EnfErrorKind::Serialization)
            .with_op("encode_labels")
            .with_message(e.to_string())
    })
}

/// Visit columns as read, before the creation stamp is validated
pub(crate) struct VisitRow {
    pub id: i64,
    pub details: VisitDetails,
    pub date: String,
    pub time: String,
    pub iso_week: i64,
}

impl VisitRow {
    pub fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        let identity = PatientIdentity {
            badge_number: text(row, "badge_number")?,
            name: text(row, "nome")?,
            login: text(row, "login")?,
            manager: text(row, "gestor")?,
            shift: text(row, "turno")?,
            department: text(row, "setor")?,
            process: text(row, "processo")?,
            tenure: text(row, "tenure")?,
        };
        let principal = PrincipalComplaint {
            symptom: stored_label(
                &text(row, "queixa_principal_sintoma")?,
                "queixa_principal_sintoma",
                Symptom::from_label,
            ),
            region: stored_label(
                &text(row, "queixa_principal_regiao")?,
                "queixa_principal_regiao",
                Region::from_label,
            ),
        };
        let secondary = SecondaryComplaint {
            symptoms: stored_labels(
                &text(row, "queixa_secundaria_sintomas")?,
                "queixa_secundaria_sintomas",
                Symptom::from_label,
            ),
            regions: stored_labels(
                &text(row, "queixa_secundaria_regioes")?,
                "queixa_secundaria_regioes",
                Region::from_label,
            ),
        };
        let vitals = Vitals {
            temperature: text(row, "tax")?,
            systolic_pressure: text(row, "pa_sistolica")?,
            diastolic_pressure: text(row, "pa_diastolica")?,
            heart_rate: text(row, "fc")?,
            saturation: text(row, "sat")?,
        };
        let history = MedicalHistory {
            current_complaint_history: text(row, "hqa")?,
            preexisting_conditions: text(row, "doencas_preexistentes")?,
            allergies: text(row, "alergias")?,
            medications_in_use: text(row, "medicamentos_em_uso")?,
            notes: text(row, "visit_observacoes")?,
        };

        Ok(Self {
            id: row.get("visit_id")?,
            details: VisitDetails {
                identity,
                principal,
                secondary,
                vitals,
                history,
                conducts: Vec::new(),
            },
            date: row.get("data_atendimento")?,
            time: row.get("hora_atendimento")?,
            iso_week: row.get("semana_iso")?,
        })
    }

    pub fn recorded_at(&self) -> Result<RecordedAt> {
        RecordedAt::parse(&self.date, &self.time, self.iso_week).map_err(|e| {
            EnfError::new(EnfErrorKind::Persistence)
                .with_op("read_visit")
                .with_entity_id(self.id.to_string())
                .with_message(e.to_string())
        })
    }

    pub fn into_visit(self, conducts: Vec<Conduct>) -> Result<Visit> {
        let recorded = self.recorded_at()?;
        let mut details = self.details;
        details.conducts = conducts;
        Ok(Visit {
            id: Some(self.id),
            recorded,
            details,
        })
    }
}

/// Conduct columns of a row; `None` when a LEFT JOIN found no conduct
pub(crate) fn read_conduct(row: &Row<'_>) -> rusqlite::Result<Option<Conduct>> {
    let id: Option<i64> = row.get("conduct_id")?;
    let Some(id) = id else {
        return Ok(None);
    };
    Ok(Some(Conduct {
        id: Some(id),
        hypothesis: text(row, "hipotese_diagnostica")?,
        conduct_taken: text(row, "conduta_adotada")?,
        summary: stored_label(
            &text(row, "resumo_conduta")?,
            "resumo_conduta",
            ConductSummary::from_label,
        ),
        administered_medication: stored_label(
            &text(row, "medicamento_administrado")?,
            "medicamento_administrado",
            AdministeredMedication::from_label,
        ),
        medication: text(row, "medicamento")?,
        dosage: text(row, "posologia")?,
        medication_time: text(row, "horario_medicacao")?,
        notes: text(row, "conduct_observacoes")?,
    }))
}

//! Visit repository
//!
//! Visits and their conducts are written as one unit: a save or update
//! either commits every row or none.

use super::rows::{
    label_text, labels_json, read_conduct, stored_label, text, VisitRow, CONDUCT_SELECT,
    VISIT_SELECT,
};
use crate::db::Store;
use crate::errors::{from_rusqlite, visit_not_found, Result};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use enfermaria_core::errors::{EnfError, EnfErrorKind};
use enfermaria_core::model::visit::{DATE_FORMAT, TIME_FORMAT};
use enfermaria_core::model::{
    Conduct, ConductSummary, PatientIdentity, Symptom, Visit, VisitSummary,
};
use enfermaria_core::rules::validation;
use rusqlite::{params, Connection, OptionalExtension, Row};

const SUMMARY_SELECT: &str = "SELECT a.id, a.badge_number, a.nome, a.login, \
     a.data_atendimento, a.hora_atendimento, a.queixa_principal_sintoma, \
     (SELECT c.resumo_conduta FROM condutas c WHERE c.atendimento_id = a.id \
      ORDER BY c.id LIMIT 1) AS primeiro_resumo \
     FROM atendimentos a";

const SUMMARY_ORDER: &str =
    " ORDER BY a.data_atendimento DESC, a.hora_atendimento DESC, a.id DESC";

/// CRUD over visits, bound to one store
///
/// The store owns a single connection and is used from one thread, so writes
/// open their transaction through a shared borrow.
pub struct VisitRepo<'s> {
    store: &'s Store,
}

impl<'s> VisitRepo<'s> {
    pub fn new(store: &'s Store) -> Self {
        Self { store }
    }

    fn conn(&self) -> &Connection {
        self.store.conn()
    }

    /// Insert a visit and its conducts; returns the new visit id
    ///
    /// # Errors
    ///
    /// `InvalidInput` for a blank badge, `Persistence` if any insert fails
    /// (nothing is kept).
    pub fn save(&self, visit: &Visit) -> Result<i64> {
        validation::validate_visit(visit).map_err(EnfError::from)?;

        let tx = self.conn().unchecked_transaction().map_err(from_rusqlite)?;
        let d = &visit.details;
        tx.execute(
            "INSERT INTO atendimentos (
                badge_number, nome, login, gestor, turno, setor, processo, tenure,
                queixa_principal_sintoma, queixa_principal_regiao,
                queixa_secundaria_sintomas, queixa_secundaria_regioes,
                hqa, tax, pa_sistolica, pa_diastolica, fc, sat,
                doencas_preexistentes, alergias, medicamentos_em_uso, observacoes,
                data_atendimento, hora_atendimento, semana_iso
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14,
                      ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25)",
            params![
                d.identity.badge_number.trim(),
                d.identity.name,
                d.identity.login,
                d.identity.manager,
                d.identity.shift,
                d.identity.department,
                d.identity.process,
                d.identity.tenure,
                label_text(&d.principal.symptom),
                label_text(&d.principal.region),
                labels_json(&d.secondary.symptoms)?,
                labels_json(&d.secondary.regions)?,
                d.history.current_complaint_history,
                d.vitals.temperature,
                d.vitals.systolic_pressure,
                d.vitals.diastolic_pressure,
                d.vitals.heart_rate,
                d.vitals.saturation,
                d.history.preexisting_conditions,
                d.history.allergies,
                d.history.medications_in_use,
                d.history.notes,
                visit.recorded.date_str(),
                visit.recorded.time_str(),
                visit.recorded.iso_week,
            ],
        )
        .map_err(from_rusqlite)?;
        let id = tx.last_insert_rowid();

        insert_conducts(&tx, id, &d.conducts)?;
        tx.commit().map_err(from_rusqlite)?;

        tracing::debug!(visit_id = id, conducts = d.conducts.len(), "Visit saved");
        Ok(id)
    }

    /// Load a visit with its conducts in insertion order
    pub fn get_by_id(&self, id: i64) -> Result<Option<Visit>> {
        let row = self
            .conn()
            .query_row(
                &format!("SELECT {} FROM atendimentos a WHERE a.id = ?1", VISIT_SELECT),
                [id],
                VisitRow::read,
            )
            .optional()
            .map_err(from_rusqlite)?;
        let Some(row) = row else {
            return Ok(None);
        };

        let conducts = self.conducts_of(id)?;
        row.into_visit(conducts).map(Some)
    }

    fn conducts_of(&self, visit_id: i64) -> Result<Vec<Conduct>> {
        let mut stmt = self
            .conn()
            .prepare(&format!(
                "SELECT {} FROM condutas c WHERE c.atendimento_id = ?1 ORDER BY c.id",
                CONDUCT_SELECT
            ))
            .map_err(from_rusqlite)?;
        let conducts = stmt
            .query_map([visit_id], read_conduct)
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;
        Ok(conducts.into_iter().flatten().collect())
    }

    /// Identification block of the badge's most recent visit
    pub fn get_last_by_badge(&self, badge: &str) -> Result<Option<PatientIdentity>> {
        self.conn()
            .query_row(
                "SELECT badge_number, nome, login, gestor, turno, setor, processo, tenure
                 FROM atendimentos WHERE badge_number = ?1
                 ORDER BY data_atendimento DESC, hora_atendimento DESC, id DESC
                 LIMIT 1",
                [badge.trim()],
                |row| {
                    Ok(PatientIdentity {
                        badge_number: text(row, "badge_number")?,
                        name: text(row, "nome")?,
                        login: text(row, "login")?,
                        manager: text(row, "gestor")?,
                        shift: text(row, "turno")?,
                        department: text(row, "setor")?,
                        process: text(row, "processo")?,
                        tenure: text(row, "tenure")?,
                    })
                },
            )
            .optional()
            .map_err(from_rusqlite)
    }

    /// Visits dated within `[today - days_ago, today]`, newest first
    ///
    /// The window is day-granular: every visit on the boundary day counts.
    ///
    /// # Errors
    ///
    /// `InvalidInput` when `days_ago` is negative or reaches past the
    /// calendar's range.
    pub fn list_by_badge_or_all(
        &self,
        badge: Option<&str>,
        days_ago: i64,
        today: NaiveDate,
    ) -> Result<Vec<VisitSummary>> {
        let start = Duration::try_days(days_ago)
            .filter(|_| days_ago >= 0)
            .and_then(|span| today.checked_sub_signed(span))
            .ok_or_else(|| {
                EnfError::new(EnfErrorKind::InvalidInput)
                    .with_op("visit_list")
                    .with_message(format!("History window of {} days is out of range", days_ago))
            })?;
        let from = start.format(DATE_FORMAT).to_string();
        let to = today.format(DATE_FORMAT).to_string();
        self.list_summaries("a.data_atendimento BETWEEN ?1 AND ?2", &from, &to, badge)
    }

    /// Visits whose date and time fall inside `[start, end]`, newest first
    pub fn list_by_date_time_range(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        badge: Option<&str>,
    ) -> Result<Vec<VisitSummary>> {
        let format = format!("{} {}", DATE_FORMAT, TIME_FORMAT);
        let from = start.format(&format).to_string();
        let to = end.format(&format).to_string();
        self.list_summaries(
            "(a.data_atendimento || ' ' || a.hora_atendimento) BETWEEN ?1 AND ?2",
            &from,
            &to,
            badge,
        )
    }

    fn list_summaries(
        &self,
        window: &str,
        from: &str,
        to: &str,
        badge: Option<&str>,
    ) -> Result<Vec<VisitSummary>> {
        let mut sql = format!("{} WHERE {}", SUMMARY_SELECT, window);
        if badge.is_some() {
            sql.push_str(" AND a.badge_number = ?3");
        }
        sql.push_str(SUMMARY_ORDER);

        let mut stmt = self.conn().prepare(&sql).map_err(from_rusqlite)?;
        let rows = match badge {
            Some(badge) => stmt.query_map(params![from, to, badge.trim()], read_summary),
            None => stmt.query_map(params![from, to], read_summary),
        }
        .map_err(from_rusqlite)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)
    }

    /// Overwrite the editable columns and replace every conduct
    ///
    /// Date, time and ISO week are never rewritten.
    ///
    /// # Errors
    ///
    /// `InvalidInput` without an id or with a blank badge, `NotFound` when
    /// the id has no row, `Persistence` on any SQLite failure.
    pub fn update(&self, visit: &Visit) -> Result<()> {
        let id = visit.id.ok_or_else(|| {
            EnfError::new(EnfErrorKind::InvalidInput)
                .with_op("visit_update")
                .with_message("Visit has no id")
        })?;
        validation::validate_badge(visit.badge_number()).map_err(EnfError::from)?;

        let tx = self.conn().unchecked_transaction().map_err(from_rusqlite)?;
        let d = &visit.details;
        let changed = tx
            .execute(
                "UPDATE atendimentos SET
                    badge_number = ?1, nome = ?2, login = ?3, gestor = ?4, turno = ?5,
                    setor = ?6, processo = ?7, tenure = ?8,
                    queixa_principal_sintoma = ?9, queixa_principal_regiao = ?10,
                    queixa_secundaria_sintomas = ?11, queixa_secundaria_regioes = ?12,
                    hqa = ?13, tax = ?14, pa_sistolica = ?15, pa_diastolica = ?16,
                    fc = ?17, sat = ?18, doencas_preexistentes = ?19, alergias = ?20,
                    medicamentos_em_uso = ?21, observacoes = ?22
                 WHERE id = ?23",
                params![
                    d.identity.badge_number.trim(),
                    d.identity.name,
                    d.identity.login,
                    d.identity.manager,
                    d.identity.shift,
                    d.identity.department,
                    d.identity.process,
                    d.identity.tenure,
                    label_text(&d.principal.symptom),
                    label_text(&d.principal.region),
                    labels_json(&d.secondary.symptoms)?,
                    labels_json(&d.secondary.regions)?,
                    d.history.current_complaint_history,
                    d.vitals.temperature,
                    d.vitals.systolic_pressure,
                    d.vitals.diastolic_pressure,
                    d.vitals.heart_rate,
                    d.vitals.saturation,
                    d.history.preexisting_conditions,
                    d.history.allergies,
                    d.history.medications_in_use,
                    d.history.notes,
                    id,
                ],
            )
            .map_err(from_rusqlite)?;
        if changed == 0 {
            return Err(visit_not_found("visit_update", id));
        }

        tx.execute("DELETE FROM condutas WHERE atendimento_id = ?1", [id])
            .map_err(from_rusqlite)?;
        insert_conducts(&tx, id, &d.conducts)?;
        tx.commit().map_err(from_rusqlite)?;

        tracing::debug!(visit_id = id, conducts = d.conducts.len(), "Visit updated");
        Ok(())
    }

    /// Delete a visit; its conducts go with it
    ///
    /// # Errors
    ///
    /// `NotFound` when the id has no row.
    pub fn delete(&self, id: i64) -> Result<()> {
        let removed = self
            .conn()
            .execute("DELETE FROM atendimentos WHERE id = ?1", [id])
            .map_err(from_rusqlite)?;
        if removed == 0 {
            return Err(visit_not_found("visit_delete", id));
        }
        Ok(())
    }

    /// Number of conduct rows owned by `visit_id`
    pub fn conduct_count(&self, visit_id: i64) -> Result<i64> {
        self.conn()
            .query_row(
                "SELECT COUNT(*) FROM condutas WHERE atendimento_id = ?1",
                [visit_id],
                |row| row.get(0),
            )
            .map_err(from_rusqlite)
    }
}

fn insert_conducts(conn: &Connection, visit_id: i64, conducts: &[Conduct]) -> Result<()> {
    let mut stmt = conn
        .prepare(
            "INSERT INTO condutas (
                atendimento_id, hipotese_diagnostica, conduta_adotada, resumo_conduta,
                medicamento_administrado, medicamento, posologia, horario_medicacao,
                observacoes
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        )
        .map_err(from_rusqlite)?;
    for conduct in conducts {
        stmt.execute(params![
            visit_id,
            conduct.hypothesis,
            conduct.conduct_taken,
            label_text(&conduct.summary),
            label_text(&conduct.administered_medication),
            conduct.medication,
            conduct.dosage,
            conduct.medication_time,
            conduct.notes,
        ])
        .map_err(from_rusqlite)?;
    }
    Ok(())
}

fn read_summary(row: &Row<'_>) -> rusqlite::Result<VisitSummary> {
    Ok(VisitSummary {
        id: row.get("id")?,
        badge_number: text(row, "badge_number")?,
        name: text(row, "nome")?,
        login: text(row, "login")?,
        date: text(row, "data_atendimento")?,
        time: text(row, "hora_atendimento")?,
        principal_symptom: stored_label(
            &text(row, "queixa_principal_sintoma")?,
            "queixa_principal_sintoma",
            Symptom::from_label,
        ),
        first_conduct_summary: stored_label(
            &text(row, "primeiro_resumo")?,
            "resumo_conduta",
            ConductSummary::from_label,
        ),
    })
}

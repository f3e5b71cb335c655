use crate::db::Store;
use crate::errors::{export_error, from_csv, from_rusqlite, io_error, Result};
use crate::repo::rows::{label_text, read_conduct, VisitRow, CONDUCT_SELECT, VISIT_SELECT};
use chrono::NaiveDate;
use enfermaria_core::model::visit::DATE_FORMAT;
use enfermaria_core::model::{Conduct, Region, Symptom};
use rusqlite::types::Value;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Spreadsheet tools need the BOM to pick UTF-8
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

const VISIT_COLUMNS: &[&str] = &[
    "id_atendimento",
    "badge_number",
    "nome",
    "login",
    "gestor",
    "turno",
    "setor",
    "processo",
    "tenure",
    "qp_sintoma",
    "qp_regiao",
    "hqa",
    "tax",
    "pa_sistolica",
    "pa_diastolica",
    "fc",
    "sat",
    "doencas_preexistentes",
    "alergias",
    "medicamentos_em_uso",
    "observacoes_atendimento",
    "data_atendimento",
    "hora_atendimento",
    "semana_iso",
];

const CONDUCT_COLUMNS: &[&str] = &[
    "id_conduta",
    "hipotese_diagnostica",
    "conduta_adotada",
    "resumo_conduta",
    "medicamento_administrado",
    "medicamento",
    "posologia",
    "horario_medicacao",
    "observacoes_conduta",
];

/// Which visits to export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFilter {
    /// Inclusive range of visit dates
    DateRange { start: NaiveDate, end: NaiveDate },
    /// ISO week number, across every year in the store
    IsoWeek(u32),
    All,
}

impl ExportFilter {
    pub fn today(today: NaiveDate) -> Self {
        ExportFilter::DateRange {
            start: today,
            end: today,
        }
    }

    fn where_clause(&self) -> (&'static str, Vec<Value>) {
        match self {
            ExportFilter::DateRange { start, end } => (
                "a.data_atendimento BETWEEN ?1 AND ?2",
                vec![
                    Value::Text(start.format(DATE_FORMAT).to_string()),
                    Value::Text(end.format(DATE_FORMAT).to_string()),
                ],
            ),
            ExportFilter::IsoWeek(week) => {
                ("a.semana_iso = ?1", vec![Value::Integer(i64::from(*week))])
            }
            ExportFilter::All => ("1 = 1", Vec::new()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportSummary {
    /// Data rows written, header excluded
    pub rows: usize,
    pub visits: usize,
}

/// Full header: visit columns, one-hot columns, conduct columns
pub fn header() -> Vec<String> {
    VISIT_COLUMNS
        .iter()
        .map(|c| c.to_string())
        .chain(Symptom::exportable().map(|s| format!("qs_sintoma_{}", s.label())))
        .chain(Region::exportable().map(|r| format!("qs_regiao_{}", r.label())))
        .chain(CONDUCT_COLUMNS.iter().map(|c| c.to_string()))
        .collect()
}

/// Writes flat CSV snapshots of one store
///
/// A visit with N conducts becomes N rows repeating the visit columns; a
/// visit without conducts becomes one row with empty conduct columns.
pub struct CsvExporter<'s> {
    store: &'s Store,
}

impl<'s> CsvExporter<'s> {
    pub fn new(store: &'s Store) -> Self {
        Self { store }
    }

    /// Write the visits matching `filter` to `path`
    ///
    /// # Errors
    ///
    /// `Export` for any I/O or query failure. Whatever was written before
    /// the failure stays on disk.
    pub fn export(&self, path: &Path, filter: &ExportFilter) -> Result<ExportSummary> {
        let summary = self
            .write_csv(path, filter)
            .map_err(|e| export_error(path, e))?;
        tracing::info!(
            path = %path.display(),
            rows = summary.rows,
            visits = summary.visits,
            "CSV export written"
        );
        Ok(summary)
    }

    fn write_csv(&self, path: &Path, filter: &ExportFilter) -> Result<ExportSummary> {
        let mut file = File::create(path).map_err(|e| io_error("export_create", e))?;
        file.write_all(UTF8_BOM)
            .map_err(|e| io_error("export_write", e))?;

        let mut writer = csv::Writer::from_writer(file);
        writer.write_record(header()).map_err(from_csv)?;

        let (clause, params) = filter.where_clause();
        let sql = format!(
            "SELECT {}, {} FROM atendimentos a \
             LEFT JOIN condutas c ON c.atendimento_id = a.id \
             WHERE {} \
             ORDER BY a.data_atendimento, a.hora_atendimento, a.id, c.id",
            VISIT_SELECT, CONDUCT_SELECT, clause
        );
        let mut stmt = self.store.conn().prepare(&sql).map_err(from_rusqlite)?;
        let mut rows = stmt
            .query(rusqlite::params_from_iter(params))
            .map_err(from_rusqlite)?;

        let mut summary = ExportSummary::default();
        let mut last_visit = None;
        while let Some(row) = rows.next().map_err(from_rusqlite)? {
            let visit = VisitRow::read(row).map_err(from_rusqlite)?;
            let conduct = read_conduct(row).map_err(from_rusqlite)?;
            if last_visit != Some(visit.id) {
                summary.visits += 1;
                last_visit = Some(visit.id);
            }
            writer
                .write_record(record(&visit, conduct.as_ref()))
                .map_err(from_csv)?;
            summary.rows += 1;
        }

        writer
            .flush()
            .map_err(|e| io_error("export_flush", e))?;
        Ok(summary)
    }
}

fn one_hot(selected: bool) -> String {
    if selected { "1" } else { "0" }.to_string()
}

fn record(visit: &VisitRow, conduct: Option<&Conduct>) -> Vec<String> {
    let d = &visit.details;
    let mut fields = vec![
        visit.id.to_string(),
        d.identity.badge_number.clone(),
        d.identity.name.clone(),
        d.identity.login.clone(),
        d.identity.manager.clone(),
        d.identity.shift.clone(),
        d.identity.department.clone(),
        d.identity.process.clone(),
        d.identity.tenure.clone(),
        label_text(&d.principal.symptom),
        label_text(&d.principal.region),
        d.history.current_complaint_history.clone(),
        d.vitals.temperature.clone(),
        d.vitals.systolic_pressure.clone(),
        d.vitals.diastolic_pressure.clone(),
        d.vitals.heart_rate.clone(),
        d.vitals.saturation.clone(),
        d.history.preexisting_conditions.clone(),
        d.history.allergies.clone(),
        d.history.medications_in_use.clone(),
        d.history.notes.clone(),
        visit.date.clone(),
        visit.time.clone(),
        visit.iso_week.to_string(),
    ];

    fields.extend(Symptom::exportable().map(|s| one_hot(d.secondary.symptoms.contains(&s))));
    fields.extend(Region::exportable().map(|r| one_hot(d.secondary.regions.contains(&r))));

    match conduct {
        Some(c) => fields.extend([
            c.id.map(|id| id.to_string()).unwrap_or_default(),
            c.hypothesis.clone(),
            c.conduct_taken.clone(),
            label_text(&c.summary),
            label_text(&c.administered_medication),
            c.medication.clone(),
            c.dosage.clone(),
            c.medication_time.clone(),
            c.notes.clone(),
        ]),
        None => fields.extend(std::iter::repeat(String::new()).take(CONDUCT_COLUMNS.len())),
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_layout() {
        let header = header();
        assert_eq!(
            header.len(),
            VISIT_COLUMNS.len() + 14 + 11 + CONDUCT_COLUMNS.len()
        );
        assert_eq!(header[0], "id_atendimento");
        assert!(header.contains(&"qs_sintoma_Dor".to_string()));
        assert!(header.contains(&"qs_regiao_Mãos/Dedos".to_string()));
        assert!(!header.iter().any(|h| h == "qs_sintoma_N/A"));
        assert_eq!(header.last().map(String::as_str), Some("observacoes_conduta"));
    }
}

use super::catalog::{ConductSummary, Region, Symptom};
use super::conduct::Conduct;
use crate::errors::{EnfermariaError, Result};
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// Identification block, also returned alone by the last-visit lookup
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatientIdentity {
    pub badge_number: String,
    pub name: String,
    pub login: String,
    pub manager: String,
    pub shift: String,
    pub department: String,
    pub process: String,
    /// Admission date as typed (`dd/mm/YYYY`)
    pub tenure: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrincipalComplaint {
    pub symptom: Option<Symptom>,
    pub region: Option<Region>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecondaryComplaint {
    pub symptoms: Vec<Symptom>,
    pub regions: Vec<Region>,
}

/// Vital signs, kept as typed so "N/A" and partial readings survive
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vitals {
    pub temperature: String,
    pub systolic_pressure: String,
    pub diastolic_pressure: String,
    pub heart_rate: String,
    pub saturation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MedicalHistory {
    /// History of the current complaint (HQA)
    pub current_complaint_history: String,
    pub preexisting_conditions: String,
    pub allergies: String,
    pub medications_in_use: String,
    pub notes: String,
}

/// Everything about a visit that may be edited after creation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisitDetails {
    pub identity: PatientIdentity,
    pub principal: PrincipalComplaint,
    pub secondary: SecondaryComplaint,
    pub vitals: Vitals,
    pub history: MedicalHistory,
    pub conducts: Vec<Conduct>,
}

/// Creation stamp of a visit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedAt {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub iso_week: u32,
}

impl RecordedAt {
    /// Stamp at second precision
    pub fn at(now: NaiveDateTime) -> Self {
        let time = now.time();
        let time = NaiveTime::from_hms_opt(time.hour(), time.minute(), time.second()).unwrap_or(time);
        Self {
            date: now.date(),
            time,
            iso_week: now.date().iso_week().week(),
        }
    }

    /// Rebuild from the stored text columns
    pub fn parse(date: &str, time: &str, iso_week: i64) -> Result<Self> {
        let date = NaiveDate::parse_from_str(date, DATE_FORMAT).map_err(|e| {
            EnfermariaError::InvalidRecordedAt {
                reason: format!("date '{}': {}", date, e),
            }
        })?;
        let time = NaiveTime::parse_from_str(time, TIME_FORMAT).map_err(|e| {
            EnfermariaError::InvalidRecordedAt {
                reason: format!("time '{}': {}", time, e),
            }
        })?;
        let iso_week = u32::try_from(iso_week).map_err(|_| EnfermariaError::InvalidRecordedAt {
            reason: format!("iso week {}", iso_week),
        })?;
        Ok(Self {
            date,
            time,
            iso_week,
        })
    }

    pub fn date_str(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }

    pub fn time_str(&self) -> String {
        self.time.format(TIME_FORMAT).to_string()
    }
}

/// One patient encounter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visit {
    /// Assigned by the store on save
    pub id: Option<i64>,
    pub recorded: RecordedAt,
    pub details: VisitDetails,
}

impl Visit {
    pub fn new(details: VisitDetails, now: NaiveDateTime) -> Self {
        Self {
            id: None,
            recorded: RecordedAt::at(now),
            details,
        }
    }

    pub fn badge_number(&self) -> &str {
        &self.details.identity.badge_number
    }

    pub fn conducts(&self) -> &[Conduct] {
        &self.details.conducts
    }
}

/// Row of the history listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisitSummary {
    pub id: i64,
    pub badge_number: String,
    pub name: String,
    pub login: String,
    pub date: String,
    pub time: String,
    pub principal_symptom: Option<Symptom>,
    pub first_conduct_summary: Option<ConductSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, hh: u32, mm: u32, ss: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_milli_opt(hh, mm, ss, 750)
            .unwrap()
    }

    #[test]
    fn test_new_visit_stamps_date_time_and_week() {
        let visit = Visit::new(VisitDetails::default(), at(2024, 1, 1, 8, 5, 9));
        assert_eq!(visit.id, None);
        assert_eq!(visit.recorded.date_str(), "2024-01-01");
        assert_eq!(visit.recorded.time_str(), "08:05:09");
        assert_eq!(visit.recorded.iso_week, 1);
    }

    #[test]
    fn test_iso_week_across_year_boundary() {
        // 2021-01-03 is a Sunday in ISO week 53 of 2020
        let stamp = RecordedAt::at(at(2021, 1, 3, 12, 0, 0));
        assert_eq!(stamp.iso_week, 53);
    }

    #[test]
    fn test_parse_rejects_bad_columns() {
        assert!(RecordedAt::parse("2024-02-30", "10:00:00", 9).is_err());
        assert!(RecordedAt::parse("2024-02-10", "25:00:00", 6).is_err());
        assert!(RecordedAt::parse("2024-02-10", "10:00:00", -1).is_err());
        let ok = RecordedAt::parse("2024-02-10", "10:00:00", 6).unwrap();
        assert_eq!(ok.time_str(), "10:00:00");
    }

    #[test]
    fn test_details_deserialize_with_missing_sections() {
        let json = r#"{
            "identity": { "badge_number": "12345", "name": "Paciente" },
            "principal": { "symptom": "Dor", "region": "Braços" },
            "secondary": { "symptoms": ["Vertigem"] }
        }"#;
        let details: VisitDetails = serde_json::from_str(json).unwrap();
        assert_eq!(details.identity.badge_number, "12345");
        assert_eq!(details.principal.symptom, Some(Symptom::Pain));
        assert_eq!(details.secondary.symptoms, vec![Symptom::Vertigo]);
        assert!(details.secondary.regions.is_empty());
        assert!(details.conducts.is_empty());
    }
}

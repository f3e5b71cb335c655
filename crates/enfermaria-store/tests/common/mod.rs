#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use enfermaria_core::model::{
    AdministeredMedication, Conduct, ConductSummary, MedicalHistory, PatientIdentity,
    PrincipalComplaint, Region, SecondaryComplaint, Symptom, Visit, VisitDetails, Vitals,
};
use enfermaria_store::Store;

pub fn new_store() -> Store {
    let mut store = Store::open_in_memory().expect("in-memory store");
    store.ensure_schema().expect("schema");
    store
}

pub fn at(date: &str, time: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(&format!("{} {}", date, time), "%Y-%m-%d %H:%M:%S")
        .expect("valid timestamp")
}

pub fn day(date: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").expect("valid date")
}

pub fn conduct(hypothesis: &str, summary: ConductSummary) -> Conduct {
    Conduct {
        hypothesis: hypothesis.to_string(),
        conduct_taken: "Repouso".to_string(),
        summary: Some(summary),
        administered_medication: Some(AdministeredMedication::Dipyrone),
        dosage: "500mg".to_string(),
        medication_time: "10:15".to_string(),
        notes: "Sem intercorrências".to_string(),
        ..Default::default()
    }
}

pub fn details(badge: &str, name: &str, conducts: Vec<Conduct>) -> VisitDetails {
    VisitDetails {
        identity: PatientIdentity {
            badge_number: badge.to_string(),
            name: name.to_string(),
            login: format!("login{}", badge),
            manager: "GESTOR TESTE (GTESTE)".to_string(),
            shift: "Blue Day".to_string(),
            department: "ICQA".to_string(),
            process: "Pick".to_string(),
            tenure: "15/03/2022".to_string(),
        },
        principal: PrincipalComplaint {
            symptom: Some(Symptom::Pain),
            region: Some(Region::Head),
        },
        secondary: SecondaryComplaint {
            symptoms: vec![Symptom::Pain, Symptom::Vertigo],
            regions: vec![Region::Head],
        },
        vitals: Vitals {
            temperature: "36.7".to_string(),
            systolic_pressure: "120".to_string(),
            diastolic_pressure: "80".to_string(),
            heart_rate: "72".to_string(),
            saturation: "98".to_string(),
        },
        history: MedicalHistory {
            current_complaint_history: "Cefaleia desde o início do turno".to_string(),
            preexisting_conditions: "Nenhuma".to_string(),
            allergies: "Dipirona? não".to_string(),
            medications_in_use: "Nenhum".to_string(),
            notes: "Linha com, vírgula e \"aspas\"".to_string(),
        },
        conducts,
    }
}

pub fn visit(badge: &str, when: NaiveDateTime, conducts: Vec<Conduct>) -> Visit {
    Visit::new(details(badge, "Paciente Teste", conducts), when)
}

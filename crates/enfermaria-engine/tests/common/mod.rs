#![allow(dead_code)]

use chrono::NaiveDateTime;
use enfermaria_config::AppConfig;
use enfermaria_core::model::PatientIdentity;
use enfermaria_engine::Session;
use tempfile::TempDir;

/// A session over a fresh store inside its own configuration directory
pub fn new_session() -> (TempDir, Session) {
    let dir = TempDir::new().expect("temp dir");
    let config = AppConfig::load_from(dir.path()).expect("config");
    let store = dir.path().join("atendimentos.db");
    let session = Session::start_with_store(config, &store).expect("session");
    (dir, session)
}

pub fn identity(badge: &str) -> PatientIdentity {
    PatientIdentity {
        badge_number: badge.to_string(),
        name: "Carlos Souza".to_string(),
        login: "csouza".to_string(),
        manager: "GESTOR TESTE (GTESTE)".to_string(),
        shift: "Blue Night".to_string(),
        department: "Outbound".to_string(),
        process: "Pack".to_string(),
        tenure: "01/02/2021".to_string(),
    }
}

pub fn at(text: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S").expect("valid timestamp")
}

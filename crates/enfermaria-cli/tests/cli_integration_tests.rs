//! CLI integration tests
//!
//! Drive the `enfermaria` binary against a scratch configuration directory
//! and check the store and export it leaves behind.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use rusqlite::Connection;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn run(config_dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_enfermaria"))
        .current_dir(config_dir)
        .env("ENFERMARIA_LOGGING__PROFILE", "test")
        .arg("--config-dir")
        .arg(config_dir)
        .args(args)
        .output()
        .expect("Failed to execute CLI")
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "CLI command should succeed. Stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

fn init(temp_dir: &TempDir) -> std::path::PathBuf {
    let db_path = temp_dir.path().join("atendimentos.db");
    let output = run(temp_dir.path(), &["init", "--db", db_path.to_str().unwrap()]);
    assert_success(&output);
    db_path
}

#[test]
fn test_cli_without_store_points_to_init() {
    // Given: No store configured
    let temp_dir = TempDir::new().unwrap();

    // When: A visit command runs
    let output = run(temp_dir.path(), &["visit", "list"]);

    // Then: It fails and names the init command
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERR_STORAGE_UNAVAILABLE"), "stderr: {}", stderr);
    assert!(stderr.contains("enfermaria init"), "stderr: {}", stderr);
}

#[test]
fn test_cli_init_then_add_visit_with_conducts() {
    // Given: An initialised store
    let temp_dir = TempDir::new().unwrap();
    let db_path = init(&temp_dir);
    assert!(temp_dir.path().join("enfermaria.toml").is_file());

    // When: A visit with two conducts is added
    let output = run(
        temp_dir.path(),
        &[
            "visit",
            "add",
            "--badge",
            "1234",
            "--name",
            "Paciente CLI",
            "--symptom",
            "Dor",
            "--region",
            "Cabeça",
            "--secondary-symptom",
            "Vertigem",
            "--temperature",
            "36.9",
            "--conduct",
            r#"{"hypothesis":"Cefaleia","summary":"Em observação"}"#,
            "--conduct",
            r#"{"hypothesis":"Tensão","summary":"Liberado para operação"}"#,
        ],
    );

    // Then: It succeeds and both conducts reach the store
    assert_success(&output);
    assert!(String::from_utf8_lossy(&output.stdout).contains("Visit saved"));

    let conn = Connection::open(&db_path).unwrap();
    let conducts: i64 = conn
        .query_row("SELECT COUNT(*) FROM condutas", [], |row| row.get(0))
        .unwrap();
    assert_eq!(conducts, 2);
    let secondary: String = conn
        .query_row(
            "SELECT queixa_secundaria_sintomas FROM atendimentos",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(secondary, r#"["Vertigem"]"#);
}

#[test]
fn test_cli_sanitary_pad_masks_clinical_fields() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = init(&temp_dir);

    let output = run(
        temp_dir.path(),
        &["visit", "add", "--badge", "2345", "--symptom", "Absorvente"],
    );
    assert_success(&output);

    let conn = Connection::open(&db_path).unwrap();
    let (tax, summary): (String, String) = conn
        .query_row(
            "SELECT a.tax, c.resumo_conduta FROM atendimentos a
             JOIN condutas c ON c.atendimento_id = a.id",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert_eq!(tax, "N/A");
    assert_eq!(summary, "N/A");

    // A masked field cannot be typed into
    let output = run(
        temp_dir.path(),
        &[
            "visit",
            "add",
            "--badge",
            "2345",
            "--symptom",
            "Absorvente",
            "--temperature",
            "37",
        ],
    );
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("ERR_FIELD_DISABLED"));
}

#[test]
fn test_cli_misspelled_symptom_saves_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = init(&temp_dir);

    let output = run(
        temp_dir.path(),
        &["visit", "add", "--badge", "4567", "--symptom", "Dorr"],
    );

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERR_INVALID_INPUT"), "stderr: {}", stderr);
    let conn = Connection::open(&db_path).unwrap();
    let visits: i64 = conn
        .query_row("SELECT COUNT(*) FROM atendimentos", [], |row| row.get(0))
        .unwrap();
    assert_eq!(visits, 0);
}

#[test]
fn test_cli_export_all_writes_bom_and_rows() {
    // Given: A store with one visit
    let temp_dir = TempDir::new().unwrap();
    init(&temp_dir);
    assert_success(&run(
        temp_dir.path(),
        &["visit", "add", "--badge", "3456", "--symptom", "Vertigem"],
    ));

    // When: Everything is exported
    let out = temp_dir.path().join("saida.csv");
    let output = run(
        temp_dir.path(),
        &["export", "--all", "--out", out.to_str().unwrap()],
    );

    // Then: The file has a BOM, a header and one data row
    assert_success(&output);
    let bytes = std::fs::read(&out).unwrap();
    assert!(bytes.starts_with(b"\xEF\xBB\xBF"));
    let text = String::from_utf8(bytes[3..].to_vec()).unwrap();
    assert_eq!(text.lines().count(), 2);
    assert!(text.starts_with("id_atendimento,badge_number"));
}

#[test]
fn test_cli_options_add_and_show() {
    let temp_dir = TempDir::new().unwrap();
    init(&temp_dir);

    assert_success(&run(
        temp_dir.path(),
        &["options", "add", "gestores", "Ana Lima (ALIMA)"],
    ));
    let output = run(temp_dir.path(), &["options", "show", "gestores"]);

    assert_success(&output);
    assert!(String::from_utf8_lossy(&output.stdout).contains("Ana Lima (ALIMA)"));
    assert!(temp_dir.path().join("opcoes.json").is_file());
}

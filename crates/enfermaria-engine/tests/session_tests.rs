#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{at, identity, new_session};
use enfermaria_config::AppConfig;
use enfermaria_core::errors::EnfErrorKind;
use enfermaria_core::form::{ConductField, FieldId, FieldValue, FormMode, VisitField};
use enfermaria_core::model::{ConductSummary, Region, Symptom, NOT_APPLICABLE};
use enfermaria_core::options::{OptionCategory, OptionSets};
use enfermaria_engine::{EngineCommand, EngineCommandResult, EngineQuery, EngineQueryResult, Session};
use enfermaria_store::ExportFilter;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn text(value: &str) -> FieldValue {
    FieldValue::Text(value.to_string())
}

fn get(session: &Session, id: i64) -> enfermaria_core::model::Visit {
    match session.query(EngineQuery::VisitGet { id }).unwrap() {
        EngineQueryResult::Visit(visit) => *visit,
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_start_without_configured_store_is_storage_unavailable() {
    // Given: A configuration directory with no store chosen yet
    let dir = TempDir::new().unwrap();
    let config = AppConfig::load_from(dir.path()).unwrap();

    // When: A session is started
    let err = Session::start(config).err().expect("start should fail");

    // Then: The caller is told to pick a store
    assert_eq!(err.kind(), EnfErrorKind::StorageUnavailable);
}

#[test]
fn test_chosen_store_is_remembered_for_next_start() {
    // Given: A first session that picked a store file
    let (dir, first) = new_session();
    assert_eq!(first.schema_report().applied.len(), 4);
    drop(first);

    // When: The application starts again from the saved configuration
    let config = AppConfig::load_from(dir.path()).unwrap();
    let second = Session::start(config).unwrap();

    // Then: The same store opens and no migration runs twice
    assert_eq!(
        second.store().path(),
        Some(dir.path().join("atendimentos.db").as_path())
    );
    assert!(second.schema_report().applied.is_empty());
}

#[test]
fn test_store_in_missing_directory_is_storage_unavailable() {
    let dir = TempDir::new().unwrap();
    let config = AppConfig::load_from(dir.path()).unwrap();

    let err = Session::start_with_store(config, &dir.path().join("nada").join("x.db"))
        .err()
        .expect("start should fail");

    assert_eq!(err.kind(), EnfErrorKind::StorageUnavailable);
}

#[test]
fn test_ordinary_form_round_trips_through_store() {
    // Given: A form filled for a headache
    let (_dir, mut session) = new_session();
    assert_eq!(session.on_principal_complaint_changed("Dor").unwrap(), FormMode::Unrestricted);
    let section = session.form().conduct_sections()[0];
    session
        .set_field(FieldId::Visit(VisitField::PrincipalRegion), text("Cabeça"))
        .unwrap();
    session
        .set_field(FieldId::Visit(VisitField::Temperature), text("37.2"))
        .unwrap();
    session
        .set_field(
            FieldId::Conduct(section, ConductField::Summary),
            text("Liberado para operação"),
        )
        .unwrap();

    // When: The form is saved
    let id = session
        .save_form(identity("1234"), at("2024-09-03 07:45:00"))
        .unwrap();

    // Then: The stored visit holds the entered values
    let visit = get(&session, id);
    assert_eq!(visit.details.principal.symptom, Some(Symptom::Pain));
    assert_eq!(visit.details.principal.region, Some(Region::Head));
    assert_eq!(visit.details.vitals.temperature, "37.2");
    assert_eq!(visit.conducts().len(), 1);
    assert_eq!(
        visit.conducts()[0].summary,
        Some(ConductSummary::ReleasedToWork)
    );

    // And: The form is blank again
    assert_eq!(
        session
            .form()
            .field(&FieldId::Visit(VisitField::Temperature))
            .unwrap()
            .value,
        text("")
    );
}

#[test]
fn test_misspelled_principal_symptom_is_refused() {
    // Given: A form with a principal complaint already chosen
    let (_dir, mut session) = new_session();
    session.on_principal_complaint_changed("Dor").unwrap();

    // When: A label outside the enumeration is selected
    let err = session.on_principal_complaint_changed("Dorr").unwrap_err();

    // Then: It is invalid input and the earlier choice is what gets saved
    assert_eq!(err.kind(), EnfErrorKind::InvalidInput);
    assert_eq!(err.code(), "ERR_INVALID_INPUT");
    let id = session
        .save_form(identity("1234"), at("2024-09-03 08:00:00"))
        .unwrap();
    assert_eq!(
        get(&session, id).details.principal.symptom,
        Some(Symptom::Pain)
    );
}

#[test]
fn test_sanitary_pad_visit_is_stored_with_not_applicable_values() {
    // Given: A form where the temperature was typed before the sentinel
    let (_dir, mut session) = new_session();
    session
        .set_field(FieldId::Visit(VisitField::Temperature), text("36.5"))
        .unwrap();

    // When: "Absorvente" is selected and the form saved
    assert_eq!(
        session.on_principal_complaint_changed("Absorvente").unwrap(),
        FormMode::FullyMasked
    );
    let err = session
        .set_field(FieldId::Visit(VisitField::Temperature), text("37"))
        .unwrap_err();
    assert_eq!(err.kind(), EnfErrorKind::FieldDisabled);
    let id = session
        .save_form(identity("2345"), at("2024-09-03 09:00:00"))
        .unwrap();

    // Then: Masked fields were stored as N/A
    let visit = get(&session, id);
    assert_eq!(visit.details.principal.symptom, Some(Symptom::SanitaryPad));
    assert_eq!(visit.details.vitals.temperature, NOT_APPLICABLE);
    assert_eq!(visit.details.principal.region, Some(Region::NotApplicable));
    assert!(visit.details.secondary.symptoms.is_empty());
    assert_eq!(
        visit.conducts()[0].summary,
        Some(ConductSummary::NotApplicable)
    );
}

#[test]
fn test_work_at_height_keeps_pressure_and_summary() {
    // Given: Pressure and a conduct summary entered on a two-section form
    let (_dir, mut session) = new_session();
    let second = session.form_mut().add_conduct_section();
    session
        .set_field(FieldId::Visit(VisitField::SystolicPressure), text("130"))
        .unwrap();
    session
        .set_field(FieldId::Visit(VisitField::HeartRate), text("88"))
        .unwrap();
    session
        .set_field(
            FieldId::Conduct(second, ConductField::Summary),
            text("Apto para trabalho em altura"),
        )
        .unwrap();

    // When: "Trabalho em altura" is selected and the form saved
    assert_eq!(
        session.on_principal_complaint_changed("Trabalho em altura").unwrap(),
        FormMode::PartiallyMasked
    );
    let id = session
        .save_form(identity("3456"), at("2024-09-03 10:00:00"))
        .unwrap();

    // Then: The exempt values survive and the rest is N/A
    let visit = get(&session, id);
    assert_eq!(visit.details.vitals.systolic_pressure, "130");
    assert_eq!(visit.details.vitals.heart_rate, NOT_APPLICABLE);
    assert_eq!(visit.conducts().len(), 2);
    assert_eq!(
        visit.conducts()[1].summary,
        Some(ConductSummary::FitForWorkAtHeight)
    );
    assert_eq!(visit.conducts()[1].hypothesis, NOT_APPLICABLE);
}

#[test]
fn test_update_form_keeps_timestamp_and_replaces_conducts() {
    // Given: A saved visit with two conducts
    let (_dir, mut session) = new_session();
    session.form_mut().add_conduct_section();
    let id = session
        .save_form(identity("4567"), at("2024-09-02 22:10:05"))
        .unwrap();
    assert_eq!(get(&session, id).conducts().len(), 2);

    // When: It is edited down to one conduct with new notes
    session.edit_visit(id).unwrap();
    let sections = session.form().conduct_sections().to_vec();
    assert_eq!(sections.len(), 2);
    session.form_mut().remove_conduct_section(sections[1]);
    session
        .set_field(FieldId::Visit(VisitField::Notes), text("Retorno"))
        .unwrap();
    session.update_form(id, identity("4567")).unwrap();

    // Then: Notes and conducts change, date and time do not
    let visit = get(&session, id);
    assert_eq!(visit.details.history.notes, "Retorno");
    assert_eq!(visit.conducts().len(), 1);
    assert_eq!(visit.recorded.date_str(), "2024-09-02");
    assert_eq!(visit.recorded.time_str(), "22:10:05");
}

#[test]
fn test_missing_visit_is_not_found_with_request_id() {
    let (_dir, mut session) = new_session();

    let err = session.query(EngineQuery::VisitGet { id: 404 }).unwrap_err();
    assert_eq!(err.kind(), EnfErrorKind::NotFound);
    assert!(err.request_id().is_some());

    let err = session.edit_visit(404).unwrap_err();
    assert_eq!(err.kind(), EnfErrorKind::NotFound);

    let err = session
        .execute(EngineCommand::VisitDelete { id: 404 })
        .unwrap_err();
    assert_eq!(err.kind(), EnfErrorKind::NotFound);
}

#[test]
fn test_reversed_range_is_invalid_input() {
    let (_dir, session) = new_session();

    let err = session
        .query(EngineQuery::VisitRange {
            start: at("2024-09-03 10:00:00"),
            end: at("2024-09-03 09:00:00"),
            badge: None,
        })
        .unwrap_err();

    assert_eq!(err.kind(), EnfErrorKind::InvalidInput);
}

#[test]
fn test_last_identity_prefills_returning_patient() {
    let (_dir, mut session) = new_session();
    session
        .save_form(identity("5678"), at("2024-09-01 08:00:00"))
        .unwrap();

    let result = session
        .query(EngineQuery::LastIdentity {
            badge: "5678".to_string(),
        })
        .unwrap();

    assert_eq!(result, EngineQueryResult::LastIdentity(Some(identity("5678"))));
}

#[test]
fn test_export_command_writes_file() {
    // Given: Two visits on one day
    let (dir, mut session) = new_session();
    session
        .save_form(identity("6789"), at("2024-09-05 08:00:00"))
        .unwrap();
    session
        .save_form(identity("6790"), at("2024-09-05 09:00:00"))
        .unwrap();
    let path = dir.path().join("export.csv");

    // When: That day is exported
    let result = session
        .execute(EngineCommand::Export {
            path: path.clone(),
            filter: ExportFilter::today(at("2024-09-05 00:00:00").date()),
        })
        .unwrap();

    // Then: One row per conduct section, one visit each
    match result {
        EngineCommandResult::Exported(summary) => {
            assert_eq!(summary.visits, 2);
            assert_eq!(summary.rows, 2);
        }
        other => panic!("unexpected result: {:?}", other),
    }
    assert!(path.is_file());
}

#[test]
fn test_option_edits_persist_and_reload() {
    // Given: A session with the default option sets
    let (_dir, mut session) = new_session();
    assert!(session.options().values(OptionCategory::Managers).is_empty());

    // When: A manager is added
    session
        .add_option(OptionCategory::Managers, "Ana Lima (ALIMA)")
        .unwrap();

    // Then: The file holds it and a reload sees it
    let on_disk = OptionSets::load(&session.config().options_path()).unwrap();
    assert!(on_disk.contains(OptionCategory::Managers, "Ana Lima (ALIMA)"));
    assert!(session
        .reload_options()
        .contains(OptionCategory::Managers, "Ana Lima (ALIMA)"));

    // And: Duplicates and unknown removals are refused
    let dup = session
        .add_option(OptionCategory::Managers, "ana lima (alima)")
        .unwrap_err();
    assert_eq!(dup.kind(), EnfErrorKind::InvalidInput);
    let missing = session
        .remove_option(OptionCategory::Managers, "Ninguém")
        .unwrap_err();
    assert_eq!(missing.kind(), EnfErrorKind::NotFound);
}

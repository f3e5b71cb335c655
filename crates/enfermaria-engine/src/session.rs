//! Startup sequence and the live state behind one operator session
//!
//! A session owns the open store, the option sets and the visit form. The
//! presentation layer talks to it only; nothing here touches a terminal.

use crate::{
    apply_engine_command, apply_engine_query, EngineCommand, EngineCommandResult, EngineQuery,
    EngineQueryResult,
};
use chrono::NaiveDateTime;
use enfermaria_config::{AppConfig, ConfigError};
use enfermaria_core::errors::{EnfError, EnfErrorKind};
use enfermaria_core::form::{FieldId, FieldValue, FormMode, FormState};
use enfermaria_core::model::{PatientIdentity, Visit, VisitDetails};
use enfermaria_core::options::{OptionCategory, OptionSets};
use enfermaria_store::errors::Result;
use enfermaria_store::{SchemaReport, Store};
use std::path::Path;

pub struct Session {
    config: AppConfig,
    store: Store,
    options: OptionSets,
    form: FormState,
    schema: SchemaReport,
}

impl Session {
    /// Open the configured store
    ///
    /// # Errors
    ///
    /// `StorageUnavailable` when no store is configured or its file is gone;
    /// the caller should ask for a path and use [`Session::start_with_store`].
    pub fn start(config: AppConfig) -> Result<Self> {
        let path = config.resolved_database_path().ok_or_else(|| {
            EnfError::new(EnfErrorKind::StorageUnavailable)
                .with_op("session_start")
                .with_message("No store file configured")
        })?;
        Self::open(config, &path)
    }

    /// Open (or create) the store at `path` and remember it in the
    /// configuration file
    ///
    /// # Errors
    ///
    /// `StorageUnavailable` if the store cannot be opened, `Io` if the
    /// configuration file cannot be written.
    pub fn start_with_store(mut config: AppConfig, path: &Path) -> Result<Self> {
        let store = Store::open(path)?;
        config
            .save_database_path(path)
            .map_err(|e| config_error(&config, e))?;
        Self::with_store(config, store)
    }

    fn open(config: AppConfig, path: &Path) -> Result<Self> {
        let store = Store::open(path)?;
        Self::with_store(config, store)
    }

    fn with_store(config: AppConfig, mut store: Store) -> Result<Self> {
        let schema = store.ensure_schema()?;
        for warning in &schema.warnings {
            tracing::warn!(warning = %warning, "Store schema is incomplete");
        }
        let options = OptionSets::load_or_default(&config.options_path());
        tracing::info!(
            store = ?store.path(),
            migrations_applied = schema.applied.len(),
            "Session started"
        );
        Ok(Self {
            config,
            store,
            options,
            form: FormState::standard(),
            schema,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// What the startup schema check did
    pub fn schema_report(&self) -> &SchemaReport {
        &self.schema
    }

    /// # Errors
    ///
    /// See [`apply_engine_command`].
    pub fn execute(&mut self, cmd: EngineCommand) -> Result<EngineCommandResult> {
        apply_engine_command(cmd, &mut self.store)
    }

    /// # Errors
    ///
    /// See [`apply_engine_query`].
    pub fn query(&self, query: EngineQuery) -> Result<EngineQueryResult> {
        apply_engine_query(query, &self.store)
    }

    // ===== Option sets =====

    pub fn options(&self) -> &OptionSets {
        &self.options
    }

    /// Re-read the option-sets file after an outside edit
    pub fn reload_options(&mut self) -> &OptionSets {
        self.options = OptionSets::load_or_default(&self.config.options_path());
        &self.options
    }

    /// # Errors
    ///
    /// `Io` or `Serialization` if the file cannot be written.
    pub fn save_options(&self) -> Result<()> {
        self.options
            .save(&self.config.options_path())
            .map_err(EnfError::from)
    }

    /// Add an item and rewrite the file
    ///
    /// # Errors
    ///
    /// `InvalidInput` for a blank or duplicate item; nothing is written.
    pub fn add_option(&mut self, category: OptionCategory, item: &str) -> Result<()> {
        self.options.add(category, item).map_err(EnfError::from)?;
        self.save_options()
    }

    /// Remove an item and rewrite the file
    ///
    /// # Errors
    ///
    /// `NotFound` if the item is not in the list.
    pub fn remove_option(&mut self, category: OptionCategory, item: &str) -> Result<()> {
        self.options.remove(category, item).map_err(EnfError::from)?;
        self.save_options()
    }

    // ===== Visit form =====

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormState {
        &mut self.form
    }

    /// Discard the form and start a blank one
    pub fn new_form(&mut self) {
        self.form = FormState::standard();
    }

    /// # Errors
    ///
    /// `InvalidInput` for a label outside the symptom enumeration; the form
    /// keeps its current mode.
    pub fn on_principal_complaint_changed(&mut self, label: &str) -> Result<FormMode> {
        self.form
            .on_principal_complaint_changed(label)
            .map_err(EnfError::from)
    }

    /// # Errors
    ///
    /// `FieldDisabled` while the field is masked, `InvalidInput` for a
    /// value that does not fit, `NotFound` for an unregistered field.
    pub fn set_field(&mut self, id: FieldId, value: FieldValue) -> Result<()> {
        self.form.set_value(id, value).map_err(EnfError::from)
    }

    /// Load a stored visit into the form for editing
    ///
    /// # Errors
    ///
    /// `NotFound` if the visit does not exist.
    pub fn edit_visit(&mut self, id: i64) -> Result<Visit> {
        let visit = self.get_visit(id)?;
        self.form.load_visit(&visit.details);
        Ok(visit)
    }

    /// Save the form as a new visit stamped `now`, then clear the form
    ///
    /// # Errors
    ///
    /// `InvalidInput` for a blank badge or a bad label, `Persistence` on
    /// SQLite failure. The form is kept on error.
    pub fn save_form(&mut self, identity: PatientIdentity, now: NaiveDateTime) -> Result<i64> {
        let mut details = VisitDetails {
            identity,
            ..VisitDetails::default()
        };
        self.form.write_into(&mut details).map_err(EnfError::from)?;

        let id = match self.execute(EngineCommand::VisitSave {
            visit: Visit::new(details, now),
        })? {
            EngineCommandResult::VisitSaved { id } => id,
            other => return Err(unexpected("save_form", &other)),
        };
        self.new_form();
        Ok(id)
    }

    /// Write the form over visit `id`, keeping its date and time
    ///
    /// # Errors
    ///
    /// `NotFound` if the visit is gone, plus the errors of [`Session::save_form`].
    pub fn update_form(&mut self, id: i64, identity: PatientIdentity) -> Result<()> {
        let mut visit = self.get_visit(id)?;
        visit.details.identity = identity;
        self.form
            .write_into(&mut visit.details)
            .map_err(EnfError::from)?;
        self.execute(EngineCommand::VisitUpdate { visit })?;
        self.new_form();
        Ok(())
    }

    fn get_visit(&self, id: i64) -> Result<Visit> {
        match self.query(EngineQuery::VisitGet { id })? {
            EngineQueryResult::Visit(visit) => Ok(*visit),
            other => Err(unexpected("visit_get", &other)),
        }
    }
}

fn config_error(config: &AppConfig, err: ConfigError) -> EnfError {
    EnfError::new(EnfErrorKind::Io)
        .with_op("config_save")
        .with_entity_id(config.file_path().display().to_string())
        .with_message(err.to_string())
}

fn unexpected(op: &str, result: &impl std::fmt::Debug) -> EnfError {
    EnfError::new(EnfErrorKind::Internal)
        .with_op(op.to_string())
        .with_message(format!("Unexpected engine result: {:?}", result))
}

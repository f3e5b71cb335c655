//! Enfermaria Core - occupational-health visit domain
//!
//! This crate holds everything that does not touch the database:
//! - Visit and Conduct models with the closed enumerations used by the forms
//! - Option sets (managers, shifts, departments, processes) with JSON persistence
//! - Visit validation rules
//! - The form-state engine driven by the principal-complaint selector
//! - The canonical error and logging facilities shared by the other crates

pub mod errors;
pub mod form;
pub mod logging_facility;
pub mod model;
pub mod options;
pub mod rules;

// Re-exported so the logging macros resolve without a direct dependency.
pub use enfermaria_core_types as core_types;

pub use errors::{EnfError, EnfErrorKind, EnfermariaError, Result};
pub use form::{FieldId, FieldValue, FieldView, FormMode, FormState};
pub use model::{Conduct, PatientIdentity, RecordedAt, Visit, VisitDetails};
pub use options::{OptionCategory, OptionSets};

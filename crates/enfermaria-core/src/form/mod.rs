//! Form-state engine
//!
//! The principal-complaint symptom selects one of three modes. Sentinel
//! symptoms disable the rest of the form and force "N/A" into it, except for
//! the fields listed in the active rule's exception set. The selector itself
//! is not a [`FieldId`] and can never be masked.

pub mod field;
pub mod rules;
pub mod state;

pub use field::{ConductField, ConductKey, FieldId, FieldKind, FieldValue, FieldView, VisitField};
pub use rules::{default_rules, ExceptionSet, FormMode, MaskRule};
pub use state::FormState;

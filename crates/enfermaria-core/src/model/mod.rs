//! Visit and Conduct model
//!
//! Labels of the closed enumerations are stored verbatim in the database and
//! in exports, so the Rust variants only exist to make illegal values
//! unrepresentable inside the process.

pub mod catalog;
pub mod conduct;
pub mod period;
pub mod visit;

pub use catalog::{AdministeredMedication, ConductSummary, Region, Symptom, NOT_APPLICABLE};
pub use conduct::Conduct;
pub use period::{tenure_days, HistoryPeriod};
pub use visit::{
    MedicalHistory, PatientIdentity, PrincipalComplaint, RecordedAt, SecondaryComplaint, Visit,
    VisitDetails, VisitSummary, Vitals,
};

use super::catalog::{AdministeredMedication, ConductSummary};
use serde::{Deserialize, Serialize};

/// One nursing action taken during a visit
///
/// Owned by its visit. On update the whole list is replaced, so `id` is only
/// meaningful for rows read back from the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Conduct {
    pub id: Option<i64>,
    /// Diagnostic hypothesis
    pub hypothesis: String,
    pub conduct_taken: String,
    pub summary: Option<ConductSummary>,
    pub administered_medication: Option<AdministeredMedication>,
    /// Free-text medication name, used with `AdministeredMedication::Other`
    pub medication: String,
    pub dosage: String,
    pub medication_time: String,
    pub notes: String,
}

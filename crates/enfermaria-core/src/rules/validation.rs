use crate::errors::{EnfermariaError, Result};
use crate::model::Visit;

/// Validate a visit before it is written
///
/// # Errors
///
/// `InvalidBadge` when the badge is blank, `InvalidRecordedAt` when the ISO
/// week is outside 1..=53.
pub fn validate_visit(visit: &Visit) -> Result<()> {
    validate_badge(visit.badge_number())?;
    if !(1..=53).contains(&visit.recorded.iso_week) {
        return Err(EnfermariaError::InvalidRecordedAt {
            reason: format!("iso week {} out of range", visit.recorded.iso_week),
        });
    }
    Ok(())
}

/// Badge numbers must be non-empty after trimming
///
/// # Errors
///
/// `InvalidBadge` when the badge is blank.
pub fn validate_badge(badge: &str) -> Result<()> {
    if badge.trim().is_empty() {
        return Err(EnfermariaError::InvalidBadge {
            reason: "badge number is required".to_string(),
        });
    }
    Ok(())
}

//! Core types shared across the enfermaria crates
//!
//! Foundational types used by both the error and logging facilities:
//!
//! - **Correlation**: `RequestId` stamped on every engine call
//! - **Sensitive data**: `Sensitive<T>` marker for patient-identifying values
//! - **Schema constants**: canonical log field keys and event names

pub mod correlation;
pub mod schema;
pub mod sensitive;

pub use correlation::RequestId;
pub use sensitive::Sensitive;

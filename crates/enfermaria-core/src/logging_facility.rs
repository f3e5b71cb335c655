//! Structured logging facility
//!
//! One initialization point (`init(profile)`) and three macros that every
//! operation boundary uses, so visit saves, exports and migrations all emit
//! the same `op`/`event`/`duration_ms` shape:
//!
//! - `log_op_start!(op, ...)`
//! - `log_op_end!(op, duration_ms = ...)`
//! - `log_op_error!(op, err, duration_ms = ...)`
//!
//! ```rust
//! use enfermaria_core::logging_facility::{init, Profile};
//!
//! init(Profile::Development);
//! ```
//!
//! Patient names and logins must be wrapped in
//! [`Sensitive`](enfermaria_core_types::Sensitive) before they reach a field.

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};

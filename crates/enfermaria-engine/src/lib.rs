//! Enfermaria Engine - Orchestration layer
//!
//! Runs the startup sequence (configuration, store, schema, option sets)
//! and dispatches every presentation-layer call as an `EngineCommand` or an
//! `EngineQuery` against the open store.

pub mod commands;
pub mod session;

pub use commands::engine_command::{apply_engine_command, EngineCommand, EngineCommandResult};
pub use commands::engine_query::{apply_engine_query, EngineQuery, EngineQueryResult};
pub use session::Session;

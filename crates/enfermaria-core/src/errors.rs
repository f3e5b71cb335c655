use enfermaria_core_types::RequestId;
use thiserror::Error;

/// Result type alias using EnfermariaError
pub type Result<T> = std::result::Result<T, EnfermariaError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every kind maps to a stable code that callers (the CLI, a GUI, tests)
/// can match on without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnfErrorKind {
    // Validation
    InvalidInput,
    FieldDisabled,

    // Lookup
    NotFound,

    // Storage
    /// Store path unset, parent directory missing or not writable
    StorageUnavailable,
    /// Constraint violation or SQLite failure; the transaction was rolled back
    Persistence,

    // CSV generation
    /// I/O or query failure while writing an export; a partial file may remain
    Export,

    // Integration/IO
    Io,
    Serialization,

    // Internal
    Internal,
}

impl EnfErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            EnfErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            EnfErrorKind::FieldDisabled => "ERR_FIELD_DISABLED",
            EnfErrorKind::NotFound => "ERR_NOT_FOUND",
            EnfErrorKind::StorageUnavailable => "ERR_STORAGE_UNAVAILABLE",
            EnfErrorKind::Persistence => "ERR_PERSISTENCE",
            EnfErrorKind::Export => "ERR_EXPORT",
            EnfErrorKind::Io => "ERR_IO",
            EnfErrorKind::Serialization => "ERR_SERIALIZATION",
            EnfErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification kind for programmatic handling plus optional
/// context (operation, entity id, request id) for debugging.
#[derive(Debug, Clone)]
pub struct EnfError {
    kind: EnfErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    request_id: Option<RequestId>,
    message: String,
    source: Option<Box<EnfError>>,
}

impl EnfError {
    /// Create a new error with the specified kind
    pub fn new(kind: EnfErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            request_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity ID context (visit id, badge, file path)
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Add request ID context
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: EnfError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> EnfErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source_error(&self) -> Option<&EnfError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for EnfError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for EnfError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Domain errors raised by the core (no database involved)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EnfermariaError {
    // ===== Validation Errors =====
    /// Badge number missing or blank
    #[error("Invalid badge number: {reason}")]
    InvalidBadge { reason: String },

    /// A label that is not a member of a closed enumeration
    #[error("Unknown {enumeration} label: '{label}'")]
    UnknownLabel {
        enumeration: &'static str,
        label: String,
    },

    /// Date, time or ISO week of a visit cannot be parsed
    #[error("Invalid visit timestamp: {reason}")]
    InvalidRecordedAt { reason: String },

    // ===== Form Errors =====
    /// The field is not registered with the form
    #[error("Field not registered: {field}")]
    FieldNotRegistered { field: String },

    /// The field is disabled by the active masking rule
    #[error("Field is disabled: {field}")]
    FieldDisabled { field: String },

    /// The value does not fit the field (wrong shape or unknown label)
    #[error("Invalid value for field {field}: {reason}")]
    InvalidFieldValue { field: String, reason: String },

    // ===== Option Set Errors =====
    /// Blank option item
    #[error("Option item for {category} cannot be blank")]
    BlankOption { category: String },

    /// Option item already present (case-insensitive)
    #[error("Option '{item}' already exists in {category}")]
    DuplicateOption { category: String, item: String },

    /// Option item not present
    #[error("Option '{item}' not found in {category}")]
    OptionNotFound { category: String, item: String },

    /// Reading or writing the option-sets file failed
    #[error("Option sets file error at {path}: {message}")]
    OptionSetsIo { path: String, message: String },

    /// JSON (de)serialization failure
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

/// Conversion from EnfermariaError to EnfError
impl From<EnfermariaError> for EnfError {
    fn from(err: EnfermariaError) -> Self {
        let message = err.to_string();
        match err {
            EnfermariaError::InvalidBadge { .. } | EnfermariaError::InvalidRecordedAt { .. } => {
                EnfError::new(EnfErrorKind::InvalidInput)
                    .with_op("validate_visit")
                    .with_message(message)
            }

            EnfermariaError::UnknownLabel { label, .. } => {
                EnfError::new(EnfErrorKind::InvalidInput)
                    .with_entity_id(label)
                    .with_message(message)
            }

            EnfermariaError::FieldNotRegistered { field } => {
                EnfError::new(EnfErrorKind::NotFound)
                    .with_op("form")
                    .with_entity_id(field)
                    .with_message(message)
            }

            EnfermariaError::FieldDisabled { field } => EnfError::new(EnfErrorKind::FieldDisabled)
                .with_op("form")
                .with_entity_id(field)
                .with_message(message),

            EnfermariaError::InvalidFieldValue { field, .. } => {
                EnfError::new(EnfErrorKind::InvalidInput)
                    .with_op("form")
                    .with_entity_id(field)
                    .with_message(message)
            }

            EnfermariaError::BlankOption { category }
            | EnfermariaError::DuplicateOption { category, .. } => {
                EnfError::new(EnfErrorKind::InvalidInput)
                    .with_op("options_edit")
                    .with_entity_id(category)
                    .with_message(message)
            }

            EnfermariaError::OptionNotFound { category, .. } => {
                EnfError::new(EnfErrorKind::NotFound)
                    .with_op("options_edit")
                    .with_entity_id(category)
                    .with_message(message)
            }

            EnfermariaError::OptionSetsIo { path, .. } => EnfError::new(EnfErrorKind::Io)
                .with_op("options_file")
                .with_entity_id(path)
                .with_message(message),

            EnfermariaError::Serialization { .. } => {
                EnfError::new(EnfErrorKind::Serialization).with_message(message)
            }
        }
    }
}

/// Conversion from serde_json::Error to EnfermariaError
impl From<serde_json::Error> for EnfermariaError {
    fn from(err: serde_json::Error) -> Self {
        EnfermariaError::Serialization {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_kind_codes() {
        let cases = [
            (EnfErrorKind::StorageUnavailable, "ERR_STORAGE_UNAVAILABLE"),
            (EnfErrorKind::Persistence, "ERR_PERSISTENCE"),
            (EnfErrorKind::Export, "ERR_EXPORT"),
            (EnfErrorKind::NotFound, "ERR_NOT_FOUND"),
        ];
        for (kind, expected_code) in cases {
            assert_eq!(kind.code(), expected_code, "Wrong code for {:?}", kind);
        }
    }

    #[test]
    fn test_display_includes_op_and_entity() {
        let err = EnfError::new(EnfErrorKind::NotFound)
            .with_op("visit_get")
            .with_entity_id("42")
            .with_message("Visit not found");
        let rendered = err.to_string();
        assert_eq!(
            rendered,
            "[ERR_NOT_FOUND] in operation 'visit_get': Visit not found (entity_id: 42)"
        );
    }

    #[test]
    fn test_source_chain_is_exposed() {
        use std::error::Error;

        let inner = EnfError::new(EnfErrorKind::Io).with_message("disk full");
        let outer = EnfError::new(EnfErrorKind::Export).with_source(inner);
        let source = outer.source().expect("source should be set");
        assert!(source.to_string().contains("disk full"));
    }
}

use enfermaria_core::errors::{EnfError, EnfErrorKind, EnfermariaError};
use enfermaria_core_types::RequestId;

#[test]
fn test_invalid_badge_maps_to_invalid_input() {
    let err = EnfermariaError::InvalidBadge {
        reason: "badge number is required".to_string(),
    };

    let enf_err: EnfError = err.into();

    assert_eq!(enf_err.kind(), EnfErrorKind::InvalidInput);
    assert_eq!(enf_err.code(), "ERR_INVALID_INPUT");
    assert!(enf_err.message().contains("Invalid badge number"));
}

#[test]
fn test_disabled_field_distinct_from_invalid_input() {
    let err = EnfermariaError::FieldDisabled {
        field: "temperature".to_string(),
    };

    let enf_err: EnfError = err.into();

    assert_eq!(enf_err.kind(), EnfErrorKind::FieldDisabled);
    assert_ne!(enf_err.kind(), EnfErrorKind::InvalidInput);
    assert_eq!(enf_err.entity_id(), Some("temperature"));
}

#[test]
fn test_option_not_found_verifiable_by_kind() {
    let err = EnfermariaError::OptionNotFound {
        category: "turnos".to_string(),
        item: "Green Day".to_string(),
    };

    let enf_err: EnfError = err.into();

    assert_eq!(enf_err.kind(), EnfErrorKind::NotFound);
    assert_eq!(enf_err.code(), "ERR_NOT_FOUND");
    assert_eq!(enf_err.entity_id(), Some("turnos"));
}

#[test]
fn test_unknown_label_carries_label() {
    let err = EnfermariaError::UnknownLabel {
        enumeration: "symptom",
        label: "Tosse".to_string(),
    };

    let enf_err: EnfError = err.into();

    assert_eq!(enf_err.kind(), EnfErrorKind::InvalidInput);
    assert_eq!(enf_err.entity_id(), Some("Tosse"));
}

#[test]
fn test_error_kind_code_mapping() {
    let kinds = vec![
        (EnfErrorKind::InvalidInput, "ERR_INVALID_INPUT"),
        (EnfErrorKind::FieldDisabled, "ERR_FIELD_DISABLED"),
        (EnfErrorKind::NotFound, "ERR_NOT_FOUND"),
        (EnfErrorKind::StorageUnavailable, "ERR_STORAGE_UNAVAILABLE"),
        (EnfErrorKind::Persistence, "ERR_PERSISTENCE"),
        (EnfErrorKind::Export, "ERR_EXPORT"),
        (EnfErrorKind::Io, "ERR_IO"),
        (EnfErrorKind::Serialization, "ERR_SERIALIZATION"),
        (EnfErrorKind::Internal, "ERR_INTERNAL"),
    ];

    let mut seen = std::collections::HashSet::new();
    for (kind, expected_code) in kinds {
        assert_eq!(kind.code(), expected_code);
        assert!(seen.insert(expected_code), "duplicate code {}", expected_code);
    }
}

#[test]
fn test_builder_keeps_request_id() {
    let request_id = RequestId::new();
    let err = EnfError::new(EnfErrorKind::Persistence)
        .with_op("visit_save")
        .with_request_id(request_id.clone())
        .with_message("constraint failed");

    assert_eq!(err.request_id(), Some(&request_id));
    assert_eq!(err.op(), Some("visit_save"));
}

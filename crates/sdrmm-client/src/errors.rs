use sdrmm_core::errors::{ExError, ExErrorKind};

/// Transport failure or non-success status from the request manager
pub fn external_service(op: &str, err: reqwest::Error) -> ExError {
    ExError::new(ExErrorKind::ExternalService)
        .with_op(op.to_string())
        .with_message(err.to_string())
}

/// The request manager answered with something we cannot read
pub fn malformed_response(op: &str, err: serde_json::Error) -> ExError {
    ExError::new(ExErrorKind::Serialization)
        .with_op(op.to_string())
        .with_message(format!("malformed response: {}", err))
}

/// The configured address cannot be used as a base URL
pub fn bad_address(address: &str, reason: impl std::fmt::Display) -> ExError {
    ExError::new(ExErrorKind::Config)
        .with_op("drm_client")
        .with_message(format!(
            "invalid request manager address '{}': {}",
            address, reason
        ))
}

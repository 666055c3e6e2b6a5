//! Error types for the gateway integration.

/// Startup configuration errors. These are fatal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Unsupported hash algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("Invalid setting {name}: {reason}")]
    InvalidSetting { name: &'static str, reason: String },

    #[error("Invalid result field configuration: {0}")]
    InvalidField(String),
}

/// ResultURL callback rejections.
///
/// The display strings are the diagnostic bodies sent back to the gateway.
/// `SignatureMismatch` deliberately carries no digest.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Missing required key: {0}")]
    MissingField(String),

    #[error("Incorrect signature value")]
    SignatureMismatch,
}

/// Failure reported by the merchant's business handler.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Result handler failed: {message}")]
pub struct HandlerError {
    message: String,
}

impl HandlerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<String> for HandlerError {
    fn from(message: String) -> Self {
        Self { message }
    }
}

impl From<&str> for HandlerError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// Service-level errors.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid callback invocation: {0}")]
    InvalidCallbackInvocation(String),

    #[error("Invalid payment request: {0}")]
    InvalidPaymentRequest(String),

    #[error(transparent)]
    Handler(#[from] HandlerError),
}

/// Application-level errors (for HTTP responses).
///
/// Maps cleanly to HTTP status codes.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<GatewayError> for AppError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Validation(e) => AppError::BadRequest(e.to_string()),
            GatewayError::Config(e) => AppError::Internal(e.to_string()),
            GatewayError::InvalidCallbackInvocation(msg) => AppError::Internal(msg),
            GatewayError::InvalidPaymentRequest(msg) => AppError::BadRequest(msg),
            GatewayError::Handler(e) => AppError::Internal(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages() {
        assert_eq!(
            ValidationError::MissingField("OutSum".into()).to_string(),
            "Missing required key: OutSum"
        );
        assert_eq!(
            ValidationError::SignatureMismatch.to_string(),
            "Incorrect signature value"
        );
    }

    #[test]
    fn test_gateway_error_maps_to_app_error() {
        let err: AppError = GatewayError::from(ValidationError::SignatureMismatch).into();
        assert!(matches!(err, AppError::BadRequest(ref m) if m == "Incorrect signature value"));

        let err: AppError = GatewayError::InvalidCallbackInvocation("no handler".into()).into();
        assert!(matches!(err, AppError::Internal(_)));

        let err: AppError = GatewayError::from(HandlerError::new("db down")).into();
        assert!(matches!(err, AppError::Internal(ref m) if m.contains("db down")));
    }
}

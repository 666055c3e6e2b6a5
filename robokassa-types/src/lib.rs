//! # Robokassa Types
//!
//! Configuration, domain types and port traits for the Robokassa payment
//! gateway integration. This crate has no IO and no cryptography - only data
//! structures, configuration rules and trait definitions.
//!
//! ## Architecture
//!
//! - `config` - Immutable gateway configuration and its builder
//! - `domain/` - Custom data, payment requests, validated callbacks
//! - `ports/` - Traits the application layer calls out to
//! - `dto` - Data Transfer Objects for the HTTP boundary
//! - `error` - Configuration, validation and application errors

pub mod config;
pub mod domain;
pub mod dto;
pub mod error;
pub mod ports;

// Re-export commonly used types
pub use config::{
    DEFAULT_PAYMENT_URL, DEFAULT_USER_DATA_PREFIX, FieldTarget, GatewayConfig,
    GatewayConfigBuilder, HashAlgorithm, RequestMethod, ResultField,
};
pub use domain::{CustomData, Decision, PaymentRequest, ResultOutcome, ResultPayment};
pub use dto::*;
pub use error::{AppError, ConfigError, GatewayError, HandlerError, ValidationError};
pub use ports::ResultHandler;

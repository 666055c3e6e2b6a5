//! Data Transfer Objects (DTOs) for the HTTP boundary.

use serde::{Deserialize, Serialize};

/// Response carrying a freshly generated payment page URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentUrlResponse {
    pub url: String,
}

/// Health check body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

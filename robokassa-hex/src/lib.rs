//! # Robokassa Hex
//!
//! Application layer and HTTP adapter for the Robokassa integration.
//!
//! ## Architecture
//!
//! - `callback` - ResultURL validation (pure, synchronous)
//! - `payment_url` - Signed payment page URL assembly
//! - `service` - Validate-then-handle orchestration over a [`ResultHandler`]
//! - `inbound/` - HTTP adapter (Axum server)
//!
//! [`ResultHandler`]: robokassa_types::ResultHandler

pub mod callback;
pub mod inbound;
pub mod payment_url;
pub mod service;


pub use callback::{extract_user_data, validate_callback, validate_callback_with_fields};
pub use payment_url::{generate_payment_url, payment_url_params};
pub use service::{GatewayService, ResultRequestOptions};

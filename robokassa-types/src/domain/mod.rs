//! Domain models for the gateway integration.

pub mod callback;
pub mod custom_data;
pub mod payment;

pub use callback::{Decision, ResultOutcome, ResultPayment};
pub use custom_data::CustomData;
pub use payment::PaymentRequest;

//! Business handler port for validated ResultURL callbacks.

use std::future::Future;

use crate::domain::{Decision, ResultPayment};
use crate::error::HandlerError;

/// Merchant business logic run after a callback passes validation.
///
/// Implementations typically mark the order paid and return
/// [`Decision::Acknowledge`]. Returning [`Decision::Suppress`] withholds the
/// acknowledgment so the gateway retries later.
///
/// Any `Fn(ResultPayment) -> impl Future<Output = Result<Decision, HandlerError>>`
/// closure implements this trait.
#[async_trait::async_trait]
pub trait ResultHandler: Send + Sync + 'static {
    async fn handle(&self, payment: ResultPayment) -> Result<Decision, HandlerError>;
}

#[async_trait::async_trait]
impl<F, Fut> ResultHandler for F
where
    F: Fn(ResultPayment) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Decision, HandlerError>> + Send,
{
    async fn handle(&self, payment: ResultPayment) -> Result<Decision, HandlerError> {
        (self)(payment).await
    }
}

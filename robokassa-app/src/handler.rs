//! Business handler wired into the server.

use std::collections::HashSet;
use std::sync::Mutex;

use robokassa_types::{Decision, HandlerError, ResultHandler, ResultPayment};

/// Records paid invoices in memory and acknowledges every valid callback.
///
/// The gateway may redeliver a callback it already got `OK` for, so repeats
/// are acknowledged again rather than treated as errors.
#[derive(Default)]
pub struct PaidInvoices {
    paid: Mutex<HashSet<String>>,
}

impl PaidInvoices {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn is_paid(&self, inv_id: &str) -> bool {
        self.paid
            .lock()
            .map(|paid| paid.contains(inv_id))
            .unwrap_or(false)
    }
}

#[async_trait::async_trait]
impl ResultHandler for PaidInvoices {
    #[tracing::instrument(skip(self, payment), fields(inv_id = ?payment.inv_id, out_sum = %payment.out_sum))]
    async fn handle(&self, payment: ResultPayment) -> Result<Decision, HandlerError> {
        let Some(inv_id) = payment.inv_id else {
            return Err(HandlerError::new("callback has no invoice id"));
        };

        let newly_paid = self
            .paid
            .lock()
            .map_err(|_| HandlerError::new("invoice ledger poisoned"))?
            .insert(inv_id);

        if newly_paid {
            tracing::info!(user_data = ?payment.user_data, "Invoice marked as paid");
        } else {
            tracing::info!("Invoice already paid, acknowledging again");
        }

        Ok(Decision::Acknowledge)
    }
}

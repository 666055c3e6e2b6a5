//! Gateway Application Service
//!
//! Two-stage ResultURL processing: pure validation first, then the injected
//! business handler decides whether to acknowledge. Transport concerns stay
//! in `inbound/`.

use std::collections::HashMap;
use std::sync::Arc;

use robokassa_types::{
    Decision, GatewayConfig, GatewayError, PaymentRequest, RequestMethod, ResultField,
    ResultHandler, ResultOutcome,
};

use crate::callback::{validate_callback, validate_callback_with_fields};
use crate::payment_url::generate_payment_url;

/// Per-request overrides for ResultURL processing.
#[derive(Debug, Clone, Default)]
pub struct ResultRequestOptions {
    /// Overrides the configured request method.
    pub method: Option<RequestMethod>,
    /// Overrides the configured recognized field list.
    pub fields: Option<Vec<ResultField>>,
}

/// Application service for gateway operations.
///
/// Holds the immutable configuration and an optional business handler.
/// Cheap to clone and safe to share across tasks.
#[derive(Clone)]
pub struct GatewayService {
    config: Arc<GatewayConfig>,
    handler: Option<Arc<dyn ResultHandler>>,
}

impl GatewayService {
    /// Creates a service without a result handler (payment URLs only).
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            config: Arc::new(config),
            handler: None,
        }
    }

    /// Installs the business handler run for every valid callback.
    pub fn with_handler(mut self, handler: impl ResultHandler) -> Self {
        self.handler = Some(Arc::new(handler));
        self
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Method ResultURL callbacks are expected to arrive with.
    pub fn result_method(&self, options: &ResultRequestOptions) -> RequestMethod {
        options
            .method
            .unwrap_or_else(|| self.config.result_method())
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Payment URLs
    // ─────────────────────────────────────────────────────────────────────────────

    /// Builds a signed payment page URL.
    #[tracing::instrument(skip(self, req), fields(inv_id = ?req.invoice_id))]
    pub fn payment_url(&self, req: &PaymentRequest) -> Result<String, GatewayError> {
        if req.out_sum.trim().is_empty() {
            return Err(GatewayError::InvalidPaymentRequest(
                "OutSum cannot be empty".into(),
            ));
        }

        let url = generate_payment_url(&self.config, req);
        tracing::debug!("Generated payment URL");
        Ok(url)
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // ResultURL Callbacks
    // ─────────────────────────────────────────────────────────────────────────────

    /// Validates a ResultURL callback and hands it to the business handler.
    ///
    /// Returns `InvalidCallbackInvocation` when no handler is installed or the
    /// field override is malformed, before looking at the data.
    #[tracing::instrument(skip_all, fields(inv_id = raw.get("InvId").map(String::as_str)))]
    pub async fn process_result(
        &self,
        raw: &HashMap<String, String>,
        options: &ResultRequestOptions,
    ) -> Result<ResultOutcome, GatewayError> {
        let handler = self.handler.as_ref().ok_or_else(|| {
            GatewayError::InvalidCallbackInvocation("no result handler installed".into())
        })?;

        let validated = match &options.fields {
            Some(fields) => {
                ResultField::validate_list(fields)
                    .map_err(|e| GatewayError::InvalidCallbackInvocation(e.to_string()))?;
                validate_callback_with_fields(raw, &self.config, fields)
            }
            None => validate_callback(raw, &self.config),
        };

        let payment = match validated {
            Ok(payment) => payment,
            Err(e) => {
                tracing::warn!(reason = %e, "Rejected ResultURL callback");
                return Err(e.into());
            }
        };

        match handler.handle(payment.clone()).await? {
            Decision::Acknowledge => {
                tracing::info!(out_sum = %payment.out_sum, "Payment acknowledged");
                Ok(ResultOutcome::Acknowledged {
                    body: payment.acknowledgement(),
                    payment,
                })
            }
            Decision::Suppress => {
                tracing::info!("Handler suppressed acknowledgment");
                Ok(ResultOutcome::Suppressed { payment })
            }
        }
    }
}

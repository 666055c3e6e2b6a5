//! # Robokassa Client
//!
//! Plays the gateway's side of a ResultURL exchange: signs a payment
//! notification with password2 and delivers it to a merchant endpoint, the
//! way the gateway would. Useful for local testing and smoke checks.

use robokassa_signature::SignatureEngine;
use robokassa_types::{CustomData, GatewayConfig, RequestMethod};
use reqwest::Client;

/// Error type for client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Callback rejected: {status} - {message}")]
    Rejected { status: u16, message: String },
}

/// A payment notification to deliver.
#[derive(Debug, Clone, Default)]
pub struct CallbackPayment {
    pub out_sum: String,
    pub inv_id: Option<String>,
    /// Unprefixed custom data.
    pub user_data: CustomData,
    /// Unsigned informational fields (e.g. `Fee`, `EMail`).
    pub fields: Vec<(String, String)>,
}

impl CallbackPayment {
    pub fn new(out_sum: impl Into<String>) -> Self {
        Self {
            out_sum: out_sum.into(),
            ..Default::default()
        }
    }

    pub fn inv_id(mut self, inv_id: impl Into<String>) -> Self {
        self.inv_id = Some(inv_id.into());
        self
    }

    pub fn user_data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.user_data.insert(key, value);
        self
    }

    pub fn field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((key.into(), value.into()));
        self
    }
}

/// Merchant's reply to a delivered callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultResponse {
    pub status: u16,
    pub body: String,
}

impl ResultResponse {
    /// True when the body is exactly the `OK<InvId>` token.
    pub fn is_acknowledged(&self, inv_id: Option<&str>) -> bool {
        self.body.trim() == format!("OK{}", inv_id.unwrap_or_default())
    }
}

/// Builds the signed parameter list for a callback.
pub fn signed_params(config: &GatewayConfig, payment: &CallbackPayment) -> Vec<(String, String)> {
    let prefixed = payment.user_data.prefixed(config.user_data_prefix());
    let signature = SignatureEngine::from_config(config).inbound(
        &payment.out_sum,
        payment.inv_id.as_deref(),
        config.password2(),
        &prefixed,
    );

    let mut params = vec![("OutSum".to_string(), payment.out_sum.clone())];
    if let Some(inv_id) = payment.inv_id.as_deref().filter(|id| !id.is_empty()) {
        params.push(("InvId".to_string(), inv_id.to_string()));
    }
    params.push(("SignatureValue".to_string(), signature));
    params.extend(payment.fields.iter().cloned());

    let mut user_data: Vec<(String, String)> = prefixed.into_iter().collect();
    user_data.sort();
    params.extend(user_data);

    params
}

/// Delivers signed ResultURL callbacks to a merchant endpoint.
pub struct ResultUrlClient {
    result_url: String,
    config: GatewayConfig,
    method: RequestMethod,
    http: Client,
}

impl ResultUrlClient {
    /// Creates a client using the configured request method.
    pub fn new(result_url: impl Into<String>, config: GatewayConfig) -> Self {
        let method = config.result_method();
        Self {
            result_url: result_url.into(),
            config,
            method,
            http: Client::new(),
        }
    }

    /// Overrides the request method.
    pub fn with_method(mut self, method: RequestMethod) -> Self {
        self.method = method;
        self
    }

    /// Signs and sends a callback. Non-2xx replies become [`ClientError::Rejected`].
    #[tracing::instrument(skip(self, payment), fields(inv_id = ?payment.inv_id, method = %self.method))]
    pub async fn send(&self, payment: &CallbackPayment) -> Result<ResultResponse, ClientError> {
        let params = signed_params(&self.config, payment);

        let request = match self.method {
            RequestMethod::Get => self.http.get(&self.result_url).query(&params),
            RequestMethod::Post => self.http.post(&self.result_url).form(&params),
        };

        let resp = request.send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            return Err(ClientError::Rejected {
                status: status.as_u16(),
                message: body,
            });
        }

        tracing::debug!(status = status.as_u16(), "Callback delivered");
        Ok(ResultResponse {
            status: status.as_u16(),
            body,
        })
    }
}

//! Outbound payment request.

use serde::{Deserialize, Serialize};

use super::custom_data::CustomData;

/// Parameters for a payment page URL.
///
/// `out_sum` is passed through verbatim; the gateway signs the exact string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub out_sum: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Currency the sum is denominated in (`OutSumCurrency`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_sum_currency: Option<String>,
    /// Defaults to `UTF-8` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
    /// Forces `IsTest=1` for this payment even when test mode is off.
    #[serde(default)]
    pub is_test: bool,
    /// Unprefixed custom data.
    #[serde(default)]
    pub user_data: CustomData,
}

impl PaymentRequest {
    pub fn new(out_sum: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            out_sum: out_sum.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    pub fn invoice_id(mut self, invoice_id: impl Into<String>) -> Self {
        self.invoice_id = Some(invoice_id.into());
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn out_sum_currency(mut self, currency: impl Into<String>) -> Self {
        self.out_sum_currency = Some(currency.into());
        self
    }

    pub fn encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = Some(encoding.into());
        self
    }

    pub fn test(mut self) -> Self {
        self.is_test = true;
        self
    }

    pub fn user_data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.user_data.insert(key, value);
        self
    }

    /// Invoice id, treating an empty string as absent.
    pub fn invoice_id_str(&self) -> Option<&str> {
        non_empty(self.invoice_id.as_deref())
    }

    /// Currency, treating an empty string as absent.
    pub fn currency_str(&self) -> Option<&str> {
        non_empty(self.out_sum_currency.as_deref())
    }

    pub fn email_str(&self) -> Option<&str> {
        non_empty(self.email.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

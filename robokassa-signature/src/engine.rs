//! Payment URL and ResultURL signatures.
//!
//! The two variants are not symmetric and must stay that way, since the
//! gateway recomputes both independently:
//! - the payment URL signature always carries an invoice slot (empty when
//!   there is no invoice id) and prefixes custom data keys itself;
//! - the ResultURL signature drops the invoice slot when there is no invoice
//!   id and receives custom data keys already prefixed.

use robokassa_types::{CustomData, GatewayConfig, HashAlgorithm};
use subtle::ConstantTimeEq;

use crate::digest::digest;

/// Separator between preimage fields.
pub const DELIMITER: char = ':';

/// `key=value` strings, sorted as whole strings.
///
/// `Shp_id2=2` sorts before `Shp_id=1` because `2` < `=`.
pub fn signing_pairs(data: &CustomData) -> Vec<String> {
    let mut pairs: Vec<String> = data
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect();
    pairs.sort();
    pairs
}

fn join(mut parts: Vec<String>, user_data: &CustomData) -> String {
    parts.extend(signing_pairs(user_data));
    parts.join(&DELIMITER.to_string())
}

/// Preimage for a payment URL. `user_data` keys are prefixed here.
pub fn outbound_preimage(
    merchant_login: &str,
    out_sum: &str,
    inv_id: Option<&str>,
    out_sum_currency: Option<&str>,
    password1: &str,
    user_data: &CustomData,
    user_data_prefix: &str,
) -> String {
    let mut parts = vec![
        merchant_login.to_string(),
        out_sum.to_string(),
        inv_id.unwrap_or_default().to_string(),
    ];
    if let Some(currency) = out_sum_currency.filter(|c| !c.is_empty()) {
        parts.push(currency.to_string());
    }
    parts.push(password1.to_string());

    join(parts, &user_data.prefixed(user_data_prefix))
}

/// Preimage for a ResultURL callback. `user_data` keys must already carry
/// their prefix exactly as received.
pub fn inbound_preimage(
    out_sum: &str,
    inv_id: Option<&str>,
    password2: &str,
    user_data: &CustomData,
) -> String {
    let mut parts = vec![out_sum.to_string()];
    if let Some(inv_id) = inv_id.filter(|id| !id.is_empty()) {
        parts.push(inv_id.to_string());
    }
    parts.push(password2.to_string());

    join(parts, user_data)
}

/// Compares a supplied signature with the expected one.
///
/// Hex case is ignored and the comparison runs in constant time.
pub fn signatures_match(supplied: &str, expected: &str) -> bool {
    let supplied = supplied.to_ascii_lowercase();
    let expected = expected.to_ascii_lowercase();
    supplied.as_bytes().ct_eq(expected.as_bytes()).into()
}

/// Signature computation bound to an algorithm and custom data prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureEngine {
    algorithm: HashAlgorithm,
    user_data_prefix: String,
}

impl SignatureEngine {
    pub fn new(algorithm: HashAlgorithm, user_data_prefix: impl Into<String>) -> Self {
        Self {
            algorithm,
            user_data_prefix: user_data_prefix.into(),
        }
    }

    pub fn from_config(config: &GatewayConfig) -> Self {
        Self::new(config.hash_algorithm(), config.user_data_prefix())
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    pub fn user_data_prefix(&self) -> &str {
        &self.user_data_prefix
    }

    /// Signature for a payment URL (`SignatureValue` query parameter).
    pub fn outbound(
        &self,
        merchant_login: &str,
        out_sum: &str,
        inv_id: Option<&str>,
        out_sum_currency: Option<&str>,
        password1: &str,
        user_data: &CustomData,
    ) -> String {
        let preimage = outbound_preimage(
            merchant_login,
            out_sum,
            inv_id,
            out_sum_currency,
            password1,
            user_data,
            &self.user_data_prefix,
        );
        digest(self.algorithm, &preimage)
    }

    /// Signature the gateway attaches to a ResultURL callback.
    pub fn inbound(
        &self,
        out_sum: &str,
        inv_id: Option<&str>,
        password2: &str,
        prefixed_user_data: &CustomData,
    ) -> String {
        let preimage = inbound_preimage(out_sum, inv_id, password2, prefixed_user_data);
        digest(self.algorithm, &preimage)
    }

    /// Recomputes the ResultURL signature and compares it with `supplied`.
    pub fn verify_inbound(
        &self,
        supplied: &str,
        out_sum: &str,
        inv_id: Option<&str>,
        password2: &str,
        prefixed_user_data: &CustomData,
    ) -> bool {
        let expected = self.inbound(out_sum, inv_id, password2, prefixed_user_data);
        signatures_match(supplied, &expected)
    }
}

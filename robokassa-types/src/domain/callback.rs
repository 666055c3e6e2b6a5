//! Validated ResultURL callback and the merchant's decision on it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::custom_data::CustomData;

/// A ResultURL callback whose signature has been verified.
///
/// Values stay strings. Interpreting `out_sum` as a number is up to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultPayment {
    pub out_sum: String,
    pub inv_id: Option<String>,
    pub signature_value: String,
    /// Other recognized fields keyed by internal name (e.g. `fee`).
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
    /// Custom data with the prefix removed.
    #[serde(default)]
    pub user_data: CustomData,
}

impl ResultPayment {
    /// Plain-text token the gateway expects on success: `OK` + invoice id.
    pub fn acknowledgement(&self) -> String {
        format!("OK{}", self.inv_id.as_deref().unwrap_or_default())
    }
}

/// What the business handler wants done with a valid callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Reply with the `OK<InvId>` token.
    Acknowledge,
    /// Withhold the token; the gateway will redeliver.
    Suppress,
}

/// Result of processing a callback end to end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultOutcome {
    Acknowledged { payment: ResultPayment, body: String },
    Suppressed { payment: ResultPayment },
}

impl ResultOutcome {
    pub fn payment(&self) -> &ResultPayment {
        match self {
            ResultOutcome::Acknowledged { payment, .. } => payment,
            ResultOutcome::Suppressed { payment } => payment,
        }
    }

    pub fn is_acknowledged(&self) -> bool {
        matches!(self, ResultOutcome::Acknowledged { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payment(inv_id: Option<&str>) -> ResultPayment {
        ResultPayment {
            out_sum: "100.00".into(),
            inv_id: inv_id.map(String::from),
            signature_value: "abc".into(),
            extra: BTreeMap::new(),
            user_data: CustomData::new(),
        }
    }

    #[test]
    fn test_acknowledgement_token() {
        assert_eq!(payment(Some("12345")).acknowledgement(), "OK12345");
        assert_eq!(payment(None).acknowledgement(), "OK");
    }

    #[test]
    fn test_outcome_accessors() {
        let outcome = ResultOutcome::Acknowledged {
            payment: payment(Some("1")),
            body: "OK1".into(),
        };
        assert!(outcome.is_acknowledged());
        assert_eq!(outcome.payment().inv_id.as_deref(), Some("1"));

        let outcome = ResultOutcome::Suppressed {
            payment: payment(Some("2")),
        };
        assert!(!outcome.is_acknowledged());
    }
}

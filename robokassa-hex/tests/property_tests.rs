//! Property-based tests for ResultURL validation.
//!
//! A callback signed the way the gateway signs it must validate, and any
//! single change to a signed value must not.

use std::collections::HashMap;

use proptest::prelude::*;
use robokassa_hex::validate_callback;
use robokassa_signature::SignatureEngine;
use robokassa_types::{CustomData, GatewayConfig, ValidationError};

fn sum() -> impl Strategy<Value = String> {
    (1u32..1_000_000, 0u32..100).prop_map(|(major, minor)| format!("{}.{:02}", major, minor))
}

fn user_data() -> impl Strategy<Value = HashMap<String, String>> {
    prop::collection::hash_map("[a-zA-Z][a-zA-Z0-9]{0,8}", "[a-zA-Z0-9]{1,12}", 0..5)
}

fn config(password2: &str) -> GatewayConfig {
    GatewayConfig::builder("demo")
        .password2(password2)
        .build()
        .unwrap()
}

/// Builds the raw request map the gateway would send.
fn signed_request(
    config: &GatewayConfig,
    sum: &str,
    inv_id: &str,
    user_data: &HashMap<String, String>,
) -> HashMap<String, String> {
    let prefixed = CustomData::from(user_data.clone()).prefixed(config.user_data_prefix());
    let signature = SignatureEngine::from_config(config).inbound(
        sum,
        Some(inv_id),
        config.password2(),
        &prefixed,
    );

    let mut raw: HashMap<String, String> = prefixed.into_iter().collect();
    raw.insert("OutSum".into(), sum.to_string());
    raw.insert("InvId".into(), inv_id.to_string());
    raw.insert("SignatureValue".into(), signature);
    raw
}

proptest! {
    /// Whatever the gateway signs with password2 validates and round-trips custom data.
    #[test]
    fn signed_callback_validates(
        password2 in "[a-zA-Z0-9]{1,16}",
        sum in sum(),
        inv_id in "[1-9][0-9]{0,8}",
        data in user_data(),
    ) {
        let config = config(&password2);
        let raw = signed_request(&config, &sum, &inv_id, &data);

        let payment = validate_callback(&raw, &config).unwrap();
        prop_assert_eq!(&payment.out_sum, &sum);
        prop_assert_eq!(payment.inv_id.as_deref(), Some(inv_id.as_str()));
        prop_assert_eq!(payment.user_data.into_inner(), data);
    }

    /// Upper-casing the signature does not affect validation.
    #[test]
    fn uppercase_signature_validates(
        sum in sum(),
        inv_id in "[1-9][0-9]{0,8}",
        data in user_data(),
    ) {
        let config = config("pass2");
        let mut raw = signed_request(&config, &sum, &inv_id, &data);
        let upper = raw["SignatureValue"].to_uppercase();
        raw.insert("SignatureValue".into(), upper);

        prop_assert!(validate_callback(&raw, &config).is_ok());
    }

    /// Changing the invoice id after signing is detected.
    #[test]
    fn tampered_invoice_rejected(
        sum in sum(),
        inv_id in "[1-9][0-9]{0,8}",
        other in "[1-9][0-9]{0,8}",
        data in user_data(),
    ) {
        prop_assume!(inv_id != other);
        let config = config("pass2");
        let mut raw = signed_request(&config, &sum, &inv_id, &data);
        raw.insert("InvId".into(), other);

        prop_assert_eq!(
            validate_callback(&raw, &config),
            Err(ValidationError::SignatureMismatch)
        );
    }

    /// Changing any custom data value after signing is detected.
    #[test]
    fn tampered_custom_value_rejected(
        sum in sum(),
        inv_id in "[1-9][0-9]{0,8}",
        data in user_data(),
        index in any::<prop::sample::Index>(),
    ) {
        prop_assume!(!data.is_empty());
        let config = config("pass2");
        let mut raw = signed_request(&config, &sum, &inv_id, &data);

        let mut keys: Vec<&String> = data.keys().collect();
        keys.sort();
        let key = format!("Shp_{}", keys[index.index(keys.len())]);
        let tampered = format!("{}x", raw[&key]);
        raw.insert(key, tampered);

        prop_assert_eq!(
            validate_callback(&raw, &config),
            Err(ValidationError::SignatureMismatch)
        );
    }
}

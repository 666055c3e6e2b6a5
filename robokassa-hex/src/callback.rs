//! ResultURL callback validation.
//!
//! Pure and synchronous: extracts the recognized fields and the custom data
//! from the raw request map, recomputes the signature with password2 and
//! either returns the validated payment or a [`ValidationError`].

use std::collections::{BTreeMap, HashMap};

use robokassa_signature::SignatureEngine;
use robokassa_types::{
    CustomData, FieldTarget, GatewayConfig, ResultField, ResultPayment, ValidationError,
};

/// Validates a callback against the configured recognized fields.
pub fn validate_callback(
    raw: &HashMap<String, String>,
    config: &GatewayConfig,
) -> Result<ResultPayment, ValidationError> {
    validate_callback_with_fields(raw, config, config.result_fields())
}

/// Validates a callback against an explicit recognized field list.
///
/// `fields` is expected to have passed [`ResultField::validate_list`].
pub fn validate_callback_with_fields(
    raw: &HashMap<String, String>,
    config: &GatewayConfig,
    fields: &[ResultField],
) -> Result<ResultPayment, ValidationError> {
    let mut out_sum = None;
    let mut inv_id = None;
    let mut signature = None;
    let mut extra = BTreeMap::new();

    for field in fields {
        // Exact key match; an empty value counts as absent.
        let value = raw
            .get(&field.key)
            .map(String::as_str)
            .filter(|v| !v.is_empty());

        let Some(value) = value else {
            if field.required {
                return Err(ValidationError::MissingField(field.key.clone()));
            }
            continue;
        };

        let value = value.to_string();
        match &field.target {
            FieldTarget::OutSum => out_sum = Some(value),
            FieldTarget::InvId => inv_id = Some(value),
            FieldTarget::SignatureValue => signature = Some(value),
            FieldTarget::Extra(name) => {
                extra.insert(name.clone(), value);
            }
        }
    }

    let prefix = config.user_data_prefix();
    let user_data = extract_user_data(raw, prefix);

    let out_sum = out_sum.unwrap_or_default();
    let signature = signature.unwrap_or_default();

    let engine = SignatureEngine::from_config(config);
    if !engine.verify_inbound(
        &signature,
        &out_sum,
        inv_id.as_deref(),
        config.password2(),
        &user_data,
    ) {
        return Err(ValidationError::SignatureMismatch);
    }

    Ok(ResultPayment {
        out_sum,
        inv_id,
        signature_value: signature,
        extra,
        user_data: user_data.without_prefix(prefix),
    })
}

/// Collects every entry whose key starts with `prefix`, ignoring case.
///
/// Keys are kept exactly as received, prefix included.
pub fn extract_user_data(raw: &HashMap<String, String>, prefix: &str) -> CustomData {
    let prefix = prefix.to_lowercase();
    raw.iter()
        .filter(|(key, _)| key.to_lowercase().starts_with(&prefix))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use robokassa_types::HashAlgorithm;

    fn config() -> GatewayConfig {
        GatewayConfig::builder("demo")
            .password1("pass1")
            .password2("pass2")
            .build()
            .unwrap()
    }

    fn raw(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_valid_callback_without_custom_data() {
        // md5("100.00:123:pass2")
        let data = raw(&[
            ("OutSum", "100.00"),
            ("InvId", "123"),
            ("SignatureValue", "7423585a73d9125e048801a3c9d908a2"),
        ]);

        let payment = validate_callback(&data, &config()).unwrap();
        assert_eq!(payment.out_sum, "100.00");
        assert_eq!(payment.inv_id.as_deref(), Some("123"));
        assert!(payment.user_data.is_empty());
        assert_eq!(payment.acknowledgement(), "OK123");
    }

    #[test]
    fn test_uppercase_signature_accepted() {
        let data = raw(&[
            ("OutSum", "100.00"),
            ("InvId", "123"),
            ("SignatureValue", "7423585A73D9125E048801A3C9D908A2"),
        ]);
        assert!(validate_callback(&data, &config()).is_ok());
    }

    #[test]
    fn test_custom_data_verified_and_cleared() {
        // md5("100.00:123:pass2:Shp_userId=42")
        let data = raw(&[
            ("OutSum", "100.00"),
            ("InvId", "123"),
            ("SignatureValue", "2082f1dd20e49f5e02d902bcd0441691"),
            ("Shp_userId", "42"),
        ]);

        let payment = validate_callback(&data, &config()).unwrap();
        assert_eq!(payment.user_data.get("userId"), Some("42"));
        assert!(!payment.user_data.contains_key("Shp_userId"));
    }

    #[test]
    fn test_custom_data_order_in_request_irrelevant() {
        // md5("100.00:123:pass2:Shp_a=1:Shp_b=2")
        let data = raw(&[
            ("Shp_b", "2"),
            ("SignatureValue", "6748eb8fe4a7a841acaf96761d2b747b"),
            ("Shp_a", "1"),
            ("OutSum", "100.00"),
            ("InvId", "123"),
        ]);

        let payment = validate_callback(&data, &config()).unwrap();
        assert_eq!(payment.user_data.get("a"), Some("1"));
        assert_eq!(payment.user_data.get("b"), Some("2"));
    }

    #[test]
    fn test_missing_required_field() {
        let data = raw(&[
            ("InvId", "123"),
            ("SignatureValue", "7423585a73d9125e048801a3c9d908a2"),
        ]);
        assert_eq!(
            validate_callback(&data, &config()),
            Err(ValidationError::MissingField("OutSum".into()))
        );
    }

    #[test]
    fn test_empty_required_field_counts_as_missing() {
        let data = raw(&[
            ("OutSum", "100.00"),
            ("InvId", ""),
            ("SignatureValue", "7423585a73d9125e048801a3c9d908a2"),
        ]);
        assert_eq!(
            validate_callback(&data, &config()),
            Err(ValidationError::MissingField("InvId".into()))
        );
    }

    #[test]
    fn test_key_match_is_exact() {
        let data = raw(&[
            ("outsum", "100.00"),
            ("InvId", "123"),
            ("SignatureValue", "7423585a73d9125e048801a3c9d908a2"),
        ]);
        assert_eq!(
            validate_callback(&data, &config()),
            Err(ValidationError::MissingField("OutSum".into()))
        );
    }

    #[test]
    fn test_optional_invoice_id_may_be_omitted() {
        let config = GatewayConfig::builder("demo")
            .password2("pass2")
            .result_fields(vec![
                ResultField::new("OutSum", true),
                ResultField::new("InvId", false),
                ResultField::new("SignatureValue", true),
            ])
            .build()
            .unwrap();

        // md5("100.00:pass2")
        let data = raw(&[
            ("OutSum", "100.00"),
            ("SignatureValue", "5a96f3d83e85b8633ba0659d78bb6590"),
        ]);

        let payment = validate_callback(&data, &config).unwrap();
        assert_eq!(payment.inv_id, None);
        assert_eq!(payment.acknowledgement(), "OK");
    }

    #[test]
    fn test_tampered_values_rejected() {
        let valid = [
            ("OutSum", "100.00"),
            ("InvId", "123"),
            ("SignatureValue", "2082f1dd20e49f5e02d902bcd0441691"),
            ("Shp_userId", "42"),
        ];
        assert!(validate_callback(&raw(&valid), &config()).is_ok());

        for (key, tampered) in [("OutSum", "1000.00"), ("InvId", "124"), ("Shp_userId", "43")] {
            let mut data = raw(&valid);
            data.insert(key.to_string(), tampered.to_string());
            assert_eq!(
                validate_callback(&data, &config()),
                Err(ValidationError::SignatureMismatch),
                "tampering with {} must be detected",
                key
            );
        }

        let mut data = raw(&valid);
        data.insert("Shp_extra".into(), "injected".into());
        assert_eq!(
            validate_callback(&data, &config()),
            Err(ValidationError::SignatureMismatch)
        );
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let config = GatewayConfig::builder("demo")
            .password2("other")
            .build()
            .unwrap();
        let data = raw(&[
            ("OutSum", "100.00"),
            ("InvId", "123"),
            ("SignatureValue", "7423585a73d9125e048801a3c9d908a2"),
        ]);
        assert_eq!(
            validate_callback(&data, &config),
            Err(ValidationError::SignatureMismatch)
        );
    }

    #[test]
    fn test_extra_recognized_fields_surface_by_internal_name() {
        let config = GatewayConfig::builder("demo")
            .password2("pass2")
            .result_field("Fee", false)
            .result_field("EMail", false)
            .build()
            .unwrap();
        let data = raw(&[
            ("OutSum", "100.00"),
            ("InvId", "123"),
            ("SignatureValue", "7423585a73d9125e048801a3c9d908a2"),
            ("Fee", "3.50"),
        ]);

        let payment = validate_callback(&data, &config).unwrap();
        assert_eq!(payment.extra.get("fee").map(String::as_str), Some("3.50"));
        assert!(!payment.extra.contains_key("eMail"));
    }

    #[test]
    fn test_extract_user_data_prefix_case_insensitive() {
        let data = raw(&[
            ("Shp_a", "1"),
            ("shp_b", "2"),
            ("SHP_c", "3"),
            ("OutSum", "1"),
            ("Shop", "x"),
        ]);
        let user_data = extract_user_data(&data, "Shp_");

        assert_eq!(user_data.len(), 3);
        assert_eq!(user_data.get("shp_b"), Some("2"));
        assert_eq!(user_data.get("SHP_c"), Some("3"));
    }

    #[test]
    fn test_sha256_gateway() {
        let config = GatewayConfig::builder("demo")
            .password2("pass2")
            .hash_algorithm("sha256")
            .build()
            .unwrap();
        let signature = SignatureEngine::new(HashAlgorithm::Sha256, "Shp_").inbound(
            "10",
            Some("5"),
            "pass2",
            &CustomData::new(),
        );
        let data = raw(&[("OutSum", "10"), ("InvId", "5"), ("SignatureValue", signature.as_str())]);

        assert!(validate_callback(&data, &config).is_ok());
    }
}

//! Signed payment page URLs.

use robokassa_signature::SignatureEngine;
use robokassa_types::{GatewayConfig, PaymentRequest};

const DEFAULT_ENCODING: &str = "UTF-8";

/// Query parameters for a payment page, `SignatureValue` included.
///
/// Custom data entries come last, prefixed and sorted by key.
pub fn payment_url_params(config: &GatewayConfig, req: &PaymentRequest) -> Vec<(String, String)> {
    let engine = SignatureEngine::from_config(config);
    let signature = engine.outbound(
        config.merchant_login(),
        &req.out_sum,
        req.invoice_id_str(),
        req.currency_str(),
        config.password1(),
        &req.user_data,
    );

    let encoding = req
        .encoding
        .as_deref()
        .filter(|e| !e.is_empty())
        .unwrap_or(DEFAULT_ENCODING);

    let mut params = vec![
        ("MerchantLogin".to_string(), config.merchant_login().to_string()),
        ("OutSum".to_string(), req.out_sum.clone()),
        ("Description".to_string(), req.description.clone()),
        ("SignatureValue".to_string(), signature),
        ("Encoding".to_string(), encoding.to_string()),
    ];

    if let Some(inv_id) = req.invoice_id_str() {
        params.push(("InvId".to_string(), inv_id.to_string()));
    }
    if let Some(email) = req.email_str() {
        params.push(("Email".to_string(), email.to_string()));
    }
    if let Some(currency) = req.currency_str() {
        params.push(("OutSumCurrency".to_string(), currency.to_string()));
    }
    if config.test_mode() || req.is_test {
        params.push(("IsTest".to_string(), "1".to_string()));
    }

    let mut user_data: Vec<(String, String)> = req
        .user_data
        .prefixed(config.user_data_prefix())
        .into_iter()
        .collect();
    user_data.sort();
    params.extend(user_data);

    params
}

/// Merges the signed parameters into the configured template URL.
///
/// Query parameters already on the template are kept unless a generated
/// parameter has the same name.
pub fn generate_payment_url(config: &GatewayConfig, req: &PaymentRequest) -> String {
    let params = payment_url_params(config, req);

    let mut url = config.payment_url_template().clone();
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .into_owned()
        .filter(|(key, _)| !params.iter().any(|(name, _)| name == key))
        .collect();

    url.query_pairs_mut()
        .clear()
        .extend_pairs(&kept)
        .extend_pairs(&params);

    url.to_string()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config() -> GatewayConfig {
        GatewayConfig::builder("demo")
            .password1("pass1")
            .password2("pass2")
            .build()
            .unwrap()
    }

    fn query(url: &str) -> HashMap<String, String> {
        url::Url::parse(url)
            .unwrap()
            .query_pairs()
            .into_owned()
            .collect()
    }

    #[test]
    fn test_basic_payment_url() {
        let req = PaymentRequest::new("100.00", "Test order").invoice_id("123");
        let url = generate_payment_url(&config(), &req);

        assert!(url.starts_with("https://auth.robokassa.ru/Merchant/Index.aspx?"));

        let q = query(&url);
        assert_eq!(q["MerchantLogin"], "demo");
        assert_eq!(q["OutSum"], "100.00");
        assert_eq!(q["Description"], "Test order");
        assert_eq!(q["InvId"], "123");
        assert_eq!(q["Encoding"], "UTF-8");
        assert_eq!(q["SignatureValue"], "641a2329e1beac5121408f53c451f0cc");
        assert!(!q.contains_key("IsTest"));
        assert!(!q.contains_key("Email"));
    }

    #[test]
    fn test_custom_data_prefixed_in_url_and_signature() {
        let req = PaymentRequest::new("100.00", "Order")
            .invoice_id("123")
            .user_data("b", "2")
            .user_data("a", "1");
        let params = payment_url_params(&config(), &req);

        let tail: Vec<_> = params[params.len() - 2..].to_vec();
        assert_eq!(
            tail,
            vec![
                ("Shp_a".to_string(), "1".to_string()),
                ("Shp_b".to_string(), "2".to_string())
            ]
        );

        let q: HashMap<_, _> = params.into_iter().collect();
        assert_eq!(q["SignatureValue"], "3f1a015a3d758040161342b4e1bada28");
    }

    #[test]
    fn test_optional_parameters() {
        let req = PaymentRequest::new("100.00", "Order")
            .invoice_id("123")
            .email("buyer@example.com")
            .out_sum_currency("USD")
            .encoding("windows-1251");
        let q = query(&generate_payment_url(&config(), &req));

        assert_eq!(q["Email"], "buyer@example.com");
        assert_eq!(q["OutSumCurrency"], "USD");
        assert_eq!(q["Encoding"], "windows-1251");
        assert_eq!(q["SignatureValue"], "06f9cb4eb2913f6a0e598b8783f16bb1");
    }

    #[test]
    fn test_missing_invoice_id_omitted_from_query() {
        let req = PaymentRequest::new("100.00", "Order");
        let q = query(&generate_payment_url(&config(), &req));

        assert!(!q.contains_key("InvId"));
        assert_eq!(q["SignatureValue"], "2d7148f846af7f6f3128c1aeb0074347");
    }

    #[test]
    fn test_is_test_from_config_or_request() {
        let test_config = GatewayConfig::builder("demo")
            .password1("pass1")
            .test_mode(true)
            .build()
            .unwrap();
        let req = PaymentRequest::new("1.00", "x");
        assert_eq!(query(&generate_payment_url(&test_config, &req))["IsTest"], "1");

        let req = PaymentRequest::new("1.00", "x").test();
        assert_eq!(query(&generate_payment_url(&config(), &req))["IsTest"], "1");
    }

    #[test]
    fn test_template_query_merged() {
        let config = GatewayConfig::builder("demo")
            .password1("pass1")
            .payment_url_template("https://pay.example.com/checkout?Culture=en&OutSum=999")
            .build()
            .unwrap();
        let req = PaymentRequest::new("100.00", "Order").invoice_id("123");
        let url = generate_payment_url(&config, &req);

        assert!(url.starts_with("https://pay.example.com/checkout?Culture=en&"));
        let q = query(&url);
        assert_eq!(q["Culture"], "en");
        assert_eq!(q["OutSum"], "100.00");
    }

    #[test]
    fn test_description_is_url_encoded() {
        let req = PaymentRequest::new("1.00", "Заказ #7 & more");
        let url = generate_payment_url(&config(), &req);

        assert!(!url.contains(' '));
        assert!(!url.contains("#7"));
        assert_eq!(query(&url)["Description"], "Заказ #7 & more");
    }
}

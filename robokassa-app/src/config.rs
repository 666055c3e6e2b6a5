//! Configuration loading from environment.

use std::env;

use robokassa_types::{GatewayConfig, RequestMethod};

/// Application configuration.
pub struct Config {
    pub port: u16,
    pub gateway: GatewayConfig,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration through `lookup`, which returns `None` for unset keys.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let port = lookup("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()?;

        let merchant_login = lookup("ROBOKASSA_MERCHANT_LOGIN").ok_or_else(|| {
            anyhow::anyhow!("ROBOKASSA_MERCHANT_LOGIN environment variable is required")
        })?;

        let mut builder = GatewayConfig::builder(merchant_login)
            .password1(lookup("ROBOKASSA_PASSWORD1").unwrap_or_default())
            .password2(lookup("ROBOKASSA_PASSWORD2").unwrap_or_default());

        if let Some(algorithm) = lookup("ROBOKASSA_HASH_ALGORITHM") {
            builder = builder.hash_algorithm(algorithm);
        }
        if let Some(test_mode) = lookup("ROBOKASSA_TEST_MODE") {
            builder = builder.test_mode(parse_flag(&test_mode)?);
        }
        if let Some(method) = lookup("ROBOKASSA_RESULT_METHOD") {
            builder = builder.result_method(method.parse::<RequestMethod>()?);
        }
        if let Some(template) = lookup("ROBOKASSA_PAYMENT_URL") {
            builder = builder.payment_url_template(template);
        }
        if let Some(prefix) = lookup("ROBOKASSA_USER_DATA_PREFIX") {
            builder = builder.user_data_prefix(prefix);
        }

        Ok(Self {
            port,
            gateway: builder.build()?,
        })
    }
}

fn parse_flag(value: &str) -> anyhow::Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(anyhow::anyhow!("Invalid boolean flag: {}", other)),
    }
}

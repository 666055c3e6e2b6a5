//! Gateway configuration.
//!
//! A [`GatewayConfig`] is built once at startup through [`GatewayConfigBuilder`],
//! which merges defaults with overrides and validates everything up front.
//! After `build()` the value is never mutated and is shared read-only.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use heck::ToLowerCamelCase;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ConfigError;

/// Payment page used when no template is configured.
pub const DEFAULT_PAYMENT_URL: &str = "https://auth.robokassa.ru/Merchant/Index.aspx";

/// Prefix the gateway uses to round-trip merchant-defined parameters.
pub const DEFAULT_USER_DATA_PREFIX: &str = "Shp_";

// ─────────────────────────────────────────────────────────────────────────────
// Hash Algorithm
// ─────────────────────────────────────────────────────────────────────────────

/// Digest algorithms the gateway protocol can be configured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    #[default]
    Md5,
    Sha256,
    Sha384,
    Sha512,
}

impl HashAlgorithm {
    /// Returns the identifier used in configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            HashAlgorithm::Md5 => "md5",
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Sha384 => "sha384",
            HashAlgorithm::Sha512 => "sha512",
        }
    }

    /// Length of the lowercase hex digest.
    pub fn hex_len(&self) -> usize {
        match self {
            HashAlgorithm::Md5 => 32,
            HashAlgorithm::Sha256 => 64,
            HashAlgorithm::Sha384 => 96,
            HashAlgorithm::Sha512 => 128,
        }
    }

    pub fn all() -> &'static [HashAlgorithm] {
        &[
            HashAlgorithm::Md5,
            HashAlgorithm::Sha256,
            HashAlgorithm::Sha384,
            HashAlgorithm::Sha512,
        ]
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashAlgorithm {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "md5" => Ok(HashAlgorithm::Md5),
            "sha256" => Ok(HashAlgorithm::Sha256),
            "sha384" => Ok(HashAlgorithm::Sha384),
            "sha512" => Ok(HashAlgorithm::Sha512),
            _ => Err(ConfigError::UnsupportedAlgorithm(s.to_string())),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Request Method
// ─────────────────────────────────────────────────────────────────────────────

/// How the gateway delivers ResultURL callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RequestMethod {
    /// Callback fields arrive in the query string.
    Get,
    /// Callback fields arrive as a form-encoded body.
    #[default]
    Post,
}

impl RequestMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestMethod::Get => "GET",
            RequestMethod::Post => "POST",
        }
    }
}

impl fmt::Display for RequestMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestMethod {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "GET" => Ok(RequestMethod::Get),
            "POST" => Ok(RequestMethod::Post),
            _ => Err(ConfigError::InvalidSetting {
                name: "result_method",
                reason: format!("expected GET or POST, got {:?}", s),
            }),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Recognized Result Fields
// ─────────────────────────────────────────────────────────────────────────────

/// Where a recognized callback field ends up after extraction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldTarget {
    OutSum,
    InvId,
    SignatureValue,
    /// Any other recognized field, surfaced under this internal name.
    Extra(String),
}

impl FieldTarget {
    /// Infers the target from the gateway's key name.
    pub fn for_key(key: &str) -> Self {
        match key {
            "OutSum" => FieldTarget::OutSum,
            "InvId" => FieldTarget::InvId,
            "SignatureValue" => FieldTarget::SignatureValue,
            other => FieldTarget::Extra(other.to_lower_camel_case()),
        }
    }

    pub fn internal_name(&self) -> &str {
        match self {
            FieldTarget::OutSum => "outSum",
            FieldTarget::InvId => "invId",
            FieldTarget::SignatureValue => "signatureValue",
            FieldTarget::Extra(name) => name,
        }
    }
}

/// A top-level callback field the validator knows how to extract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultField {
    /// Key as sent by the gateway. Matched exactly.
    pub key: String,
    pub required: bool,
    pub target: FieldTarget,
}

impl ResultField {
    pub fn new(key: impl Into<String>, required: bool) -> Self {
        let key = key.into();
        let target = FieldTarget::for_key(&key);
        Self {
            key,
            required,
            target,
        }
    }

    pub fn with_target(key: impl Into<String>, required: bool, target: FieldTarget) -> Self {
        Self {
            key: key.into(),
            required,
            target,
        }
    }

    /// `OutSum`, `InvId` and `SignatureValue`, all required.
    pub fn defaults() -> Vec<ResultField> {
        vec![
            ResultField::new("OutSum", true),
            ResultField::new("InvId", true),
            ResultField::new("SignatureValue", true),
        ]
    }

    /// Checks a field list before it is used for extraction.
    ///
    /// Keys and targets must be unique, and the sum and signature must be mapped.
    pub fn validate_list(fields: &[ResultField]) -> Result<(), ConfigError> {
        let mut keys = HashSet::new();
        let mut targets = HashSet::new();

        for field in fields {
            if field.key.is_empty() {
                return Err(ConfigError::InvalidField("empty field key".into()));
            }
            if !keys.insert(field.key.as_str()) {
                return Err(ConfigError::InvalidField(format!(
                    "duplicate field key {}",
                    field.key
                )));
            }
            if !targets.insert(&field.target) {
                return Err(ConfigError::InvalidField(format!(
                    "duplicate target {} for key {}",
                    field.target.internal_name(),
                    field.key
                )));
            }
        }

        for required in [FieldTarget::OutSum, FieldTarget::SignatureValue] {
            if !targets.contains(&required) {
                return Err(ConfigError::InvalidField(format!(
                    "no field maps to {}",
                    required.internal_name()
                )));
            }
        }

        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Gateway Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Immutable gateway configuration.
#[derive(Clone)]
pub struct GatewayConfig {
    merchant_login: String,
    password1: String,
    password2: String,
    hash_algorithm: HashAlgorithm,
    test_mode: bool,
    result_method: RequestMethod,
    payment_url_template: Url,
    user_data_prefix: String,
    result_fields: Vec<ResultField>,
}

impl GatewayConfig {
    /// Starts a builder for the given merchant login.
    pub fn builder(merchant_login: impl Into<String>) -> GatewayConfigBuilder {
        GatewayConfigBuilder::new(merchant_login)
    }

    pub fn merchant_login(&self) -> &str {
        &self.merchant_login
    }

    /// Secret used for payment URL signatures.
    pub fn password1(&self) -> &str {
        &self.password1
    }

    /// Secret used for ResultURL signatures.
    pub fn password2(&self) -> &str {
        &self.password2
    }

    pub fn hash_algorithm(&self) -> HashAlgorithm {
        self.hash_algorithm
    }

    pub fn test_mode(&self) -> bool {
        self.test_mode
    }

    pub fn result_method(&self) -> RequestMethod {
        self.result_method
    }

    pub fn payment_url_template(&self) -> &Url {
        &self.payment_url_template
    }

    pub fn user_data_prefix(&self) -> &str {
        &self.user_data_prefix
    }

    pub fn result_fields(&self) -> &[ResultField] {
        &self.result_fields
    }
}

// Secrets stay out of logs.
impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("merchant_login", &self.merchant_login)
            .field("password1", &"***")
            .field("password2", &"***")
            .field("hash_algorithm", &self.hash_algorithm)
            .field("test_mode", &self.test_mode)
            .field("result_method", &self.result_method)
            .field("payment_url_template", &self.payment_url_template.as_str())
            .field("user_data_prefix", &self.user_data_prefix)
            .field("result_fields", &self.result_fields)
            .finish()
    }
}

/// Builder merging defaults with overrides.
#[derive(Debug, Clone)]
pub struct GatewayConfigBuilder {
    merchant_login: String,
    password1: String,
    password2: String,
    hash_algorithm: String,
    test_mode: bool,
    result_method: RequestMethod,
    payment_url_template: String,
    user_data_prefix: String,
    result_fields: Vec<ResultField>,
}

impl GatewayConfigBuilder {
    pub fn new(merchant_login: impl Into<String>) -> Self {
        Self {
            merchant_login: merchant_login.into(),
            password1: String::new(),
            password2: String::new(),
            hash_algorithm: HashAlgorithm::default().as_str().to_string(),
            test_mode: false,
            result_method: RequestMethod::default(),
            payment_url_template: DEFAULT_PAYMENT_URL.to_string(),
            user_data_prefix: DEFAULT_USER_DATA_PREFIX.to_string(),
            result_fields: ResultField::defaults(),
        }
    }

    pub fn password1(mut self, password: impl Into<String>) -> Self {
        self.password1 = password.into();
        self
    }

    pub fn password2(mut self, password: impl Into<String>) -> Self {
        self.password2 = password.into();
        self
    }

    /// Algorithm identifier, checked in [`build`](Self::build).
    pub fn hash_algorithm(mut self, algorithm: impl Into<String>) -> Self {
        self.hash_algorithm = algorithm.into();
        self
    }

    pub fn test_mode(mut self, enabled: bool) -> Self {
        self.test_mode = enabled;
        self
    }

    pub fn result_method(mut self, method: RequestMethod) -> Self {
        self.result_method = method;
        self
    }

    pub fn payment_url_template(mut self, template: impl Into<String>) -> Self {
        self.payment_url_template = template.into();
        self
    }

    pub fn user_data_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_data_prefix = prefix.into();
        self
    }

    /// Replaces the recognized field list.
    pub fn result_fields(mut self, fields: Vec<ResultField>) -> Self {
        self.result_fields = fields;
        self
    }

    /// Appends one recognized field to the current list.
    pub fn result_field(mut self, key: impl Into<String>, required: bool) -> Self {
        self.result_fields.push(ResultField::new(key, required));
        self
    }

    /// Validates all settings and freezes the configuration.
    pub fn build(self) -> Result<GatewayConfig, ConfigError> {
        if self.merchant_login.trim().is_empty() {
            return Err(ConfigError::InvalidSetting {
                name: "merchant_login",
                reason: "cannot be empty".into(),
            });
        }

        if self.user_data_prefix.is_empty() {
            return Err(ConfigError::InvalidSetting {
                name: "user_data_prefix",
                reason: "cannot be empty".into(),
            });
        }

        let hash_algorithm: HashAlgorithm = self.hash_algorithm.parse()?;

        let payment_url_template =
            Url::parse(&self.payment_url_template).map_err(|e| ConfigError::InvalidSetting {
                name: "payment_url_template",
                reason: e.to_string(),
            })?;
        if payment_url_template.cannot_be_a_base() {
            return Err(ConfigError::InvalidSetting {
                name: "payment_url_template",
                reason: "must be a hierarchical URL".into(),
            });
        }

        ResultField::validate_list(&self.result_fields)?;

        Ok(GatewayConfig {
            merchant_login: self.merchant_login,
            password1: self.password1,
            password2: self.password2,
            hash_algorithm,
            test_mode: self.test_mode,
            result_method: self.result_method,
            payment_url_template,
            user_data_prefix: self.user_data_prefix,
            result_fields: self.result_fields,
        })
    }
}

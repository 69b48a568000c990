//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `GALERIA_BASE_URL` - Public URL for the storefront
//! - `GALERIA_ADMIN_TOKEN` - Bearer token for the admin API (min 32 chars, high entropy)
//!
//! ## Optional
//! - `GALERIA_HOST` - Bind address (default: 127.0.0.1)
//! - `GALERIA_PORT` - Listen port (default: 3000)
//! - `GALERIA_DATA_DIR` - Directory for cart slots and the catalog (default: data)
//! - `GALERIA_CATALOG_FILE` - Catalog JSON file (default: `<data dir>/catalog.json`)
//! - `GALERIA_CART_IDLE_SECS` - Seconds before an idle cart leaves memory (default: 1800)
//! - `WHATSAPP_BASE_URL` - Deep link base (default: <https://wa.me>)
//! - `WHATSAPP_RECIPIENT` - Gallery phone number, digits only
//! - `WHATSAPP_OPENING_LINE` - First line of the quote request
//! - `WHATSAPP_CLOSING_LINE` - Last line of the quote request
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_TRACES_SAMPLE_RATE` - Sentry traces sample rate (default: 0.0)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

const MIN_ADMIN_TOKEN_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

const DEFAULT_WHATSAPP_BASE_URL: &str = "https://wa.me";
const DEFAULT_WHATSAPP_RECIPIENT: &str = "5551999373017";
const DEFAULT_OPENING_LINE: &str =
    "Olá! Gostaria de solicitar um orçamento para os seguintes quadros:";
const DEFAULT_CLOSING_LINE: &str = "Aguardo retorno. Obrigado!";

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Directory holding cart slot files
    pub data_dir: PathBuf,
    /// Catalog JSON file
    pub catalog_file: PathBuf,
    /// How long an untouched cart stays in memory
    pub cart_idle: Duration,
    /// Bearer token for the admin API
    pub admin_token: SecretString,
    /// WhatsApp checkout handoff
    pub checkout: CheckoutConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Sentry traces sample rate
    pub sentry_traces_sample_rate: f32,
}

/// WhatsApp deep link settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutConfig {
    /// Deep link base, e.g. <https://wa.me>
    pub base_url: Url,
    /// Gallery phone number in international format, digits only
    pub recipient: String,
    /// First line of the quote request
    pub opening_line: String,
    /// Last line of the quote request
    pub closing_line: String,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_WHATSAPP_BASE_URL)
                .unwrap_or_else(|_| unreachable!("default WhatsApp URL is valid")),
            recipient: DEFAULT_WHATSAPP_RECIPIENT.to_string(),
            opening_line: DEFAULT_OPENING_LINE.to_string(),
            closing_line: DEFAULT_CLOSING_LINE.to_string(),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Same as [`StorefrontConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(&lookup);

        let host = env
            .or_default("GALERIA_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("GALERIA_HOST".to_string(), e.to_string()))?;
        let port = env
            .or_default("GALERIA_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("GALERIA_PORT".to_string(), e.to_string()))?;
        let base_url = env.required("GALERIA_BASE_URL")?;

        let data_dir = PathBuf::from(env.or_default("GALERIA_DATA_DIR", "data"));
        let catalog_file = env
            .optional("GALERIA_CATALOG_FILE")
            .map_or_else(|| data_dir.join("catalog.json"), PathBuf::from);
        let cart_idle = env
            .or_default("GALERIA_CART_IDLE_SECS", "1800")
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|e| {
                ConfigError::InvalidEnvVar("GALERIA_CART_IDLE_SECS".to_string(), e.to_string())
            })?;

        let admin_token = env.validated_secret("GALERIA_ADMIN_TOKEN")?;
        validate_secret_length(&admin_token, "GALERIA_ADMIN_TOKEN")?;

        let checkout = CheckoutConfig::from_env(&env)?;

        let sentry_traces_sample_rate = env
            .or_default("SENTRY_TRACES_SAMPLE_RATE", "0.0")
            .parse::<f32>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("SENTRY_TRACES_SAMPLE_RATE".to_string(), e.to_string())
            })?;

        Ok(Self {
            host,
            port,
            base_url,
            data_dir,
            catalog_file,
            cart_idle,
            admin_token,
            checkout,
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl CheckoutConfig {
    /// Load only the `WHATSAPP_*` settings, for tools that do not run the
    /// server.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the base URL or recipient is invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Self::from_env(&Env(&lookup))
    }

    fn from_env(env: &Env<'_>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let base_url = match env.optional("WHATSAPP_BASE_URL") {
            Some(raw) => Url::parse(&raw).map_err(|e| {
                ConfigError::InvalidEnvVar("WHATSAPP_BASE_URL".to_string(), e.to_string())
            })?,
            None => defaults.base_url,
        };

        let recipient = env.or_default("WHATSAPP_RECIPIENT", DEFAULT_WHATSAPP_RECIPIENT);
        if recipient.is_empty() || !recipient.chars().all(|c| c.is_ascii_digit()) {
            return Err(ConfigError::InvalidEnvVar(
                "WHATSAPP_RECIPIENT".to_string(),
                "must be a phone number with digits only".to_string(),
            ));
        }

        Ok(Self {
            base_url,
            recipient,
            opening_line: env.or_default("WHATSAPP_OPENING_LINE", DEFAULT_OPENING_LINE),
            closing_line: env.or_default("WHATSAPP_CLOSING_LINE", DEFAULT_CLOSING_LINE),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Variable source used while loading.
struct Env<'a>(&'a dyn Fn(&str) -> Option<String>);

impl Env<'_> {
    /// Get a required variable.
    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Get an optional variable. Empty values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.is_empty())
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Load and validate a secret.
    fn validated_secret(&self, key: &str) -> Result<SecretString, ConfigError> {
        let value = self.required(key)?;
        validate_secret_strength(&value, key)?;
        Ok(SecretString::from(value))
    }
}

/// Validate that a secret meets minimum length requirements.
fn validate_secret_length(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_ADMIN_TOKEN_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_ADMIN_TOKEN_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    if let Some(pattern) = PLACEHOLDER_PATTERNS
        .iter()
        .find(|pattern| lower.contains(*pattern))
    {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!("appears to be a placeholder (contains '{pattern}')"),
        ));
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated token."
            ),
        ));
    }

    Ok(())
}

//! Service configuration.

use serde::Deserialize;
use std::path::Path;

/// Service configuration loaded from environment variables.
///
/// Built once at startup and shared read-only. Missing credentials are not
/// rejected here; they surface later as authentication failures from the
/// provider concerned.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Address to listen on (default: "0.0.0.0:3000").
    pub listen_addr: String,

    /// Telegram bot token. Also the secret segment of the webhook path.
    pub telegram_token: String,

    /// Telegram Bot API base URL (default: `<https://api.telegram.org>`).
    pub telegram_api_url: String,

    /// `OpenRouter` API key.
    pub openrouter_api_key: String,

    /// `OpenRouter` API base URL (default: `<https://openrouter.ai/api/v1>`).
    pub openrouter_api_url: String,

    /// Chat completion model.
    pub openrouter_model: String,

    /// M-Pesa Daraja settings.
    pub mpesa: MpesaConfig,

    /// Timeout for outbound HTTP calls in seconds.
    pub http_timeout_seconds: u64,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,

    /// Inbound request timeout in seconds.
    pub request_timeout_seconds: u64,
}

/// M-Pesa Daraja merchant settings.
#[derive(Debug, Clone)]
pub struct MpesaConfig {
    /// OAuth consumer key.
    pub consumer_key: String,

    /// OAuth consumer secret.
    pub consumer_secret: String,

    /// Paybill shortcode.
    pub shortcode: String,

    /// Lipa na M-Pesa Online passkey.
    pub passkey: String,

    /// Daraja base URL (default: `<https://api.safaricom.co.ke>`).
    pub api_url: String,

    /// Public base URL of this service, used to build callback URLs.
    pub callback_base_url: String,

    /// Session price in KES (default: 100).
    pub amount: u32,

    /// `AccountReference` shown to the payer.
    pub account_reference: String,

    /// `TransactionDesc` sent with each push.
    pub transaction_desc: String,

    /// Extra token fetch attempts after the first (default: 0).
    pub token_retry_attempts: u32,
}

/// M-Pesa secrets file structure.
#[derive(Debug, Deserialize)]
struct MpesaSecrets {
    consumer_key: String,
    consumer_secret: String,
    shortcode: String,
    passkey: String,
    #[serde(default)]
    api_url: Option<String>,
}

impl ServiceConfig {
    /// Load configuration from environment variables and secrets files.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let mpesa = MpesaConfig::from_env(defaults.mpesa);

        let config = Self {
            listen_addr: env_or("LISTEN_ADDR", defaults.listen_addr),
            telegram_token: env_or("TELEGRAM_TOKEN", defaults.telegram_token),
            telegram_api_url: env_or("TELEGRAM_API_URL", defaults.telegram_api_url),
            openrouter_api_key: env_or("OPENROUTER_KEY", defaults.openrouter_api_key),
            openrouter_api_url: env_or("OPENROUTER_API_URL", defaults.openrouter_api_url),
            openrouter_model: env_or("OPENROUTER_MODEL", defaults.openrouter_model),
            mpesa,
            http_timeout_seconds: env_parse_or("HTTP_TIMEOUT_SECONDS", defaults.http_timeout_seconds),
            max_body_bytes: env_parse_or("MAX_BODY_BYTES", defaults.max_body_bytes),
            request_timeout_seconds: env_parse_or(
                "REQUEST_TIMEOUT_SECONDS",
                defaults.request_timeout_seconds,
            ),
        };

        config.warn_missing();
        config
    }

    fn warn_missing(&self) {
        let required = [
            ("TELEGRAM_TOKEN", &self.telegram_token),
            ("OPENROUTER_KEY", &self.openrouter_api_key),
            ("MPESA_CONSUMER_KEY", &self.mpesa.consumer_key),
            ("MPESA_CONSUMER_SECRET", &self.mpesa.consumer_secret),
            ("MPESA_SHORTCODE", &self.mpesa.shortcode),
            ("MPESA_PASSKEY", &self.mpesa.passkey),
        ];

        for (name, value) in required {
            if value.is_empty() {
                tracing::warn!(setting = name, "Not configured - dependent calls will fail");
            }
        }
    }
}

impl MpesaConfig {
    /// Whether every Daraja credential is set.
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        [
            &self.consumer_key,
            &self.consumer_secret,
            &self.shortcode,
            &self.passkey,
        ]
        .iter()
        .all(|value| !value.is_empty())
    }

    fn from_env(defaults: Self) -> Self {
        // Try to load credentials from a secrets file first, then fall back to env vars
        let (consumer_key, consumer_secret, shortcode, passkey, api_url) =
            if let Some(secrets) = load_mpesa_secrets() {
                (
                    secrets.consumer_key,
                    secrets.consumer_secret,
                    secrets.shortcode,
                    secrets.passkey,
                    resolve_api_url(
                        secrets.api_url,
                        std::env::var("MPESA_API_URL").ok(),
                        defaults.api_url,
                    ),
                )
            } else {
                (
                    env_or("MPESA_CONSUMER_KEY", defaults.consumer_key),
                    env_or("MPESA_CONSUMER_SECRET", defaults.consumer_secret),
                    env_or("MPESA_SHORTCODE", defaults.shortcode),
                    env_or("MPESA_PASSKEY", defaults.passkey),
                    env_or("MPESA_API_URL", defaults.api_url),
                )
            };

        Self {
            consumer_key,
            consumer_secret,
            shortcode,
            passkey,
            api_url,
            callback_base_url: env_or("BASE_URL", defaults.callback_base_url),
            amount: env_parse_or("SESSION_PRICE_KES", defaults.amount),
            account_reference: env_or("MPESA_ACCOUNT_REFERENCE", defaults.account_reference),
            transaction_desc: env_or("MPESA_TRANSACTION_DESC", defaults.transaction_desc),
            token_retry_attempts: env_parse_or(
                "MPESA_TOKEN_RETRY_ATTEMPTS",
                defaults.token_retry_attempts,
            ),
        }
    }
}

/// Daraja URL precedence: secrets file, then `MPESA_API_URL`, then default.
fn resolve_api_url(from_file: Option<String>, from_env: Option<String>, default: String) -> String {
    from_file.or(from_env).unwrap_or(default)
}

fn env_or(name: &str, default: String) -> String {
    std::env::var(name).unwrap_or(default)
}

fn env_parse_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// Load M-Pesa secrets from the first secrets file found.
fn load_mpesa_secrets() -> Option<MpesaSecrets> {
    let secret_paths = [
        ".secrets/mpesa.json",
        "therapy-bot/.secrets/mpesa.json",
        "../.secrets/mpesa.json",
    ];

    for path in &secret_paths {
        if let Ok(secrets) = load_secrets_file::<MpesaSecrets>(path) {
            tracing::info!(path = %path, "Loaded M-Pesa secrets from file");
            return Some(secrets);
        }
    }

    tracing::debug!("M-Pesa secrets file not found, using environment variables");
    None
}

/// Load secrets from a JSON file.
fn load_secrets_file<T: serde::de::DeserializeOwned>(path: &str) -> Result<T, std::io::Error> {
    let path = Path::new(path);
    if !path.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Secrets file not found",
        ));
    }
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:3000".into(),
            telegram_token: String::new(),
            telegram_api_url: "https://api.telegram.org".into(),
            openrouter_api_key: String::new(),
            openrouter_api_url: "https://openrouter.ai/api/v1".into(),
            openrouter_model: "qwen/qwen3-30b-a3b:free".into(),
            mpesa: MpesaConfig::default(),
            http_timeout_seconds: 30,
            max_body_bytes: 1024 * 1024, // 1MB
            request_timeout_seconds: 120,
        }
    }
}

impl Default for MpesaConfig {
    fn default() -> Self {
        Self {
            consumer_key: String::new(),
            consumer_secret: String::new(),
            shortcode: String::new(),
            passkey: String::new(),
            api_url: "https://api.safaricom.co.ke".into(),
            callback_base_url: "http://localhost:3000".into(),
            amount: 100,
            account_reference: "Therapy".into(),
            transaction_desc: "Therapy session booking".into(),
            token_retry_attempts: 0,
        }
    }
}

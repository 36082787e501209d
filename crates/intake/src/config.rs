//! Intake service configuration loaded from environment variables.
//!
//! Loaded once at process start and handed to [`AppState`](crate::state::AppState);
//! nothing else in the service reads the environment.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SMTP_HOST` - SMTP relay hostname (STARTTLS)
//! - `SMTP_SENDER_EMAIL` - Sender address, also the SMTP login
//! - `SMTP_PASSWORD` - SMTP password / app password for the sender
//! - `ORDER_RECEIVER_EMAIL` - Address that receives new-order notifications
//! - `COMPANY_NAME` - Company name shown in the page footer
//! - `SUPPORT_EMAIL` - Support contact shown in the page footer
//!
//! ## Optional
//! - `INTAKE_HOST` - Bind address (default: 127.0.0.1)
//! - `INTAKE_PORT` - Listen port (default: 3000)
//! - `INTAKE_ORDERS_DIR` - Root directory for stored orders (default: orders)
//! - `INTAKE_STATIC_DIR` - Stylesheet directory (default: crates/intake/static)
//! - `INTAKE_MAX_UPLOAD_MB` - Request body limit in MiB (default: 50)
//! - `INTAKE_STRICT_CONTACT_VALIDATION` - Reject implausible email/phone (default: false)
//! - `INTAKE_SHOW_TEST_BANNER` - Show the "test version" banner (default: false)
//! - `SMTP_PORT` - SMTP port (default: 587)
//! - `SMTP_TIMEOUT_SECS` - SMTP command timeout (default: 30)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Sentry error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Sentry traces sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use cadia_core::Email;
use secrecy::SecretString;
use thiserror::Error;

const BYTES_PER_MIB: usize = 1024 * 1024;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
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

/// Intake service configuration.
#[derive(Debug, Clone)]
pub struct IntakeConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Root directory holding one subdirectory per order
    pub orders_dir: PathBuf,
    /// Directory served under `/static`
    pub static_dir: PathBuf,
    /// Largest accepted request body, in bytes
    pub max_upload_bytes: usize,
    /// Turn advisory contact checks into blocking validation errors
    pub strict_contact_validation: bool,
    /// Outbound notification settings
    pub smtp: SmtpConfig,
    /// Branding shown on the order page
    pub branding: BrandingConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

/// SMTP settings for order notifications.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct SmtpConfig {
    /// SMTP relay hostname
    pub host: String,
    /// SMTP port (STARTTLS)
    pub port: u16,
    /// Sender address; also used as the SMTP username
    pub sender: Email,
    /// SMTP password for the sender
    pub password: SecretString,
    /// Fixed recipient of every order notification
    pub receiver: Email,
    /// Per-command timeout for the SMTP conversation
    pub timeout: Duration,
}

impl std::fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("sender", &self.sender)
            .field("password", &"[REDACTED]")
            .field("receiver", &self.receiver)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Company details rendered on the order page.
#[derive(Debug, Clone)]
pub struct BrandingConfig {
    pub company_name: String,
    pub support_email: Email,
    pub show_test_banner: bool,
}

impl IntakeConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let host = env.parsed_or("INTAKE_HOST", "127.0.0.1")?;
        let port = env.parsed_or("INTAKE_PORT", "3000")?;
        let orders_dir = PathBuf::from(env.or_default("INTAKE_ORDERS_DIR", "orders"));
        let static_dir = PathBuf::from(env.or_default("INTAKE_STATIC_DIR", "crates/intake/static"));
        let max_upload_mb: usize = env.parsed_or("INTAKE_MAX_UPLOAD_MB", "50")?;
        if max_upload_mb == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "INTAKE_MAX_UPLOAD_MB".to_string(),
                "must be at least 1".to_string(),
            ));
        }
        let strict_contact_validation = env.flag("INTAKE_STRICT_CONTACT_VALIDATION")?;

        let smtp = SmtpConfig::from_env(&env)?;
        let branding = BrandingConfig::from_env(&env)?;

        let sentry_dsn = env.optional("SENTRY_DSN");
        let sentry_environment = env.optional("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = env.parsed_or("SENTRY_SAMPLE_RATE", "1.0")?;
        let sentry_traces_sample_rate = env.parsed_or("SENTRY_TRACES_SAMPLE_RATE", "0.0")?;

        Ok(Self {
            host,
            port,
            orders_dir,
            static_dir,
            max_upload_bytes: max_upload_mb.saturating_mul(BYTES_PER_MIB),
            strict_contact_validation,
            smtp,
            branding,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl SmtpConfig {
    fn from_env<F>(env: &Env<F>) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let timeout_secs: u64 = env.parsed_or("SMTP_TIMEOUT_SECS", "30")?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "SMTP_TIMEOUT_SECS".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            host: env.required("SMTP_HOST")?,
            port: env.parsed_or("SMTP_PORT", "587")?,
            sender: env.email("SMTP_SENDER_EMAIL")?,
            password: env.secret("SMTP_PASSWORD")?,
            receiver: env.email("ORDER_RECEIVER_EMAIL")?,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

impl BrandingConfig {
    fn from_env<F>(env: &Env<F>) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            company_name: env.required("COMPANY_NAME")?,
            support_email: env.email("SUPPORT_EMAIL")?,
            show_test_banner: env.flag("INTAKE_SHOW_TEST_BANNER")?,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Typed accessors over a key lookup.
struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Get an optional variable; blank values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    /// Get a required variable.
    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Parse a variable, falling back to `default` when unset.
    fn parsed_or<T>(&self, key: &str, default: &str) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.or_default(key, default)
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    }

    /// Boolean flag, false when unset.
    fn flag(&self, key: &str) -> Result<bool, ConfigError> {
        match self.optional(key).map(|v| v.trim().to_ascii_lowercase()) {
            None => Ok(false),
            Some(v) if matches!(v.as_str(), "1" | "true" | "yes" | "on") => Ok(true),
            Some(v) if matches!(v.as_str(), "0" | "false" | "no" | "off") => Ok(false),
            Some(v) => Err(ConfigError::InvalidEnvVar(
                key.to_string(),
                format!("expected a boolean, got {v:?}"),
            )),
        }
    }

    /// Get a required variable holding an email address.
    fn email(&self, key: &str) -> Result<Email, ConfigError> {
        Email::parse(&self.required(key)?)
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    }

    /// Load and validate a secret.
    fn secret(&self, key: &str) -> Result<SecretString, ConfigError> {
        let value = self.required(key)?;
        reject_placeholder(&value, key)?;
        Ok(SecretString::from(value))
    }
}

/// Validate that a secret is not a placeholder copied from a sample `.env`.
fn reject_placeholder(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    Ok(())
}

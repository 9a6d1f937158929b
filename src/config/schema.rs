//! Configuration schema types
//!
//! This module defines the configuration structure for orderdesk.

use crate::config::SecretString;
use serde::{Deserialize, Serialize};

/// Passphrase used to decrypt the session token when none is configured.
///
/// Kept only so tokens written by older console builds stay readable.
/// Validation rejects it in production.
pub const FALLBACK_SECRET_KEY: &str = "your-secret-key";

/// Runtime environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Development environment
    #[default]
    Development,
    /// Staging environment
    Staging,
    /// Production environment
    Production,
}

/// Main orderdesk configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeskConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Runtime environment (development, staging, production)
    #[serde(default)]
    pub environment: Environment,

    /// Order service connection
    pub api: ApiConfig,

    /// Session credential storage
    #[serde(default)]
    pub session: SessionConfig,

    /// Order view defaults
    #[serde(default)]
    pub view: ViewConfig,

    /// Export destinations
    #[serde(default)]
    pub export: ExportConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl DeskConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.api.validate(&self.environment)?;
        self.session.validate(&self.environment)?;
        self.view.validate()?;
        self.export.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Order service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the order service, e.g. `https://api.example.com/api/v1`
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// TLS certificate verification enabled
    ///
    /// **SECURITY WARNING**: disabling verification exposes the bearer token
    /// to man-in-the-middle attacks. Rejected in production.
    #[serde(default = "default_true")]
    pub tls_verify: bool,
}

impl ApiConfig {
    fn validate(&self, environment: &Environment) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("api.base_url cannot be empty".to_string());
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err("api.base_url must start with http:// or https://".to_string());
        }

        if url::Url::parse(&self.base_url).is_err() {
            return Err(format!("api.base_url is not a valid URL: {}", self.base_url));
        }

        if self.timeout_seconds == 0 {
            return Err("api.timeout_seconds must be > 0".to_string());
        }

        if *environment == Environment::Production && !self.tls_verify {
            return Err(
                "TLS certificate verification cannot be disabled in production environments. \
                Set 'tls_verify = true', or use 'environment = \"development\"' for local testing."
                    .to_string(),
            );
        }

        Ok(())
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/api/v1".to_string(),
            timeout_seconds: default_timeout_seconds(),
            tls_verify: true,
        }
    }
}

/// Session credential configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Path of the JSON document holding persisted session values
    #[serde(default = "default_store_path")]
    pub store_path: String,

    /// Key the encrypted bearer token is stored under
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// Passphrase the token is encrypted with
    /// Stored securely in memory and automatically zeroized on drop
    #[serde(default)]
    pub secret_key: Option<SecretString>,
}

impl SessionConfig {
    fn validate(&self, environment: &Environment) -> Result<(), String> {
        use secrecy::ExposeSecret;

        if self.store_path.trim().is_empty() {
            return Err("session.store_path cannot be empty".to_string());
        }

        if self.storage_key.trim().is_empty() {
            return Err("session.storage_key cannot be empty".to_string());
        }

        if *environment == Environment::Production {
            let configured = self
                .secret_key
                .as_ref()
                .map(|k| {
                    let k = k.expose_secret();
                    !k.is_empty() && *k != *FALLBACK_SECRET_KEY
                })
                .unwrap_or(false);
            if !configured {
                return Err(
                    "session.secret_key must be set to a non-default value in production environments"
                        .to_string(),
                );
            }
        }

        Ok(())
    }

    /// True when no usable passphrase is configured and the fallback applies
    pub fn uses_fallback_key(&self) -> bool {
        use secrecy::ExposeSecret;

        self.secret_key
            .as_ref()
            .map(|k| k.expose_secret().is_empty())
            .unwrap_or(true)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            storage_key: default_storage_key(),
            secret_key: None,
        }
    }
}

/// Order view configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewConfig {
    /// Initial page size
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Page sizes offered by the page-size selector
    #[serde(default = "default_page_size_options")]
    pub page_size_options: Vec<usize>,

    /// Currency label appended to displayed amounts
    #[serde(default = "default_currency")]
    pub currency: String,
}

impl ViewConfig {
    fn validate(&self) -> Result<(), String> {
        if self.page_size_options.is_empty() {
            return Err("view.page_size_options cannot be empty".to_string());
        }

        if self.page_size_options.contains(&0) {
            return Err("view.page_size_options must all be > 0".to_string());
        }

        if !self.page_size_options.contains(&self.page_size) {
            return Err(format!(
                "view.page_size {} is not one of view.page_size_options {:?}",
                self.page_size, self.page_size_options
            ));
        }

        Ok(())
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            page_size_options: default_page_size_options(),
            currency: default_currency(),
        }
    }
}

/// Export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory exported documents are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// File name of the PDF snapshot
    #[serde(default = "default_snapshot_file_name")]
    pub snapshot_file_name: String,

    /// File name of the spreadsheet export
    #[serde(default = "default_spreadsheet_file_name")]
    pub spreadsheet_file_name: String,

    /// Snapshot page format (a4 or letter)
    #[serde(default = "default_page_format")]
    pub page_format: String,
}

impl ExportConfig {
    fn validate(&self) -> Result<(), String> {
        if self.output_dir.trim().is_empty() {
            return Err("export.output_dir cannot be empty".to_string());
        }

        for (field, name) in [
            ("snapshot_file_name", &self.snapshot_file_name),
            ("spreadsheet_file_name", &self.spreadsheet_file_name),
        ] {
            if name.trim().is_empty() {
                return Err(format!("export.{field} cannot be empty"));
            }
            if name.contains('/') || name.contains('\\') {
                return Err(format!("export.{field} must be a file name, not a path"));
            }
        }

        let valid_formats = ["a4", "letter"];
        if !valid_formats.contains(&self.page_format.as_str()) {
            return Err(format!(
                "Invalid export.page_format '{}'. Must be one of: {}",
                self.page_format,
                valid_formats.join(", ")
            ));
        }

        Ok(())
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            snapshot_file_name: default_snapshot_file_name(),
            spreadsheet_file_name: default_spreadsheet_file_name(),
            page_format: default_page_format(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local logging is enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_store_path() -> String {
    ".orderdesk/session.json".to_string()
}

fn default_storage_key() -> String {
    "token".to_string()
}

fn default_page_size() -> usize {
    10
}

fn default_page_size_options() -> Vec<usize> {
    vec![10, 50, 100, 200]
}

fn default_currency() -> String {
    "so'm".to_string()
}

fn default_output_dir() -> String {
    ".".to_string()
}

fn default_snapshot_file_name() -> String {
    "orders.pdf".to_string()
}

fn default_spreadsheet_file_name() -> String {
    "orders.xlsx".to_string()
}

fn default_page_format() -> String {
    "a4".to_string()
}

fn default_local_path() -> String {
    "logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

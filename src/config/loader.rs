//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::DeskConfig;
use super::secret::secret_string;
use crate::domain::errors::DeskError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into DeskConfig
/// 4. Applies environment variable overrides (ORDERDESK_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns [`DeskError::Configuration`] if the file is missing or unreadable,
/// a referenced variable is unset, parsing fails or validation fails.
///
/// # Examples
///
/// ```no_run
/// use orderdesk::config::loader::load_config;
///
/// let config = load_config("orderdesk.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<DeskConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(DeskError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        DeskError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&contents)
}

/// Parses configuration text (substitution, overrides, validation)
pub fn parse_config(contents: &str) -> Result<DeskConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: DeskConfig = toml::from_str(&contents)
        .map_err(|e| DeskError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        DeskError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error listing every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| DeskError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    processed_line = processed_line.replace(&format!("${{{var_name}}}"), &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(DeskError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the ORDERDESK_* prefix
///
/// Environment variables follow the pattern: ORDERDESK_<SECTION>_<KEY>,
/// for example ORDERDESK_API_BASE_URL or ORDERDESK_VIEW_PAGE_SIZE.
fn apply_env_overrides(config: &mut DeskConfig) {
    if let Ok(val) = std::env::var("ORDERDESK_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // API overrides
    if let Ok(val) = std::env::var("ORDERDESK_API_BASE_URL") {
        config.api.base_url = val;
    }
    if let Ok(val) = std::env::var("ORDERDESK_API_TIMEOUT_SECONDS") {
        if let Ok(secs) = val.parse() {
            config.api.timeout_seconds = secs;
        }
    }
    if let Ok(val) = std::env::var("ORDERDESK_API_TLS_VERIFY") {
        config.api.tls_verify = val.parse().unwrap_or(true);
    }

    // Session overrides
    if let Ok(val) = std::env::var("ORDERDESK_SESSION_STORE_PATH") {
        config.session.store_path = val;
    }
    if let Ok(val) = std::env::var("ORDERDESK_SESSION_STORAGE_KEY") {
        config.session.storage_key = val;
    }
    if let Ok(val) = std::env::var("ORDERDESK_SESSION_SECRET_KEY") {
        config.session.secret_key = Some(secret_string(val));
    }

    // View overrides
    if let Ok(val) = std::env::var("ORDERDESK_VIEW_PAGE_SIZE") {
        if let Ok(size) = val.parse() {
            config.view.page_size = size;
        }
    }

    // Export overrides
    if let Ok(val) = std::env::var("ORDERDESK_EXPORT_OUTPUT_DIR") {
        config.export.output_dir = val;
    }

    // Logging overrides
    if let Ok(val) = std::env::var("ORDERDESK_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("ORDERDESK_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("ORDERDESK_LOADER_TEST_VAR", "test_value");
        let input = "secret_key = \"${ORDERDESK_LOADER_TEST_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "secret_key = \"test_value\"\n");
        std::env::remove_var("ORDERDESK_LOADER_TEST_VAR");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("ORDERDESK_LOADER_MISSING_VAR");
        let input = "secret_key = \"${ORDERDESK_LOADER_MISSING_VAR}\"";
        let err = substitute_env_vars(input).unwrap_err();
        assert!(err.to_string().contains("ORDERDESK_LOADER_MISSING_VAR"));
    }

    #[test]
    fn test_substitute_env_vars_skips_comments() {
        let input = "# secret_key = \"${ORDERDESK_LOADER_COMMENTED_VAR}\"";
        assert!(substitute_env_vars(input).is_ok());
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent-orderdesk.toml");
        assert!(matches!(result, Err(DeskError::Configuration(_))));
    }

    #[test]
    fn test_load_config_valid() {
        let toml_content = r#"
[application]
log_level = "debug"

[api]
base_url = "https://api.example.com/api/v1"

[view]
page_size = 50
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.application.log_level, "debug");
        assert_eq!(config.api.base_url, "https://api.example.com/api/v1");
        assert_eq!(config.view.page_size, 50);
        assert_eq!(config.session.storage_key, "token");
    }

    #[test]
    fn test_parse_config_rejects_invalid() {
        let toml_content = r#"
[api]
base_url = "not-a-url"
"#;
        let err = parse_config(toml_content).unwrap_err();
        assert!(err.to_string().contains("validation failed"));
    }
}

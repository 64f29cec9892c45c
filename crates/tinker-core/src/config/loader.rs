//! Config loader — reads `~/.tinker/config.json` and merges env vars.
//!
//! # Loading precedence
//! 1. Defaults (from `Config::default()`)
//! 2. JSON file at `~/.tinker/config.json`
//! 3. Environment variables `TINKER_<SECTION>__<FIELD>` (override JSON)

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::schema::Config;

/// Default config file path.
pub fn get_config_path() -> PathBuf {
    crate::utils::get_data_path().join("config.json")
}

/// Load configuration from the default path + env vars.
///
/// Falls back to `Config::default()` if the file doesn't exist or can't be parsed.
pub fn load_config(path: Option<&Path>) -> Config {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);

    load_config_from_path(&config_path)
}

/// Load config from a specific file path.
fn load_config_from_path(path: &Path) -> Config {
    if !path.exists() {
        info!("No config file found at {}, using defaults", path.display());
        return apply_env_overrides(Config::default());
    }

    debug!("Loading config from {}", path.display());

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return apply_env_overrides(Config::default());
        }
    };

    let config: Config = match serde_json::from_str(&content) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to parse config JSON: {}", e);
            return apply_env_overrides(Config::default());
        }
    };

    apply_env_overrides(config)
}

/// Save configuration to disk (pretty-printed JSON with camelCase keys).
pub fn save_config(config: &Config, path: Option<&Path>) -> std::io::Result<()> {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);

    // Ensure parent directory exists
    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(config)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    std::fs::write(&config_path, json)?;
    debug!("Config saved to {}", config_path.display());
    Ok(())
}

/// Apply environment variable overrides on top of a loaded config.
///
/// Env var format: `TINKER_<SECTION>__<FIELD>` (double underscore as delimiter).
///
/// Supported overrides:
/// - `TINKER_INFERENCE__API_TOKEN` → `inference.api_token`
/// - `TINKER_INFERENCE__API_BASE` → `inference.api_base`
/// - `TINKER_INFERENCE__MAX_ATTEMPTS` → `inference.max_attempts`
/// - `TINKER_INFERENCE__RETRY_WAIT_SECS` → `inference.retry_wait_secs`
/// - `TINKER_STORAGE__DATA_DIR` → `storage.data_dir`
/// - `HF_API_TOKEN` → `inference.api_token` (fallback, only if still empty)
fn apply_env_overrides(mut config: Config) -> Config {
    if let Ok(val) = std::env::var("TINKER_INFERENCE__API_TOKEN") {
        config.inference.api_token = val;
    }
    if let Ok(val) = std::env::var("TINKER_INFERENCE__API_BASE") {
        config.inference.api_base = val;
    }
    if let Ok(val) = std::env::var("TINKER_INFERENCE__MAX_ATTEMPTS") {
        if let Ok(n) = val.parse::<u32>() {
            config.inference.max_attempts = n;
        }
    }
    if let Ok(val) = std::env::var("TINKER_INFERENCE__RETRY_WAIT_SECS") {
        if let Ok(n) = val.parse::<u64>() {
            config.inference.retry_wait_secs = n;
        }
    }
    if let Ok(val) = std::env::var("TINKER_STORAGE__DATA_DIR") {
        config.storage.data_dir = Some(val);
    }

    // Conventional Hugging Face token var as a fallback
    if config.inference.api_token.is_empty() {
        if let Ok(val) = std::env::var("HF_API_TOKEN") {
            config.inference.api_token = val;
        }
    }

    config
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp_json(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_missing_file() {
        let config = load_config_from_path(Path::new("/nonexistent/path/config.json"));
        // Should return defaults
        assert_eq!(config.inference.max_attempts, 5);
        assert_eq!(config.inference.retry_wait_secs, 30);
    }

    #[test]
    fn test_load_valid_json() {
        let file = write_temp_json(
            r#"{
            "inference": {
                "apiToken": "hf_test",
                "maxAttempts": 3
            }
        }"#,
        );

        let config = load_config_from_path(file.path());
        assert_eq!(config.inference.api_token, "hf_test");
        assert_eq!(config.inference.max_attempts, 3);
        // Default preserved
        assert_eq!(config.inference.retry_wait_secs, 30);
    }

    #[test]
    fn test_load_invalid_json_returns_defaults() {
        let file = write_temp_json("not valid json {{{");
        let config = load_config_from_path(file.path());
        assert_eq!(config.inference.max_attempts, 5);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = Config::default();
        config.inference.api_token = "hf_saved".to_string();
        config.storage.data_dir = Some("/tmp/elsewhere".to_string());

        save_config(&config, Some(&path)).unwrap();

        let reloaded = load_config_from_path(&path);
        assert_eq!(reloaded.inference.api_token, "hf_saved");
        assert_eq!(reloaded.storage.data_dir.as_deref(), Some("/tmp/elsewhere"));
    }

    #[test]
    fn test_env_override_token() {
        std::env::set_var("TINKER_INFERENCE__API_TOKEN", "hf_env");
        let config = apply_env_overrides(Config::default());
        assert_eq!(config.inference.api_token, "hf_env");
        std::env::remove_var("TINKER_INFERENCE__API_TOKEN");
    }

    #[test]
    fn test_env_override_data_dir() {
        std::env::set_var("TINKER_STORAGE__DATA_DIR", "/data/tinker");
        let config = apply_env_overrides(Config::default());
        assert_eq!(config.storage.data_dir.as_deref(), Some("/data/tinker"));
        std::env::remove_var("TINKER_STORAGE__DATA_DIR");
    }

    #[test]
    fn test_saved_json_uses_camel_case() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        save_config(&Config::default(), Some(&path)).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let raw: serde_json::Value = serde_json::from_str(&content).unwrap();

        assert!(raw["inference"].get("maxAttempts").is_some());
        assert!(raw["inference"].get("max_attempts").is_none());
    }
}

//! Configuration schema.
//!
//! JSON on disk uses **camelCase** keys; Rust uses snake_case.
//! We use `#[serde(rename_all = "camelCase")]` to handle the conversion.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────
// Root Config
// ─────────────────────────────────────────────

/// Root configuration — loaded from `~/.tinker/config.json` + env vars.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub inference: InferenceSettings,
    pub storage: StorageSettings,
}

// ─────────────────────────────────────────────
// Inference
// ─────────────────────────────────────────────

/// Settings for the Hugging Face inference client.
///
/// Injected into the client at construction; nothing reads process state
/// at call time.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InferenceSettings {
    /// API token for Bearer authentication.
    #[serde(default)]
    pub api_token: String,
    /// Inference API base URL.
    pub api_base: String,
    /// Maximum attempts while the model is loading (cold start).
    pub max_attempts: u32,
    /// Fallback wait between attempts, in seconds, when the service gives
    /// no readiness estimate.
    pub retry_wait_secs: u64,
}

impl Default for InferenceSettings {
    fn default() -> Self {
        Self {
            api_token: String::new(),
            api_base: "https://api-inference.huggingface.co".to_string(),
            max_attempts: 5,
            retry_wait_secs: 30,
        }
    }
}

impl InferenceSettings {
    /// Whether an API token is configured.
    pub fn is_configured(&self) -> bool {
        !self.api_token.is_empty()
    }
}

// ─────────────────────────────────────────────
// Storage
// ─────────────────────────────────────────────

/// Settings for the local record and attachment stores.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StorageSettings {
    /// Data directory override; defaults to `~/.tinker`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<String>,
}

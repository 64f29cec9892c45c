//! Model registry — the accepted model ids and their backend kinds.
//!
//! Classification is static and total: exactly one reserved id designates
//! the audio (speech-to-text) backend; every other accepted id is a text
//! completion model. Unknown ids are rejected up front so the rest of the
//! pipeline never sees them.

use tinker_core::{Result, TinkerError};

/// Which request/response shape a model speaks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backend {
    /// Prompt completion: JSON `{"inputs": ...}` in, candidate array out.
    Text,
    /// Speech transcription: raw bytes in, `{"text": ...}` out.
    Audio,
}

impl Backend {
    /// Short label for logs and CLI listings.
    pub fn label(&self) -> &'static str {
        match self {
            Backend::Text => "text",
            Backend::Audio => "audio",
        }
    }
}

/// Static specification of one accepted model.
#[derive(Clone, Debug)]
pub struct ModelSpec {
    /// Model id as addressed on the inference API (e.g. `"gpt2"`).
    pub id: &'static str,
    /// Backend kind, fixed per model.
    pub kind: Backend,
    /// Human-readable name for logs and listings.
    pub display_name: &'static str,
}

impl ModelSpec {
    /// Build the inference endpoint URL for this model.
    pub fn endpoint(&self, api_base: &str) -> String {
        let base = api_base.trim_end_matches('/');
        format!("{}/models/{}", base, self.id)
    }
}

/// Complete list of accepted models.
pub static MODELS: &[ModelSpec] = &[
    ModelSpec {
        id: "gpt2",
        kind: Backend::Text,
        display_name: "GPT-2",
    },
    ModelSpec {
        id: "microsoft/DialoGPT-medium",
        kind: Backend::Text,
        display_name: "DialoGPT Medium",
    },
    ModelSpec {
        id: "facebook/bart-large",
        kind: Backend::Text,
        display_name: "BART Large",
    },
    ModelSpec {
        id: "openai-gpt",
        kind: Backend::Text,
        display_name: "OpenAI GPT",
    },
    ModelSpec {
        id: "EleutherAI/gpt-neo-2.7B",
        kind: Backend::Text,
        display_name: "GPT-Neo 2.7B",
    },
    // The one reserved speech-to-text model.
    ModelSpec {
        id: "openai/whisper-large-v3",
        kind: Backend::Audio,
        display_name: "Whisper Large v3",
    },
];

/// Resolve a model id to its spec.
pub fn select_model(model_id: &str) -> Result<&'static ModelSpec> {
    MODELS
        .iter()
        .find(|spec| spec.id == model_id)
        .ok_or_else(|| TinkerError::UnsupportedModel(model_id.to_string()))
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

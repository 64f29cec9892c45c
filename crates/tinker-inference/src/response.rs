//! Backend response shapes and their normalization.
//!
//! The two backends return different payloads: text generation returns an
//! array of candidates, transcription returns a single object. Both are
//! parsed into one tagged union keyed by the backend kind, and each
//! variant normalizes to a plain content string.

use serde::Deserialize;

use tinker_core::{Result, TinkerError};

use crate::models::Backend;

/// Sentinel content used when a text generation carries no
/// `generated_text`. An empty generation is a legitimate model outcome,
/// not an error.
pub const NO_CONTENT: &str = "No content generated";

/// One candidate generation from a text model.
#[derive(Clone, Debug, Deserialize)]
pub struct TextCandidate {
    #[serde(default)]
    pub generated_text: Option<String>,
}

/// The transcript object from an audio model.
#[derive(Clone, Debug, Deserialize)]
pub struct Transcript {
    pub text: String,
}

/// A backend response, tagged by the backend that produced it.
#[derive(Clone, Debug)]
pub enum RawResponse {
    Text(Vec<TextCandidate>),
    Audio(Transcript),
}

impl RawResponse {
    /// Parse an upstream JSON payload for the given backend kind.
    ///
    /// A text payload that is not an array, or an audio payload without a
    /// `text` field, is a `Normalization` failure.
    pub fn parse(kind: Backend, raw: serde_json::Value) -> Result<Self> {
        match kind {
            Backend::Text => serde_json::from_value::<Vec<TextCandidate>>(raw)
                .map(RawResponse::Text)
                .map_err(|e| {
                    TinkerError::Normalization(format!("expected a candidate array: {e}"))
                }),
            Backend::Audio => serde_json::from_value::<Transcript>(raw)
                .map(RawResponse::Audio)
                .map_err(|e| {
                    TinkerError::Normalization(format!("expected a transcript object: {e}"))
                }),
        }
    }

    /// Reduce the response to plain output content.
    pub fn into_content(self) -> String {
        match self {
            RawResponse::Text(candidates) => candidates
                .into_iter()
                .next()
                .and_then(|c| c.generated_text)
                .unwrap_or_else(|| NO_CONTENT.to_string()),
            RawResponse::Audio(transcript) => transcript.text,
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn first_candidate_wins() {
        let raw = json!([
            {"generated_text": "hi"},
            {"generated_text": "ignored"}
        ]);
        let parsed = RawResponse::parse(Backend::Text, raw).unwrap();
        assert_eq!(parsed.into_content(), "hi");
    }

    #[test]
    fn missing_generated_text_degrades_to_sentinel() {
        let parsed = RawResponse::parse(Backend::Text, json!([{}])).unwrap();
        assert_eq!(parsed.into_content(), NO_CONTENT);
    }

    #[test]
    fn empty_candidate_array_degrades_to_sentinel() {
        let parsed = RawResponse::parse(Backend::Text, json!([])).unwrap();
        assert_eq!(parsed.into_content(), NO_CONTENT);
    }

    #[test]
    fn non_array_text_payload_is_normalization_failure() {
        let err = RawResponse::parse(Backend::Text, json!({"oops": true})).unwrap_err();
        assert!(matches!(err, TinkerError::Normalization(_)));
    }

    #[test]
    fn transcript_text_is_the_content() {
        let raw = json!({"text": "hello from the recording"});
        let parsed = RawResponse::parse(Backend::Audio, raw).unwrap();
        assert_eq!(parsed.into_content(), "hello from the recording");
    }

    #[test]
    fn audio_without_text_is_normalization_failure() {
        let err = RawResponse::parse(Backend::Audio, json!({"error": "bad file"})).unwrap_err();
        assert!(matches!(err, TinkerError::Normalization(_)));
    }
}

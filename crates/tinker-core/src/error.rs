//! Error taxonomy for the whole workspace.
//!
//! One enum covers the execution pipeline, the stores, and validation so
//! that every failure reaching a caller carries its classification.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TinkerError {
    #[error("unsupported model: {0}")]
    UnsupportedModel(String),

    #[error("unresolved variables: {}", .0.join(", "))]
    UnresolvedVariables(Vec<String>),

    #[error("model still loading after {attempts} attempts")]
    ServiceUnavailable { attempts: u32 },

    #[error("inference request failed ({status}): {message}")]
    InferenceFailed { status: u16, message: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("unrecognized response payload: {0}")]
    Normalization(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("validation: {0}")]
    Validation(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TinkerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unresolved_variables_lists_names() {
        let err = TinkerError::UnresolvedVariables(vec!["topic".into(), "name".into()]);
        assert_eq!(err.to_string(), "unresolved variables: topic, name");
    }

    #[test]
    fn inference_failed_carries_status() {
        let err = TinkerError::InferenceFailed {
            status: 401,
            message: "invalid token".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("401"));
        assert!(msg.contains("invalid token"));
    }
}

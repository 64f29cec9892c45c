//! Hugging Face inference client — the HTTP invoker for both backends.
//!
//! Text models receive JSON `{"inputs": ...}`; the audio model receives
//! the attachment bytes as `application/octet-stream`. Both share one
//! dispatch loop that handles the cold-start retry policy: HTTP 503 means
//! "model is loading", and the wait before the next attempt comes from
//! the service's own `estimated_time` hint when present.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use tracing::{debug, error, warn};

use tinker_core::config::InferenceSettings;
use tinker_core::{Result, TinkerError};

use crate::models::{Backend, ModelSpec};
use crate::response::RawResponse;

// ─────────────────────────────────────────────
// InferenceClient
// ─────────────────────────────────────────────

/// HTTP client for the inference API.
///
/// All connection values (token, base URL, retry knobs) are injected at
/// construction from [`InferenceSettings`].
pub struct InferenceClient {
    /// HTTP client (shared, connection-pooled).
    client: reqwest::Client,
    /// Inference API base URL.
    api_base: String,
    /// API token for Bearer authentication.
    api_token: String,
    /// Total attempts allowed while the model is loading.
    max_attempts: u32,
    /// Wait between attempts when no readiness estimate is given.
    default_wait: Duration,
}

impl std::fmt::Debug for InferenceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceClient")
            .field("api_base", &self.api_base)
            .field("max_attempts", &self.max_attempts)
            .finish()
    }
}

/// Request body for one dispatch.
enum Payload<'a> {
    Json(serde_json::Value),
    Bytes(&'a [u8]),
}

impl InferenceClient {
    /// Create a new client from injected settings.
    pub fn new(settings: &InferenceSettings) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .expect("Failed to build HTTP client");

        InferenceClient {
            client,
            api_base: settings.api_base.clone(),
            api_token: settings.api_token.clone(),
            max_attempts: settings.max_attempts.max(1),
            default_wait: Duration::from_secs(settings.retry_wait_secs),
        }
    }

    /// Run a text completion: POST `{"inputs": resolved_text}`.
    pub async fn generate_text(&self, model: &ModelSpec, inputs: &str) -> Result<RawResponse> {
        debug!(model = model.id, chars = inputs.len(), "dispatching text generation");
        self.dispatch(model, Payload::Json(serde_json::json!({ "inputs": inputs })))
            .await
    }

    /// Run a transcription: POST the file bytes as binary content.
    pub async fn transcribe(&self, model: &ModelSpec, bytes: &[u8]) -> Result<RawResponse> {
        debug!(model = model.id, size = bytes.len(), "dispatching transcription");
        self.dispatch(model, Payload::Bytes(bytes)).await
    }

    /// Shared dispatch loop with the cold-start retry policy.
    ///
    /// - 503 is the transient "model loading" signal: wait for the body's
    ///   `estimated_time` seconds (or the configured default) and retry,
    ///   up to `max_attempts` total attempts.
    /// - Any other non-success status fails immediately without retry.
    /// - A transport error fails immediately; there is no readiness hint
    ///   to wait on.
    async fn dispatch(&self, model: &ModelSpec, payload: Payload<'_>) -> Result<RawResponse> {
        let url = model.endpoint(&self.api_base);
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;

            let request = match &payload {
                Payload::Json(body) => self
                    .client
                    .post(&url)
                    .bearer_auth(&self.api_token)
                    .json(body),
                Payload::Bytes(bytes) => self
                    .client
                    .post(&url)
                    .bearer_auth(&self.api_token)
                    .header(CONTENT_TYPE, "application/octet-stream")
                    .body(bytes.to_vec()),
            };

            let response = match request.send().await {
                Ok(resp) => resp,
                Err(e) => {
                    error!(model = model.id, error = %e, "inference request failed");
                    return Err(TinkerError::Network(e.to_string()));
                }
            };

            let status = response.status();

            if status == StatusCode::SERVICE_UNAVAILABLE {
                let body: serde_json::Value =
                    response.json().await.unwrap_or(serde_json::Value::Null);
                let wait = body
                    .get("estimated_time")
                    .and_then(|v| v.as_f64())
                    .filter(|secs| secs.is_finite() && *secs >= 0.0)
                    .map(Duration::from_secs_f64)
                    .unwrap_or(self.default_wait);

                if attempt >= self.max_attempts {
                    error!(
                        model = model.id,
                        attempts = attempt,
                        "model never became ready, giving up"
                    );
                    return Err(TinkerError::ServiceUnavailable { attempts: attempt });
                }

                warn!(
                    model = model.id,
                    attempt = attempt,
                    wait_secs = wait.as_secs_f64(),
                    "model loading, waiting before retry"
                );
                tokio::time::sleep(wait).await;
                continue;
            }

            if !status.is_success() {
                let message = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Failed to read error body".to_string());
                error!(
                    model = model.id,
                    status = %status,
                    body = %message,
                    "inference API error"
                );
                return Err(TinkerError::InferenceFailed {
                    status: status.as_u16(),
                    message,
                });
            }

            let raw: serde_json::Value = response.json().await.map_err(|e| {
                TinkerError::Normalization(format!("invalid JSON from backend: {e}"))
            })?;

            debug!(model = model.id, attempt = attempt, "inference response received");
            return RawResponse::parse(model.kind, raw);
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::select_model;
    use wiremock::matchers::{body_bytes, body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn make_settings(api_base: &str, retry_wait_secs: u64) -> InferenceSettings {
        InferenceSettings {
            api_token: "hf_test_token".to_string(),
            api_base: api_base.to_string(),
            max_attempts: 5,
            retry_wait_secs,
        }
    }

    #[tokio::test]
    async fn text_generation_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/models/gpt2"))
            .and(header("Authorization", "Bearer hf_test_token"))
            .and(body_partial_json(serde_json::json!({
                "inputs": "Say hello to Ava"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"generated_text": "Hello, Ava!"}
            ])))
            .mount(&mock_server)
            .await;

        let client = InferenceClient::new(&make_settings(&mock_server.uri(), 30));
        let model = select_model("gpt2").unwrap();

        let raw = client.generate_text(model, "Say hello to Ava").await.unwrap();
        assert_eq!(raw.into_content(), "Hello, Ava!");
    }

    #[tokio::test]
    async fn cold_start_retries_then_succeeds() {
        let mock_server = MockServer::start().await;

        // First two attempts: model loading, with a tiny readiness hint.
        Mock::given(method("POST"))
            .and(path("/models/gpt2"))
            .respond_with(ResponseTemplate::new(503).set_body_json(serde_json::json!({
                "error": "Model gpt2 is currently loading",
                "estimated_time": 0.01
            })))
            .up_to_n_times(2)
            .mount(&mock_server)
            .await;

        Mock::given(method("POST"))
            .and(path("/models/gpt2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"generated_text": "warm now"}
            ])))
            .mount(&mock_server)
            .await;

        let client = InferenceClient::new(&make_settings(&mock_server.uri(), 30));
        let model = select_model("gpt2").unwrap();

        let raw = client.generate_text(model, "ping").await.unwrap();
        assert_eq!(raw.into_content(), "warm now");
    }

    #[tokio::test]
    async fn retry_budget_exhaustion_is_service_unavailable() {
        let mock_server = MockServer::start().await;

        // Always loading, no readiness hint — the (zeroed) default wait
        // applies. Exactly max_attempts requests must be made.
        Mock::given(method("POST"))
            .and(path("/models/gpt2"))
            .respond_with(ResponseTemplate::new(503).set_body_json(serde_json::json!({
                "error": "Model gpt2 is currently loading"
            })))
            .expect(5)
            .mount(&mock_server)
            .await;

        let client = InferenceClient::new(&make_settings(&mock_server.uri(), 0));
        let model = select_model("gpt2").unwrap();

        let err = client.generate_text(model, "ping").await.unwrap_err();
        assert!(matches!(
            err,
            TinkerError::ServiceUnavailable { attempts: 5 }
        ));
    }

    #[tokio::test]
    async fn non_transient_error_fails_without_retry() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/models/gpt2"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid token"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = InferenceClient::new(&make_settings(&mock_server.uri(), 0));
        let model = select_model("gpt2").unwrap();

        let err = client.generate_text(model, "ping").await.unwrap_err();
        match err {
            TinkerError::InferenceFailed { status, message } => {
                assert_eq!(status, 401);
                assert!(message.contains("invalid token"));
            }
            other => panic!("expected InferenceFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unreachable_host_is_network_error() {
        // Point to a port that's not listening
        let client = InferenceClient::new(&make_settings("http://127.0.0.1:1", 0));
        let model = select_model("gpt2").unwrap();

        let err = client.generate_text(model, "ping").await.unwrap_err();
        assert!(matches!(err, TinkerError::Network(_)));
    }

    #[tokio::test]
    async fn transcription_posts_raw_bytes() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/models/openai/whisper-large-v3"))
            .and(header("Content-Type", "application/octet-stream"))
            .and(body_bytes(b"fake audio bytes".to_vec()))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "text": "hello from the recording"
            })))
            .mount(&mock_server)
            .await;

        let client = InferenceClient::new(&make_settings(&mock_server.uri(), 30));
        let model = select_model("openai/whisper-large-v3").unwrap();

        let raw = client.transcribe(model, b"fake audio bytes").await.unwrap();
        assert_eq!(raw.into_content(), "hello from the recording");
    }

    #[tokio::test]
    async fn malformed_audio_payload_is_hard_failure() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/models/openai/whisper-large-v3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "error": "unrecognized container"
            })))
            .mount(&mock_server)
            .await;

        let client = InferenceClient::new(&make_settings(&mock_server.uri(), 30));
        let model = select_model("openai/whisper-large-v3").unwrap();

        let err = client.transcribe(model, b"noise").await.unwrap_err();
        assert!(matches!(err, TinkerError::Normalization(_)));
    }

    #[tokio::test]
    async fn non_json_success_body_is_normalization_failure() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/models/gpt2"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
            .mount(&mock_server)
            .await;

        let client = InferenceClient::new(&make_settings(&mock_server.uri(), 30));
        let model = select_model("gpt2").unwrap();

        let err = client.generate_text(model, "ping").await.unwrap_err();
        assert!(matches!(err, TinkerError::Normalization(_)));
    }
}

//! The execution orchestrator — runs one prompt end to end.
//!
//! A run moves through the phases
//! `Idle → VariablesPending → Resolving → Dispatching → Normalizing →
//! Persisted`, failing out of any non-terminal phase with a classified
//! error. [`PendingRun`] is the explicit suspended state between
//! placeholder discovery and value collection: `prepare` produces it,
//! the caller gathers values, `resume` finishes the pipeline. A prompt
//! without placeholders reports `needs_input() == false` and can be
//! resumed immediately with an empty value map.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use tinker_core::types::{OutputRecord, PromptRecord};
use tinker_core::{Result, TinkerError};
use tinker_inference::models::{select_model, Backend, ModelSpec};
use tinker_inference::InferenceClient;
use tinker_store::{BlobStore, PromptStore};

use crate::template::resolve_template;
use crate::variables::extract_variables;

// ─────────────────────────────────────────────
// PendingRun — the suspension point
// ─────────────────────────────────────────────

/// A prepared run, suspended until placeholder values are supplied.
#[derive(Clone, Debug)]
pub struct PendingRun {
    prompt: PromptRecord,
    model: &'static ModelSpec,
    variables: Vec<String>,
}

impl PendingRun {
    /// The variable names that must be supplied before resuming, in
    /// first-occurrence order.
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// Whether the caller has to collect any input at all.
    pub fn needs_input(&self) -> bool {
        !self.variables.is_empty()
    }

    pub fn prompt(&self) -> &PromptRecord {
        &self.prompt
    }

    pub fn model(&self) -> &ModelSpec {
        self.model
    }

    /// Names from `variables()` that the given map does not cover.
    pub fn missing_values(&self, values: &HashMap<String, String>) -> Vec<String> {
        self.variables
            .iter()
            .filter(|name| !values.contains_key(*name))
            .cloned()
            .collect()
    }
}

// ─────────────────────────────────────────────
// Engine
// ─────────────────────────────────────────────

/// Orchestrates store, blob store, and inference client into the
/// end-to-end prompt execution operation.
pub struct Engine {
    store: Arc<dyn PromptStore>,
    blobs: Arc<dyn BlobStore>,
    inference: InferenceClient,
}

impl Engine {
    pub fn new(
        store: Arc<dyn PromptStore>,
        blobs: Arc<dyn BlobStore>,
        inference: InferenceClient,
    ) -> Self {
        Engine {
            store,
            blobs,
            inference,
        }
    }

    pub fn store(&self) -> &Arc<dyn PromptStore> {
        &self.store
    }

    pub fn blobs(&self) -> &Arc<dyn BlobStore> {
        &self.blobs
    }

    /// Load a prompt, select the model, and discover its variables.
    ///
    /// The returned [`PendingRun`] is the suspension point: when
    /// `needs_input()` is false the caller skips collection entirely and
    /// resumes with an empty map.
    pub async fn prepare(
        &self,
        owner: &str,
        prompt_id: &str,
        model_id: &str,
    ) -> Result<PendingRun> {
        let model = select_model(model_id)?;
        let prompt = self.store.get_prompt(owner, prompt_id).await?;
        let variables = extract_variables(&prompt.content);

        debug!(
            prompt_id = prompt_id,
            model = model.id,
            backend = model.kind.label(),
            variables = variables.len(),
            "prepared run"
        );

        Ok(PendingRun {
            prompt,
            model,
            variables,
        })
    }

    /// Resume a suspended run with the collected values and drive it to a
    /// persisted output.
    pub async fn resume(
        &self,
        run: PendingRun,
        values: &HashMap<String, String>,
    ) -> Result<OutputRecord> {
        let PendingRun { prompt, model, .. } = run;

        // Resolving
        let resolved = resolve_template(&prompt.content, values);
        if model.kind == Backend::Text {
            let remaining = extract_variables(&resolved);
            if !remaining.is_empty() {
                return Err(TinkerError::UnresolvedVariables(remaining));
            }
        }
        debug!(prompt_id = %prompt.prompt_id, phase = "resolving", "template resolved");

        // Dispatching
        let raw = match model.kind {
            Backend::Text => self.inference.generate_text(model, &resolved).await?,
            Backend::Audio => {
                let key = prompt.attachment.as_deref().ok_or_else(|| {
                    TinkerError::Validation(
                        "audio model requires an attachment on the prompt".to_string(),
                    )
                })?;
                let bytes = self.blobs.fetch(key).await?;
                self.inference.transcribe(model, &bytes).await?
            }
        };
        debug!(prompt_id = %prompt.prompt_id, phase = "dispatching", "backend responded");

        // Normalizing
        let content = raw.into_content();

        // Persisted
        let output = OutputRecord::new(&prompt, content);
        self.store.put_output(output.clone()).await?;
        info!(
            prompt_id = %prompt.prompt_id,
            output_id = %output.output_id,
            model = model.id,
            "output persisted"
        );
        Ok(output)
    }

    /// The single composed operation exposed to callers: prepare, check
    /// that every discovered variable has a value, resume.
    pub async fn run_prompt(
        &self,
        owner: &str,
        prompt_id: &str,
        model_id: &str,
        values: Option<&HashMap<String, String>>,
    ) -> Result<OutputRecord> {
        let run = self.prepare(owner, prompt_id, model_id).await?;

        let empty = HashMap::new();
        let values = values.unwrap_or(&empty);

        let missing = run.missing_values(values);
        if !missing.is_empty() {
            return Err(TinkerError::UnresolvedVariables(missing));
        }

        self.resume(run, values).await
    }

    /// Delete a prompt and cascade to its outputs.
    ///
    /// The prompt record goes first, then each known output best-effort;
    /// an output created concurrently with the delete may survive (an
    /// accepted race). Returns the number of outputs removed.
    pub async fn delete_prompt(&self, owner: &str, prompt_id: &str) -> Result<usize> {
        let outputs = self.store.outputs_for_prompt(owner, prompt_id).await?;
        self.store.delete_prompt(owner, prompt_id).await?;

        let mut removed = 0;
        for output in &outputs {
            match self.store.delete_output(owner, &output.output_id).await {
                Ok(()) => removed += 1,
                Err(e) => {
                    warn!(
                        output_id = %output.output_id,
                        error = %e,
                        "failed to cascade-delete output"
                    );
                }
            }
        }

        info!(prompt_id = prompt_id, outputs = removed, "prompt deleted");
        Ok(removed)
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

//! Store contracts — the seams between the engine and its persistence
//! collaborators.

use async_trait::async_trait;

use tinker_core::types::{OutputRecord, PromptRecord, PromptUpdate};
use tinker_core::Result;

/// Record store for prompts and their outputs.
///
/// Every operation is scoped to an owner id. Missing records surface as
/// `TinkerError::NotFound`.
#[async_trait]
pub trait PromptStore: Send + Sync {
    /// Persist a new prompt.
    async fn put_prompt(&self, prompt: PromptRecord) -> Result<()>;

    /// Fetch a prompt by id.
    async fn get_prompt(&self, owner: &str, prompt_id: &str) -> Result<PromptRecord>;

    /// Apply a partial update to an existing prompt.
    async fn update_prompt(
        &self,
        owner: &str,
        prompt_id: &str,
        update: PromptUpdate,
    ) -> Result<PromptRecord>;

    /// Delete a prompt record. Does NOT cascade — the engine owns cascade
    /// ordering.
    async fn delete_prompt(&self, owner: &str, prompt_id: &str) -> Result<()>;

    /// All prompts for an owner, newest first.
    async fn list_prompts(&self, owner: &str) -> Result<Vec<PromptRecord>>;

    /// Persist an output.
    async fn put_output(&self, output: OutputRecord) -> Result<()>;

    /// Fetch an output by id.
    async fn get_output(&self, owner: &str, output_id: &str) -> Result<OutputRecord>;

    /// Delete an output by id.
    async fn delete_output(&self, owner: &str, output_id: &str) -> Result<()>;

    /// All outputs belonging to one prompt, newest first.
    async fn outputs_for_prompt(&self, owner: &str, prompt_id: &str)
        -> Result<Vec<OutputRecord>>;
}

/// Attachment store.
///
/// `upload` returns an opaque key; `fetch` loads the bytes back for
/// dispatch to an audio backend.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store a file, returning its key.
    async fn upload(&self, name: &str, content_type: &str, bytes: &[u8]) -> Result<String>;

    /// Load a stored file's bytes.
    async fn fetch(&self, key: &str) -> Result<Vec<u8>>;
}

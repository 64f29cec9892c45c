//! In-memory record store — used by tests and ephemeral runs.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use tinker_core::types::{OutputRecord, PromptRecord, PromptUpdate};
use tinker_core::{Result, TinkerError};

use crate::traits::PromptStore;

/// Records held for one owner.
#[derive(Debug, Default, Clone)]
struct OwnerRecords {
    prompts: Vec<PromptRecord>,
    outputs: Vec<OutputRecord>,
}

/// A `PromptStore` backed by a `RwLock<HashMap>` — multiple readers,
/// exclusive writer.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<String, OwnerRecords>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PromptStore for MemoryStore {
    async fn put_prompt(&self, prompt: PromptRecord) -> Result<()> {
        let mut records = self.records.write().unwrap();
        records
            .entry(prompt.owner_id.clone())
            .or_default()
            .prompts
            .push(prompt);
        Ok(())
    }

    async fn get_prompt(&self, owner: &str, prompt_id: &str) -> Result<PromptRecord> {
        let records = self.records.read().unwrap();
        records
            .get(owner)
            .and_then(|r| r.prompts.iter().find(|p| p.prompt_id == prompt_id))
            .cloned()
            .ok_or_else(|| TinkerError::NotFound(format!("prompt {prompt_id}")))
    }

    async fn update_prompt(
        &self,
        owner: &str,
        prompt_id: &str,
        update: PromptUpdate,
    ) -> Result<PromptRecord> {
        let mut records = self.records.write().unwrap();
        let prompt = records
            .get_mut(owner)
            .and_then(|r| r.prompts.iter_mut().find(|p| p.prompt_id == prompt_id))
            .ok_or_else(|| TinkerError::NotFound(format!("prompt {prompt_id}")))?;
        prompt.apply(update)?;
        Ok(prompt.clone())
    }

    async fn delete_prompt(&self, owner: &str, prompt_id: &str) -> Result<()> {
        let mut records = self.records.write().unwrap();
        let owned = records
            .get_mut(owner)
            .ok_or_else(|| TinkerError::NotFound(format!("prompt {prompt_id}")))?;
        let before = owned.prompts.len();
        owned.prompts.retain(|p| p.prompt_id != prompt_id);
        if owned.prompts.len() == before {
            return Err(TinkerError::NotFound(format!("prompt {prompt_id}")));
        }
        Ok(())
    }

    async fn list_prompts(&self, owner: &str) -> Result<Vec<PromptRecord>> {
        let records = self.records.read().unwrap();
        let mut prompts = records
            .get(owner)
            .map(|r| r.prompts.clone())
            .unwrap_or_default();
        prompts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(prompts)
    }

    async fn put_output(&self, output: OutputRecord) -> Result<()> {
        let mut records = self.records.write().unwrap();
        records
            .entry(output.owner_id.clone())
            .or_default()
            .outputs
            .push(output);
        Ok(())
    }

    async fn get_output(&self, owner: &str, output_id: &str) -> Result<OutputRecord> {
        let records = self.records.read().unwrap();
        records
            .get(owner)
            .and_then(|r| r.outputs.iter().find(|o| o.output_id == output_id))
            .cloned()
            .ok_or_else(|| TinkerError::NotFound(format!("output {output_id}")))
    }

    async fn delete_output(&self, owner: &str, output_id: &str) -> Result<()> {
        let mut records = self.records.write().unwrap();
        let owned = records
            .get_mut(owner)
            .ok_or_else(|| TinkerError::NotFound(format!("output {output_id}")))?;
        let before = owned.outputs.len();
        owned.outputs.retain(|o| o.output_id != output_id);
        if owned.outputs.len() == before {
            return Err(TinkerError::NotFound(format!("output {output_id}")));
        }
        Ok(())
    }

    async fn outputs_for_prompt(
        &self,
        owner: &str,
        prompt_id: &str,
    ) -> Result<Vec<OutputRecord>> {
        let records = self.records.read().unwrap();
        let mut outputs: Vec<OutputRecord> = records
            .get(owner)
            .map(|r| {
                r.outputs
                    .iter()
                    .filter(|o| o.prompt_id == prompt_id)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        outputs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(outputs)
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

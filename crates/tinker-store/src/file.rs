//! File-backed record store.
//!
//! File format: JSONL in `{store_dir}/{safe_owner}.jsonl`, one record per
//! line, each tagged with a `type` field:
//! - `{"type":"prompt","ownerId":"...","promptId":"...",...}`
//! - `{"type":"output","ownerId":"...","outputId":"...",...}`
//!
//! Thread-safe via `RwLock` — multiple readers, exclusive writer. Owners
//! are loaded from disk on first access and rewritten on every change.

use std::collections::HashMap;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::RwLock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use tinker_core::types::{OutputRecord, PromptRecord, PromptUpdate};
use tinker_core::utils::safe_filename;
use tinker_core::{Result, TinkerError};

use crate::traits::PromptStore;

// ─────────────────────────────────────────────
// Stored record (one JSONL line)
// ─────────────────────────────────────────────

/// A single line of an owner's record file, discriminated by `type`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
enum StoredRecord {
    #[serde(rename = "prompt")]
    Prompt(PromptRecord),
    #[serde(rename = "output")]
    Output(OutputRecord),
}

#[derive(Debug, Default, Clone)]
struct OwnerRecords {
    prompts: Vec<PromptRecord>,
    outputs: Vec<OutputRecord>,
}

impl OwnerRecords {
    fn to_lines(&self) -> Vec<StoredRecord> {
        let mut lines: Vec<StoredRecord> = Vec::with_capacity(self.prompts.len() + self.outputs.len());
        lines.extend(self.prompts.iter().cloned().map(StoredRecord::Prompt));
        lines.extend(self.outputs.iter().cloned().map(StoredRecord::Output));
        lines
    }
}

// ─────────────────────────────────────────────
// FileStore
// ─────────────────────────────────────────────

/// A `PromptStore` persisting one JSONL file per owner with an in-memory
/// cache.
pub struct FileStore {
    /// Directory where `.jsonl` record files are stored.
    store_dir: PathBuf,
    /// In-memory cache of loaded owners.
    cache: RwLock<HashMap<String, OwnerRecords>>,
}

impl FileStore {
    /// Create a new file store rooted at `store_dir`.
    ///
    /// The directory is created if it doesn't exist.
    pub fn new(store_dir: PathBuf) -> std::io::Result<Self> {
        std::fs::create_dir_all(&store_dir)?;
        Ok(FileStore {
            store_dir,
            cache: RwLock::new(HashMap::new()),
        })
    }

    fn owner_path(&self, owner: &str) -> PathBuf {
        self.store_dir.join(format!("{}.jsonl", safe_filename(owner)))
    }

    /// Load an owner's records from disk. Unparseable lines are skipped
    /// with a warning so one corrupt record cannot take the file down.
    fn load_from_disk(&self, owner: &str) -> OwnerRecords {
        let path = self.owner_path(owner);
        let mut records = OwnerRecords::default();

        let file = match std::fs::File::open(&path) {
            Ok(f) => f,
            Err(_) => return records,
        };

        for (idx, line) in std::io::BufReader::new(file).lines().enumerate() {
            let line = match line {
                Ok(l) => l,
                Err(e) => {
                    warn!(path = %path.display(), line = idx + 1, error = %e, "failed to read record line");
                    continue;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<StoredRecord>(&line) {
                Ok(StoredRecord::Prompt(p)) => records.prompts.push(p),
                Ok(StoredRecord::Output(o)) => records.outputs.push(o),
                Err(e) => {
                    warn!(path = %path.display(), line = idx + 1, error = %e, "skipping unparseable record");
                }
            }
        }

        debug!(
            owner = owner,
            prompts = records.prompts.len(),
            outputs = records.outputs.len(),
            "loaded owner records from disk"
        );
        records
    }

    fn save_to_disk(&self, owner: &str, records: &OwnerRecords) -> std::io::Result<()> {
        let path = self.owner_path(owner);
        let mut file = std::fs::File::create(&path)?;
        for record in records.to_lines() {
            let line = serde_json::to_string(&record)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
            writeln!(file, "{line}")?;
        }
        Ok(())
    }

    /// Run `f` against an owner's records under the write lock, then
    /// persist the result.
    fn mutate<T>(
        &self,
        owner: &str,
        f: impl FnOnce(&mut OwnerRecords) -> Result<T>,
    ) -> Result<T> {
        let snapshot;
        let result;
        {
            let mut cache = self.cache.write().unwrap();
            let records = cache
                .entry(owner.to_string())
                .or_insert_with(|| self.load_from_disk(owner));
            result = f(records)?;
            snapshot = records.clone();
        }
        self.save_to_disk(owner, &snapshot)
            .map_err(|e| TinkerError::Storage(format!("failed to persist records: {e}")))?;
        Ok(result)
    }

    /// Run `f` against an owner's records without writing back.
    fn read<T>(&self, owner: &str, f: impl FnOnce(&OwnerRecords) -> T) -> T {
        {
            let cache = self.cache.read().unwrap();
            if let Some(records) = cache.get(owner) {
                return f(records);
            }
        }
        let loaded = self.load_from_disk(owner);
        let mut cache = self.cache.write().unwrap();
        let records = cache.entry(owner.to_string()).or_insert(loaded);
        f(records)
    }
}

#[async_trait]
impl PromptStore for FileStore {
    async fn put_prompt(&self, prompt: PromptRecord) -> Result<()> {
        let owner = prompt.owner_id.clone();
        self.mutate(&owner, |records| {
            records.prompts.push(prompt);
            Ok(())
        })
    }

    async fn get_prompt(&self, owner: &str, prompt_id: &str) -> Result<PromptRecord> {
        self.read(owner, |records| {
            records
                .prompts
                .iter()
                .find(|p| p.prompt_id == prompt_id)
                .cloned()
        })
        .ok_or_else(|| TinkerError::NotFound(format!("prompt {prompt_id}")))
    }

    async fn update_prompt(
        &self,
        owner: &str,
        prompt_id: &str,
        update: PromptUpdate,
    ) -> Result<PromptRecord> {
        self.mutate(owner, |records| {
            let prompt = records
                .prompts
                .iter_mut()
                .find(|p| p.prompt_id == prompt_id)
                .ok_or_else(|| TinkerError::NotFound(format!("prompt {prompt_id}")))?;
            prompt.apply(update)?;
            Ok(prompt.clone())
        })
    }

    async fn delete_prompt(&self, owner: &str, prompt_id: &str) -> Result<()> {
        self.mutate(owner, |records| {
            let before = records.prompts.len();
            records.prompts.retain(|p| p.prompt_id != prompt_id);
            if records.prompts.len() == before {
                return Err(TinkerError::NotFound(format!("prompt {prompt_id}")));
            }
            Ok(())
        })
    }

    async fn list_prompts(&self, owner: &str) -> Result<Vec<PromptRecord>> {
        let mut prompts = self.read(owner, |records| records.prompts.clone());
        prompts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(prompts)
    }

    async fn put_output(&self, output: OutputRecord) -> Result<()> {
        let owner = output.owner_id.clone();
        self.mutate(&owner, |records| {
            records.outputs.push(output);
            Ok(())
        })
    }

    async fn get_output(&self, owner: &str, output_id: &str) -> Result<OutputRecord> {
        self.read(owner, |records| {
            records
                .outputs
                .iter()
                .find(|o| o.output_id == output_id)
                .cloned()
        })
        .ok_or_else(|| TinkerError::NotFound(format!("output {output_id}")))
    }

    async fn delete_output(&self, owner: &str, output_id: &str) -> Result<()> {
        self.mutate(owner, |records| {
            let before = records.outputs.len();
            records.outputs.retain(|o| o.output_id != output_id);
            if records.outputs.len() == before {
                return Err(TinkerError::NotFound(format!("output {output_id}")));
            }
            Ok(())
        })
    }

    async fn outputs_for_prompt(
        &self,
        owner: &str,
        prompt_id: &str,
    ) -> Result<Vec<OutputRecord>> {
        let mut outputs = self.read(owner, |records| {
            records
                .outputs
                .iter()
                .filter(|o| o.prompt_id == prompt_id)
                .cloned()
                .collect::<Vec<_>>()
        });
        outputs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(outputs)
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn prompt(owner: &str, content: &str) -> PromptRecord {
        PromptRecord::new(owner, content, "a test prompt", None).unwrap()
    }

    #[tokio::test]
    async fn roundtrip_through_fresh_store() {
        let dir = tempfile::tempdir().unwrap();
        let p = prompt("local", "Say hi to @name");

        {
            let store = FileStore::new(dir.path().to_path_buf()).unwrap();
            store.put_prompt(p.clone()).await.unwrap();
            store
                .put_output(OutputRecord::new(&p, "Hello Ava"))
                .await
                .unwrap();
        }

        // New store instance, cold cache — must reload from disk.
        let store = FileStore::new(dir.path().to_path_buf()).unwrap();
        let loaded = store.get_prompt("local", &p.prompt_id).await.unwrap();
        assert_eq!(loaded, p);

        let outputs = store
            .outputs_for_prompt("local", &p.prompt_id)
            .await
            .unwrap();
        assert_eq!(outputs.len(), 1);
        assert_eq!(outputs[0].content, "Hello Ava");
    }

    #[tokio::test]
    async fn records_are_tagged_by_type() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().to_path_buf()).unwrap();
        let p = prompt("local", "text");
        store.put_prompt(p.clone()).await.unwrap();
        store.put_output(OutputRecord::new(&p, "out")).await.unwrap();

        let content = std::fs::read_to_string(dir.path().join("local.jsonl")).unwrap();
        let lines: Vec<serde_json::Value> = content
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["type"], "prompt");
        assert_eq!(lines[1]["type"], "output");
        assert_eq!(lines[1]["title"], "a test prompt");
    }

    #[tokio::test]
    async fn delete_persists_across_reload() {
        let dir = tempfile::tempdir().unwrap();
        let p = prompt("local", "text");

        {
            let store = FileStore::new(dir.path().to_path_buf()).unwrap();
            store.put_prompt(p.clone()).await.unwrap();
            store.delete_prompt("local", &p.prompt_id).await.unwrap();
        }

        let store = FileStore::new(dir.path().to_path_buf()).unwrap();
        let err = store.get_prompt("local", &p.prompt_id).await.unwrap_err();
        assert!(matches!(err, TinkerError::NotFound(_)));
    }

    #[tokio::test]
    async fn corrupt_lines_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let p = prompt("local", "text");

        {
            let store = FileStore::new(dir.path().to_path_buf()).unwrap();
            store.put_prompt(p.clone()).await.unwrap();
        }

        // Append garbage to the owner file
        let path = dir.path().join("local.jsonl");
        let mut content = std::fs::read_to_string(&path).unwrap();
        content.push_str("this is not json\n");
        std::fs::write(&path, content).unwrap();

        let store = FileStore::new(dir.path().to_path_buf()).unwrap();
        let prompts = store.list_prompts("local").await.unwrap();
        assert_eq!(prompts.len(), 1);
    }

    #[tokio::test]
    async fn owners_use_separate_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().to_path_buf()).unwrap();
        store.put_prompt(prompt("alice", "a")).await.unwrap();
        store.put_prompt(prompt("bob", "b")).await.unwrap();

        assert!(dir.path().join("alice.jsonl").exists());
        assert!(dir.path().join("bob.jsonl").exists());
        assert_eq!(store.list_prompts("alice").await.unwrap().len(), 1);
    }
}

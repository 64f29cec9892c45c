//! Domain records for Tinker — typed prompts and outputs.
//!
//! Both records serialize with **camelCase** keys, matching the on-disk
//! store format. Every record is scoped to an `owner_id`; ids are uuid v4
//! and immutable once created.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TinkerError};

// ─────────────────────────────────────────────
// PromptRecord
// ─────────────────────────────────────────────

/// A stored prompt template.
///
/// `content` may contain `@name` placeholders that are filled in at
/// execution time. `description` doubles as the title of any output the
/// prompt produces.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PromptRecord {
    /// Identity of the creator; all store operations are scoped to it.
    pub owner_id: String,
    /// Unique id, immutable once created.
    pub prompt_id: String,
    /// Template text with zero or more `@name` placeholders.
    pub content: String,
    /// Required free-text description; copied into outputs as their title.
    pub description: String,
    /// Blob-store key of an uploaded file (e.g. audio for transcription).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl PromptRecord {
    /// Create a new prompt, validating that content and description are
    /// non-empty.
    pub fn new(
        owner_id: impl Into<String>,
        content: impl Into<String>,
        description: impl Into<String>,
        attachment: Option<String>,
    ) -> Result<Self> {
        let content = content.into();
        let description = description.into();
        validate_text("content", &content)?;
        validate_text("description", &description)?;

        Ok(PromptRecord {
            owner_id: owner_id.into(),
            prompt_id: uuid::Uuid::new_v4().to_string(),
            content,
            description,
            attachment,
            created_at: Utc::now(),
        })
    }

    /// Apply an update in place, re-validating changed fields.
    ///
    /// All-or-nothing: validation runs before any field is assigned, so a
    /// rejected update leaves the record untouched.
    pub fn apply(&mut self, update: PromptUpdate) -> Result<()> {
        if let Some(ref content) = update.content {
            validate_text("content", content)?;
        }
        if let Some(ref description) = update.description {
            validate_text("description", description)?;
        }

        if let Some(content) = update.content {
            self.content = content;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(attachment) = update.attachment {
            self.attachment = Some(attachment);
        }
        Ok(())
    }
}

/// Partial update for a prompt; `None` fields are left untouched.
#[derive(Clone, Debug, Default)]
pub struct PromptUpdate {
    pub content: Option<String>,
    pub description: Option<String>,
    pub attachment: Option<String>,
}

// ─────────────────────────────────────────────
// OutputRecord
// ─────────────────────────────────────────────

/// The persisted result of one successful prompt execution.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OutputRecord {
    pub owner_id: String,
    pub output_id: String,
    /// The prompt this output belongs to; deleting the prompt cascades.
    pub prompt_id: String,
    /// Copied from the prompt's description at execution time.
    pub title: String,
    /// Generated text or transcript.
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl OutputRecord {
    /// Create an output for a prompt.
    pub fn new(prompt: &PromptRecord, content: impl Into<String>) -> Self {
        OutputRecord {
            owner_id: prompt.owner_id.clone(),
            output_id: uuid::Uuid::new_v4().to_string(),
            prompt_id: prompt.prompt_id.clone(),
            title: prompt.description.clone(),
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}

fn validate_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(TinkerError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

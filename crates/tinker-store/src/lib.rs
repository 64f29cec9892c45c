//! Persistence layer for Tinker.
//!
//! # Architecture
//!
//! - [`traits::PromptStore`] — record store contract (prompts + outputs)
//! - [`traits::BlobStore`] — attachment store contract
//! - [`memory::MemoryStore`] — in-memory store for tests and ephemeral use
//! - [`file::FileStore`] — JSONL-per-owner store with an in-memory cache
//! - [`blobs::LocalBlobStore`] — attachments on the local filesystem

pub mod blobs;
pub mod file;
pub mod memory;
pub mod traits;

pub use blobs::LocalBlobStore;
pub use file::FileStore;
pub use memory::MemoryStore;
pub use traits::{BlobStore, PromptStore};

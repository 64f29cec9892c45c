//! Inference layer for Tinker — the Hugging Face HTTP client and the
//! response shapes around it.
//!
//! # Architecture
//!
//! - [`models`] — static registry of accepted model ids + backend kinds
//! - [`client::InferenceClient`] — HTTP invoker with cold-start retry
//! - [`response::RawResponse`] — tagged union of backend payloads and
//!   their normalization into plain output content

pub mod client;
pub mod models;
pub mod response;

pub use client::InferenceClient;
pub use models::{select_model, Backend, ModelSpec, MODELS};
pub use response::RawResponse;

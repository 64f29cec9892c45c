//! Core crate for Tinker — domain types, error taxonomy, configuration,
//! and small utilities shared by every other crate in the workspace.

pub mod config;
pub mod error;
pub mod types;
pub mod utils;

pub use error::{Result, TinkerError};
pub use types::{OutputRecord, PromptRecord, PromptUpdate};

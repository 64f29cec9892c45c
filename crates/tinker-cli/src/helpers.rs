//! Shared CLI helpers — path expansion, argument parsing, record printing.

use std::path::PathBuf;

use colored::Colorize;

use tinker_core::types::{OutputRecord, PromptRecord};
use tinker_core::utils::truncate_string;

/// Expand `~` at the start of a path to the user's home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(rest);
        }
    }
    if path == "~" {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home);
        }
    }
    PathBuf::from(path)
}

/// Parse a `name=value` pair from `--var`.
pub fn parse_var(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(format!("expected name=value, got '{s}'")),
    }
}

/// Guess a content type from a file extension.
///
/// Covers the audio containers the transcription backend accepts; anything
/// else is sent as opaque bytes.
pub fn content_type_for(path: &std::path::Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .as_deref()
    {
        Some("ogg") | Some("oga") | Some("opus") => "audio/ogg",
        Some("mp3") => "audio/mpeg",
        Some("m4a") => "audio/mp4",
        Some("wav") => "audio/wav",
        Some("flac") => "audio/flac",
        Some("webm") => "audio/webm",
        _ => "application/octet-stream",
    }
}

/// Print a one-line prompt summary for `tinker list`.
pub fn print_prompt_row(prompt: &PromptRecord) {
    println!(
        "  {}  {}  {}",
        prompt.prompt_id.dimmed(),
        prompt.description.bold(),
        truncate_string(&prompt.content.replace('\n', " "), 48).dimmed()
    );
}

/// Print a full prompt for `tinker show`.
pub fn print_prompt(prompt: &PromptRecord) {
    println!();
    println!("{}", prompt.description.bold());
    println!("{}  {}", "id:".dimmed(), prompt.prompt_id);
    println!(
        "{}  {}",
        "created:".dimmed(),
        prompt.created_at.format("%Y-%m-%d %H:%M")
    );
    if let Some(attachment) = &prompt.attachment {
        println!("{}  {}", "attachment:".dimmed(), attachment);
    }
    println!();
    println!("{}", prompt.content);
    println!();
}

/// Print a persisted output.
pub fn print_output(output: &OutputRecord) {
    println!();
    println!("{}", output.title.cyan().bold());
    println!(
        "{}  {}  {}",
        output.output_id.dimmed(),
        "·".dimmed(),
        output.created_at.format("%Y-%m-%d %H:%M").to_string().dimmed()
    );
    println!();
    println!("{}", output.content);
    println!();
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

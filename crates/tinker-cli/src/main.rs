//! Tinker CLI — entry point.
//!
//! # Commands
//!
//! - `tinker new --content C --description D [--attach FILE]`
//! - `tinker list` / `tinker show <id>` / `tinker edit <id> …` / `tinker delete <id>`
//! - `tinker run <id> --model MODEL [--var name=value …]`
//! - `tinker outputs <id>` / `tinker delete-output <output-id>`
//! - `tinker models` / `tinker status`

mod helpers;
mod input;
mod status;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use tinker_core::config::{load_config, Config};
use tinker_core::types::{PromptRecord, PromptUpdate};
use tinker_core::utils::get_data_path;
use tinker_engine::Engine;
use tinker_inference::models::MODELS;
use tinker_inference::InferenceClient;
use tinker_store::{BlobStore, FileStore, LocalBlobStore, PromptStore};

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// Tinker — a prompt workbench for Hugging Face models
#[derive(Parser)]
#[command(name = "tinker", version, about, long_about = None)]
struct Cli {
    /// Owner id scoping all records
    #[arg(long, global = true, default_value = "local")]
    owner: String,

    /// Enable debug logging
    #[arg(long, global = true, default_value_t = false)]
    logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a prompt
    New {
        /// Template text, may contain @name placeholders
        #[arg(long)]
        content: String,

        /// Short description; becomes the title of generated outputs
        #[arg(long)]
        description: String,

        /// File to upload as the prompt's attachment (e.g. audio)
        #[arg(long)]
        attach: Option<PathBuf>,
    },

    /// List all prompts
    List,

    /// Show one prompt in full
    Show { id: String },

    /// Update a prompt's content, description, or attachment
    Edit {
        id: String,

        #[arg(long)]
        content: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        attach: Option<PathBuf>,
    },

    /// Delete a prompt and all its outputs
    Delete { id: String },

    /// Run a prompt against a model and persist the output
    Run {
        id: String,

        /// Model id (see `tinker models`)
        #[arg(short, long)]
        model: String,

        /// Placeholder value as name=value; repeatable
        #[arg(long = "var", value_parser = helpers::parse_var)]
        vars: Vec<(String, String)>,
    },

    /// List the outputs of a prompt
    Outputs { id: String },

    /// Delete a single output
    DeleteOutput { output_id: String },

    /// List the accepted model ids
    Models,

    /// Show configuration and backend readiness
    Status,
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.logs);

    let config = load_config(None);
    let data_dir = resolve_data_dir(&config);
    let owner = cli.owner.clone();

    match cli.command {
        Commands::New {
            content,
            description,
            attach,
        } => {
            let engine = build_engine(&config, &data_dir)?;
            let attachment = match attach {
                Some(path) => Some(upload_attachment(&engine, &path).await?),
                None => None,
            };
            let prompt = PromptRecord::new(&owner, content, description, attachment)?;
            engine.store().put_prompt(prompt.clone()).await?;
            info!(prompt_id = %prompt.prompt_id, "prompt created");
            helpers::print_prompt(&prompt);
            Ok(())
        }

        Commands::List => {
            let engine = build_engine(&config, &data_dir)?;
            let prompts = engine.store().list_prompts(&owner).await?;
            if prompts.is_empty() {
                println!("{}", "No prompts yet. Create one with `tinker new`.".dimmed());
                return Ok(());
            }
            for prompt in &prompts {
                helpers::print_prompt_row(prompt);
            }
            Ok(())
        }

        Commands::Show { id } => {
            let engine = build_engine(&config, &data_dir)?;
            let prompt = engine.store().get_prompt(&owner, &id).await?;
            helpers::print_prompt(&prompt);
            Ok(())
        }

        Commands::Edit {
            id,
            content,
            description,
            attach,
        } => {
            let engine = build_engine(&config, &data_dir)?;
            let attachment = match attach {
                Some(path) => Some(upload_attachment(&engine, &path).await?),
                None => None,
            };
            let updated = engine
                .store()
                .update_prompt(
                    &owner,
                    &id,
                    PromptUpdate {
                        content,
                        description,
                        attachment,
                    },
                )
                .await?;
            helpers::print_prompt(&updated);
            Ok(())
        }

        Commands::Delete { id } => {
            let engine = build_engine(&config, &data_dir)?;
            let removed = engine.delete_prompt(&owner, &id).await?;
            println!(
                "Deleted prompt {} and {} output(s).",
                id.bold(),
                removed.to_string().bold()
            );
            Ok(())
        }

        Commands::Run { id, model, vars } => {
            let engine = build_engine(&config, &data_dir)?;
            let run = engine.prepare(&owner, &id, &model).await?;

            let mut values: HashMap<String, String> = vars.into_iter().collect();
            let missing = run.missing_values(&values);
            input::collect_variables(&missing, &mut values)?;

            println!("{}", format!("Running {}…", run.model().id).dimmed());
            let output = engine.resume(run, &values).await?;
            helpers::print_output(&output);
            Ok(())
        }

        Commands::Outputs { id } => {
            let engine = build_engine(&config, &data_dir)?;
            let outputs = engine.store().outputs_for_prompt(&owner, &id).await?;
            if outputs.is_empty() {
                println!("{}", "No outputs yet. Run the prompt first.".dimmed());
                return Ok(());
            }
            for output in &outputs {
                helpers::print_output(output);
            }
            Ok(())
        }

        Commands::DeleteOutput { output_id } => {
            let engine = build_engine(&config, &data_dir)?;
            engine.store().delete_output(&owner, &output_id).await?;
            println!("Deleted output {}.", output_id.bold());
            Ok(())
        }

        Commands::Models => {
            for spec in MODELS {
                println!(
                    "  {:<28} {:<6} {}",
                    spec.id.bold(),
                    spec.kind.label().dimmed(),
                    spec.display_name.dimmed()
                );
            }
            Ok(())
        }

        Commands::Status => status::run(&config, &data_dir),
    }
}

// ─────────────────────────────────────────────
// Wiring
// ─────────────────────────────────────────────

/// Resolve the data directory from config (expanding `~`) or the default.
fn resolve_data_dir(config: &Config) -> PathBuf {
    config
        .storage
        .data_dir
        .as_deref()
        .map(helpers::expand_tilde)
        .unwrap_or_else(get_data_path)
}

/// Build the execution engine over the file-backed stores.
fn build_engine(config: &Config, data_dir: &std::path::Path) -> Result<Engine> {
    let store = FileStore::new(data_dir.join("store"))
        .with_context(|| format!("failed to open record store under {}", data_dir.display()))?;
    let blobs = LocalBlobStore::new(data_dir.join("attachments"))
        .with_context(|| format!("failed to open attachment store under {}", data_dir.display()))?;
    let inference = InferenceClient::new(&config.inference);

    Ok(Engine::new(Arc::new(store), Arc::new(blobs), inference))
}

/// Read a local file and store it as an attachment.
async fn upload_attachment(engine: &Engine, path: &std::path::Path) -> Result<String> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("failed to read attachment {}", path.display()))?;
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("attachment");
    let content_type = helpers::content_type_for(path);

    let key = engine.blobs().upload(name, content_type, &bytes).await?;
    info!(key = %key, size = bytes.len(), "attachment uploaded");
    Ok(key)
}

/// Initialize tracing/logging.
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("tinker=debug,info")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

//! `tinker status` — show configuration and backend readiness.

use anyhow::Result;
use colored::Colorize;

use tinker_core::config::{get_config_path, Config};
use tinker_inference::models::MODELS;

/// Run the status command.
pub fn run(config: &Config, data_dir: &std::path::Path) -> Result<()> {
    let config_path = get_config_path();

    println!();
    println!("{}", "Tinker Status".cyan().bold());
    println!();

    // Config
    let config_exists = config_path.exists();
    println!(
        "  {:<14} {} {}",
        "Config:".bold(),
        config_path.display(),
        if config_exists {
            "✓".green().to_string()
        } else {
            "(not found)".red().to_string()
        }
    );

    // Data directory
    println!(
        "  {:<14} {} {}",
        "Data dir:".bold(),
        data_dir.display(),
        if data_dir.exists() {
            "✓".green().to_string()
        } else {
            "(not found)".red().to_string()
        }
    );

    // API
    println!(
        "  {:<14} {}",
        "API base:".bold(),
        config.inference.api_base
    );
    let token_status = if config.inference.is_configured() {
        format!("{} (token set)", "✓".green())
    } else {
        format!("{}", "· not configured".dimmed())
    };
    println!("  {:<14} {}", "API token:".bold(), token_status);
    println!(
        "  {:<14} {}",
        "Retry:".bold(),
        format!(
            "{} attempts, {}s default wait",
            config.inference.max_attempts, config.inference.retry_wait_secs
        )
        .dimmed()
    );

    // Models
    println!();
    println!("  {}", "Models:".bold());
    for spec in MODELS {
        println!(
            "    {:<28} {:<6} {}",
            spec.id,
            spec.kind.label().dimmed(),
            spec.display_name.dimmed()
        );
    }
    println!();

    Ok(())
}

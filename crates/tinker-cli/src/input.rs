//! Interactive variable collection.
//!
//! When `tinker run` finds placeholders not covered by `--var` flags, the
//! missing values are read from the terminal one by one.

use std::collections::HashMap;

use anyhow::{Context, Result};
use colored::Colorize;
use rustyline::DefaultEditor;
use tracing::debug;

/// Fill in values for every name in `missing`, prompting interactively.
pub fn collect_variables(
    missing: &[String],
    values: &mut HashMap<String, String>,
) -> Result<()> {
    if missing.is_empty() {
        return Ok(());
    }

    println!(
        "{}",
        format!("This prompt needs {} value(s).", missing.len()).dimmed()
    );

    let mut editor = DefaultEditor::new().context("failed to open terminal input")?;
    for name in missing {
        let value = editor
            .readline(&format!("{}: ", name.bold()))
            .with_context(|| format!("no value supplied for '{name}'"))?;
        debug!(variable = %name, chars = value.len(), "collected value");
        values.insert(name.clone(), value);
    }

    Ok(())
}

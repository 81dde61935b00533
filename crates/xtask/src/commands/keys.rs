//! List or substitute nameable keys
//!
//! Free text in lists may contain `@key@` placeholders. Without `--set` the
//! command lists them; with `--set` it substitutes the given values and saves.

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use std::path::PathBuf;

use sheet_content::FsSource;

use crate::utils::SheetFile;

/// List or substitute nameable `@key@` placeholders
#[derive(Parser, Debug)]
pub struct Keys {
    /// List file to inspect
    #[arg(value_name = "FILE")]
    path: PathBuf,

    /// Replacement for a key, as KEY=VALUE (repeatable)
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_assignment)]
    assignments: Vec<(String, String)>,

    /// Write here instead of replacing the input (only with --set)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

fn parse_assignment(text: &str) -> Result<(String, String), String> {
    let (key, value) = text
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{text}`"))?;
    if key.is_empty() {
        return Err("key must not be empty".to_string());
    }
    Ok((key.to_string(), value.to_string()))
}

impl Keys {
    pub fn execute(self) -> Result<()> {
        let source = FsSource::new();
        let mut file = SheetFile::load(&source, &self.path)?;
        let mut keys = file
            .nameable_keys()
            .with_context(|| format!("A {} has no nameable keys", file.label()))?;

        if self.assignments.is_empty() {
            if keys.is_empty() {
                println!("{}", style("No nameable keys").dim());
            }
            for key in keys.keys() {
                println!("  {}", style(format!("@{key}@")).cyan());
            }
            return Ok(());
        }

        for (key, value) in self.assignments {
            if !keys.contains_key(&key) {
                anyhow::bail!("Unknown key: {key}");
            }
            keys.insert(key, value);
        }
        file.apply_nameable_keys(&keys);

        let output = self.output.as_ref().unwrap_or(&self.path);
        file.save(&source, output)?;
        println!(
            "{} Substituted keys in {}",
            style("✓").green().bold(),
            output.display()
        );
        Ok(())
    }
}

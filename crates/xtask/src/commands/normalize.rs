//! Rewrite files in the current format
//!
//! Legacy files are migrated on load, so saving them back upgrades the
//! discriminator, version, identifiers and tags in one step.

use anyhow::Result;
use clap::Parser;
use console::style;
use std::path::PathBuf;

use sheet_content::FsSource;

use crate::config::SheetConfig;
use crate::utils::SheetFile;

/// Load a file and save it back in the current format
#[derive(Parser, Debug)]
pub struct Normalize {
    /// File to normalize
    #[arg(value_name = "FILE")]
    path: PathBuf,

    /// Write here instead of replacing the input
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

impl Normalize {
    pub fn execute(self) -> Result<()> {
        let source = FsSource::new();
        let mut file = SheetFile::load(&source, &self.path)?;
        // Saved calc blocks reflect the configured sheet settings.
        file.set_owner(&SheetConfig::from_env().sheet());

        let output = self.output.as_ref().unwrap_or(&self.path);
        file.save(&source, output)?;

        println!(
            "{} {} ({}, {} entries) -> {}",
            style("✓").green().bold(),
            self.path.display(),
            file.label(),
            file.len(),
            output.display()
        );
        Ok(())
    }
}

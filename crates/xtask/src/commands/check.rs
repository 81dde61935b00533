//! Validate that files load
//!
//! Every file is loaded independently; failures are reported with the
//! loader's error code and severity, and the command fails if any file does.

use anyhow::Result;
use clap::Parser;
use console::style;
use std::path::{Path, PathBuf};

use sheet_content::{
    DataSource, FileKind, FsSource, LoadError, load_ancestry, load_notes, load_trait_modifiers,
    load_traits,
};
use sheet_core::SheetError;

/// Validate that files load
#[derive(Parser, Debug)]
pub struct Check {
    /// Files to check
    #[arg(value_name = "FILE", required = true)]
    paths: Vec<PathBuf>,
}

impl Check {
    pub fn execute(self) -> Result<()> {
        let source = FsSource::new();
        let mut failures = 0;

        for path in &self.paths {
            match check_file(&source, path) {
                Ok((kind, entries)) => println!(
                    "{} {} ({kind:?}, {entries} entries)",
                    style("✓").green().bold(),
                    path.display()
                ),
                Err(err) => {
                    failures += 1;
                    println!(
                        "{} {} [{} / {}] {err}",
                        style("✗").red().bold(),
                        path.display(),
                        style(err.error_code()).yellow(),
                        err.severity().as_str()
                    );
                }
            }
        }

        println!();
        if failures > 0 {
            anyhow::bail!("{failures} of {} files failed to load", self.paths.len());
        }
        println!("{} All {} files loaded", style("✓").green().bold(), self.paths.len());
        Ok(())
    }
}

fn check_file(source: &dyn DataSource, path: &Path) -> Result<(FileKind, usize), LoadError> {
    let kind = FileKind::detect(source, path)?;
    let entries = match kind {
        FileKind::Traits => load_traits(source, path)?.len(),
        FileKind::TraitModifiers => load_trait_modifiers(source, path)?.len(),
        FileKind::Notes => load_notes(source, path)?.len(),
        FileKind::Ancestry => {
            load_ancestry(source, path)?;
            1
        }
    };
    tracing::debug!(path = %path.display(), ?kind, entries, "checked");
    Ok((kind, entries))
}

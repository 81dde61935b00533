//! Show computed trait point costs
//!
//! Loads a trait list, attaches the sheet configured through `SHEET_*`
//! variables and prints every trait with its adjusted cost.

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use serde_json::json;
use std::path::PathBuf;

use sheet_content::{FsSource, load_traits};
use sheet_core::{Node, NodeTree, Trait, Traversal};

use crate::config::SheetConfig;

/// Show the computed point cost of every trait in a list
#[derive(Parser)]
pub struct Points {
    /// Trait list file (.adq)
    #[arg(value_name = "FILE")]
    path: PathBuf,

    /// Skip disabled traits and everything below them
    #[arg(long)]
    enabled_only: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    format: OutputFormat,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    /// Indented tree with costs and a total
    Summary,
    /// One JSON object per trait
    Json,
}

impl Points {
    pub fn execute(self) -> Result<()> {
        let config = SheetConfig::from_env();
        let mut traits = load_traits(&FsSource::new(), &self.path)
            .with_context(|| format!("Failed to load trait list: {}", self.path.display()))?;
        traits.set_owning_entity(Some(config.sheet()));

        let flags = if self.enabled_only {
            Traversal::EXCLUDE_DISABLED
        } else {
            Traversal::empty()
        };

        match self.format {
            OutputFormat::Summary => print_summary(&traits, flags),
            OutputFormat::Json => print_json(&traits, flags)?,
        }
        Ok(())
    }
}

fn print_summary(traits: &NodeTree<Trait>, flags: Traversal) {
    println!("{}", style("=== Trait Points ===").bold().green());
    println!();

    for (id, t) in traits.walk(flags) {
        let indent = "  ".repeat(traits.depth(id));
        let points = traits.adjusted_points(id);
        let mut line = format!("{indent}{}", t.name);
        if t.is_leveled() {
            line.push_str(&format!(" {}", traits.current_level(id)));
        }
        let points = format!("[{points}]");
        if traits.effectively_disabled(id) {
            println!("{} {}", style(line).dim(), style("(disabled)").dim());
        } else if t.is_container() {
            println!("{} {}", style(line).bold(), style(points).cyan());
        } else {
            println!("{} {}", line, style(points).cyan());
        }
    }

    println!();
    println!(
        "{} {}",
        style("Total:").bold().yellow(),
        traits.total_points()
    );
}

fn print_json(traits: &NodeTree<Trait>, flags: Traversal) -> Result<()> {
    let rows: Vec<_> = traits
        .walk(flags)
        .map(|(id, t)| {
            json!({
                "id": t.id.to_string(),
                "name": t.name,
                "depth": traits.depth(id),
                "level": t.is_leveled().then(|| traits.current_level(id)),
                "points": traits.adjusted_points(id),
                "disabled": traits.effectively_disabled(id),
            })
        })
        .collect();
    let output = json!({
        "total": traits.total_points(),
        "traits": rows,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

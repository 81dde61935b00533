//! Utility functions for xtask commands

use std::path::Path;

use anyhow::{Context, Result};
use sheet_content::{
    DataSource, FileKind, load_ancestry, load_notes, load_trait_modifiers, load_traits,
    save_ancestry, save_notes, save_trait_modifiers, save_traits,
};
use sheet_core::{Ancestry, NameableKeys, NodeTree, Note, SheetRef, Trait, TraitModifier};

/// Any file the sheet content crate can read, loaded by its discriminator.
pub enum SheetFile {
    Traits(NodeTree<Trait>),
    TraitModifiers(NodeTree<TraitModifier>),
    Notes(NodeTree<Note>),
    Ancestry(Ancestry),
}

impl SheetFile {
    pub fn load(source: &dyn DataSource, path: &Path) -> Result<Self> {
        let kind = FileKind::detect(source, path)
            .with_context(|| format!("Failed to classify {}", path.display()))?;
        let loaded = match kind {
            FileKind::Traits => load_traits(source, path).map(Self::Traits),
            FileKind::TraitModifiers => load_trait_modifiers(source, path).map(Self::TraitModifiers),
            FileKind::Notes => load_notes(source, path).map(Self::Notes),
            FileKind::Ancestry => load_ancestry(source, path).map(Self::Ancestry),
        };
        loaded.with_context(|| format!("Failed to load {}", path.display()))
    }

    pub fn save(&self, source: &dyn DataSource, path: &Path) -> Result<()> {
        let saved = match self {
            Self::Traits(tree) => save_traits(source, path, tree),
            Self::TraitModifiers(tree) => save_trait_modifiers(source, path, tree),
            Self::Notes(tree) => save_notes(source, path, tree),
            Self::Ancestry(ancestry) => save_ancestry(source, path, ancestry),
        };
        saved.with_context(|| format!("Failed to save {}", path.display()))
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Traits(_) => "trait list",
            Self::TraitModifiers(_) => "trait modifier list",
            Self::Notes(_) => "note list",
            Self::Ancestry(_) => "ancestry",
        }
    }

    /// Number of entities in the file.
    pub fn len(&self) -> usize {
        match self {
            Self::Traits(tree) => tree.len(),
            Self::TraitModifiers(tree) => tree.len(),
            Self::Notes(tree) => tree.len(),
            Self::Ancestry(_) => 1,
        }
    }

    pub fn set_owner(&mut self, owner: &SheetRef) {
        match self {
            Self::Traits(tree) => tree.set_owning_entity(Some(owner.clone())),
            Self::TraitModifiers(tree) => tree.set_owning_entity(Some(owner.clone())),
            Self::Notes(tree) => tree.set_owning_entity(Some(owner.clone())),
            Self::Ancestry(_) => {}
        }
    }

    /// `None` for ancestries, which carry no free text placeholders.
    pub fn nameable_keys(&self) -> Option<NameableKeys> {
        let mut keys = NameableKeys::new();
        match self {
            Self::Traits(tree) => tree.fill_with_nameable_keys(&mut keys),
            Self::TraitModifiers(tree) => tree.fill_with_nameable_keys(&mut keys),
            Self::Notes(tree) => tree.fill_with_nameable_keys(&mut keys),
            Self::Ancestry(_) => return None,
        }
        Some(keys)
    }

    pub fn apply_nameable_keys(&mut self, keys: &NameableKeys) {
        match self {
            Self::Traits(tree) => tree.apply_nameable_keys(keys),
            Self::TraitModifiers(tree) => tree.apply_nameable_keys(keys),
            Self::Notes(tree) => tree.apply_nameable_keys(keys),
            Self::Ancestry(_) => {}
        }
    }
}

//! Ancestry lookup by name.

use std::collections::BTreeMap;
use std::path::Path;

use sheet_core::{Ancestry, ContainerType, Node, NodeId, NodeTree, Trait, Traversal};

use crate::loaders::{LoadResult, load_ancestry};
use crate::source::DataSource;

/// Ancestries available to a sheet, keyed by name.
#[derive(Clone, Debug, Default)]
pub struct AncestryLibrary {
    entries: BTreeMap<String, Ancestry>,
}

impl AncestryLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every file in `paths`; the first failure aborts.
    pub fn load<'a, I>(source: &dyn DataSource, paths: I) -> LoadResult<Self>
    where
        I: IntoIterator<Item = &'a Path>,
    {
        let mut library = Self::new();
        for path in paths {
            library.insert(load_ancestry(source, path)?);
        }
        Ok(library)
    }

    /// Adds or replaces the ancestry with the same name.
    pub fn insert(&mut self, ancestry: Ancestry) {
        self.entries.insert(ancestry.name.clone(), ancestry);
    }

    /// Exact name match, then a case-insensitive one.
    pub fn lookup(&self, name: &str) -> Option<&Ancestry> {
        self.entries.get(name).or_else(|| {
            self.entries
                .values()
                .find(|ancestry| ancestry.name.eq_ignore_ascii_case(name))
        })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Enabled ancestry containers whose ancestry resolves in `library`, with the
/// resolved ancestry. Disabled subtrees are skipped entirely.
pub fn active_ancestry_traits<'a>(
    traits: &NodeTree<Trait>,
    library: &'a AncestryLibrary,
) -> Vec<(NodeId, &'a Ancestry)> {
    traits
        .walk(Traversal::EXCLUDE_DISABLED)
        .filter(|(_, t)| t.is_container() && t.container.container_type == ContainerType::Ancestry)
        .filter_map(|(id, t)| match library.lookup(&t.container.ancestry) {
            Some(ancestry) => Some((id, ancestry)),
            None => {
                tracing::warn!(ancestry = %t.container.ancestry, trait_id = %t.id, "ancestry not found");
                None
            }
        })
        .collect()
}

/// Ancestries referenced by the enabled ancestry containers of `traits`.
pub fn active_ancestries<'a>(traits: &NodeTree<Trait>, library: &'a AncestryLibrary) -> Vec<&'a Ancestry> {
    active_ancestry_traits(traits, library)
        .into_iter()
        .map(|(_, ancestry)| ancestry)
        .collect()
}

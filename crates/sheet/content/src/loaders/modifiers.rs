//! Trait modifier list files (`modifier_list`).

use std::path::Path;

use sheet_core::{KindFamily, NodeTree, TraitModifier};

use crate::loaders::migrate::migrate_rows;
use crate::loaders::{ListFormat, LoadResult, SaveResult, decode_rows, encode_rows, read_rows, write_rows};
use crate::source::DataSource;

pub(crate) const MODIFIER_LIST: ListFormat = ListFormat {
    type_key: "modifier_list",
    legacy_type_key: None,
};

pub fn load_trait_modifiers(source: &dyn DataSource, path: &Path) -> LoadResult<NodeTree<TraitModifier>> {
    let mut rows = read_rows(source, path, MODIFIER_LIST)?;
    migrate_rows(KindFamily::TraitModifier, &mut rows)?;
    decode_rows(path, rows)
}

/// Modifier rows carry no `calc` block.
pub fn save_trait_modifiers(
    source: &dyn DataSource,
    path: &Path,
    modifiers: &NodeTree<TraitModifier>,
) -> SaveResult {
    let mut written = modifiers.clone();
    written.clear_unused_fields();
    let rows = encode_rows(path, &written)?;
    write_rows(source, path, MODIFIER_LIST.type_key, rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemorySource;
    use sheet_core::{CostType, Traversal};

    #[test]
    fn unknown_cost_type_is_preserved() {
        let source = MemorySource::new().with_file(
            "m.adm",
            r#"{"type":"modifier_list","version":4,"rows":[
                {"type":"modifier","name":"Odd","cost":5,"cost_type":"per_die"}
            ]}"#,
        );
        let modifiers = load_trait_modifiers(&source, Path::new("m.adm")).unwrap();
        let (_, odd) = modifiers.walk(Traversal::empty()).next().unwrap();
        assert_eq!(odd.leaf.cost_type, CostType::Unrecognized("per_die".into()));
        assert_eq!(odd.cost_description(), "+5%");

        save_trait_modifiers(&source, Path::new("m.adm"), &modifiers).unwrap();
        let saved = source.get(Path::new("m.adm")).unwrap();
        assert!(saved.contains("\"per_die\""));
        assert!(!saved.contains("calc"));
    }

    #[test]
    fn containers_lose_leaf_fields_on_load() {
        let source = MemorySource::new().with_file(
            "m.adm",
            r#"{"type":"modifier_list","version":5,"rows":[
                {"type":"modifier_container","name":"Group","cost":50,"children":[
                    {"type":"modifier","name":"Inner","cost":10}
                ]}
            ]}"#,
        );
        let modifiers = load_trait_modifiers(&source, Path::new("m.adm")).unwrap();
        let group = modifiers.roots()[0];
        assert!(modifiers.node(group).unwrap().leaf.cost.is_zero());
        assert_eq!(modifiers.children(group).len(), 1);
    }
}

//! Trait list files (`trait_list`, formerly `advantage_list`).

use std::path::Path;

use serde_json::{Map, Value, json};
use sheet_core::{KindFamily, NodeId, NodeTree, Trait};

use crate::loaders::migrate::migrate_rows;
use crate::loaders::{
    ListFormat, LoadResult, SaveResult, attach_calc, decode_rows, encode_rows, read_rows, write_rows,
};
use crate::source::DataSource;

pub(crate) const TRAIT_LIST: ListFormat = ListFormat {
    type_key: "trait_list",
    legacy_type_key: Some("advantage_list"),
};

/// Loads a trait list.
///
/// Legacy rows are migrated (see [`crate::loaders::migrate`]); any `calc`
/// block in the file is ignored.
pub fn load_traits(source: &dyn DataSource, path: &Path) -> LoadResult<NodeTree<Trait>> {
    let mut rows = read_rows(source, path, TRAIT_LIST)?;
    migrate_rows(KindFamily::Trait, &mut rows)?;
    decode_rows(path, rows)
}

/// Saves a trait list with a `calc` block on every row.
///
/// The tree is not modified: inapplicable fields are cleared on the written
/// copy only.
pub fn save_traits(source: &dyn DataSource, path: &Path, traits: &NodeTree<Trait>) -> SaveResult {
    let mut written = traits.clone();
    written.clear_unused_fields();
    let mut rows = encode_rows(path, &written)?;
    attach_calc(&written, written.roots(), &mut rows, &|id| trait_calc(&written, id));
    write_rows(source, path, TRAIT_LIST.type_key, rows)
}

/// Derived values written alongside a trait for external readers.
fn trait_calc(traits: &NodeTree<Trait>, id: NodeId) -> Option<Map<String, Value>> {
    let t = traits.get(id)?;
    let mut calc = Map::new();
    calc.insert("points".to_owned(), json!(traits.adjusted_points(id)));
    if !t.unsatisfied_reason.is_empty() {
        calc.insert("unsatisfied_reason".to_owned(), json!(t.unsatisfied_reason));
    }
    let notes = t.resolved_notes();
    if notes != t.local_notes {
        calc.insert("resolved_notes".to_owned(), json!(notes));
    }
    Some(calc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LoadError;
    use crate::source::MemorySource;
    use sheet_core::{ContainerType, Fxp, Sheet};

    #[test]
    fn legacy_type_is_accepted() {
        let source = MemorySource::new().with_file(
            "old.adq",
            r#"{"type":"advantage_list","version":2,"rows":[{"type":"advantage","name":"Luck","base_points":15}]}"#,
        );
        let traits = load_traits(&source, Path::new("old.adq")).unwrap();
        assert_eq!(traits.len(), 1);
        assert_eq!(traits.total_points(), Fxp::from_int(15));
    }

    #[test]
    fn wrong_list_type_is_refused() {
        let source = MemorySource::new().with_file("notes.not", r#"{"type":"note_list","version":5,"rows":[]}"#);
        assert!(matches!(
            load_traits(&source, Path::new("notes.not")),
            Err(LoadError::UnexpectedFileType { expected: "trait_list", .. })
        ));
    }

    #[test]
    fn calc_block_carries_points_and_resolved_notes() {
        let mut traits = NodeTree::<Trait>::new();
        let group = traits.insert(None, true).unwrap();
        traits.node_mut(group).unwrap().container.container_type = ContainerType::AlternativeAbilities;
        for points in [10, 10, 5] {
            let id = traits.insert(Some(group), false).unwrap();
            traits.node_mut(id).unwrap().leaf.base_points = Fxp::from_int(points);
        }
        let first = traits.children(group)[0];
        traits.node_mut(first).unwrap().local_notes = "Range ||$range|| yards".into();
        traits.node_mut(first).unwrap().unsatisfied_reason = "Requires ST 12".into();
        traits.set_owning_entity(Some(
            Sheet::new("pc").with_variable("range", Fxp::from_int(30)).into_shared(),
        ));

        let source = MemorySource::new();
        save_traits(&source, Path::new("t.adq"), &traits).unwrap();
        let saved: Value = serde_json::from_str(&source.get(Path::new("t.adq")).unwrap()).unwrap();

        assert_eq!(saved["type"], "trait_list");
        assert_eq!(saved["version"], 5);
        let row = &saved["rows"][0];
        assert_eq!(row["calc"]["points"], 13);
        let child = &row["children"][0];
        assert_eq!(child["calc"]["points"], 10);
        assert_eq!(child["calc"]["resolved_notes"], "Range 30 yards");
        assert_eq!(child["calc"]["unsatisfied_reason"], "Requires ST 12");
        assert!(row["children"][2]["calc"].get("resolved_notes").is_none());
    }
}

//! Legacy row migration.
//!
//! Rows are rewritten on the raw JSON before typed deserialization, in a
//! single pass over each row and its descendants (and, for traits, the rows
//! of their modifier lists):
//!
//! - `advantage` / `advantage_container` row types become `trait` /
//!   `trait_container`
//! - ids that are not valid for the list's kind are minted from the row type;
//!   containers are recognized by the `_container` suffix
//! - the boolean `mental`, `physical`, `social`, `exotic` and `supernatural`
//!   flags and the `categories` list fold into sorted `tags`
//! - a `race` container type becomes `ancestry`
//! - leaves with non-zero levels or points per level get `can_level`
//! - any `calc` block is dropped

use serde_json::{Map, Value, json};
use sheet_core::tags::add_tag_once;
use sheet_core::{EntityKind, Fxp, KindFamily, Tid, convert_old_categories_to_tags};

use crate::error::LoadError;
use crate::loaders::LoadResult;

/// Suffix of container row types (`trait_container`, `note_container`).
pub const CONTAINER_SUFFIX: &str = "_container";

/// Boolean row flags of old trait files and the tag each one becomes.
const TRAIT_FLAG_TAGS: [(&str, &str); 5] = [
    ("mental", "Mental"),
    ("physical", "Physical"),
    ("social", "Social"),
    ("exotic", "Exotic"),
    ("supernatural", "Supernatural"),
];

/// Migrates the rows of one list in place.
pub fn migrate_rows(family: KindFamily, rows: &mut [Value]) -> LoadResult<()> {
    RowMigration::new(family).rows(rows)
}

struct RowMigration {
    family: KindFamily,
    next_row: usize,
}

impl RowMigration {
    fn new(family: KindFamily) -> Self {
        Self { family, next_row: 0 }
    }

    fn rows(&mut self, rows: &mut [Value]) -> LoadResult<()> {
        for row in rows {
            self.row(row)?;
        }
        Ok(())
    }

    fn row(&mut self, row: &mut Value) -> LoadResult<()> {
        let index = self.next_row;
        self.next_row += 1;
        // Non-object rows are rejected by the typed pass.
        let Value::Object(fields) = row else {
            return Ok(());
        };

        let row_type = self.row_type(fields);
        let tid = self.ensure_id(fields, &row_type, index)?;
        fields.remove("calc");

        match self.family {
            KindFamily::Trait => {
                if !tid.is_container() {
                    force_can_level(fields);
                }
                if fields.get("container_type").and_then(Value::as_str) == Some("race") {
                    fields.insert("container_type".to_owned(), json!("ancestry"));
                }
                fold_tags(fields, &TRAIT_FLAG_TAGS);
                if let Some(Value::Array(modifiers)) = fields.get_mut("modifiers") {
                    RowMigration::new(KindFamily::TraitModifier).rows(modifiers)?;
                }
            }
            KindFamily::TraitModifier => fold_tags(fields, &[]),
            KindFamily::Note => {}
        }

        if let Some(Value::Array(children)) = fields.get_mut("children") {
            self.rows(children)?;
        }
        Ok(())
    }

    /// Removes the row's `type` and returns it with legacy keys renamed.
    fn row_type(&self, fields: &mut Map<String, Value>) -> String {
        let row_type = match fields.remove("type") {
            Some(Value::String(text)) => text,
            _ => String::new(),
        };
        let legacy_rest = self
            .family
            .legacy_type_key()
            .and_then(|legacy| row_type.strip_prefix(legacy))
            .filter(|rest| rest.is_empty() || *rest == CONTAINER_SUFFIX);
        match legacy_rest {
            Some(rest) => format!("{}{rest}", self.family.type_key()),
            None => row_type,
        }
    }

    fn ensure_id(&self, fields: &mut Map<String, Value>, row_type: &str, index: usize) -> LoadResult<Tid> {
        let current = fields.get("id").and_then(Value::as_str);
        if let Some(tid) = current.and_then(|text| Tid::parse_for(text, self.family)) {
            return Ok(tid);
        }

        let container = match self.family {
            // Notes never failed on an unknown type; anything else is a leaf.
            KindFamily::Note => row_type.ends_with(CONTAINER_SUFFIX),
            family => match row_type.strip_prefix(family.type_key()) {
                Some("") => false,
                Some(CONTAINER_SUFFIX) => true,
                _ => {
                    return Err(LoadError::InvalidIdentifier {
                        row: index,
                        row_type: row_type.to_owned(),
                    });
                }
            },
        };
        let tid = Tid::new(EntityKind::new(self.family, container));
        tracing::debug!(row = index, previous = ?current, %tid, "minted identifier for legacy row");
        fields.insert("id".to_owned(), json!(tid.to_string()));
        Ok(tid)
    }
}

fn is_non_zero(fields: &Map<String, Value>, key: &str) -> bool {
    fields
        .get(key)
        .and_then(|value| serde_json::from_value::<Fxp>(value.clone()).ok())
        .is_some_and(|value| !value.is_zero())
}

fn force_can_level(fields: &mut Map<String, Value>) {
    if is_non_zero(fields, "levels") || is_non_zero(fields, "points_per_level") {
        fields.insert("can_level".to_owned(), json!(true));
    }
}

fn take_strings(fields: &mut Map<String, Value>, key: &str) -> Vec<String> {
    match fields.remove(key) {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(text) => Some(text),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn fold_tags(fields: &mut Map<String, Value>, flags: &[(&str, &str)]) {
    let mut tags = take_strings(fields, "tags");
    for &(key, tag) in flags {
        if fields.remove(key).and_then(|value| value.as_bool()).unwrap_or(false) {
            add_tag_once(&mut tags, tag);
        }
    }
    let categories = take_strings(fields, "categories");
    let mut tags = convert_old_categories_to_tags(&tags, &categories);
    tags.sort();
    if !tags.is_empty() {
        fields.insert("tags".to_owned(), json!(tags));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn migrated(family: KindFamily, row: Value) -> Value {
        let mut rows = vec![row];
        migrate_rows(family, &mut rows).unwrap();
        rows.remove(0)
    }

    #[test]
    fn legacy_advantage_rows_become_traits() {
        let row = migrated(
            KindFamily::Trait,
            json!({
                "type": "advantage_container",
                "id": "8d7c0b6a-uuid",
                "children": [{"type": "advantage", "name": "Luck"}]
            }),
        );
        let id: Tid = row["id"].as_str().unwrap().parse().unwrap();
        assert_eq!(id.kind(), EntityKind::TraitContainer);
        let child: Tid = row["children"][0]["id"].as_str().unwrap().parse().unwrap();
        assert_eq!(child.kind(), EntityKind::Trait);
        assert!(row.get("type").is_none());
    }

    #[test]
    fn valid_ids_are_kept() {
        let tid = Tid::new(EntityKind::TraitModifier).to_string();
        let row = migrated(KindFamily::TraitModifier, json!({"id": tid, "name": "Extra"}));
        assert_eq!(row["id"], json!(tid));
    }

    #[test]
    fn unusable_id_and_type_is_an_error() {
        let mut rows = vec![
            json!({"type": "modifier", "id": "x"}),
            json!({"type": "skill", "id": "y"}),
        ];
        let err = migrate_rows(KindFamily::TraitModifier, &mut rows).unwrap_err();
        assert!(matches!(err, LoadError::InvalidIdentifier { row: 1, ref row_type } if row_type == "skill"));

        // A trait-modifier id is not valid in a trait list.
        let foreign = Tid::new(EntityKind::TraitModifier).to_string();
        let mut rows = vec![json!({"id": foreign})];
        assert!(migrate_rows(KindFamily::Trait, &mut rows).is_err());
    }

    #[test]
    fn notes_mint_ids_from_suffix_alone() {
        let row = migrated(KindFamily::Note, json!({"type": "note_container", "text": "x"}));
        let id: Tid = row["id"].as_str().unwrap().parse().unwrap();
        assert_eq!(id.kind(), EntityKind::NoteContainer);
        let row = migrated(KindFamily::Note, json!({"text": "x"}));
        let id: Tid = row["id"].as_str().unwrap().parse().unwrap();
        assert_eq!(id.kind(), EntityKind::Note);
    }

    #[test]
    fn flags_and_categories_fold_into_sorted_tags() {
        let row = migrated(
            KindFamily::Trait,
            json!({
                "type": "advantage",
                "tags": ["Quirk"],
                "physical": true,
                "mental": true,
                "social": false,
                "categories": ["Advantage", "Quirk"]
            }),
        );
        assert_eq!(row["tags"], json!(["Advantage", "Mental", "Physical", "Quirk"]));
        for key in ["physical", "mental", "social", "categories"] {
            assert!(row.get(key).is_none(), "{key} should be removed");
        }
    }

    #[test]
    fn levels_force_can_level_on_leaves_only() {
        let row = migrated(KindFamily::Trait, json!({"type": "trait", "levels": "2"}));
        assert_eq!(row["can_level"], json!(true));
        let row = migrated(KindFamily::Trait, json!({"type": "trait", "points_per_level": 0}));
        assert!(row.get("can_level").is_none());
        let row = migrated(KindFamily::Trait, json!({"type": "trait_container", "levels": 2}));
        assert!(row.get("can_level").is_none());
    }

    #[test]
    fn nested_modifier_rows_are_migrated() {
        let row = migrated(
            KindFamily::Trait,
            json!({
                "type": "trait_container",
                "container_type": "race",
                "calc": {"points": 5},
                "modifiers": [{"type": "modifier", "categories": ["Power"]}]
            }),
        );
        assert_eq!(row["container_type"], json!("ancestry"));
        assert!(row.get("calc").is_none());
        let modifier: Tid = row["modifiers"][0]["id"].as_str().unwrap().parse().unwrap();
        assert_eq!(modifier.kind(), EntityKind::TraitModifier);
        assert_eq!(row["modifiers"][0]["tags"], json!(["Power"]));
    }
}

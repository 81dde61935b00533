use std::fmt;

use serde_json::{Map, Value};

use crate::nameables::{self, NameableKeys};
use crate::sheet::{self, SheetRef};
use crate::tid::{EntityKind, KindFamily, Tid};
use crate::tree::Node;

use super::is_false;

/// Free-form text attached to a sheet. Notes are always enabled.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Note {
    pub id: Tid,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(rename = "reference", default, skip_serializing_if = "String::is_empty")]
    pub page_ref: String,
    #[serde(rename = "reference_highlight", default, skip_serializing_if = "String::is_empty")]
    pub page_ref_highlight: String,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub third_party: Map<String, Value>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub open: bool,
    #[serde(skip)]
    owner: Option<SheetRef>,
}

impl Note {
    /// Text with `||expr||` expressions evaluated against the owner.
    pub fn resolved_text(&self) -> String {
        sheet::resolve_embedded(self.owner(), &self.text)
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.resolved_text())
    }
}

impl Node for Note {
    const FAMILY: KindFamily = KindFamily::Note;

    fn new_node(container: bool) -> Self {
        let kind = EntityKind::new(Self::FAMILY, container);
        Self {
            id: Tid::new(kind),
            text: kind.label().to_string(),
            page_ref: String::new(),
            page_ref_highlight: String::new(),
            third_party: Map::new(),
            open: container,
            owner: None,
        }
    }

    fn id(&self) -> Tid {
        self.id
    }

    fn set_id(&mut self, id: Tid) {
        self.id = id;
    }

    fn is_open(&self) -> bool {
        self.open && self.is_container()
    }

    fn set_open(&mut self, open: bool) {
        self.open = open && self.is_container();
    }

    fn clear_unused_fields_for_type(&mut self) {
        if !self.is_container() {
            self.open = false;
        }
    }

    fn owner(&self) -> Option<&SheetRef> {
        self.owner.as_ref()
    }

    fn set_owner(&mut self, owner: Option<SheetRef>) {
        self.owner = owner;
    }

    fn fill_nameable_keys(&self, keys: &mut NameableKeys) {
        if !self.is_container() {
            nameables::extract(&self.text, keys);
        }
    }

    fn apply_nameable_keys(&mut self, keys: &NameableKeys) {
        if !self.is_container() {
            nameables::apply_in_place(&mut self.text, keys);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fxp::Fxp;
    use crate::sheet::Sheet;

    #[test]
    fn new_note_uses_kind_label_and_resolves_text() {
        let mut note = Note::new_node(false);
        assert_eq!(note.text, "Note");
        assert!(!note.is_open());

        note.text = "Carries ||$gold|| gold".into();
        assert_eq!(note.to_string(), "Carries ||$gold|| gold");
        note.set_owner(Some(
            Sheet::new("x").with_variable("gold", Fxp::from_int(40)).into_shared(),
        ));
        assert_eq!(note.to_string(), "Carries 40 gold");
    }

    #[test]
    fn notes_cannot_be_disabled() {
        let mut note = Note::new_node(false);
        note.set_enabled(false);
        assert!(note.is_self_enabled());
        let container = Note::new_node(true);
        assert_eq!(container.text, "Note Container");
        assert!(container.is_open());
    }
}

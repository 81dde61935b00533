//! Nested value objects carried by traits and modifiers.
//!
//! Features, weapons and prerequisite lists are evaluated by other parts of
//! a character sheet. Here they are kept as opaque JSON objects so that every
//! authored field survives a load/save round trip; only their text is touched,
//! by nameable-key substitution.

use serde_json::{Map, Value};

use crate::nameables::{self, NameableKeys};

macro_rules! opaque_payload {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Map<String, Value>);

        impl $name {
            /// The `type` discriminator, if present.
            pub fn type_key(&self) -> Option<&str> {
                self.0.get("type").and_then(Value::as_str)
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            pub fn fill_nameable_keys(&self, keys: &mut NameableKeys) {
                self.0.values().for_each(|value| nameables::extract_json(value, keys));
            }

            pub fn apply_nameable_keys(&mut self, keys: &NameableKeys) {
                self.0.values_mut().for_each(|value| nameables::apply_json(value, keys));
            }
        }

        impl From<Map<String, Value>> for $name {
            fn from(map: Map<String, Value>) -> Self {
                Self(map)
            }
        }
    };
}

opaque_payload!(
    /// A bonus or other effect granted by an entity.
    Feature
);

opaque_payload!(
    /// A melee or ranged weapon granted by a trait.
    Weapon
);

opaque_payload!(
    /// Prerequisite tree of a trait.
    PrereqList
);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn payloads_keep_unknown_fields_and_substitute_text() {
        let raw = json!({
            "type": "skill_bonus",
            "selection_type": "skills_with_name",
            "name": {"compare": "is", "qualifier": "@Weapon Skill@"},
            "amount": 1,
        });
        let mut feature: Feature = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(feature.type_key(), Some("skill_bonus"));

        let mut keys = NameableKeys::new();
        feature.fill_nameable_keys(&mut keys);
        assert_eq!(keys["Weapon Skill"], "@Weapon Skill@");

        // Untouched keys leave the payload as authored.
        feature.apply_nameable_keys(&keys);
        assert_eq!(serde_json::to_value(&feature).unwrap(), raw);

        keys.insert("Weapon Skill".into(), "Axe/Mace".into());
        feature.apply_nameable_keys(&keys);
        assert_eq!(feature.0["name"]["qualifier"], "Axe/Mace");
    }
}

//! Entity kinds stored in sheet trees and the value objects they carry.
//!
//! Each kind implements [`Node`](crate::tree::Node) and serializes to the row
//! shape of its list file. Tree structure (`children`) is written by the
//! enclosing [`NodeTree`](crate::tree::NodeTree).

use std::str::FromStr;

use serde_json::Value;

/// Implements `Deserialize` for key enums through their `FromStr`, so an
/// unknown key reads as the default instead of failing the whole row.
macro_rules! deserialize_key_or_default {
    ($($ty:ty),+ $(,)?) => {$(
        impl<'de> serde::Deserialize<'de> for $ty {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let value = <serde_json::Value as serde::Deserialize>::deserialize(deserializer)?;
                Ok($crate::model::key_or_default(&value, stringify!($ty)))
            }
        }
    )+};
}

pub mod ancestry;
pub mod container;
pub mod modifier;
pub mod note;
pub mod payload;
pub mod selfctrl;
pub mod study;
pub mod template_picker;
pub mod traits;

pub use ancestry::{Ancestry, AncestryOptions, WeightedOption};
pub use container::ContainerType;
pub use modifier::{Affects, CostType, TraitModifier, TraitModifierLeafData};
pub use note::Note;
pub use payload::{Feature, PrereqList, Weapon};
pub use selfctrl::{SelfControlAdjustment, SelfControlRoll};
pub use study::{Study, StudyHoursNeeded, StudyType};
pub use template_picker::{NumericComparison, NumericCriteria, TemplatePicker, TemplatePickerType};
pub use traits::{Trait, TraitContainerData, TraitLeafData};

pub(crate) fn is_false(value: &bool) -> bool {
    !*value
}

pub(crate) fn key_or_default<T>(value: &Value, kind: &'static str) -> T
where
    T: FromStr + Default,
{
    match value {
        Value::String(key) => key.parse().unwrap_or_else(|_| {
            tracing::warn!(kind, key = %key, "unknown key, using default");
            T::default()
        }),
        Value::Null => T::default(),
        other => {
            tracing::warn!(kind, value = %other, "expected a string key, using default");
            T::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_keys_fall_back_to_the_default() {
        let kind: ContainerType = serde_json::from_value(json!("future_kind")).unwrap();
        assert_eq!(kind, ContainerType::Group);
        let affects: Affects = serde_json::from_value(json!(3)).unwrap();
        assert_eq!(affects, Affects::Total);
        let affects: Affects = serde_json::from_value(json!("levels_only")).unwrap();
        assert_eq!(affects, Affects::LevelsOnly);
        let hours: StudyHoursNeeded = serde_json::from_value(json!("100")).unwrap();
        assert_eq!(hours, StudyHoursNeeded::Standard);
        let hours: StudyHoursNeeded = serde_json::from_value(json!("160")).unwrap();
        assert_eq!(hours, StudyHoursNeeded::Level2);
        let study: StudyType = serde_json::from_value(json!("self")).unwrap();
        assert_eq!(study, StudyType::SelfTaught);
    }
}

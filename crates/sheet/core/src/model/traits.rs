use std::fmt;

use serde_json::{Map, Value};

use crate::fxp::Fxp;
use crate::nameables::{self, NameableKeys};
use crate::sheet::{self, SheetRef};
use crate::tid::{EntityKind, KindFamily, Tid};
use crate::tree::{Node, NodeTree, Traversal};

use super::container::ContainerType;
use super::is_false;
use super::modifier::TraitModifier;
use super::payload::{Feature, PrereqList, Weapon};
use super::selfctrl::{SelfControlAdjustment, SelfControlRoll};
use super::study::{Study, StudyHoursNeeded};
use super::template_picker::TemplatePicker;

/// Fields that only apply to trait leaves.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TraitLeafData {
    #[serde(skip_serializing_if = "Fxp::is_zero_ref")]
    pub base_points: Fxp,
    #[serde(skip_serializing_if = "Fxp::is_zero_ref")]
    pub levels: Fxp,
    #[serde(skip_serializing_if = "Fxp::is_zero_ref")]
    pub points_per_level: Fxp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prereqs: Option<PrereqList>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub weapons: Vec<Weapon>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<Feature>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub study: Vec<Study>,
    #[serde(skip_serializing_if = "StudyHoursNeeded::is_standard")]
    pub study_hours_needed: StudyHoursNeeded,
    #[serde(rename = "round_down", skip_serializing_if = "is_false")]
    pub round_cost_down: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub can_level: bool,
}

/// Fields that only apply to trait containers.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TraitContainerData {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub ancestry: String,
    #[serde(skip_serializing_if = "TemplatePicker::is_empty")]
    pub template_picker: TemplatePicker,
    #[serde(skip_serializing_if = "ContainerType::is_group")]
    pub container_type: ContainerType,
}

/// An advantage, disadvantage, perk or quirk, or a container of them.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Trait {
    pub id: Tid,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(rename = "reference", default, skip_serializing_if = "String::is_empty")]
    pub page_ref: String,
    #[serde(rename = "reference_highlight", default, skip_serializing_if = "String::is_empty")]
    pub page_ref_highlight: String,
    #[serde(rename = "notes", default, skip_serializing_if = "String::is_empty")]
    pub local_notes: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub vtt_notes: String,
    #[serde(rename = "userdesc", default, skip_serializing_if = "String::is_empty")]
    pub user_desc: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "NodeTree::is_empty")]
    pub modifiers: NodeTree<TraitModifier>,
    #[serde(default, skip_serializing_if = "SelfControlRoll::is_none")]
    pub cr: SelfControlRoll,
    #[serde(default, skip_serializing_if = "SelfControlAdjustment::is_none")]
    pub cr_adj: SelfControlAdjustment,
    #[serde(default, skip_serializing_if = "is_false")]
    pub disabled: bool,
    #[serde(flatten)]
    pub leaf: TraitLeafData,
    #[serde(flatten)]
    pub container: TraitContainerData,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub third_party: Map<String, Value>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub open: bool,
    /// Set by the collaborator that evaluates prerequisites; never loaded.
    #[serde(skip)]
    pub unsatisfied_reason: String,
    #[serde(skip)]
    owner: Option<SheetRef>,
}

impl Trait {
    pub fn is_leveled(&self) -> bool {
        self.leaf.can_level && !self.is_container()
    }

    /// Local notes with embedded expressions resolved.
    pub fn resolved_notes(&self) -> String {
        sheet::resolve_embedded(self.owner(), &self.local_notes)
    }

    /// First enabled modifier leaf with a matching name (case-insensitive).
    pub fn active_modifier_for(&self, name: &str) -> Option<&TraitModifier> {
        self.modifiers
            .walk(Traversal::EXCLUDE_DISABLED | Traversal::EXCLUDE_CONTAINERS)
            .map(|(_, modifier)| modifier)
            .find(|modifier| modifier.name.eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Trait {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if self.is_leveled() {
            write!(f, " {}", self.leaf.levels)?;
        }
        Ok(())
    }
}

impl Node for Trait {
    const FAMILY: KindFamily = KindFamily::Trait;

    fn new_node(container: bool) -> Self {
        let kind = EntityKind::new(Self::FAMILY, container);
        Self {
            id: Tid::new(kind),
            name: kind.label().to_string(),
            page_ref: String::new(),
            page_ref_highlight: String::new(),
            local_notes: String::new(),
            vtt_notes: String::new(),
            user_desc: String::new(),
            tags: Vec::new(),
            modifiers: NodeTree::new(),
            cr: SelfControlRoll::None,
            cr_adj: SelfControlAdjustment::None,
            disabled: false,
            leaf: TraitLeafData::default(),
            container: TraitContainerData::default(),
            third_party: Map::new(),
            open: container,
            unsatisfied_reason: String::new(),
            owner: None,
        }
    }

    fn id(&self) -> Tid {
        self.id
    }

    fn set_id(&mut self, id: Tid) {
        self.id = id;
    }

    fn is_self_enabled(&self) -> bool {
        !self.disabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.disabled = !enabled;
    }

    fn is_open(&self) -> bool {
        self.open && self.is_container()
    }

    fn set_open(&mut self, open: bool) {
        self.open = open && self.is_container();
    }

    fn clear_unused_fields_for_type(&mut self) {
        if self.is_container() {
            self.leaf = TraitLeafData::default();
        } else {
            self.open = false;
            self.container = TraitContainerData::default();
            if !self.leaf.can_level {
                self.leaf.levels = Fxp::ZERO;
                self.leaf.points_per_level = Fxp::ZERO;
            }
        }
        self.modifiers.clear_unused_fields();
    }

    fn owner(&self) -> Option<&SheetRef> {
        self.owner.as_ref()
    }

    fn set_owner(&mut self, owner: Option<SheetRef>) {
        self.modifiers.set_owning_entity(owner.clone());
        self.owner = owner;
    }

    fn regenerate_ids(&mut self) {
        self.id = Tid::new(self.kind());
        self.modifiers.regenerate_ids();
    }

    fn fill_nameable_keys(&self, keys: &mut NameableKeys) {
        if self.is_container() || self.disabled {
            return;
        }
        nameables::extract(&self.name, keys);
        nameables::extract(&self.local_notes, keys);
        nameables::extract(&self.user_desc, keys);
        if let Some(prereqs) = &self.leaf.prereqs {
            prereqs.fill_nameable_keys(keys);
        }
        for feature in &self.leaf.features {
            feature.fill_nameable_keys(keys);
        }
        for weapon in &self.leaf.weapons {
            weapon.fill_nameable_keys(keys);
        }
        self.modifiers.fill_with_nameable_keys(keys);
    }

    fn apply_nameable_keys(&mut self, keys: &NameableKeys) {
        if self.is_container() || self.disabled {
            return;
        }
        nameables::apply_in_place(&mut self.name, keys);
        nameables::apply_in_place(&mut self.local_notes, keys);
        nameables::apply_in_place(&mut self.user_desc, keys);
        if let Some(prereqs) = &mut self.leaf.prereqs {
            prereqs.apply_nameable_keys(keys);
        }
        for feature in &mut self.leaf.features {
            feature.apply_nameable_keys(keys);
        }
        for weapon in &mut self.leaf.weapons {
            weapon.apply_nameable_keys(keys);
        }
        self.modifiers.apply_nameable_keys(keys);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::modifier::CostType;
    use crate::sheet::Sheet;

    fn leveled(name: &str, levels: i64) -> Trait {
        let mut t = Trait::new_node(false);
        t.name = name.into();
        t.leaf.can_level = true;
        t.leaf.levels = Fxp::from_int(levels);
        t.leaf.points_per_level = Fxp::from_int(5);
        t
    }

    #[test]
    fn display_includes_levels_only_when_leveled() {
        let mut t = leveled("Acute Vision", 3);
        assert_eq!(t.to_string(), "Acute Vision 3");
        t.leaf.can_level = false;
        assert_eq!(t.to_string(), "Acute Vision");
    }

    #[test]
    fn clearing_fields_follows_container_ness() {
        let mut t = leveled("Fit", 2);
        t.container.container_type = ContainerType::MetaTrait;
        t.clear_unused_fields_for_type();
        assert_eq!(t.container, TraitContainerData::default());
        assert_eq!(t.leaf.levels, Fxp::from_int(2));

        t.leaf.can_level = false;
        t.clear_unused_fields_for_type();
        assert_eq!(t.leaf.levels, Fxp::ZERO);
        assert_eq!(t.leaf.points_per_level, Fxp::ZERO);

        t.set_id(t.id().to_container());
        t.leaf.base_points = Fxp::from_int(10);
        t.clear_unused_fields_for_type();
        assert_eq!(t.leaf, TraitLeafData::default());
    }

    #[test]
    fn owner_and_ids_reach_modifiers() {
        let mut t = leveled("Magery", 1);
        let m = t.modifiers.insert(None, false).unwrap();
        t.set_owner(Some(Sheet::new("Wizard").into_shared()));
        assert!(t.modifiers.node(m).unwrap().owner().is_some());

        let before = t.modifiers.node(m).unwrap().id;
        t.regenerate_ids();
        let after = t.modifiers.node(m).unwrap().id;
        assert_ne!(before, after);
        assert_eq!(before.kind(), after.kind());
    }

    #[test]
    fn nameable_keys_cover_modifiers_and_payloads() {
        let mut t = leveled("Enemy (@Who@)", 1);
        t.user_desc = "Hunted by @Who@".into();
        let m = t.modifiers.insert(None, false).unwrap();
        {
            let modifier = t.modifiers.node_mut(m).unwrap();
            modifier.name = "Watched by @Agency@".into();
            modifier.leaf.cost_type = CostType::Points;
        }
        let off = t.modifiers.insert(None, false).unwrap();
        t.modifiers.node_mut(off).unwrap().name = "@Ignored@".into();
        t.modifiers.node_mut(off).unwrap().set_enabled(false);

        let mut keys = NameableKeys::new();
        t.fill_nameable_keys(&mut keys);
        assert_eq!(keys.keys().collect::<Vec<_>>(), vec!["Agency", "Who"]);

        keys.insert("Who".into(), "the Mafia".into());
        t.apply_nameable_keys(&keys);
        assert_eq!(t.name, "Enemy (the Mafia)");
        assert_eq!(t.user_desc, "Hunted by the Mafia");
        assert_eq!(t.modifiers.node(m).unwrap().name, "Watched by @Agency@");
        assert_eq!(
            t.active_modifier_for("watched by @agency@").map(|m| m.id),
            Some(t.modifiers.node(m).unwrap().id)
        );

        t.disabled = true;
        let mut none = NameableKeys::new();
        t.fill_nameable_keys(&mut none);
        assert!(none.is_empty());
    }
}

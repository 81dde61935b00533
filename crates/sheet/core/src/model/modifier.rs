use std::fmt;

use serde_json::{Map, Value};

use crate::fxp::Fxp;
use crate::nameables::{self, NameableKeys};
use crate::settings::DisplayTarget;
use crate::sheet::{self, SheetRef};
use crate::tid::{EntityKind, KindFamily, Tid};
use crate::tree::Node;

use super::is_false;
use super::payload::Feature;

/// How a modifier's `cost` is applied.
///
/// Keys not recognized on load are preserved so that saving writes them back
/// unchanged; such modifiers are treated as percentages.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CostType {
    #[default]
    Percentage,
    Points,
    Multiplier,
    Unrecognized(String),
}

impl CostType {
    pub fn key(&self) -> &str {
        match self {
            Self::Percentage => "percentage",
            Self::Points => "points",
            Self::Multiplier => "multiplier",
            Self::Unrecognized(key) => key,
        }
    }

    pub const fn is_percentage(&self) -> bool {
        matches!(self, Self::Percentage)
    }

    /// Text shown next to the cost value.
    pub const fn suffix(&self) -> &'static str {
        match self {
            Self::Percentage | Self::Unrecognized(_) => "%",
            Self::Points => "",
            Self::Multiplier => "×",
        }
    }
}

impl From<String> for CostType {
    fn from(key: String) -> Self {
        match key.as_str() {
            "" | "percentage" => Self::Percentage,
            "points" => Self::Points,
            "multiplier" => Self::Multiplier,
            _ => {
                tracing::warn!(cost_type = %key, "unrecognized modifier cost type, treating as percentage");
                Self::Unrecognized(key)
            }
        }
    }
}

impl From<CostType> for String {
    fn from(cost_type: CostType) -> Self {
        match cost_type {
            CostType::Unrecognized(key) => key,
            other => other.key().to_string(),
        }
    }
}

/// Which part of a leveled trait's cost a modifier changes.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    serde::Serialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Affects {
    #[default]
    Total,
    BaseOnly,
    LevelsOnly,
}

deserialize_key_or_default!(Affects);

impl Affects {
    pub const fn is_total(&self) -> bool {
        matches!(self, Self::Total)
    }

    pub const fn touches_base(self) -> bool {
        matches!(self, Self::Total | Self::BaseOnly)
    }

    pub const fn touches_levels(self) -> bool {
        matches!(self, Self::Total | Self::LevelsOnly)
    }

    /// Qualifier appended to cost descriptions; empty for `Total`.
    pub const fn alt_string(self) -> &'static str {
        match self {
            Self::Total => "",
            Self::BaseOnly => "(base only)",
            Self::LevelsOnly => "(levels only)",
        }
    }
}

/// Fields that only apply to modifier leaves.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TraitModifierLeafData {
    #[serde(skip_serializing_if = "Fxp::is_zero_ref")]
    pub cost: Fxp,
    #[serde(skip_serializing_if = "Fxp::is_zero_ref")]
    pub levels: Fxp,
    #[serde(skip_serializing_if = "Affects::is_total")]
    pub affects: Affects,
    #[serde(skip_serializing_if = "CostType::is_percentage")]
    pub cost_type: CostType,
    #[serde(skip_serializing_if = "is_false")]
    pub disabled: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<Feature>,
}

/// An enhancement or limitation attached to a trait.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct TraitModifier {
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
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(flatten)]
    pub leaf: TraitModifierLeafData,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub third_party: Map<String, Value>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub open: bool,
    #[serde(skip)]
    owner: Option<SheetRef>,
}

impl TraitModifier {
    /// Cost scaled by levels when the modifier is leveled.
    pub fn cost_modifier(&self) -> Fxp {
        if self.leaf.levels > Fxp::ZERO {
            self.leaf.cost * self.leaf.levels
        } else {
            self.leaf.cost
        }
    }

    pub fn is_leveled(&self) -> bool {
        !self.is_container() && self.leaf.cost_type.is_percentage() && self.leaf.levels > Fxp::ZERO
    }

    pub fn current_level(&self) -> Fxp {
        if self.is_self_enabled() && self.is_leveled() {
            self.leaf.levels
        } else {
            Fxp::ZERO
        }
    }

    /// Formatted cost: `+50%`, `-10% (base only)`, `+5`, `×2`. Empty for
    /// containers.
    pub fn cost_description(&self) -> String {
        if self.is_container() {
            return String::new();
        }
        let leaf = &self.leaf;
        let mut text = match &leaf.cost_type {
            CostType::Percentage => format!("{}%", self.cost_modifier_for_display().string_with_sign()),
            CostType::Points => leaf.cost.string_with_sign(),
            CostType::Multiplier => return format!("×{}", leaf.cost),
            CostType::Unrecognized(key) => {
                tracing::warn!(modifier = %self.id, cost_type = %key, "unknown cost type");
                format!("{}%", leaf.cost.string_with_sign())
            }
        };
        let qualifier = leaf.affects.alt_string();
        if !qualifier.is_empty() {
            text.push(' ');
            text.push_str(qualifier);
        }
        text
    }

    fn cost_modifier_for_display(&self) -> Fxp {
        if self.is_leveled() {
            self.leaf.cost * self.leaf.levels
        } else {
            self.leaf.cost
        }
    }

    /// Name and notes, plus the cost in brackets when the owner's settings
    /// ask for it.
    pub fn full_description(&self) -> String {
        let mut text = self.to_string();
        if !self.local_notes.is_empty() {
            text.push_str(&format!(" ({})", self.local_notes));
        }
        if sheet::settings_for(self.owner()).show_trait_modifier_adj {
            text.push_str(&format!(" [{}]", self.cost_description()));
        }
        text
    }

    pub fn secondary_text(&self, target: DisplayTarget) -> String {
        if sheet::settings_for(self.owner()).notes_display.shows(target) {
            self.local_notes.clone()
        } else {
            String::new()
        }
    }
}

impl fmt::Display for TraitModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if self.is_leveled() {
            write!(f, " {}", self.leaf.levels)?;
        }
        Ok(())
    }
}

impl Node for TraitModifier {
    const FAMILY: KindFamily = KindFamily::TraitModifier;

    fn new_node(container: bool) -> Self {
        let kind = EntityKind::new(Self::FAMILY, container);
        Self {
            id: Tid::new(kind),
            name: kind.label().to_string(),
            page_ref: String::new(),
            page_ref_highlight: String::new(),
            local_notes: String::new(),
            vtt_notes: String::new(),
            tags: Vec::new(),
            leaf: TraitModifierLeafData::default(),
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

    // Containers are always enabled.
    fn is_self_enabled(&self) -> bool {
        !self.leaf.disabled || self.is_container()
    }

    fn set_enabled(&mut self, enabled: bool) {
        if !self.is_container() {
            self.leaf.disabled = !enabled;
        }
    }

    fn is_open(&self) -> bool {
        self.open && self.is_container()
    }

    fn set_open(&mut self, open: bool) {
        self.open = open && self.is_container();
    }

    fn clear_unused_fields_for_type(&mut self) {
        if self.is_container() {
            self.leaf = TraitModifierLeafData::default();
        } else {
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
        if self.is_container() || !self.is_self_enabled() {
            return;
        }
        nameables::extract(&self.name, keys);
        nameables::extract(&self.local_notes, keys);
        for feature in &self.leaf.features {
            feature.fill_nameable_keys(keys);
        }
    }

    fn apply_nameable_keys(&mut self, keys: &NameableKeys) {
        if self.is_container() || !self.is_self_enabled() {
            return;
        }
        nameables::apply_in_place(&mut self.name, keys);
        nameables::apply_in_place(&mut self.local_notes, keys);
        for feature in &mut self.leaf.features {
            feature.apply_nameable_keys(keys);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SheetSettings;
    use crate::sheet::Sheet;

    fn modifier(cost: i64, cost_type: CostType, affects: Affects) -> TraitModifier {
        let mut m = TraitModifier::new_node(false);
        m.name = "Mod".into();
        m.leaf.cost = Fxp::from_int(cost);
        m.leaf.cost_type = cost_type;
        m.leaf.affects = affects;
        m
    }

    #[test]
    fn cost_descriptions() {
        assert_eq!(modifier(50, CostType::Percentage, Affects::Total).cost_description(), "+50%");
        assert_eq!(
            modifier(-10, CostType::Percentage, Affects::BaseOnly).cost_description(),
            "-10% (base only)"
        );
        assert_eq!(
            modifier(5, CostType::Points, Affects::LevelsOnly).cost_description(),
            "+5 (levels only)"
        );
        assert_eq!(modifier(2, CostType::Multiplier, Affects::BaseOnly).cost_description(), "×2");
        assert_eq!(
            modifier(15, CostType::Unrecognized("fancy".into()), Affects::Total).cost_description(),
            "+15%"
        );
        assert_eq!(TraitModifier::new_node(true).cost_description(), "");
    }

    #[test]
    fn leveled_percentage_multiplies_cost() {
        let mut m = modifier(10, CostType::Percentage, Affects::Total);
        m.leaf.levels = Fxp::from_int(3);
        assert_eq!(m.cost_modifier(), Fxp::from_int(30));
        assert_eq!(m.cost_description(), "+30%");
        assert_eq!(m.to_string(), "Mod 3");
        assert_eq!(m.current_level(), Fxp::from_int(3));
        m.set_enabled(false);
        assert_eq!(m.current_level(), Fxp::ZERO);
    }

    #[test]
    fn full_description_honors_owner_settings() {
        let mut m = modifier(-20, CostType::Percentage, Affects::Total);
        m.local_notes = "Only at night".into();
        assert_eq!(m.full_description(), "Mod (Only at night)");

        let settings = SheetSettings {
            show_trait_modifier_adj: true,
            ..SheetSettings::default()
        };
        m.set_owner(Some(Sheet::new("x").with_settings(settings).into_shared()));
        assert_eq!(m.full_description(), "Mod (Only at night) [-20%]");
        assert_eq!(m.secondary_text(DisplayTarget::Inline), "Only at night");
        assert_eq!(m.secondary_text(DisplayTarget::Tooltip), "");
    }

    #[test]
    fn containers_are_always_enabled_and_lose_leaf_fields() {
        let mut m = modifier(25, CostType::Points, Affects::Total);
        m.set_enabled(false);
        m.set_id(m.id().to_container());
        m.clear_unused_fields_for_type();
        assert!(m.is_self_enabled());
        assert_eq!(m.leaf, TraitModifierLeafData::default());
    }

    #[test]
    fn unknown_cost_type_key_survives_serde() {
        let json = serde_json::json!({
            "id": Tid::new(EntityKind::TraitModifier).to_string(),
            "name": "Odd",
            "cost": 5,
            "cost_type": "per_die",
        });
        let m: TraitModifier = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(m.leaf.cost_type, CostType::Unrecognized("per_die".into()));
        assert_eq!(serde_json::to_value(&m).unwrap(), json);
    }
}

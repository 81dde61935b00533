/// How a trait container combines its children.
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
pub enum ContainerType {
    /// Plain grouping: the cost is the sum of the children.
    #[default]
    Group,
    /// Only the most expensive child is paid in full; the others cost 20%.
    AlternativeAbilities,
    #[strum(to_string = "ancestry", serialize = "race")]
    Ancestry,
    Attributes,
    MetaTrait,
}

deserialize_key_or_default!(ContainerType);

impl ContainerType {
    pub const fn is_group(&self) -> bool {
        matches!(self, Self::Group)
    }

    /// Short tag shown inline next to the container's name.
    pub const fn inline_tag(self) -> Option<&'static str> {
        match self {
            Self::Group => None,
            Self::AlternativeAbilities => Some("Alternate"),
            Self::Ancestry => Some("Ancestry"),
            Self::Attributes => Some("Attribute"),
            Self::MetaTrait => Some("Meta"),
        }
    }
}

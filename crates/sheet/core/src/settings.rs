/// Where a piece of secondary text is shown.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    serde::Serialize,
    serde::Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum DisplayOption {
    NotShown,
    #[default]
    Inline,
    Tooltip,
    InlineAndTooltip,
}

/// The two places a collaborator renders secondary text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DisplayTarget {
    Inline,
    Tooltip,
}

impl DisplayOption {
    pub const fn inline(self) -> bool {
        matches!(self, Self::Inline | Self::InlineAndTooltip)
    }

    pub const fn tooltip(self) -> bool {
        matches!(self, Self::Tooltip | Self::InlineAndTooltip)
    }

    pub const fn shows(self, target: DisplayTarget) -> bool {
        match target {
            DisplayTarget::Inline => self.inline(),
            DisplayTarget::Tooltip => self.tooltip(),
        }
    }
}

/// Per-sheet switches that influence computed values and display text.
///
/// Cost computation never reads these from global state: callers pass them
/// explicitly, or tree helpers take them from the node's owning sheet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SheetSettings {
    /// Apply enhancements and limitations as two multiplicative steps instead
    /// of summing them into a single percentage.
    pub use_multiplicative_modifiers: bool,
    /// Append `[cost]` to modifier descriptions.
    pub show_trait_modifier_adj: bool,
    pub notes_display: DisplayOption,
    pub modifiers_display: DisplayOption,
    pub user_description_display: DisplayOption,
}

impl SheetSettings {
    pub fn new() -> Self {
        Self {
            use_multiplicative_modifiers: false,
            show_trait_modifier_adj: false,
            notes_display: DisplayOption::Inline,
            modifiers_display: DisplayOption::Inline,
            user_description_display: DisplayOption::Tooltip,
        }
    }

    pub fn with_multiplicative_modifiers(mut self, enabled: bool) -> Self {
        self.use_multiplicative_modifiers = enabled;
        self
    }
}

impl Default for SheetSettings {
    fn default() -> Self {
        Self::new()
    }
}

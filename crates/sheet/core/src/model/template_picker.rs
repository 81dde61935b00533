use crate::fxp::Fxp;

/// What a template's chooser counts.
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
pub enum TemplatePickerType {
    #[default]
    NotApplicable,
    Count,
    Points,
}

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
pub enum NumericComparison {
    #[default]
    Any,
    Is,
    IsNot,
    AtLeast,
    AtMost,
}

deserialize_key_or_default!(TemplatePickerType, NumericComparison);

/// A comparison against a number, e.g. "at least 10".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct NumericCriteria {
    pub compare: NumericComparison,
    #[serde(skip_serializing_if = "Fxp::is_zero_ref")]
    pub qualifier: Fxp,
}

impl NumericCriteria {
    pub fn matches(&self, value: Fxp) -> bool {
        match self.compare {
            NumericComparison::Any => true,
            NumericComparison::Is => value == self.qualifier,
            NumericComparison::IsNot => value != self.qualifier,
            NumericComparison::AtLeast => value >= self.qualifier,
            NumericComparison::AtMost => value <= self.qualifier,
        }
    }

    pub fn alt_string(&self) -> String {
        let qualifier = self.qualifier;
        match self.compare {
            NumericComparison::Any => "any".to_string(),
            NumericComparison::Is => format!("exactly {qualifier}"),
            NumericComparison::IsNot => format!("anything but {qualifier}"),
            NumericComparison::AtLeast => format!("at least {qualifier}"),
            NumericComparison::AtMost => format!("at most {qualifier}"),
        }
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// Selection rule for a trait container used inside a character template.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TemplatePicker {
    #[serde(rename = "type")]
    pub picker_type: TemplatePickerType,
    #[serde(skip_serializing_if = "NumericCriteria::is_default")]
    pub qualifier: NumericCriteria,
}

impl TemplatePicker {
    pub fn is_empty(&self) -> bool {
        self.picker_type == TemplatePickerType::NotApplicable && self.qualifier.is_default()
    }

    /// Instruction shown next to a template container, empty when unused.
    pub fn description(&self) -> String {
        let criteria = self.qualifier.alt_string();
        match self.picker_type {
            TemplatePickerType::NotApplicable => String::new(),
            TemplatePickerType::Count => format!("Pick {criteria} item(s)"),
            TemplatePickerType::Points => format!("Pick {criteria} point(s) worth"),
        }
    }
}

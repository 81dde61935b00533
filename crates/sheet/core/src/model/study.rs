//! Time spent studying toward a trait.

use crate::fxp::Fxp;

/// How the study hours were earned; each counts at a different rate.
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
pub enum StudyType {
    #[default]
    #[serde(rename = "self")]
    #[strum(serialize = "self")]
    SelfTaught,
    Job,
    Teacher,
    Intensive,
}

deserialize_key_or_default!(StudyType, StudyHoursNeeded);

impl StudyType {
    pub const fn multiplier(self) -> Fxp {
        match self {
            Self::SelfTaught => Fxp::from_ratio(1, 2),
            Self::Job => Fxp::from_ratio(1, 4),
            Self::Teacher => Fxp::ONE,
            Self::Intensive => Fxp::TWO,
        }
    }
}

/// Hours required before study turns into a point of improvement.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    serde::Serialize,
    strum::EnumString,
    strum::EnumIter,
)]
pub enum StudyHoursNeeded {
    #[default]
    #[serde(rename = "")]
    #[strum(serialize = "")]
    Standard,
    #[serde(rename = "180")]
    #[strum(serialize = "180")]
    Level1,
    #[serde(rename = "160")]
    #[strum(serialize = "160")]
    Level2,
    #[serde(rename = "140")]
    #[strum(serialize = "140")]
    Level3,
    #[serde(rename = "120")]
    #[strum(serialize = "120")]
    Level4,
}

impl StudyHoursNeeded {
    pub const fn is_standard(&self) -> bool {
        matches!(self, Self::Standard)
    }

    pub const fn hours(self) -> i64 {
        match self {
            Self::Standard => 200,
            Self::Level1 => 180,
            Self::Level2 => 160,
            Self::Level3 => 140,
            Self::Level4 => 120,
        }
    }
}

impl std::fmt::Display for StudyHoursNeeded {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.hours())
    }
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Study {
    #[serde(rename = "type")]
    pub study_type: StudyType,
    #[serde(default)]
    pub hours: Fxp,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub note: String,
}

/// Effective hours across all entries, after each type's rate.
pub fn resolve_study_hours(entries: &[Study]) -> Fxp {
    entries
        .iter()
        .map(|entry| entry.hours * entry.study_type.multiplier())
        .sum()
}

/// `Studied X of Y hours`, or empty when nothing was studied (unless forced).
pub fn study_hours_progress_text(hours: Fxp, needed: StudyHoursNeeded, force: bool) -> String {
    if hours <= Fxp::ZERO && !force {
        return String::new();
    }
    format!("Studied {hours} of {needed} hours")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(study_type: StudyType, hours: i64) -> Study {
        Study {
            study_type,
            hours: Fxp::from_int(hours),
            note: String::new(),
        }
    }

    #[test]
    fn hours_are_weighted_by_type() {
        // 100×0.5 + 40×0.25 + 10×1 + 5×2 = 50 + 10 + 10 + 10
        let entries = [
            entry(StudyType::SelfTaught, 100),
            entry(StudyType::Job, 40),
            entry(StudyType::Teacher, 10),
            entry(StudyType::Intensive, 5),
        ];
        assert_eq!(resolve_study_hours(&entries), Fxp::from_int(80));
        assert_eq!(
            study_hours_progress_text(Fxp::from_int(80), StudyHoursNeeded::Level2, false),
            "Studied 80 of 160 hours"
        );
        assert_eq!(study_hours_progress_text(Fxp::ZERO, StudyHoursNeeded::Standard, false), "");
    }

    #[test]
    fn study_serializes_with_short_keys() {
        let text = serde_json::to_string(&entry(StudyType::SelfTaught, 3)).unwrap();
        assert_eq!(text, r#"{"type":"self","hours":3}"#);
        let needed: StudyHoursNeeded = serde_json::from_str(r#""140""#).unwrap();
        assert_eq!(needed.hours(), 140);
    }
}

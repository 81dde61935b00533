//! Self-control rolls for traits with a behavioral component.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::fxp::Fxp;

/// How often the character resists the trait's urges (a 3d6 target number).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::EnumIter)]
pub enum SelfControlRoll {
    #[default]
    None,
    Cr6,
    Cr9,
    Cr12,
    Cr15,
}

impl SelfControlRoll {
    pub const fn value(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Cr6 => 6,
            Self::Cr9 => 9,
            Self::Cr12 => 12,
            Self::Cr15 => 15,
        }
    }

    pub const fn from_value(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::None),
            6 => Some(Self::Cr6),
            9 => Some(Self::Cr9),
            12 => Some(Self::Cr12),
            15 => Some(Self::Cr15),
            _ => None,
        }
    }

    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Cost multiplier seeding the modifier fold.
    pub const fn multiplier(self) -> Fxp {
        match self {
            Self::None | Self::Cr12 => Fxp::ONE,
            Self::Cr6 => Fxp::TWO,
            Self::Cr9 => Fxp::from_ratio(3, 2),
            Self::Cr15 => Fxp::from_ratio(1, 2),
        }
    }

    /// Penalty used by the adjustment descriptions.
    pub const fn penalty(self) -> i64 {
        match self {
            Self::Cr6 => -3,
            Self::Cr9 => -2,
            Self::Cr12 => -1,
            Self::None | Self::Cr15 => 0,
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::None => "None Required",
            Self::Cr6 => "Resist rarely",
            Self::Cr9 => "Resist fairly often",
            Self::Cr12 => "Resist quite often",
            Self::Cr15 => "Resist almost all the time",
        }
    }
}

impl std::fmt::Display for SelfControlRoll {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => f.write_str(self.description()),
            _ => write!(f, "CR: {} ({})", self.value(), self.description()),
        }
    }
}

impl Serialize for SelfControlRoll {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.value())
    }
}

impl<'de> Deserialize<'de> for SelfControlRoll {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = i64::deserialize(deserializer)?;
        Ok(u8::try_from(value)
            .ok()
            .and_then(Self::from_value)
            .unwrap_or_else(|| {
                tracing::warn!(value, "unknown self-control roll, using none");
                Self::None
            }))
    }
}

/// Situational mitigator attached to a self-control roll.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SelfControlAdjustment {
    #[default]
    None,
    ActionPenalty,
    ReactionPenalty,
    FrightCheckPenalty,
    FrightCheckBonus,
    MinorCostOfLivingIncrease,
    MajorCostOfLivingIncrease,
}

deserialize_key_or_default!(SelfControlAdjustment);

impl SelfControlAdjustment {
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Text describing the adjustment at the given roll.
    pub fn description(self, roll: SelfControlRoll) -> String {
        if roll.is_none() {
            return String::new();
        }
        let penalty = roll.penalty();
        match self {
            Self::None => String::new(),
            Self::ActionPenalty => format!("{penalty} Action Penalty"),
            Self::ReactionPenalty => format!("{penalty} Reaction Penalty"),
            Self::FrightCheckPenalty => format!("{penalty} Fright Check Penalty"),
            Self::FrightCheckBonus => format!("+{} Fright Check Bonus", -penalty),
            Self::MinorCostOfLivingIncrease => {
                format!("+{}% Cost of Living Increase", 5 * -penalty)
            }
            Self::MajorCostOfLivingIncrease => {
                // Doubles for each step of penalty beyond the first.
                let percent = if penalty == 0 { 0 } else { 10 << (-penalty - 1) };
                format!("+{percent}% Cost of Living Increase")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multipliers_follow_frequency() {
        assert_eq!(SelfControlRoll::None.multiplier(), Fxp::ONE);
        assert_eq!(SelfControlRoll::Cr6.multiplier(), Fxp::TWO);
        assert_eq!(SelfControlRoll::Cr9.multiplier().to_string(), "1.5");
        assert_eq!(SelfControlRoll::Cr12.multiplier(), Fxp::ONE);
        assert_eq!(SelfControlRoll::Cr15.multiplier().to_string(), "0.5");
    }

    #[test]
    fn rolls_serialize_as_numbers() {
        assert_eq!(serde_json::to_string(&SelfControlRoll::Cr9).unwrap(), "9");
        let roll: SelfControlRoll = serde_json::from_str("12").unwrap();
        assert_eq!(roll, SelfControlRoll::Cr12);
        let odd: SelfControlRoll = serde_json::from_str("7").unwrap();
        assert_eq!(odd, SelfControlRoll::None);
        assert_eq!(SelfControlRoll::Cr12.to_string(), "CR: 12 (Resist quite often)");
    }

    #[test]
    fn adjustment_descriptions_scale_with_roll() {
        let roll = SelfControlRoll::Cr9;
        assert_eq!(SelfControlAdjustment::ActionPenalty.description(roll), "-2 Action Penalty");
        assert_eq!(SelfControlAdjustment::FrightCheckBonus.description(roll), "+2 Fright Check Bonus");
        // 5 × 2 and 10 × 2^(2-1)
        assert_eq!(
            SelfControlAdjustment::MinorCostOfLivingIncrease.description(roll),
            "+10% Cost of Living Increase"
        );
        assert_eq!(
            SelfControlAdjustment::MajorCostOfLivingIncrease.description(roll),
            "+20% Cost of Living Increase"
        );
        assert_eq!(SelfControlAdjustment::ActionPenalty.description(SelfControlRoll::None), "");
    }
}

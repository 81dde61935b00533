//! Ancestry definitions used to randomize a character's description.
//!
//! Height, weight and age formulas are kept verbatim for the sheet's
//! expression evaluator; only the weighted text options are resolved here.

use rand::Rng;
use rand::seq::SliceRandom;

pub const DEFAULT_ANCESTRY: &str = "Human";
pub const DEFAULT_HAIR: &str = "Brown";
pub const DEFAULT_EYES: &str = "Brown";
pub const DEFAULT_SKIN: &str = "Brown";
pub const DEFAULT_HANDEDNESS: &str = "Right";

/// A choice with a relative likelihood.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct WeightedOption<T> {
    #[serde(default)]
    pub weight: u32,
    pub value: T,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AncestryOptions {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub height_formula: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub weight_formula: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub age_formula: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hair_options: Vec<WeightedOption<String>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub eye_options: Vec<WeightedOption<String>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skin_options: Vec<WeightedOption<String>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub handedness_options: Vec<WeightedOption<String>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub name_generators: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Ancestry {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub common_options: Option<AncestryOptions>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub gender_options: Vec<WeightedOption<AncestryOptions>>,
}

/// Picks a weighted value, avoiding `not` when any other choice exists.
pub fn choose_weighted<'a, T, R>(
    options: &'a [WeightedOption<T>],
    not: impl Fn(&T) -> bool,
    rng: &mut R,
) -> Option<&'a T>
where
    R: Rng + ?Sized,
{
    let preferred: Vec<&WeightedOption<T>> = options
        .iter()
        .filter(|option| option.weight > 0 && !not(&option.value))
        .collect();
    let candidates = if preferred.is_empty() {
        options.iter().filter(|option| option.weight > 0).collect()
    } else {
        preferred
    };
    candidates
        .choose_weighted(rng, |option| option.weight)
        .ok()
        .copied()
        .map(|option| &option.value)
}

impl Ancestry {
    /// Options for `gender`, matched case-insensitively.
    pub fn gendered_options(&self, gender: &str) -> Option<&AncestryOptions> {
        let gender = gender.trim();
        self.gender_options
            .iter()
            .map(|option| &option.value)
            .find(|options| options.name.eq_ignore_ascii_case(gender))
    }

    /// A gender other than `not` if possible; empty when none are defined.
    pub fn random_gender<R: Rng + ?Sized>(&self, not: &str, rng: &mut R) -> String {
        choose_weighted(&self.gender_options, |options| options.name == not, rng)
            .map(|options| options.name.clone())
            .unwrap_or_default()
    }

    pub fn random_hair<R: Rng + ?Sized>(&self, gender: &str, not: &str, rng: &mut R) -> String {
        self.random_text(gender, not, |options| &options.hair_options, rng)
            .unwrap_or_else(|| DEFAULT_HAIR.to_string())
    }

    pub fn random_eyes<R: Rng + ?Sized>(&self, gender: &str, not: &str, rng: &mut R) -> String {
        self.random_text(gender, not, |options| &options.eye_options, rng)
            .unwrap_or_else(|| DEFAULT_EYES.to_string())
    }

    pub fn random_skin<R: Rng + ?Sized>(&self, gender: &str, not: &str, rng: &mut R) -> String {
        self.random_text(gender, not, |options| &options.skin_options, rng)
            .unwrap_or_else(|| DEFAULT_SKIN.to_string())
    }

    pub fn random_handedness<R: Rng + ?Sized>(&self, gender: &str, not: &str, rng: &mut R) -> String {
        self.random_text(gender, not, |options| &options.handedness_options, rng)
            .unwrap_or_else(|| DEFAULT_HANDEDNESS.to_string())
    }

    /// Gender-specific options win over common ones when non-empty.
    fn random_text<R, F>(&self, gender: &str, not: &str, select: F, rng: &mut R) -> Option<String>
    where
        R: Rng + ?Sized,
        F: Fn(&AncestryOptions) -> &Vec<WeightedOption<String>>,
    {
        let list = self
            .gendered_options(gender)
            .map(&select)
            .filter(|list| !list.is_empty())
            .or_else(|| self.common_options.as_ref().map(&select))
            .filter(|list| !list.is_empty())?;
        choose_weighted(list, |value| value == not, rng).cloned()
    }
}

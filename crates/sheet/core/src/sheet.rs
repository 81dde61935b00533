//! The owning sheet (character) of a set of entity lists.
//!
//! Every node carries an optional shared reference to its [`Sheet`], set by
//! propagation from the top of a tree (`set_owning_entity`). The sheet supplies
//! the [`SheetSettings`] used by cost and display helpers and the variables that
//! embedded `||expr||` expressions in notes resolve against.

use std::collections::BTreeMap;
use std::sync::{Arc, LazyLock};

use regex::{Captures, Regex};

use crate::fxp::Fxp;
use crate::settings::SheetSettings;

/// Shared handle to an owning sheet.
pub type SheetRef = Arc<Sheet>;

static EMBEDDED_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\|\|([^|]+)\|\|").expect("embedded pattern is valid"));

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Sheet {
    pub name: String,
    pub settings: SheetSettings,
    /// Values addressable from notes as `||$name||` (names are lower case).
    pub variables: BTreeMap<String, Fxp>,
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_settings(mut self, settings: SheetSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_variable(mut self, name: &str, value: Fxp) -> Self {
        self.variables.insert(name.to_lowercase(), value);
        self
    }

    pub fn into_shared(self) -> SheetRef {
        Arc::new(self)
    }

    /// Evaluates the body of an embedded expression: a `$variable` or a number.
    pub fn embedded_eval(&self, expression: &str) -> Option<String> {
        let expression = expression.trim();
        if let Some(name) = expression.strip_prefix('$') {
            return self
                .variables
                .get(&name.trim().to_lowercase())
                .map(ToString::to_string);
        }
        expression.parse::<Fxp>().ok().map(|value| value.to_string())
    }

    /// Replaces each `||expr||` in `text` with its value. Unresolvable
    /// expressions are left verbatim.
    pub fn resolve_embedded(&self, text: &str) -> String {
        if !text.contains("||") {
            return text.to_string();
        }
        EMBEDDED_PATTERN
            .replace_all(text, |captures: &Captures<'_>| {
                self.embedded_eval(&captures[1]).unwrap_or_else(|| {
                    tracing::warn!(
                        sheet = %self.name,
                        expression = &captures[1],
                        "unable to resolve embedded expression"
                    );
                    captures[0].to_string()
                })
            })
            .into_owned()
    }
}

/// Settings of an optional owner, falling back to defaults.
pub fn settings_for(owner: Option<&SheetRef>) -> SheetSettings {
    owner.map(|sheet| sheet.settings).unwrap_or_default()
}

/// Resolves embedded expressions when an owner is present.
pub fn resolve_embedded(owner: Option<&SheetRef>, text: &str) -> String {
    match owner {
        Some(sheet) => sheet.resolve_embedded(text),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_expressions_resolve_variables_and_numbers() {
        let sheet = Sheet::new("Dai").with_variable("ST", Fxp::from_int(12));
        assert_eq!(
            sheet.resolve_embedded("Lifts ||$st|| × 2, range ||1.50||"),
            "Lifts 12 × 2, range 1.5"
        );
        assert_eq!(sheet.resolve_embedded("||$dx||"), "||$dx||");
        assert_eq!(sheet.resolve_embedded("plain"), "plain");
    }

    #[test]
    fn missing_owner_leaves_text_and_uses_default_settings() {
        assert_eq!(resolve_embedded(None, "||$st||"), "||$st||");
        assert_eq!(settings_for(None), SheetSettings::default());
        let owner = Sheet::new("x")
            .with_settings(SheetSettings::new().with_multiplicative_modifiers(true))
            .into_shared();
        assert!(settings_for(Some(&owner)).use_multiplicative_modifiers);
    }
}

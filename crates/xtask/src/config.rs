//! Sheet configuration read from the environment.
use std::env;

use sheet_core::{DisplayOption, Fxp, Sheet, SheetRef, SheetSettings};

/// Owning-sheet data applied to every list the commands load.
#[derive(Clone, Debug, Default)]
pub struct SheetConfig {
    pub name: String,
    pub settings: SheetSettings,
    pub variables: Vec<(String, Fxp)>,
}

impl SheetConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `SHEET_NAME` - Name of the owning sheet (default: empty)
    /// - `SHEET_MULTIPLICATIVE_MODIFIERS` - Apply limitations after enhancements (default: false)
    /// - `SHEET_SHOW_MODIFIER_ADJ` - Append `[cost]` to modifier descriptions (default: false)
    /// - `SHEET_NOTES_DISPLAY` - `not_shown`, `inline`, `tooltip` or `inline_and_tooltip` (default: inline)
    /// - `SHEET_MODIFIERS_DISPLAY` - Same values (default: inline)
    /// - `SHEET_USER_DESCRIPTION_DISPLAY` - Same values (default: tooltip)
    /// - `SHEET_VARIABLES` - `name=value` pairs separated by commas, for `||$name||` in notes
    pub fn from_env() -> Self {
        let mut config = Self {
            name: env::var("SHEET_NAME").unwrap_or_default(),
            ..Self::default()
        };

        if let Some(enable) = read_env::<bool>("SHEET_MULTIPLICATIVE_MODIFIERS") {
            config.settings.use_multiplicative_modifiers = enable;
        }
        if let Some(enable) = read_env::<bool>("SHEET_SHOW_MODIFIER_ADJ") {
            config.settings.show_trait_modifier_adj = enable;
        }

        if let Some(option) = read_env::<DisplayOption>("SHEET_NOTES_DISPLAY") {
            config.settings.notes_display = option;
        }
        if let Some(option) = read_env::<DisplayOption>("SHEET_MODIFIERS_DISPLAY") {
            config.settings.modifiers_display = option;
        }
        if let Some(option) = read_env::<DisplayOption>("SHEET_USER_DESCRIPTION_DISPLAY") {
            config.settings.user_description_display = option;
        }

        if let Ok(pairs) = env::var("SHEET_VARIABLES") {
            config.variables = parse_variables(&pairs);
        }

        config
    }

    /// Shared sheet to install as the owner of loaded lists.
    pub fn sheet(&self) -> SheetRef {
        let mut sheet = Sheet::new(self.name.clone()).with_settings(self.settings);
        for (name, value) in &self.variables {
            sheet = sheet.with_variable(name, *value);
        }
        sheet.into_shared()
    }
}

fn parse_variables(pairs: &str) -> Vec<(String, Fxp)> {
    pairs
        .split(',')
        .filter_map(|pair| {
            let (name, value) = pair.split_once('=')?;
            match value.trim().parse::<Fxp>() {
                Ok(value) => Some((name.trim().to_owned(), value)),
                Err(_) => {
                    tracing::warn!(variable = name.trim(), "ignoring non-numeric sheet variable");
                    None
                }
            }
        })
        .collect()
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variables_parse_and_skip_garbage() {
        let vars = parse_variables("gold = 12, range=30.5,broken,name=abc");
        assert_eq!(
            vars,
            vec![
                ("gold".to_owned(), Fxp::from_int(12)),
                ("range".to_owned(), Fxp::from_ratio(61, 2)),
            ]
        );
    }
}

//! Homepage hero text, looked up from the template configuration.

use std::collections::HashMap;
use serde::{Deserialize, Serialize};

pub const WEBSITE_NAME_KEY: &str = "website-name";
pub const ACTION_STATEMENT_KEY: &str = "action-statement";

pub const DEFAULT_WEBSITE_NAME: &str = "Website Name";
pub const DEFAULT_ACTION_STATEMENT: &str = "Action Statement";
pub const DEFAULT_COLOR: &str = "black";

const BUILTIN_TEMPLATE: &str = r#"{
  "website-name": { "value": "EasyCreate", "color": "text-green-500" },
  "action-statement": { "value": "The Best AI SITE", "color": "text-red-500" }
}"#;

/// One configurable display entry: text plus a color token.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigEntry {
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

/// Template configuration keyed by entry name. Read-only.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiteConfig(HashMap<String, ConfigEntry>);

impl SiteConfig {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> { serde_json::from_str(raw) }

    pub fn builtin() -> Self {
        // The literal above is checked by test_builtin_template.
        Self::from_json(BUILTIN_TEMPLATE).unwrap_or_default()
    }

    pub fn get(&self, key: &str) -> Option<&ConfigEntry> { self.0.get(key) }

    fn text_or(&self, key: &str, fallback: &str) -> String {
        self.get(key)
            .and_then(|e| e.value.as_deref())
            .filter(|v| !v.is_empty())
            .unwrap_or(fallback)
            .to_string()
    }

    fn color_or_default(&self, key: &str) -> String {
        self.get(key)
            .and_then(|e| e.color.as_deref())
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_COLOR)
            .to_string()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HeroInformation {
    pub name: String,
    pub name_color: String,
    pub statement: String,
    pub statement_color: String,
}

impl HeroInformation {
    /// Each field falls back on its own when its entry, or the whole source, is missing.
    pub fn resolve(config: Option<&SiteConfig>) -> Self {
        let empty = SiteConfig::default();
        let config = config.unwrap_or(&empty);
        Self {
            name: config.text_or(WEBSITE_NAME_KEY, DEFAULT_WEBSITE_NAME),
            name_color: config.color_or_default(WEBSITE_NAME_KEY),
            statement: config.text_or(ACTION_STATEMENT_KEY, DEFAULT_ACTION_STATEMENT),
            statement_color: config.color_or_default(ACTION_STATEMENT_KEY),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_template() {
        let hero = HeroInformation::resolve(Some(&SiteConfig::builtin()));
        assert_eq!(hero, HeroInformation {
            name: "EasyCreate".into(),
            name_color: "text-green-500".into(),
            statement: "The Best AI SITE".into(),
            statement_color: "text-red-500".into(),
        });
    }

    #[test]
    fn test_missing_source_uses_all_defaults() {
        let hero = HeroInformation::resolve(None);
        assert_eq!(hero.name, DEFAULT_WEBSITE_NAME);
        assert_eq!(hero.statement, DEFAULT_ACTION_STATEMENT);
        assert_eq!(hero.name_color, DEFAULT_COLOR);
        assert_eq!(hero.statement_color, DEFAULT_COLOR);
    }

    #[test]
    fn test_per_field_fallback() {
        let config = SiteConfig::from_json(r#"{ "website-name": { "value": "Shop" } }"#).unwrap();
        let hero = HeroInformation::resolve(Some(&config));
        assert_eq!(hero.name, "Shop");
        assert_eq!(hero.name_color, DEFAULT_COLOR);
        assert_eq!(hero.statement, DEFAULT_ACTION_STATEMENT);
    }

    #[test]
    fn test_empty_value_falls_back() {
        let config = SiteConfig::from_json(r#"{ "action-statement": { "value": "", "color": "text-blue-500" } }"#).unwrap();
        let hero = HeroInformation::resolve(Some(&config));
        assert_eq!(hero.statement, DEFAULT_ACTION_STATEMENT);
        assert_eq!(hero.statement_color, "text-blue-500");
    }
}

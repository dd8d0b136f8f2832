//! Runtime configuration, read from the environment (and `.env` via dotenvy).

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use crate::application::homepage::SiteConfig;
use crate::domain::value_objects::StoreId;

pub const DEFAULT_PORT: u16 = 8083;
pub const DEFAULT_STORE_ID: &str = "c0530f4d-68dd-43b8-9867-580a8e101056";
pub const DEFAULT_CATALOG_LOAD_DELAY_MS: u64 = 800;
pub const DEFAULT_CURRENCY: &str = "USD";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("PORT must be a port number, got {0:?}")]
    InvalidPort(String),
    #[error("STORE_ID must be a UUID, got {0:?}")]
    InvalidStoreId(String),
    #[error("CATALOG_LOAD_DELAY_MS must be a whole number of milliseconds, got {0:?}")]
    InvalidDelay(String),
    #[error("SEED_DEMO_CART must be true or false, got {0:?}")]
    InvalidFlag(String),
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub store_id: StoreId,
    pub catalog_load_delay: Duration,
    pub template_config_path: Option<PathBuf>,
    pub currency: String,
    pub seed_demo_cart: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::from_env`] with an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };
        let store_id = lookup("STORE_ID").unwrap_or_else(|| DEFAULT_STORE_ID.to_string());
        let store_id = store_id.parse().map_err(|_| ConfigError::InvalidStoreId(store_id))?;
        let delay_ms = match lookup("CATALOG_LOAD_DELAY_MS") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidDelay(raw))?,
            None => DEFAULT_CATALOG_LOAD_DELAY_MS,
        };
        let seed_demo_cart = match lookup("SEED_DEMO_CART") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidFlag(raw))?,
            None => true,
        };
        Ok(Self {
            port,
            store_id,
            catalog_load_delay: Duration::from_millis(delay_ms),
            template_config_path: lookup("TEMPLATE_CONFIG_PATH").filter(|p| !p.trim().is_empty()).map(PathBuf::from),
            currency: lookup("STORE_CURRENCY").unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            seed_demo_cart,
        })
    }

    /// The hero text source. A configured file that cannot be read or parsed counts as absent.
    pub fn load_site_config(&self) -> Option<SiteConfig> {
        let Some(path) = &self.template_config_path else { return Some(SiteConfig::builtin()) };
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "template config unreadable, using defaults");
                return None;
            }
        };
        match SiteConfig::from_json(&raw) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "template config malformed, using defaults");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use crate::application::homepage::{HeroInformation, DEFAULT_WEBSITE_NAME};

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.store_id.to_string(), DEFAULT_STORE_ID);
        assert_eq!(config.catalog_load_delay, Duration::from_millis(800));
        assert!(config.template_config_path.is_none());
        assert!(config.seed_demo_cart);
        assert_eq!(config.currency, "USD");
    }

    #[test]
    fn test_overrides_and_errors() {
        let config = AppConfig::from_lookup(lookup(&[("PORT", "9000"), ("CATALOG_LOAD_DELAY_MS", "0"), ("SEED_DEMO_CART", "false")])).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.catalog_load_delay, Duration::ZERO);
        assert!(!config.seed_demo_cart);
        assert!(matches!(AppConfig::from_lookup(lookup(&[("PORT", "http")])), Err(ConfigError::InvalidPort(_))));
        assert!(matches!(AppConfig::from_lookup(lookup(&[("STORE_ID", "abc")])), Err(ConfigError::InvalidStoreId(_))));
    }

    #[test]
    fn test_unreadable_template_counts_as_absent() {
        let config = AppConfig::from_lookup(lookup(&[("TEMPLATE_CONFIG_PATH", "/nonexistent/template.json")])).unwrap();
        let site = config.load_site_config();
        assert!(site.is_none());
        assert_eq!(HeroInformation::resolve(site.as_ref()).name, DEFAULT_WEBSITE_NAME);
    }

    #[test]
    fn test_template_file_is_read() {
        let path = std::env::temp_dir().join(format!("storefront-template-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, r#"{ "website-name": { "value": "Corner Shop", "color": "text-blue-500" } }"#).unwrap();
        let config = AppConfig::from_lookup(lookup(&[("TEMPLATE_CONFIG_PATH", path.to_str().unwrap())])).unwrap();
        let hero = HeroInformation::resolve(config.load_site_config().as_ref());
        std::fs::remove_file(&path).unwrap();
        assert_eq!(hero.name, "Corner Shop");
        assert_eq!(hero.name_color, "text-blue-500");
    }
}

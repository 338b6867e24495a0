//! # Engine Settings
//!
//! Defaults applied when a caller does not choose: display language and
//! currency. Resolved in three layers, later ones winning:
//!
//! 1. [`EngineSettings::default`]
//! 2. A JSON file named by `CALCORA_SETTINGS`
//! 3. `CALCORA_LANG` / `CALCORA_CURRENCY`
//!
//! ## JSON Example
//!
//! ```json
//! { "default_language": "pt", "default_currency": "BRL" }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::format::DEFAULT_CURRENCY;
use crate::locale::Language;

pub const SETTINGS_PATH_VAR: &str = "CALCORA_SETTINGS";
pub const LANGUAGE_VAR: &str = "CALCORA_LANG";
pub const CURRENCY_VAR: &str = "CALCORA_CURRENCY";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Language used when a request names none
    pub default_language: Language,

    /// ISO 4217 code for money fields without a unit
    pub default_currency: String,
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            default_language: Language::En,
            default_currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

impl EngineSettings {
    pub fn from_json(json: &str) -> CalcResult<Self> {
        let settings: EngineSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> CalcResult<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| CalcError::internal(format!("cannot read settings '{}': {e}", path.display())))?;
        Self::from_json(&json)
    }

    /// Resolve settings from the process environment.
    pub fn load() -> CalcResult<Self> {
        Self::load_with(|name| std::env::var(name).ok())
    }

    /// Resolve settings with `env` standing in for the environment.
    pub fn load_with(env: impl Fn(&str) -> Option<String>) -> CalcResult<Self> {
        let mut settings = match env(SETTINGS_PATH_VAR) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => EngineSettings::default(),
        };

        if let Some(lang) = env(LANGUAGE_VAR) {
            settings.default_language = lang.parse()?;
        }
        if let Some(currency) = env(CURRENCY_VAR) {
            settings.default_currency = currency.trim().to_ascii_uppercase();
        }

        settings.validate()?;
        tracing::debug!(
            language = %settings.default_language,
            currency = %settings.default_currency,
            "engine settings resolved"
        );
        Ok(settings)
    }

    pub fn validate(&self) -> CalcResult<()> {
        let code = &self.default_currency;
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(CalcError::invalid_input("default_currency", code, "Not an ISO 4217 code"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = EngineSettings::load_with(env(&[])).unwrap();
        assert_eq!(settings, EngineSettings::default());
        assert_eq!(settings.default_currency, "USD");
    }

    #[test]
    fn test_env_overrides() {
        let settings = EngineSettings::load_with(env(&[(LANGUAGE_VAR, "pt-BR"), (CURRENCY_VAR, "brl")])).unwrap();
        assert_eq!(settings.default_language, Language::Pt);
        assert_eq!(settings.default_currency, "BRL");
    }

    #[test]
    fn test_bad_values_rejected() {
        assert!(EngineSettings::load_with(env(&[(LANGUAGE_VAR, "klingon")])).is_err());
        assert!(EngineSettings::load_with(env(&[(CURRENCY_VAR, "dollars")])).is_err());
        assert!(EngineSettings::load_with(env(&[(SETTINGS_PATH_VAR, "/no/such/settings.json")])).is_err());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = EngineSettings::from_json(r#"{ "default_language": "es" }"#).unwrap();
        assert_eq!(settings.default_language, Language::Es);
        assert_eq!(settings.default_currency, "USD");
    }

    #[test]
    fn test_file_then_env() {
        let path = std::env::temp_dir().join(format!("calcora-settings-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "default_language": "es", "default_currency": "EUR" }"#).unwrap();
        let path_str = path.to_string_lossy().into_owned();

        let settings = EngineSettings::load_with(env(&[(SETTINGS_PATH_VAR, &path_str), (CURRENCY_VAR, "MXN")])).unwrap();
        assert_eq!(settings.default_language, Language::Es);
        assert_eq!(settings.default_currency, "MXN");

        std::fs::remove_file(&path).ok();
    }
}

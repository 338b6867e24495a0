//! # Locale Resource Store
//!
//! Localized text for every calculator lives in JSON bundles under
//! `calcora_core/locales/<calculator-id>/<lang>.json`, embedded into the binary
//! and loaded once into a [`LocaleStore`] keyed by `(calculator_id, Language)`.
//!
//! Lookups follow one fallback chain: requested language, then English, then
//! the literal key. A missing translation degrades to English text and never
//! to an error.
//!
//! ## Example
//!
//! ```rust
//! use calcora_core::locale::{Language, LOCALES};
//!
//! let name = LOCALES.text("discount", Language::Es, "name");
//! assert_eq!(name, "Calculadora de Descuentos");
//!
//! // Unknown key: the key itself comes back
//! assert_eq!(LOCALES.text("discount", Language::Es, "no.such.key"), "no.such.key");
//! ```

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use rust_embed::RustEmbed;
use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::template;

// ============================================================================
// Language
// ============================================================================

/// Languages the calculators ship text for. English is the base language
/// every other bundle falls back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Es,
    Pt,
}

impl Language {
    pub const ALL: &'static [Language] = &[Language::En, Language::Es, Language::Pt];

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Es => "es",
            Language::Pt => "pt",
        }
    }

    /// Parse a language tag such as `pt-BR` or `es_MX`; anything
    /// unrecognised resolves to English.
    pub fn from_code_lenient(code: &str) -> Self {
        code.parse().unwrap_or_default()
    }
}

impl FromStr for Language {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let primary = s
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match primary.as_str() {
            "en" => Ok(Language::En),
            "es" => Ok(Language::Es),
            "pt" => Ok(Language::Pt),
            _ => Err(CalcError::invalid_input("language", s, "Unsupported language")),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// ============================================================================
// Text bundle
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeoText {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputText {
    pub label: String,
    #[serde(default)]
    pub help_text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultText {
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectionText {
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FaqText {
    pub question: String,
    pub answer: String,
}

/// All localized text for one calculator in one language.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextBundle {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub seo: SeoText,
    #[serde(default)]
    pub inputs: BTreeMap<String, InputText>,
    #[serde(default)]
    pub results: BTreeMap<String, ResultText>,
    #[serde(default)]
    pub presets: BTreeMap<String, String>,
    /// Labels for select options, keyed by option value
    #[serde(default)]
    pub options: BTreeMap<String, String>,
    /// Unit suffixes and other short strings used while formatting
    #[serde(default)]
    pub values: BTreeMap<String, String>,
    /// `{token}` templates, `summary` in particular
    #[serde(default)]
    pub formats: BTreeMap<String, String>,
    #[serde(default)]
    pub info_cards: BTreeMap<String, String>,
    #[serde(default)]
    pub education: BTreeMap<String, SectionText>,
    #[serde(default)]
    pub faqs: BTreeMap<String, FaqText>,
}

impl TextBundle {
    /// Look up a dotted key path, e.g. `inputs.weight.label` or `values.kg`.
    pub fn lookup(&self, key: &str) -> Option<&str> {
        let mut parts = key.splitn(3, '.');
        let head = parts.next()?;
        let id = parts.next();
        let field = parts.next();

        match (head, id, field) {
            ("name", None, None) => Some(self.name.as_str()),
            ("slug", None, None) => Some(self.slug.as_str()),
            ("seo", Some("title"), None) => Some(self.seo.title.as_str()),
            ("seo", Some("description"), None) => Some(self.seo.description.as_str()),
            ("inputs", Some(id), Some("label")) => self.inputs.get(id).map(|i| i.label.as_str()),
            ("inputs", Some(id), Some("helpText")) => {
                self.inputs.get(id).and_then(|i| i.help_text.as_deref())
            }
            ("results", Some(id), Some("label")) => self.results.get(id).map(|r| r.label.as_str()),
            ("presets", Some(id), None) => self.presets.get(id).map(String::as_str),
            ("options", Some(id), None) => self.options.get(id).map(String::as_str),
            ("values", Some(id), None) => self.values.get(id).map(String::as_str),
            ("formats", Some(id), None) => self.formats.get(id).map(String::as_str),
            ("infoCards", Some(id), None) => self.info_cards.get(id).map(String::as_str),
            ("education", Some(id), Some("title")) => self.education.get(id).map(|s| s.title.as_str()),
            ("education", Some(id), Some("body")) => self.education.get(id).map(|s| s.body.as_str()),
            ("faqs", Some(id), Some("question")) => self.faqs.get(id).map(|f| f.question.as_str()),
            ("faqs", Some(id), Some("answer")) => self.faqs.get(id).map(|f| f.answer.as_str()),
            _ => None,
        }
    }

    /// Placeholder tokens used by the summary template.
    pub fn summary_tokens(&self) -> BTreeSet<String> {
        self.formats
            .get("summary")
            .map(|s| template::placeholders(s))
            .unwrap_or_default()
    }
}

/// The slice of a bundle a calculation function is allowed to see: the
/// `values` and `formats` string maps plus the language they are written in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextContext {
    pub language: Language,
    #[serde(default)]
    pub values: BTreeMap<String, String>,
    #[serde(default)]
    pub formats: BTreeMap<String, String>,
}

impl TextContext {
    pub fn format(&self, key: &str) -> Option<&str> {
        self.formats.get(key).map(String::as_str)
    }
}

// ============================================================================
// Store
// ============================================================================

#[derive(RustEmbed)]
#[folder = "locales/"]
struct LocaleAssets;

/// Key-value store of text bundles keyed by `(calculator_id, language)`.
#[derive(Debug, Default)]
pub struct LocaleStore {
    bundles: HashMap<(String, Language), TextBundle>,
}

/// Process-wide store loaded from the embedded bundles on first use.
pub static LOCALES: Lazy<LocaleStore> = Lazy::new(LocaleStore::load_embedded);

impl LocaleStore {
    /// Load every embedded bundle. A bundle that fails to parse is logged
    /// and skipped so the remaining calculators keep working.
    pub fn load_embedded() -> Self {
        let mut store = LocaleStore::default();
        for path in LocaleAssets::iter() {
            let Some(file) = LocaleAssets::get(&path) else {
                continue;
            };
            let content = String::from_utf8_lossy(&file.data);
            if let Err(err) = store.insert_source(&path, &content) {
                tracing::error!(path = %path, error = %err, "skipping locale bundle");
            }
        }
        tracing::info!(bundles = store.len(), "locale store loaded");
        store
    }

    /// Strict loader used by tests and tooling: the first bad bundle aborts.
    pub fn from_sources<'a>(sources: impl IntoIterator<Item = (&'a str, &'a str)>) -> CalcResult<Self> {
        let mut store = LocaleStore::default();
        for (path, content) in sources {
            store.insert_source(path, content)?;
        }
        Ok(store)
    }

    /// Paths and contents of every embedded bundle.
    pub fn embedded_sources() -> Vec<(String, String)> {
        LocaleAssets::iter()
            .filter_map(|path| {
                let file = LocaleAssets::get(&path)?;
                Some((path.to_string(), String::from_utf8_lossy(&file.data).into_owned()))
            })
            .collect()
    }

    /// Parse one `<calculator>/<lang>.json` bundle into the store.
    pub fn insert_source(&mut self, path: &str, content: &str) -> CalcResult<()> {
        let (calculator, file) = path
            .rsplit_once('/')
            .ok_or_else(|| CalcError::internal(format!("locale path '{path}' has no calculator dir")))?;
        let code = file.strip_suffix(".json").unwrap_or(file);
        let language: Language = code.parse()?;
        let bundle: TextBundle = serde_json::from_str(content)?;
        self.insert(calculator, language, bundle);
        Ok(())
    }

    pub fn insert(&mut self, calculator: impl Into<String>, language: Language, bundle: TextBundle) {
        self.bundles.insert((calculator.into(), language), bundle);
    }

    pub fn len(&self) -> usize {
        self.bundles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }

    /// Exact bundle, no fallback.
    pub fn get(&self, calculator: &str, language: Language) -> Option<&TextBundle> {
        self.bundles.get(&(calculator.to_string(), language))
    }

    pub fn languages(&self, calculator: &str) -> Vec<Language> {
        Language::ALL
            .iter()
            .copied()
            .filter(|lang| self.get(calculator, *lang).is_some())
            .collect()
    }

    /// Bundle for the requested language, or the English one.
    pub fn bundle(&self, calculator: &str, language: Language) -> CalcResult<&TextBundle> {
        self.get(calculator, language)
            .or_else(|| self.get(calculator, Language::En))
            .ok_or_else(|| CalcError::LocaleNotFound {
                calculator: calculator.to_string(),
                language: language.code().to_string(),
            })
    }

    /// Resolve a dotted key: requested language, then English, then the key.
    pub fn text(&self, calculator: &str, language: Language, key: &str) -> String {
        [language, Language::En]
            .iter()
            .filter_map(|lang| self.get(calculator, *lang))
            .find_map(|bundle| bundle.lookup(key))
            .unwrap_or(key)
            .to_string()
    }

    /// `values`/`formats` maps for a calculation, English entries overlaid by
    /// the requested language's.
    pub fn text_context(&self, calculator: &str, language: Language) -> TextContext {
        let mut context = TextContext {
            language,
            ..TextContext::default()
        };
        let chain = [Language::En, language];
        for bundle in chain.iter().filter_map(|lang| self.get(calculator, *lang)) {
            context.values.extend(bundle.values.clone());
            context.formats.extend(bundle.formats.clone());
        }
        context
    }

    /// Every bundle of a calculator must use the same summary placeholders
    /// as its English bundle.
    pub fn check_consistency(&self, calculator: &str) -> CalcResult<()> {
        let base = self.get(calculator, Language::En).ok_or_else(|| CalcError::LocaleNotFound {
            calculator: calculator.to_string(),
            language: Language::En.code().to_string(),
        })?;
        let expected = base.summary_tokens();

        for lang in Language::ALL.iter().filter(|l| **l != Language::En) {
            if let Some(bundle) = self.get(calculator, *lang) {
                let tokens = bundle.summary_tokens();
                if tokens != expected {
                    return Err(CalcError::config_invalid(
                        calculator,
                        format!(
                            "summary placeholders in '{}' {:?} differ from English {:?}",
                            lang, tokens, expected
                        ),
                    ));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EN: &str = r#"{
        "name": "Tip Calculator",
        "slug": "tip-calculator",
        "inputs": { "bill": { "label": "Bill", "helpText": "Before tax" } },
        "values": { "kg": "kg" },
        "formats": { "summary": "Tip {tip} on {bill}" }
    }"#;

    const ES: &str = r#"{
        "name": "Calculadora de Propinas",
        "slug": "calculadora-propinas",
        "formats": { "summary": "Propina {tip} sobre {bill}" }
    }"#;

    fn store() -> LocaleStore {
        LocaleStore::from_sources([("tip/en.json", EN), ("tip/es.json", ES)]).unwrap()
    }

    #[test]
    fn test_language_parsing() {
        assert_eq!("pt-BR".parse::<Language>().unwrap(), Language::Pt);
        assert_eq!("es_MX".parse::<Language>().unwrap(), Language::Es);
        assert!("de".parse::<Language>().is_err());
        assert_eq!(Language::from_code_lenient("de"), Language::En);
    }

    #[test]
    fn test_fallback_chain() {
        let store = store();
        assert_eq!(store.text("tip", Language::Es, "name"), "Calculadora de Propinas");
        // Missing in es -> English
        assert_eq!(store.text("tip", Language::Es, "inputs.bill.label"), "Bill");
        assert_eq!(store.text("tip", Language::Es, "inputs.bill.helpText"), "Before tax");
        // Missing everywhere -> literal key
        assert_eq!(store.text("tip", Language::Es, "results.tip.label"), "results.tip.label");
        // No pt bundle at all -> English
        assert_eq!(store.text("tip", Language::Pt, "name"), "Tip Calculator");
    }

    #[test]
    fn test_text_context_overlay() {
        let ctx = store().text_context("tip", Language::Es);
        assert_eq!(ctx.language, Language::Es);
        assert_eq!(ctx.format("summary"), Some("Propina {tip} sobre {bill}"));
        assert_eq!(ctx.values.get("kg").map(String::as_str), Some("kg"));
    }

    #[test]
    fn test_placeholder_consistency() {
        assert!(store().check_consistency("tip").is_ok());

        let bad = r#"{ "name": "x", "slug": "x", "formats": { "summary": "Propina {tip}" } }"#;
        let store = LocaleStore::from_sources([("tip/en.json", EN), ("tip/pt.json", bad)]).unwrap();
        let err = store.check_consistency("tip").unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_INVALID");
    }

    #[test]
    fn test_bad_path_and_json_rejected() {
        assert!(LocaleStore::from_sources([("en.json", EN)]).is_err());
        assert!(LocaleStore::from_sources([("tip/xx.json", EN)]).is_err());
        assert!(LocaleStore::from_sources([("tip/en.json", "{ not json")]).is_err());
    }

    #[test]
    fn test_missing_calculator() {
        let err = store().bundle("nope", Language::En).unwrap_err();
        assert_eq!(err.error_code(), "LOCALE_NOT_FOUND");
    }
}

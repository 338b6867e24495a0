//! # Template Resolution
//!
//! `{token}` substitution for localized sentences such as
//! `"You save {saved} ({percent}% off)."`.
//!
//! Substitution is literal and single-pass: the template is scanned once,
//! every placeholder is replaced by its value, and substituted values are
//! never scanned again, so a value containing `{x}` stays as written.
//!
//! ## Example
//!
//! ```rust
//! use calcora_core::template::{render, resolve};
//!
//! let tokens = [("saved", "$45.00".to_string()), ("percent", "30".to_string())];
//! let s = render("You save {saved} ({percent}% off)", &tokens).unwrap();
//! assert_eq!(s, "You save $45.00 (30% off)");
//!
//! // A broken localized template falls back to the English default
//! let s = resolve(Some("Ahorras {ahorro}"), "You save {saved}", &tokens);
//! assert_eq!(s, "You save $45.00");
//! ```

use std::collections::BTreeSet;

use crate::errors::{CalcError, CalcResult};

fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Substitute every `{token}` in `template`.
///
/// Fails on an unknown token, an empty or malformed placeholder, or an
/// unclosed brace.
pub fn render(template: &str, tokens: &[(&str, String)]) -> CalcResult<String> {
    let mut out = String::with_capacity(template.len() + 16);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let close = after
            .find('}')
            .ok_or_else(|| CalcError::template(format!("unclosed placeholder in '{template}'")))?;
        let name = &after[..close];

        if name.is_empty() || !name.chars().all(is_token_char) {
            return Err(CalcError::template(format!("malformed placeholder '{{{name}}}'")));
        }

        let value = tokens
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
            .ok_or_else(|| CalcError::template(format!("unknown placeholder '{{{name}}}'")))?;
        out.push_str(value);
        rest = &after[close + 1..];
    }

    out.push_str(rest);
    Ok(out)
}

/// Render the localized template, falling back to the baked-in English
/// default when it is missing or cannot be rendered.
pub fn resolve(localized: Option<&str>, default: &str, tokens: &[(&str, String)]) -> String {
    if let Some(template) = localized {
        match render(template, tokens) {
            Ok(s) => return s,
            Err(err) => tracing::debug!(error = %err, "localized template failed, using default"),
        }
    }

    render(default, tokens).unwrap_or_else(|err| {
        tracing::warn!(error = %err, "default template failed to render");
        default.to_string()
    })
}

/// The set of placeholder names a template uses.
pub fn placeholders(template: &str) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                let name = &after[..close];
                if !name.is_empty() && name.chars().all(is_token_char) {
                    names.insert(name.to_string());
                }
                rest = &after[close + 1..];
            }
            None => break,
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens() -> Vec<(&'static str, String)> {
        vec![
            ("saved", "$45.00".to_string()),
            ("percent", "30".to_string()),
            ("final", "$105.00".to_string()),
        ]
    }

    #[test]
    fn test_render_order_independent() {
        let s = render("{final} after {percent}% off, saving {saved}", &tokens()).unwrap();
        assert_eq!(s, "$105.00 after 30% off, saving $45.00");
    }

    #[test]
    fn test_repeated_token() {
        let s = render("{percent}/{percent}", &tokens()).unwrap();
        assert_eq!(s, "30/30");
    }

    #[test]
    fn test_no_recursive_expansion() {
        let tokens = vec![("a", "{b}".to_string()), ("b", "x".to_string())];
        assert_eq!(render("{a}", &tokens).unwrap(), "{b}");
    }

    #[test]
    fn test_render_errors() {
        assert!(render("You save {unknown}", &tokens()).is_err());
        assert!(render("You save {saved", &tokens()).is_err());
        assert!(render("Empty {}", &tokens()).is_err());
        assert!(render("Bad {sa ved}", &tokens()).is_err());
    }

    #[test]
    fn test_resolve_fallbacks() {
        let default = "You save {saved}";
        assert_eq!(resolve(None, default, &tokens()), "You save $45.00");
        assert_eq!(resolve(Some("Ahorras {saved}"), default, &tokens()), "Ahorras $45.00");
        assert_eq!(resolve(Some("Ahorras {typo}"), default, &tokens()), "You save $45.00");
    }

    #[test]
    fn test_placeholders() {
        let names = placeholders("You save {saved} ({percent}% off). Final: {final}. {saved}");
        let expected: BTreeSet<String> =
            ["final", "percent", "saved"].iter().map(|s| s.to_string()).collect();
        assert_eq!(names, expected);
        assert!(placeholders("no tokens").is_empty());
    }
}

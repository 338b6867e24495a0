//! # Calcora CLI
//!
//! Terminal front end for the calculator engine.
//!
//! ```text
//! calcora list [--lang xx]
//! calcora describe <id> [--lang xx]
//! calcora run <id> [field=value ...] [--unit field=code ...] [--lang xx] [--json]
//! calcora preset <id> <preset-id> [--lang xx] [--json]
//! ```
//!
//! Defaults for language and currency come from `EngineSettings`
//! (`CALCORA_SETTINGS`, `CALCORA_LANG`, `CALCORA_CURRENCY`). Logging is
//! controlled by `RUST_LOG` and goes to stderr.

use anyhow::{anyhow, bail, Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use calcora_core::calculations::{CalculationInput, CalculatorResults, InputValue};
use calcora_core::config::{CalculatorConfig, InputType, UnitType};
use calcora_core::locale::{Language, LOCALES};
use calcora_core::registry::REGISTRY;
use calcora_core::settings::EngineSettings;

const USAGE: &str = "\
Usage:
  calcora list [--lang xx]
  calcora describe <id> [--lang xx]
  calcora run <id> [field=value ...] [--unit field=code ...] [--lang xx] [--json]
  calcora preset <id> <preset-id> [--lang xx] [--json]";

#[derive(Debug, Clone, PartialEq)]
enum Command {
    List,
    Describe { id: String },
    Run { id: String, values: Vec<(String, String)>, units: Vec<(String, String)> },
    Preset { id: String, preset: String },
    Help,
}

#[derive(Debug, Clone, PartialEq)]
struct Args {
    command: Command,
    language: Option<Language>,
    json: bool,
}

fn split_pair(arg: &str) -> Result<(String, String)> {
    let (key, value) = arg
        .split_once('=')
        .ok_or_else(|| anyhow!("expected field=value, got '{arg}'"))?;
    if key.is_empty() {
        bail!("empty field name in '{arg}'");
    }
    Ok((key.to_string(), value.to_string()))
}

fn parse_args(raw: impl IntoIterator<Item = String>) -> Result<Args> {
    let mut positional = Vec::new();
    let mut units = Vec::new();
    let mut language = None;
    let mut json = false;

    let mut iter = raw.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--lang" => {
                let code = iter.next().context("--lang needs a language code")?;
                language = Some(code.parse::<Language>()?);
            }
            "--unit" => {
                let pair = iter.next().context("--unit needs field=code")?;
                units.push(split_pair(&pair)?);
            }
            "--json" => json = true,
            "-h" | "--help" => positional = vec!["help".to_string()],
            other if other.starts_with("--") => bail!("unknown option '{other}'"),
            _ => positional.push(arg),
        }
    }

    let mut positional = positional.into_iter();
    let command = match positional.next().as_deref() {
        None | Some("help") => Command::Help,
        Some("list") => Command::List,
        Some("describe") => Command::Describe {
            id: positional.next().context("describe needs a calculator id")?,
        },
        Some("run") => {
            let id = positional.next().context("run needs a calculator id")?;
            let values = positional.map(|a| split_pair(&a)).collect::<Result<Vec<_>>>()?;
            Command::Run { id, values, units }
        }
        Some("preset") => Command::Preset {
            id: positional.next().context("preset needs a calculator id")?,
            preset: positional.next().context("preset needs a preset id")?,
        },
        Some(other) => bail!("unknown command '{other}'\n\n{USAGE}"),
    };

    Ok(Args { command, language, json })
}

fn input_value(raw: &str) -> InputValue {
    match raw.trim() {
        "true" => InputValue::Bool(true),
        "false" => InputValue::Bool(false),
        s => s
            .parse::<f64>()
            .map(InputValue::Number)
            .unwrap_or_else(|_| InputValue::Text(s.to_string())),
    }
}

/// Money fields without an explicit unit get the configured currency.
fn apply_default_currency(input: &mut CalculationInput, config: &CalculatorConfig, currency: &str) {
    for field in config.inputs.iter().filter(|f| f.unit_type == Some(UnitType::Currency)) {
        input
            .field_units
            .entry(field.id.clone())
            .or_insert_with(|| currency.to_string());
    }
}

fn list(language: Language) {
    for config in REGISTRY.all() {
        println!(
            "{:<14} {:<20} {}",
            config.id,
            config.category.display_name(),
            LOCALES.text(&config.id, language, "name")
        );
    }
}

fn describe(id: &str, language: Language) -> Result<()> {
    let config = REGISTRY.config(id)?;
    let text = |key: String| LOCALES.text(id, language, &key);

    println!("{} ({})", text("name".to_string()), config.id);
    println!("{}", text("seo.description".to_string()));
    println!();
    println!("Inputs:");
    for field in &config.inputs {
        let kind = match &field.input_type {
            InputType::Number => {
                let unit = field.unit_type.map(|u| u.base_unit()).unwrap_or("");
                format!("number {unit}")
            }
            InputType::Select { options } => format!("one of {}", options.join("|")),
            InputType::Toggle => "true|false".to_string(),
        };
        let required = if field.required { " (required)" } else { "" };
        println!("  {:<16} {:<28} {}{}", field.id, text(format!("inputs.{}.label", field.id)), kind.trim(), required);
    }
    println!();
    println!("Results:");
    for slot in &config.results {
        println!("  {:<16} {}", slot.id, text(format!("results.{}.label", slot.id)));
    }
    println!();
    println!("Presets:");
    for preset in &config.presets {
        println!("  {:<16} {}", preset.id, text(format!("presets.{}", preset.id)));
    }
    Ok(())
}

fn print_results(id: &str, language: Language, results: &CalculatorResults, json: bool) -> Result<()> {
    let config = REGISTRY.config(id)?;
    println!("{}", LOCALES.text(id, language, "name"));
    println!();
    for slot in &config.results {
        if let Some(value) = results.formatted.get(&slot.id) {
            let label = LOCALES.text(id, language, &format!("results.{}.label", slot.id));
            println!("  {:<28} {}", label, value);
        }
    }
    println!();
    println!("{}", results.summary);

    if json {
        println!();
        println!("{}", serde_json::to_string_pretty(results)?);
    }
    Ok(())
}

fn evaluate(id: &str, input: &CalculationInput, language: Language, json: bool) -> Result<()> {
    let results = REGISTRY
        .try_calculate(id, input)
        .with_context(|| format!("cannot evaluate '{id}'"))?;
    print_results(id, language, &results, json)
}

fn run(args: Args, settings: &EngineSettings) -> Result<()> {
    let language = args.language.unwrap_or(settings.default_language);

    match args.command {
        Command::Help => println!("{USAGE}"),
        Command::List => list(language),
        Command::Describe { id } => describe(&id, language)?,
        Command::Run { id, values, units } => {
            let config = REGISTRY.config(&id)?;
            let mut input = CalculationInput::new().with_text(REGISTRY.text_context(&id, language)?);
            for (field, raw) in values {
                if config.input(&field).is_none() {
                    bail!("'{id}' has no input '{field}'");
                }
                input = input.with(field, input_value(&raw));
            }
            for (field, unit) in units {
                input = input.with_unit(field, unit);
            }
            apply_default_currency(&mut input, config, &settings.default_currency);
            tracing::debug!(calculator = %id, fields = input.values.len(), "running calculator");
            evaluate(&id, &input, language, args.json)?;
        }
        Command::Preset { id, preset } => {
            let config = REGISTRY.config(&id)?;
            let mut input = REGISTRY.preset_input(&id, &preset, language)?;
            apply_default_currency(&mut input, config, &settings.default_currency);
            evaluate(&id, &input, language, args.json)?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let settings = EngineSettings::load().context("loading engine settings")?;
    let args = parse_args(std::env::args().skip(1))?;
    run(args, &settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(line: &str) -> Result<Args> {
        parse_args(line.split_whitespace().map(String::from))
    }

    #[test]
    fn test_parse_run() {
        let parsed = args("run kg-to-stone kgValue=165 --unit kgValue=lb --lang pt-BR --json").unwrap();
        assert_eq!(parsed.language, Some(Language::Pt));
        assert!(parsed.json);
        assert_eq!(
            parsed.command,
            Command::Run {
                id: "kg-to-stone".to_string(),
                values: vec![("kgValue".to_string(), "165".to_string())],
                units: vec![("kgValue".to_string(), "lb".to_string())],
            }
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(args("run discount price").is_err());
        assert!(args("preset discount").is_err());
        assert!(args("list --lang xx").is_err());
        assert!(args("frobnicate").is_err());
        assert_eq!(args("").unwrap().command, Command::Help);
    }

    #[test]
    fn test_input_values() {
        assert_eq!(input_value("150"), InputValue::Number(150.0));
        assert_eq!(input_value("true"), InputValue::Bool(true));
        assert_eq!(input_value("male"), InputValue::Text("male".to_string()));
    }

    #[test]
    fn test_default_currency_only_fills_gaps() {
        let config = REGISTRY.config("budget").unwrap();
        let mut input = CalculationInput::new().with_unit("needsSpending", "GBP");
        apply_default_currency(&mut input, config, "EUR");
        assert_eq!(input.unit("monthlyIncome"), Some("EUR"));
        assert_eq!(input.unit("needsSpending"), Some("GBP"));
    }
}

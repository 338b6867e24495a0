//! End-to-end checks across the whole catalog: every calculator through the
//! registry, with the embedded locale bundles.

use calcora_core::calculations::{
    CalculationInput, Calculator, CalorieCalculator, DiscountCalculator, KgToStoneCalculator, ResultValue,
    StoneToKgCalculator,
};
use calcora_core::equations::{zigzag_week, BmrFormula, BodyProfile, Sex};
use calcora_core::locale::{Language, LocaleStore, LOCALES};
use calcora_core::registry::REGISTRY;
use calcora_core::units::{Kilograms, Stones};

fn localized(id: &str, language: Language) -> CalculationInput {
    CalculationInput::new().with_text(REGISTRY.text_context(id, language).unwrap())
}

#[test]
fn catalog_validates_against_embedded_bundles() {
    REGISTRY.validate().unwrap();
    assert_eq!(LOCALES.len(), REGISTRY.all().count() * Language::ALL.len());
}

#[test]
fn embedded_bundles_load_strictly() {
    let sources = LocaleStore::embedded_sources();
    let store = LocaleStore::from_sources(sources.iter().map(|(p, c)| (p.as_str(), c.as_str()))).unwrap();
    assert_eq!(store.len(), LOCALES.len());
}

#[test]
fn every_preset_is_valid_in_every_language() {
    for config in REGISTRY.all() {
        for preset in &config.presets {
            for language in Language::ALL {
                let results = REGISTRY.run_preset(&config.id, &preset.id, *language).unwrap();
                assert!(results.is_valid, "{}/{} in {language}", config.id, preset.id);
                assert!(!results.summary.is_empty());
                assert!(!results.summary.contains('{'), "unrendered summary: {}", results.summary);

                for slot in &config.results {
                    assert!(results.values.contains_key(&slot.id), "{}: no value for {}", config.id, slot.id);
                    assert!(results.formatted.contains_key(&slot.id), "{}: no text for {}", config.id, slot.id);
                }
                assert_eq!(results.values.len(), config.results.len());
            }
        }
    }
}

#[test]
fn calculations_are_pure() {
    for config in REGISTRY.all() {
        for preset in &config.presets {
            let input = REGISTRY.preset_input(&config.id, &preset.id, Language::Es).unwrap();
            let first = REGISTRY.calculate(&config.id, &input).unwrap();
            let second = REGISTRY.calculate(&config.id, &input).unwrap();
            assert_eq!(first, second);
        }
    }
}

#[test]
fn null_required_input_gates_validity() {
    for config in REGISTRY.all() {
        let preset = &config.presets[0];
        for field in config.inputs.iter().filter(|f| f.required) {
            let mut input = REGISTRY.preset_input(&config.id, &preset.id, Language::En).unwrap();
            input.values.insert(field.id.clone(), None);

            let results = REGISTRY.calculate(&config.id, &input).unwrap();
            assert!(!results.is_valid, "{} accepted null {}", config.id, field.id);
            assert!(results.values.is_empty());
            assert!(results.formatted.is_empty());
            assert_eq!(results.summary, "");
        }
    }
}

#[test]
fn stone_kg_round_trip() {
    for x in [0.001, 1.0, 6.35029318, 11.0, 75.0, 123.456, 640.0] {
        let back: Kilograms = Stones::from(Kilograms(x)).into();
        assert!(((back.value() - x) / x).abs() < 1e-9, "kg {x}");
        let back: Stones = Kilograms::from(Stones(x)).into();
        assert!(((back.value() - x) / x).abs() < 1e-9, "st {x}");
    }
}

#[test]
fn converters_agree_with_each_other() {
    let to_kg = StoneToKgCalculator::calculate(&CalculationInput::new().with("stoneValue", 12.5));
    let kg = to_kg.number("kilograms").unwrap();
    let back = KgToStoneCalculator::calculate(&CalculationInput::new().with("kgValue", kg));
    assert!((back.number("stones").unwrap() - 12.5).abs() < 1e-9);
    assert_eq!(to_kg.formatted["stonePounds"], back.formatted["stonePounds"]);
}

#[test]
fn final_price_decreases_with_discount() {
    let mut previous = f64::INFINITY;
    for discount in 0..=100 {
        let input = CalculationInput::new()
            .with("originalPrice", 249.99)
            .with("discountPercent", discount as f64)
            .with("taxRate", 6.5);
        let price = DiscountCalculator::calculate(&input).number("finalPrice").unwrap();
        assert!(price < previous, "not decreasing at {discount}%");
        previous = price;
    }
}

#[test]
fn zigzag_week_sums_to_seven_targets() {
    for target in (1200..=4000).step_by(37) {
        let target = target as f64 + 0.4;
        assert_eq!(zigzag_week(target).iter().sum::<i64>(), 7 * target.round() as i64);
    }

    let input = REGISTRY.preset_input("calorie", "bulk", Language::En).unwrap();
    let results = CalorieCalculator::calculate(&input);
    let week = results.metadata.as_ref().unwrap()["zigzag"].clone();
    let total: i64 = week.as_array().unwrap().iter().map(|d| d.as_i64().unwrap()).sum();
    assert_eq!(total as f64, results.number("weeklyTotal").unwrap());
}

#[test]
fn bmr_formulas_differ() {
    let profiles = [
        BodyProfile { sex: Sex::Male, age: 30.0, weight_kg: 77.0, height_cm: 178.0, body_fat_pct: None },
        BodyProfile { sex: Sex::Female, age: 45.0, weight_kg: 62.0, height_cm: 160.0, body_fat_pct: Some(30.0) },
    ];
    for profile in profiles {
        let mifflin = profile.bmr(BmrFormula::Mifflin);
        let harris = profile.bmr(BmrFormula::Harris);
        let katch = profile.bmr(BmrFormula::Katch);
        assert!((mifflin - harris).abs() > 1.0);
        assert!((mifflin - katch).abs() > 1.0);
        assert!((harris - katch).abs() > 1.0);
    }
}

#[test]
fn spanish_discount_is_localized() {
    let input = localized("discount", Language::Es)
        .with("originalPrice", 80.0)
        .with("discountPercent", 40.0)
        .with("taxRate", 8.0)
        .with_unit("originalPrice", "EUR");
    let results = REGISTRY.calculate("discount", &input).unwrap();
    assert_eq!(results.formatted["finalPrice"], "€51,84");
    assert_eq!(results.summary, "Ahorras €32,00 (40% de descuento). Precio final: €51,84.");
}

#[test]
fn portuguese_falls_back_to_english_values() {
    // The pt bmr bundle has no formula names; English supplies them
    let input = localized("bmr", Language::Pt)
        .with("sex", "female")
        .with("age", 30)
        .with("weight", 63.0)
        .with("height", 165.0);
    let results = REGISTRY.calculate("bmr", &input).unwrap();
    assert!(results.summary.contains("Mifflin-St Jeor"), "{}", results.summary);
    assert!(results.summary.starts_with("Sua TMB é"));
}

#[test]
fn calorie_category_is_localized() {
    let input = localized("calorie", Language::En)
        .with("sex", "male")
        .with("age", 30)
        .with("weight", 77.0)
        .with("height", 178.0);
    let results = REGISTRY.calculate("calorie", &input).unwrap();
    assert_eq!(results.formatted["bmiCategory"], "Healthy weight");
    assert_eq!(results.values["bmiCategory"], ResultValue::Text("normal".to_string()));
    assert!(results.summary.contains("maintain your weight"));
}

#[test]
fn text_lookup_fallback_chain() {
    assert_eq!(LOCALES.text("stone-to-kg", Language::Es, "results.kilograms.label"), "Kilogramos");
    assert_eq!(LOCALES.text("bmr", Language::Pt, "values.harris"), "Harris-Benedict");
    assert_eq!(LOCALES.text("bmr", Language::Pt, "values.nothing"), "values.nothing");
}

#[test]
fn results_json_contract() {
    let input = CalculationInput::new().with("stoneValue", 11.0);
    let json = serde_json::to_value(StoneToKgCalculator::calculate(&input)).unwrap();
    assert_eq!(json["isValid"], true);
    assert_eq!(json["formatted"]["stonePounds"], "11 st 0 lbs");
    assert!(json["values"]["kilograms"].is_number());

    let input: CalculationInput =
        serde_json::from_str(r#"{ "values": { "originalPrice": null, "discountPercent": 20 } }"#).unwrap();
    let json = serde_json::to_value(DiscountCalculator::calculate(&input)).unwrap();
    assert_eq!(json["isValid"], false);
    assert_eq!(json["summary"], "");
    assert_eq!(json["values"], serde_json::json!({}));
}

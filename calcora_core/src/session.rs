//! # Calculation Session
//!
//! Caller-side state for one visit to one calculator, and the payloads sent
//! to the external tracking and history services.
//!
//! ```text
//! CalculationSession
//! ├── id: Uuid, started: DateTime<Utc>
//! ├── view: OneShot         (View event, once)
//! ├── calculation: OneShot  (Calculation event, once, valid results only)
//! └── last_saved            (history is written when the input changes)
//! ```
//!
//! The services are reached through [`EventSink`]. Delivery is
//! fire-and-forget: a failing sink is logged and never surfaces to the
//! caller.
//!
//! ## Example
//!
//! ```rust
//! use calcora_core::calculations::{CalculationInput, Calculator, DiscountCalculator};
//! use calcora_core::locale::Language;
//! use calcora_core::session::{CalculationSession, RecordingSink};
//!
//! let sink = RecordingSink::default();
//! let mut session = CalculationSession::new("discount", "Discount Calculator", Language::En);
//!
//! let input = CalculationInput::new().with("originalPrice", 150.0).with("discountPercent", 30.0);
//! let results = DiscountCalculator::calculate(&input);
//!
//! assert!(session.record_calculation(&input, &results, &sink));
//! assert!(!session.record_calculation(&input, &results, &sink));
//! assert_eq!(sink.events().len(), 1);
//! ```

use std::collections::BTreeMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculations::{CalculationInput, CalculatorResults, InputValue};
use crate::errors::{CalcError, CalcResult};
use crate::locale::Language;

// ============================================================================
// Payloads
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EventKind {
    View,
    Calculation,
}

/// Body of a tracking call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingEvent {
    pub session_id: Uuid,
    pub calculator_slug: String,
    pub language: Language,
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub timestamp: DateTime<Utc>,
}

/// One saved calculation for a signed-in user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: Uuid,
    pub calculator_slug: String,
    pub calculator_name: String,
    pub inputs: BTreeMap<String, Option<InputValue>>,
    /// Formatted results
    pub results: BTreeMap<String, String>,
    pub summary: String,
    pub created: DateTime<Utc>,
}

/// The tracking and history services.
pub trait EventSink {
    fn track(&self, event: &TrackingEvent) -> CalcResult<()>;

    fn save_history(&self, entry: &HistoryEntry) -> CalcResult<()>;
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn track(&self, _event: &TrackingEvent) -> CalcResult<()> {
        Ok(())
    }

    fn save_history(&self, _entry: &HistoryEntry) -> CalcResult<()> {
        Ok(())
    }
}

/// Keeps every payload in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<TrackingEvent>>,
    history: Mutex<Vec<HistoryEntry>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<TrackingEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn history(&self) -> Vec<HistoryEntry> {
        self.history.lock().map(|h| h.clone()).unwrap_or_default()
    }
}

impl EventSink for RecordingSink {
    fn track(&self, event: &TrackingEvent) -> CalcResult<()> {
        self.events
            .lock()
            .map_err(|_| CalcError::collaborator_failed("tracking", "recorder lock poisoned"))?
            .push(event.clone());
        Ok(())
    }

    fn save_history(&self, entry: &HistoryEntry) -> CalcResult<()> {
        self.history
            .lock()
            .map_err(|_| CalcError::collaborator_failed("history", "recorder lock poisoned"))?
            .push(entry.clone());
        Ok(())
    }
}

// ============================================================================
// Session
// ============================================================================

/// A token that can be taken exactly once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OneShot {
    fired: bool,
}

impl OneShot {
    /// `true` the first time, `false` afterwards.
    pub fn take(&mut self) -> bool {
        !std::mem::replace(&mut self.fired, true)
    }

    pub fn is_spent(&self) -> bool {
        self.fired
    }
}

#[derive(Debug, Clone)]
pub struct CalculationSession {
    pub id: Uuid,
    pub started: DateTime<Utc>,
    pub calculator_slug: String,
    pub calculator_name: String,
    pub language: Language,
    pub signed_in: bool,
    view: OneShot,
    calculation: OneShot,
    last_saved: Option<BTreeMap<String, Option<InputValue>>>,
}

impl CalculationSession {
    pub fn new(calculator_slug: impl Into<String>, calculator_name: impl Into<String>, language: Language) -> Self {
        CalculationSession {
            id: Uuid::new_v4(),
            started: Utc::now(),
            calculator_slug: calculator_slug.into(),
            calculator_name: calculator_name.into(),
            language,
            signed_in: false,
            view: OneShot::default(),
            calculation: OneShot::default(),
            last_saved: None,
        }
    }

    pub fn signed_in(mut self, signed_in: bool) -> Self {
        self.signed_in = signed_in;
        self
    }

    fn event(&self, kind: EventKind) -> TrackingEvent {
        TrackingEvent {
            session_id: self.id,
            calculator_slug: self.calculator_slug.clone(),
            language: self.language,
            kind,
            timestamp: Utc::now(),
        }
    }

    /// Send the View event the first time this is called. Returns whether an
    /// event was emitted.
    pub fn record_view(&mut self, sink: &dyn EventSink) -> bool {
        if !self.view.take() {
            return false;
        }
        deliver("tracking", sink.track(&self.event(EventKind::View)));
        true
    }

    /// Send the Calculation event for the first valid result, and save a
    /// history entry for signed-in sessions whenever the input changed.
    /// Returns whether the Calculation event was emitted.
    pub fn record_calculation(
        &mut self,
        input: &CalculationInput,
        results: &CalculatorResults,
        sink: &dyn EventSink,
    ) -> bool {
        if !results.is_valid {
            return false;
        }

        if self.signed_in && self.last_saved.as_ref() != Some(&input.values) {
            let entry = HistoryEntry {
                id: Uuid::new_v4(),
                calculator_slug: self.calculator_slug.clone(),
                calculator_name: self.calculator_name.clone(),
                inputs: input.values.clone(),
                results: results.formatted.clone(),
                summary: results.summary.clone(),
                created: Utc::now(),
            };
            deliver("history", sink.save_history(&entry));
            self.last_saved = Some(input.values.clone());
        }

        if !self.calculation.take() {
            return false;
        }
        deliver("tracking", sink.track(&self.event(EventKind::Calculation)));
        true
    }
}

fn deliver(collaborator: &str, outcome: CalcResult<()>) {
    if let Err(err) = outcome {
        tracing::warn!(collaborator, error = %err, "collaborator call failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::{Calculator, StoneToKgCalculator};

    struct FailingSink;

    impl EventSink for FailingSink {
        fn track(&self, _event: &TrackingEvent) -> CalcResult<()> {
            Err(CalcError::collaborator_failed("tracking", "503 Service Unavailable"))
        }

        fn save_history(&self, _entry: &HistoryEntry) -> CalcResult<()> {
            Err(CalcError::collaborator_failed("history", "timeout"))
        }
    }

    fn stone(value: f64) -> (CalculationInput, CalculatorResults) {
        let input = CalculationInput::new().with("stoneValue", value);
        let results = StoneToKgCalculator::calculate(&input);
        (input, results)
    }

    #[test]
    fn test_one_shot() {
        let mut token = OneShot::default();
        assert!(!token.is_spent());
        assert!(token.take());
        assert!(!token.take());
        assert!(token.is_spent());
    }

    #[test]
    fn test_view_tracked_once() {
        let sink = RecordingSink::default();
        let mut session = CalculationSession::new("stone-to-kg", "Stone to KG", Language::Pt);
        assert!(session.record_view(&sink));
        assert!(!session.record_view(&sink));

        let events = sink.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, EventKind::View);
        assert_eq!(events[0].language, Language::Pt);
        assert_eq!(events[0].session_id, session.id);
    }

    #[test]
    fn test_invalid_results_not_tracked() {
        let sink = RecordingSink::default();
        let mut session = CalculationSession::new("stone-to-kg", "Stone to KG", Language::En).signed_in(true);
        let (input, results) = stone(0.0);
        assert!(!results.is_valid);
        assert!(!session.record_calculation(&input, &results, &sink));
        assert!(sink.events().is_empty());
        assert!(sink.history().is_empty());

        // The token is still available for the first valid result
        let (input, results) = stone(11.0);
        assert!(session.record_calculation(&input, &results, &sink));
    }

    #[test]
    fn test_history_only_when_signed_in_and_changed() {
        let sink = RecordingSink::default();
        let mut anonymous = CalculationSession::new("stone-to-kg", "Stone to KG", Language::En);
        let (input, results) = stone(11.0);
        anonymous.record_calculation(&input, &results, &sink);
        assert!(sink.history().is_empty());

        let mut session = CalculationSession::new("stone-to-kg", "Stone to KG", Language::En).signed_in(true);
        session.record_calculation(&input, &results, &sink);
        session.record_calculation(&input, &results, &sink);
        let (changed, changed_results) = stone(12.0);
        session.record_calculation(&changed, &changed_results, &sink);

        let history = sink.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].results["stonePounds"], "11 st 0 lbs");
        assert_eq!(history[1].calculator_slug, "stone-to-kg");
    }

    #[test]
    fn test_sink_errors_are_swallowed() {
        let mut session = CalculationSession::new("stone-to-kg", "Stone to KG", Language::En).signed_in(true);
        let (input, results) = stone(11.0);
        assert!(session.record_view(&FailingSink));
        assert!(session.record_calculation(&input, &results, &FailingSink));
        assert!(!session.record_calculation(&input, &results, &FailingSink));
    }

    #[test]
    fn test_event_json_shape() {
        let session = CalculationSession::new("bmr", "BMR Calculator", Language::Es);
        let json = serde_json::to_value(session.event(EventKind::Calculation)).unwrap();
        assert_eq!(json["calculatorSlug"], "bmr");
        assert_eq!(json["language"], "es");
        assert_eq!(json["type"], "CALCULATION");
        assert!(json.get("kind").is_none());

        let view = serde_json::to_value(session.event(EventKind::View)).unwrap();
        assert_eq!(view["type"], "VIEW");
        let back: TrackingEvent = serde_json::from_value(view).unwrap();
        assert_eq!(back.kind, EventKind::View);
    }
}

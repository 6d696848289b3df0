// src/change_detector.rs
//! Run-over-run change detection.
//!
//! The baseline is read once when the detector is built and fully replaced by
//! the current run's signatures after comparison. "New" therefore means "not
//! present in the immediately preceding run".

use std::collections::HashSet;

use crate::event::Event;
use crate::store::SignatureStore;

/// Events whose signature is not in `previous`, in input order.
pub fn identify_new(current: &[Event], previous: &HashSet<String>) -> Vec<Event> {
    current
        .iter()
        .filter(|ev| !previous.contains(ev.signature()))
        .cloned()
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct ChangeReport {
    pub new_events: Vec<Event>,
    pub seen_before: usize,
    /// False when the new baseline could not be written.
    pub persisted: bool,
}

pub struct ChangeDetector<S: SignatureStore> {
    store: S,
    baseline: HashSet<String>,
}

impl<S: SignatureStore> ChangeDetector<S> {
    pub fn new(store: S) -> Self {
        let baseline = store.load();
        tracing::debug!(baseline = baseline.len(), "loaded signature baseline");
        Self { store, baseline }
    }

    pub fn baseline(&self) -> &HashSet<String> {
        &self.baseline
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Compares against the baseline, then replaces it (in memory and in the
    /// store) with the signatures of `current`.
    pub fn detect(&mut self, current: &[Event]) -> ChangeReport {
        let new_events = identify_new(current, &self.baseline);
        let seen_before = current.len() - new_events.len();

        let next: HashSet<String> = current.iter().map(|e| e.signature().to_string()).collect();
        let persisted = match self.store.save(&next) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("write signature baseline: {e:#}");
                false
            }
        };
        self.baseline = next;

        for ev in &new_events {
            tracing::debug!(id = %ev.id(), club = ev.club(), "new event");
        }

        ChangeReport {
            new_events,
            seen_before,
            persisted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{BoatType, ClubSource, EventType};
    use crate::store::MemorySignatureStore;

    fn ev(title: &str) -> Event {
        Event::new(
            title,
            vec!["1 de agosto de 2026".into()],
            "",
            &ClubSource::new("RCNP", "https://www.rcnp.es"),
            BoatType::Mixed,
            EventType::SingleDay,
        )
    }

    #[test]
    fn first_run_everything_is_new() {
        let mut cd = ChangeDetector::new(MemorySignatureStore::new());
        let report = cd.detect(&[ev("Regata A"), ev("Regata B")]);
        assert_eq!(report.new_events.len(), 2);
        assert_eq!(report.seen_before, 0);
        assert!(report.persisted);
    }

    #[test]
    fn second_identical_run_is_empty() {
        let mut cd = ChangeDetector::new(MemorySignatureStore::new());
        let batch = [ev("Regata A"), ev("Regata B")];
        assert_eq!(cd.detect(&batch).new_events.len(), 2);
        let again = cd.detect(&batch);
        assert!(again.new_events.is_empty());
        assert_eq!(again.seen_before, 2);
    }

    #[test]
    fn baseline_is_replaced_not_merged() {
        let store = MemorySignatureStore::new();
        let mut cd = ChangeDetector::new(store);
        cd.detect(&[ev("Regata A")]);
        cd.detect(&[ev("Regata B")]);
        let report = cd.detect(&[ev("Regata A")]);
        assert_eq!(report.new_events.len(), 1, "A vanished for a run, so it is new again");
        assert_eq!(cd.store().snapshot().len(), 1);
    }

    #[test]
    fn new_subset_keeps_input_order() {
        let prev: HashSet<String> = [ev("Regata B").signature().to_string()].into();
        let out = identify_new(&[ev("Regata C"), ev("Regata B"), ev("Regata A")], &prev);
        let titles: Vec<&str> = out.iter().map(Event::title).collect();
        assert_eq!(titles, vec!["Regata C", "Regata A"]);
    }
}

// src/dedup.rs
//! Stable keep-first deduplication.
//!
//! Two passes, applied in scan order:
//! 1. signature equality (title + primary date + club)
//! 2. title-prefix equality (case-insensitive, first `title_prefix_chars`),
//!    optionally widened by a normalized-Levenshtein title threshold.

use serde::Deserialize;
use std::collections::HashSet;
use strsim::normalized_levenshtein;

use crate::event::Event;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DedupConfig {
    pub title_prefix_chars: usize,
    /// Similarity in [0.0, 1.0]; `None` disables the fuzzy check.
    pub fuzzy_title_threshold: Option<f64>,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            title_prefix_chars: 40,
            fuzzy_title_threshold: None,
        }
    }
}

/// Drops events whose signature was already seen earlier in `events`.
/// Returns (kept, removed).
pub fn dedup_by_signature(events: Vec<Event>) -> (Vec<Event>, usize) {
    let mut seen: HashSet<String> = HashSet::with_capacity(events.len());
    let mut keep = Vec::with_capacity(events.len());
    let mut removed = 0usize;
    for ev in events {
        if !seen.insert(ev.signature().to_string()) {
            removed += 1;
            continue;
        }
        keep.push(ev);
    }
    (keep, removed)
}

/// Drops events whose title matches an earlier kept title on the prefix
/// (or, when configured, by fuzzy similarity). Returns (kept, removed).
pub fn dedup_by_title(events: Vec<Event>, cfg: &DedupConfig) -> (Vec<Event>, usize) {
    let threshold = cfg.fuzzy_title_threshold.map(|t| t.clamp(0.0, 1.0));
    let mut prefixes: HashSet<String> = HashSet::with_capacity(events.len());
    let mut kept_titles: Vec<String> = Vec::new();
    let mut keep = Vec::with_capacity(events.len());
    let mut removed = 0usize;

    for ev in events {
        let title = ev.title().to_lowercase();
        let prefix: String = ev
            .title()
            .chars()
            .take(cfg.title_prefix_chars)
            .collect::<String>()
            .to_lowercase();

        let fuzzy_hit = threshold.is_some_and(|t| {
            kept_titles
                .iter()
                .any(|k| normalized_levenshtein(k, &title) >= t)
        });
        if prefixes.contains(&prefix) || fuzzy_hit {
            removed += 1;
            continue;
        }

        prefixes.insert(prefix);
        if threshold.is_some() {
            kept_titles.push(title);
        }
        keep.push(ev);
    }
    (keep, removed)
}

/// Both passes. Idempotent: running it on its own output removes nothing.
pub fn dedup(events: Vec<Event>, cfg: &DedupConfig) -> (Vec<Event>, usize) {
    let (by_sig, r1) = dedup_by_signature(events);
    let (by_title, r2) = dedup_by_title(by_sig, cfg);
    (by_title, r1 + r2)
}

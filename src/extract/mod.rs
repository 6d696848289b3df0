// src/extract/mod.rs
//! Candidate extractor: a single left-to-right pass over page lines that pairs
//! a keyword-bearing title line with the date line(s) right after it.
//!
//! ```text
//! lines[i]        title   (5..=200 chars, regatta keyword)
//! lines[i+1..=w]  dates   (at least one date match)
//! following line  details (relevance/facet signal only)
//! ```

pub mod dates;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::classify::Classifier;
use crate::event::{ClubSource, Event};
use dates::{distinct_dates, find_dates, is_future_event};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    pub min_title_chars: usize,
    pub max_title_chars: usize,
    /// How many lines after the title are scanned for dates (>= 1).
    pub date_window: usize,
    pub details_max_chars: usize,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            min_title_chars: 5,
            max_title_chars: 200,
            date_window: 1,
            details_max_chars: 200,
        }
    }
}

/// Everything the extractor decides with, borrowed from the run.
#[derive(Debug, Clone, Copy)]
pub struct ExtractRules<'a> {
    pub classifier: &'a Classifier,
    pub config: &'a ExtractConfig,
    pub cutoff_year: i32,
    pub today: NaiveDate,
}

/// Extractor output plus counters for logging/metrics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub events: Vec<Event>,
    /// Title + date pairings found before filtering.
    pub candidates: usize,
    pub irrelevant: usize,
    pub past: usize,
}

/// Splits page text into trimmed, whitespace-collapsed, non-empty lines.
pub fn page_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(|l| l.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|l| !l.is_empty())
        .collect()
}

pub fn extract_events<S: AsRef<str>>(
    lines: &[S],
    source: &ClubSource,
    rules: &ExtractRules<'_>,
) -> Extraction {
    let cfg = rules.config;
    let n = lines.len();
    let mut out = Extraction::default();

    for i in 0..n.saturating_sub(1) {
        let title = lines[i].as_ref().trim();
        let len = title.chars().count();
        if len < cfg.min_title_chars || len > cfg.max_title_chars {
            continue;
        }
        if !rules.classifier.has_regatta_keyword(title) {
            continue;
        }

        let window_end = i.saturating_add(cfg.date_window.max(1)).min(n - 1);
        let per_line: Vec<Vec<String>> = (i + 1..=window_end)
            .map(|j| distinct_dates(&find_dates(lines[j].as_ref())))
            .collect();
        let Some(first_offset) = per_line.iter().position(|d| !d.is_empty()) else {
            continue;
        };
        out.candidates += 1;

        let mut found: Vec<String> = Vec::new();
        for d in per_line.iter().flatten() {
            if !found.iter().any(|f| f.eq_ignore_ascii_case(d)) {
                found.push(d.clone());
            }
        }

        // Non-date lines after the first date line, through one line past the window.
        let first_date_line = i + 1 + first_offset;
        let details_end = (window_end + 1).min(n - 1);
        let details_raw = (first_date_line + 1..=details_end)
            .filter(|&j| j > window_end || per_line[j - i - 1].is_empty())
            .map(|j| lines[j].as_ref().trim())
            .collect::<Vec<_>>()
            .join(" ");
        let details = truncate_chars(&details_raw, cfg.details_max_chars);

        if !rules.classifier.is_relevant(title, &details) {
            out.irrelevant += 1;
            tracing::debug!(club = %source.name, title, "dropped: not relevant");
            continue;
        }
        if !found
            .iter()
            .any(|d| is_future_event(d, rules.cutoff_year, rules.today))
        {
            out.past += 1;
            tracing::debug!(club = %source.name, title, "dropped: past event");
            continue;
        }

        let boat = rules.classifier.boat_type(&format!("{title} {details}"));
        let kind = rules.classifier.event_type(title, &found, &details);
        out.events
            .push(Event::new(title, found, details, source, boat, kind));
    }

    out
}

pub(crate) fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        s.chars().take(max).collect()
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{BoatType, EventType};

    fn rules<'a>(c: &'a Classifier, cfg: &'a ExtractConfig) -> ExtractRules<'a> {
        ExtractRules {
            classifier: c,
            config: cfg,
            cutoff_year: 2025,
            today: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        }
    }

    fn club() -> ClubSource {
        ClubSource::new("RCNP", "https://www.rcnp.es/regatas")
    }

    #[test]
    fn page_lines_trims_and_skips_blank() {
        let text = "  Copa   del Rey \n\n\t\n Regata  ";
        assert_eq!(page_lines(text), vec!["Copa del Rey", "Regata"]);
    }

    #[test]
    fn title_without_following_date_is_ignored() {
        let c = Classifier::default();
        let cfg = ExtractConfig::default();
        let lines = ["Regata de Otoño", "Horario de la secretaría", "12 de octubre de 2025"];
        let out = extract_events(&lines, &club(), &rules(&c, &cfg));
        assert!(out.events.is_empty());
        assert_eq!(out.candidates, 0);
    }

    #[test]
    fn title_length_bounds() {
        let c = Classifier::default();
        let cfg = ExtractConfig::default();
        let long = format!("Regata {}", "x".repeat(200));
        let lines = vec![
            "Copa".to_string(),
            "12 de octubre de 2025".to_string(),
            long,
            "12 de octubre de 2025".to_string(),
        ];
        let out = extract_events(&lines, &club(), &rules(&c, &cfg));
        assert!(out.events.is_empty());
    }

    #[test]
    fn past_and_irrelevant_are_counted() {
        let c = Classifier::default();
        let cfg = ExtractConfig::default();
        let lines = [
            "Trofeo Primavera",
            "3 de abril de 2025",
            "Flota crucero",
            "Resultados Regata X",
            "3 de agosto de 2025",
            "Clasificación general",
        ];
        let out = extract_events(&lines, &club(), &rules(&c, &cfg));
        assert!(out.events.is_empty());
        assert_eq!(out.candidates, 2);
        assert_eq!(out.past, 1);
        assert_eq!(out.irrelevant, 1);
    }

    #[test]
    fn wider_window_finds_late_date_and_collects_details() {
        let c = Classifier::default();
        let cfg = ExtractConfig {
            date_window: 3,
            ..ExtractConfig::default()
        };
        let lines = [
            "Campeonato ILCA Baleares",
            "Palma de Mallorca",
            "20/09/2025",
            "Flota ILCA 6 e ILCA 7",
            "Otro texto",
        ];
        let out = extract_events(&lines, &club(), &rules(&c, &cfg));
        assert_eq!(out.events.len(), 1);
        let ev = &out.events[0];
        assert_eq!(ev.dates(), ["20/09/2025".to_string()]);
        assert_eq!(ev.details(), "Flota ILCA 6 e ILCA 7 Otro texto");
        assert_eq!(ev.boat_type(), BoatType::Dinghy);
        assert_eq!(ev.event_type(), EventType::SingleDay);
    }

    #[test]
    fn huge_window_is_clamped_to_the_page() {
        let c = Classifier::default();
        let cfg = ExtractConfig {
            date_window: usize::MAX,
            ..ExtractConfig::default()
        };
        let lines = ["Regata de Otoño", "Flota crucero", "12 de octubre de 2025"];
        let out = extract_events(&lines, &club(), &rules(&c, &cfg));
        assert_eq!(out.events.len(), 1);
        assert_eq!(out.events[0].primary_date(), "12 de octubre de 2025");
    }

    #[test]
    fn details_are_capped() {
        let c = Classifier::default();
        let cfg = ExtractConfig::default();
        let lines = vec![
            "Regata Costa Nord".to_string(),
            "15 de agosto de 2025".to_string(),
            "y".repeat(500),
        ];
        let out = extract_events(&lines, &club(), &rules(&c, &cfg));
        assert_eq!(out.events[0].details().chars().count(), 200);
    }
}

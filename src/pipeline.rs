// src/pipeline.rs
//! One batch run: fetch → extract → dedup per club, then persist, detect new
//! events and notify. Nothing in here aborts the batch; collaborator failures
//! are logged and counted.

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use metrics::{counter, describe_counter, describe_gauge, gauge};
use once_cell::sync::OnceCell;
use std::time::Duration;

use crate::change_detector::ChangeDetector;
use crate::classify::Classifier;
use crate::config::AppConfig;
use crate::dedup::{dedup, dedup_by_signature};
use crate::event::{ClubSource, Event};
use crate::extract::{extract_events, page_lines, ExtractRules, Extraction};
use crate::fetch::PageFetcher;
use crate::notify::{format_extraction_alert, format_notification, NotifierMux};
use crate::store::{EventStore, SignatureStore};

/// One-time metrics registration.
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "regatta_candidates_total",
            "Title/date pairings found before filtering."
        );
        describe_counter!(
            "regatta_events_kept_total",
            "Events kept after filtering and dedup."
        );
        describe_counter!("regatta_dedup_total", "Events removed as duplicates.");
        describe_counter!("regatta_fetch_errors_total", "Club page fetch errors.");
        describe_counter!(
            "regatta_new_events_total",
            "Events not present in the previous run."
        );
        describe_gauge!("regatta_last_run_ts", "Unix ts when the pipeline last ran.");
    });
}

/// Injected time, so runs are reproducible in tests.
#[derive(Debug, Clone, Copy)]
pub struct RunClock {
    pub today: NaiveDate,
    pub now: DateTime<Utc>,
}

impl RunClock {
    pub fn now() -> Self {
        let now = Utc::now();
        Self {
            today: now.date_naive(),
            now,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub clubs_attempted: usize,
    pub clubs_ok: usize,
    pub clubs_failed: usize,
    pub dedup_removed: usize,
    /// Every event of this run.
    pub events: Vec<Event>,
    pub new_events: Vec<Event>,
    /// The text handed to the notifier, if any (regular message or alert).
    pub message: Option<String>,
    pub alert: bool,
    pub delivered: usize,
    pub events_persisted: bool,
    pub baseline_persisted: bool,
}

/// Fetches and extracts one club. Errors only come from the fetcher.
pub async fn process_club(
    club: &ClubSource,
    fetcher: &dyn PageFetcher,
    rules: &ExtractRules<'_>,
    cfg: &AppConfig,
) -> Result<(Extraction, usize)> {
    let text = fetcher.fetch(&club.url).await?;
    let lines = page_lines(&text);
    let mut extraction = extract_events(&lines, club, rules);
    let (kept, removed) = dedup(std::mem::take(&mut extraction.events), &cfg.dedup);
    extraction.events = kept;
    Ok((extraction, removed))
}

pub async fn run_once<S: SignatureStore>(
    cfg: &AppConfig,
    classifier: &Classifier,
    fetcher: &dyn PageFetcher,
    event_store: &dyn EventStore,
    detector: &mut ChangeDetector<S>,
    notifier: &NotifierMux,
    clock: RunClock,
) -> RunSummary {
    ensure_metrics_described();

    let rules = ExtractRules {
        classifier,
        config: &cfg.extract,
        cutoff_year: cfg.run.cutoff_year_for(clock.today),
        today: clock.today,
    };
    let mut summary = RunSummary {
        clubs_attempted: cfg.clubs.len(),
        ..RunSummary::default()
    };
    let mut all = Vec::new();

    for (idx, club) in cfg.clubs.iter().enumerate() {
        if idx > 0 && cfg.run.pacing_ms > 0 {
            tokio::time::sleep(Duration::from_millis(cfg.run.pacing_ms)).await;
        }
        tracing::info!(target: "pipeline", club = %club.name, url = %club.url, "scraping");

        match process_club(club, fetcher, &rules, cfg).await {
            Ok((extraction, removed)) => {
                summary.clubs_ok += 1;
                summary.dedup_removed += removed;
                counter!("regatta_candidates_total").increment(extraction.candidates as u64);
                tracing::info!(
                    target: "pipeline",
                    club = %club.name,
                    kept = extraction.events.len(),
                    candidates = extraction.candidates,
                    irrelevant = extraction.irrelevant,
                    past = extraction.past,
                    dedup = removed,
                    "club done"
                );
                all.extend(extraction.events);
            }
            Err(e) => {
                summary.clubs_failed += 1;
                counter!("regatta_fetch_errors_total").increment(1);
                tracing::warn!(target: "pipeline", club = %club.name, error = ?e, "fetch failed; zero events for this club");
            }
        }
    }

    let (all, removed) = dedup_by_signature(all);
    summary.dedup_removed += removed;
    counter!("regatta_dedup_total").increment(summary.dedup_removed as u64);
    counter!("regatta_events_kept_total").increment(all.len() as u64);

    summary.events_persisted = match event_store.save(&all) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(target: "pipeline", "write events: {e:#}");
            false
        }
    };

    let report = detector.detect(&all);
    summary.baseline_persisted = report.persisted;
    counter!("regatta_new_events_total").increment(report.new_events.len() as u64);

    tracing::info!(
        target: "pipeline",
        clubs_ok = summary.clubs_ok,
        clubs_failed = summary.clubs_failed,
        events = all.len(),
        new = report.new_events.len(),
        seen_before = report.seen_before,
        "run complete"
    );

    if all.is_empty() {
        let alert = format_extraction_alert(summary.clubs_attempted, summary.clubs_failed, clock.now);
        tracing::warn!(target: "pipeline", "no events from any club; sending alert");
        summary.delivered = notifier.notify(&alert).await;
        summary.message = Some(alert);
        summary.alert = true;
    } else if let Some(text) = format_notification(&report.new_events, &cfg.format, clock.now) {
        summary.delivered = notifier.notify(&text).await;
        summary.message = Some(text);
    } else {
        tracing::info!(target: "pipeline", "no new regattas since last run; nothing to send");
    }

    gauge!("regatta_last_run_ts").set(clock.now.timestamp().max(0) as f64);
    summary.events = all;
    summary.new_events = report.new_events;
    summary
}

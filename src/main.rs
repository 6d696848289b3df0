//! Regatta watch batch entrypoint.
//! Scrapes every configured club once, stores the full event list and the
//! signature baseline, and notifies only events new since the previous run.

use anyhow::Context;

use regatta_watch::change_detector::ChangeDetector;
use regatta_watch::fetch::HttpPageFetcher;
use regatta_watch::store::{JsonEventStore, JsonSignatureStore};
use regatta_watch::{init_tracing, run_once, AppConfig, Classifier, NotifierMux, RunClock};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = AppConfig::load_default().context("loading regatta config")?;
    let classifier = Classifier::new(&cfg.vocabulary).context("compiling vocabulary")?;
    let fetcher = HttpPageFetcher::new(&cfg.run.user_agent, cfg.run.fetch_timeout_secs)?;
    let events = JsonEventStore::new(&cfg.run.events_path);
    let mut detector = ChangeDetector::new(JsonSignatureStore::new(&cfg.run.signatures_path));
    let mux = NotifierMux::from_env();
    if mux.is_empty() {
        tracing::info!("no notification channel configured (set TELEGRAM_BOT_TOKEN and TELEGRAM_CHAT_ID)");
    } else {
        tracing::info!(channels = ?mux.channel_names(), "notification channels");
    }

    let summary = run_once(
        &cfg,
        &classifier,
        &fetcher,
        &events,
        &mut detector,
        &mux,
        RunClock::now(),
    )
    .await;

    tracing::info!(
        clubs = summary.clubs_attempted,
        ok = summary.clubs_ok,
        failed = summary.clubs_failed,
        events = summary.events.len(),
        new = summary.new_events.len(),
        alert = summary.alert,
        delivered = summary.delivered,
        events_path = %cfg.run.events_path.display(),
        "summary"
    );
    Ok(())
}

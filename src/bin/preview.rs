//! Dry run over a local text (or HTML) file: extract, classify and print the
//! message as if every event were new. No state is read or written.
//!
//! Usage: regatta-preview <file> [club name] [url]

use anyhow::{bail, Context};

use regatta_watch::extract::{extract_events, page_lines, ExtractRules};
use regatta_watch::fetch::html_to_text;
use regatta_watch::notify::format_notification;
use regatta_watch::{init_tracing, AppConfig, Classifier, ClubSource, RunClock};

fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    init_tracing();

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        bail!("usage: regatta-preview <file> [club name] [url]");
    };
    let club = args.next().unwrap_or_else(|| "Preview".to_string());
    let url = args.next().unwrap_or_else(|| format!("file://{path}"));

    let raw = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
    let text = if raw.contains('<') { html_to_text(&raw) } else { raw };

    let cfg = AppConfig::load_default()?;
    let classifier = Classifier::new(&cfg.vocabulary)?;
    let clock = RunClock::now();
    let rules = ExtractRules {
        classifier: &classifier,
        config: &cfg.extract,
        cutoff_year: cfg.run.cutoff_year_for(clock.today),
        today: clock.today,
    };

    let source = ClubSource::new(club, url);
    let out = extract_events(&page_lines(&text), &source, &rules);
    let (events, removed) = regatta_watch::dedup::dedup(out.events, &cfg.dedup);
    eprintln!(
        "candidates={} irrelevant={} past={} duplicates={} kept={}",
        out.candidates,
        out.irrelevant,
        out.past,
        removed,
        events.len()
    );

    match format_notification(&events, &cfg.format, clock.now) {
        Some(msg) => println!("{msg}"),
        None => println!("(no upcoming regattas found)"),
    }
    Ok(())
}

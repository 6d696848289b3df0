// src/lib.rs
// Public library surface for the binaries and integration tests.

pub mod change_detector;
pub mod classify;
pub mod config;
pub mod dedup;
pub mod event;
pub mod extract;
pub mod fetch;
pub mod notify;
pub mod pipeline;
pub mod store;

// ---- Re-exports for stable public API ----
pub use crate::change_detector::{identify_new, ChangeDetector, ChangeReport};
pub use crate::classify::{Classifier, Vocabulary};
pub use crate::config::AppConfig;
pub use crate::event::{BoatType, ClubSource, Event, EventRecord, EventType};
pub use crate::notify::{Notifier, NotifierMux};
pub use crate::pipeline::{run_once, RunClock, RunSummary};

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Installs the tracing subscriber used by the binaries.
/// `RUST_LOG` drives the filter; `REGATTA_LOG_JSON=1` switches to JSON lines.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("regatta_watch=info,warn"));
    let json = std::env::var("REGATTA_LOG_JSON")
        .ok()
        .is_some_and(|v| v == "1");

    let registry = tracing_subscriber::registry().with(filter);
    let res = if json {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry.with(fmt::layer().compact()).try_init()
    };
    if let Err(e) = res {
        eprintln!("tracing already initialized: {e}");
    }
}

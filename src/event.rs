// src/event.rs
//! Event model shared by extraction, dedup, change detection and formatting.

use serde::{Deserialize, Serialize};

/// Boat-type facet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoatType {
    Yacht,
    Dinghy,
    Mixed,
}

impl BoatType {
    pub fn symbol(self) -> &'static str {
        match self {
            BoatType::Yacht => "🛥️",
            BoatType::Dinghy => "⛵",
            BoatType::Mixed => "🌊",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BoatType::Yacht => "yacht",
            BoatType::Dinghy => "dinghy",
            BoatType::Mixed => "mixed",
        }
    }
}

/// Event-type facet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    SingleDay,
    MultiDay,
    Series,
}

impl EventType {
    pub fn symbol(self) -> &'static str {
        match self {
            EventType::SingleDay => "📍",
            EventType::MultiDay => "📆",
            EventType::Series => "🔁",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EventType::SingleDay => "single day",
            EventType::MultiDay => "multi day",
            EventType::Series => "series",
        }
    }
}

/// Provenance of a page, supplied by configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClubSource {
    pub name: String,
    /// Shorter name for notifications, e.g. "RCNP".
    #[serde(default)]
    pub short_name: Option<String>,
    pub url: String,
    #[serde(default)]
    pub location: String,
}

impl ClubSource {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            short_name: None,
            url: url.into(),
            location: String::new(),
        }
    }

    pub fn display_name(&self) -> &str {
        self.short_name.as_deref().unwrap_or(&self.name)
    }
}

/// An extracted regatta that passed the relevance and future-date filters.
///
/// Fields are private: an event is built once by the extractor (facets
/// included) and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    title: String,
    dates: Vec<String>,
    details: String,
    club: String,
    club_display: String,
    location: String,
    source_url: String,
    boat_type: BoatType,
    event_type: EventType,
    signature: String,
}

impl Event {
    /// `dates` must be non-empty; the first element is the primary date.
    pub fn new(
        title: impl Into<String>,
        dates: Vec<String>,
        details: impl Into<String>,
        source: &ClubSource,
        boat_type: BoatType,
        event_type: EventType,
    ) -> Self {
        let title = title.into().trim().to_string();
        let primary = dates.first().map(String::as_str).unwrap_or_default();
        let signature = signature(&title, primary, &source.name);
        Self {
            title,
            dates,
            details: details.into(),
            club: source.name.clone(),
            club_display: source.display_name().to_string(),
            location: source.location.clone(),
            source_url: source.url.clone(),
            boat_type,
            event_type,
            signature,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }
    pub fn dates(&self) -> &[String] {
        &self.dates
    }
    pub fn primary_date(&self) -> &str {
        self.dates.first().map(String::as_str).unwrap_or_default()
    }
    pub fn details(&self) -> &str {
        &self.details
    }
    pub fn club(&self) -> &str {
        &self.club
    }
    pub fn club_display(&self) -> &str {
        &self.club_display
    }
    pub fn location(&self) -> &str {
        &self.location
    }
    pub fn source_url(&self) -> &str {
        &self.source_url
    }
    pub fn boat_type(&self) -> BoatType {
        self.boat_type
    }
    pub fn event_type(&self) -> EventType {
        self.event_type
    }
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Short anonymized id used in logs and the stored record.
    pub fn id(&self) -> String {
        anon_hash(&self.signature)
    }

    pub fn to_record(&self) -> EventRecord {
        EventRecord {
            id: self.id(),
            title: self.title.clone(),
            date: self.primary_date().to_string(),
            dates: self.dates.clone(),
            details: self.details.clone(),
            club: self.club.clone(),
            location: self.location.clone(),
            url: self.source_url.clone(),
            boat_type: self.boat_type,
            event_type: self.event_type,
            boat_symbol: self.boat_type.symbol().to_string(),
            event_symbol: self.event_type.symbol().to_string(),
        }
    }
}

/// Identity key: title + primary date + club.
pub fn signature(title: &str, primary_date: &str, club: &str) -> String {
    format!("{}|{}|{}", title.trim(), primary_date.trim(), club.trim())
}

/// First 6 bytes of SHA-256, hex.
pub fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

/// Serialized shape consumed by the calendar page. Keep field names stable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    pub id: String,
    pub title: String,
    pub date: String,
    pub dates: Vec<String>,
    pub details: String,
    pub club: String,
    pub location: String,
    pub url: String,
    pub boat_type: BoatType,
    pub event_type: EventType,
    pub boat_symbol: String,
    pub event_symbol: String,
}

// src/config/mod.rs
use anyhow::{anyhow, Context, Result};
use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::classify::Vocabulary;
use crate::dedup::DedupConfig;
use crate::event::ClubSource;
use crate::extract::ExtractConfig;
use crate::notify::FormatConfig;

pub const ENV_CONFIG_PATH: &str = "REGATTA_CONFIG_PATH";
pub const DEFAULT_TOML_PATH: &str = "config/regatta.toml";
pub const DEFAULT_JSON_PATH: &str = "config/regatta.json";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Events dated before this year are dropped; `None` means the current year.
    pub cutoff_year: Option<i32>,
    /// Pause between club fetches.
    pub pacing_ms: u64,
    pub fetch_timeout_secs: u64,
    pub user_agent: String,
    pub events_path: PathBuf,
    pub signatures_path: PathBuf,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            cutoff_year: None,
            pacing_ms: 3_000,
            fetch_timeout_secs: 15,
            user_agent: crate::fetch::DEFAULT_USER_AGENT.to_string(),
            events_path: PathBuf::from("regattas.json"),
            signatures_path: PathBuf::from("state/signatures.json"),
        }
    }
}

impl RunConfig {
    pub fn cutoff_year_for(&self, today: NaiveDate) -> i32 {
        self.cutoff_year.unwrap_or_else(|| today.year())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub run: RunConfig,
    pub extract: ExtractConfig,
    pub dedup: DedupConfig,
    pub format: FormatConfig,
    pub vocabulary: Vocabulary,
    pub clubs: Vec<ClubSource>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            run: RunConfig::default(),
            extract: ExtractConfig::default(),
            dedup: DedupConfig::default(),
            format: FormatConfig::default(),
            vocabulary: Vocabulary::default_seed(),
            clubs: default_clubs(),
        }
    }
}

fn club(name: &str, short: &str, url: &str, location: &str) -> ClubSource {
    ClubSource {
        name: name.to_string(),
        short_name: Some(short.to_string()),
        url: url.to_string(),
        location: location.to_string(),
    }
}

/// Built-in Balearic club list.
pub fn default_clubs() -> Vec<ClubSource> {
    vec![
        club("CN Port d'Ítxol", "Port d'Ítxol", "https://www.cnportitxol.info/regatas/", "Mallorca"),
        club("Real Club Náutico de Palma", "RCN Palma", "https://www.rcnp.es/regatas", "Palma"),
        club("Copa del Rey MAPFRE", "Copa del Rey", "https://www.regatacopadelrey.com/home", "Palma"),
        club("PalmaVela", "PalmaVela", "https://www.palmavela.com/", "Palma"),
        club("CN Ciutadella", "Ciutadella", "https://regates.cnciutadella.com/es/default/races", "Menorca"),
        club("CN Arenal", "Arenal", "https://regatas.cnarenal.com/es/default/races", "Mallorca"),
        club("Club Marítimo San Antonio", "CM San Antonio", "https://www.cmsap.com/en/default/races/calendar", "Ibiza"),
        club("RCN Port de Pollença", "RCN Pollença", "https://regatas.rcnpp.club/es/default/races", "Mallorca"),
    ]
}

impl AppConfig {
    /// Load from an explicit path. TOML or JSON, chosen by extension.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let cfg = match ext.as_str() {
            "json" => Self::from_json_str(&content),
            _ => Self::from_toml_str(&content),
        }
        .with_context(|| format!("parsing {}", path.display()))?;
        Ok(cfg)
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let cfg: AppConfig = toml::from_str(s)?;
        Ok(cfg.sanitized())
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        let cfg: AppConfig = serde_json::from_str(s)?;
        Ok(cfg.sanitized())
    }

    /// Resolution order:
    /// 1) $REGATTA_CONFIG_PATH (must exist)
    /// 2) config/regatta.toml
    /// 3) config/regatta.json
    /// 4) built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Self::load_from(&pb);
            } else {
                return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
            }
        }
        let toml_p = PathBuf::from(DEFAULT_TOML_PATH);
        if toml_p.exists() {
            return Self::load_from(&toml_p);
        }
        let json_p = PathBuf::from(DEFAULT_JSON_PATH);
        if json_p.exists() {
            return Self::load_from(&json_p);
        }
        Ok(Self::default())
    }

    fn sanitized(mut self) -> Self {
        let ex = &mut self.extract;
        ex.date_window = ex.date_window.max(1);
        ex.min_title_chars = ex.min_title_chars.max(1);
        if ex.min_title_chars > ex.max_title_chars {
            std::mem::swap(&mut ex.min_title_chars, &mut ex.max_title_chars);
        }

        if self.dedup.title_prefix_chars == 0 {
            self.dedup.title_prefix_chars = DedupConfig::default().title_prefix_chars;
        }
        self.dedup.fuzzy_title_threshold = self
            .dedup
            .fuzzy_title_threshold
            .filter(|t| t.is_finite())
            .map(|t| t.clamp(0.0, 1.0));

        let fmt = &mut self.format;
        if fmt.hard_limit == 0 {
            fmt.hard_limit = FormatConfig::default().hard_limit;
        }
        fmt.soft_budget = fmt.soft_budget.min(fmt.hard_limit);

        self.clubs.retain(|c| !c.name.trim().is_empty() && !c.url.trim().is_empty());
        self
    }
}

// src/notify/format.rs
//! Budget-aware message rendering.
//!
//! Events are rendered as whole blocks. A block is appended only while header +
//! blocks stay within the soft budget (and leave room for the footer under the
//! hard limit); the footer is always emitted. Lengths are counted in UTF-16
//! code units, which is how the Telegram API measures message text.

use chrono::{DateTime, Utc};
use regex::{NoExpand, Regex};
use serde::Deserialize;
use std::collections::BTreeMap;

use crate::event::{BoatType, Event, EventType};

pub const DEFAULT_CALENDAR_URL: &str = "https://abandm010.github.io/balearic-regatta-scraper";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FormatConfig {
    pub header: String,
    pub calendar_url: Option<String>,
    pub soft_budget: usize,
    pub hard_limit: usize,
    /// Word-boundary, case-insensitive substitutions applied to rendered titles.
    pub glossary: BTreeMap<String, String>,
}

impl Default for FormatConfig {
    fn default() -> Self {
        let glossary = [("ilca", "ILCA"), ("orc", "ORC"), ("optimist", "Optimist")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self {
            header: "⛵ *Balearic Sailing Regattas* ⛵".to_string(),
            calendar_url: Some(DEFAULT_CALENDAR_URL.to_string()),
            soft_budget: 3500,
            hard_limit: 4096,
            glossary,
        }
    }
}

pub fn rendered_len(s: &str) -> usize {
    s.encode_utf16().count()
}

/// Message for `events`, or `None` when there is nothing to send.
pub fn format_notification(
    events: &[Event],
    cfg: &FormatConfig,
    now: DateTime<Utc>,
) -> Option<String> {
    if events.is_empty() {
        return None;
    }

    let mut sorted: Vec<&Event> = events.iter().collect();
    sorted.sort_by(|a, b| {
        a.club()
            .cmp(b.club())
            .then_with(|| a.primary_date().cmp(b.primary_date()))
    });

    let glossary = compile_glossary(&cfg.glossary);
    let total = sorted.len();

    // Worst-case footer (truncated wording, widest numbers).
    let reserve = rendered_len(&footer(total, total, true, now));
    let room = cfg.hard_limit.saturating_sub(reserve);
    let limit = cfg.soft_budget.min(room);

    // Header and calendar line must fit in front of the footer reserve too.
    let mut calendar = cfg
        .calendar_url
        .as_deref()
        .filter(|u| !u.is_empty())
        .map(|url| format!("📅 [View Full Calendar]({})\n", link_target(url)))
        .unwrap_or_default();
    if rendered_len(&calendar) + 2 > room {
        calendar.clear();
    }
    let header_room = room.saturating_sub(rendered_len(&calendar) + 2);

    let mut out = String::new();
    out.push_str(&truncate_utf16(&cfg.header, header_room));
    out.push('\n');
    out.push_str(&calendar);
    out.push('\n');

    let mut used = rendered_len(&out);
    let mut shown = 0usize;
    let mut current_club: Option<&str> = None;

    for ev in &sorted {
        let mut block = String::new();
        if current_club.is_some_and(|c| c != ev.club()) {
            block.push_str("---\n");
        }
        block.push_str(&event_block(shown + 1, ev, &glossary));

        let len = rendered_len(&block);
        if used + len > limit {
            break;
        }
        out.push_str(&block);
        used += len;
        shown += 1;
        current_club = Some(ev.club());
    }

    out.push_str(&footer(shown, total, shown < total, now));
    Some(out)
}

/// Sent instead of the normal message when a run extracted nothing at all.
pub fn format_extraction_alert(
    clubs_attempted: usize,
    clubs_failed: usize,
    now: DateTime<Utc>,
) -> String {
    format!(
        "⚠️ *Regatta watch: no events extracted*\n\
         0 events across {clubs_attempted} club pages ({clubs_failed} failed to load).\n\
         The club sites may have changed structure.\n\
         🤖 _Checked: {}_",
        now.format("%Y-%m-%d %H:%M UTC")
    )
}

fn event_block(n: usize, ev: &Event, glossary: &[(Regex, String)]) -> String {
    let mut title = ev.title().to_string();
    for (re, to) in glossary {
        title = re.replace_all(&title, NoExpand(to)).into_owned();
    }
    format!(
        "*{n}. {club}* {boat}{kind}\n🏆 {title}\n📅 {date}\n🔗 [More info]({url})\n\n",
        club = plain(ev.club_display()),
        boat = ev.boat_type().symbol(),
        kind = ev.event_type().symbol(),
        title = plain(&title),
        date = plain(ev.primary_date()),
        url = link_target(ev.source_url()),
    )
}

fn footer(shown: usize, total: usize, truncated: bool, now: DateTime<Utc>) -> String {
    let boats = [BoatType::Yacht, BoatType::Dinghy, BoatType::Mixed]
        .iter()
        .map(|b| format!("{} {}", b.symbol(), b.label()))
        .collect::<Vec<_>>()
        .join(" · ");
    let kinds = [EventType::SingleDay, EventType::MultiDay, EventType::Series]
        .iter()
        .map(|k| format!("{} {}", k.symbol(), k.label()))
        .collect::<Vec<_>>()
        .join(" · ");
    let count = if truncated {
        format!("📊 Showing {shown} of {total} new regattas")
    } else {
        format!("📊 {total} new regattas")
    };
    format!(
        "{boats}\n{kinds}\n{count}\n🤖 _Updated: {}_",
        now.format("%Y-%m-%d %H:%M UTC")
    )
}

fn compile_glossary(map: &BTreeMap<String, String>) -> Vec<(Regex, String)> {
    map.iter()
        .filter(|(from, _)| !from.trim().is_empty())
        .filter_map(|(from, to)| {
            let pattern = format!(r"(?i)\b{}\b", regex::escape(from.trim()));
            match Regex::new(&pattern) {
                Ok(re) => Some((re, to.clone())),
                Err(e) => {
                    tracing::warn!(term = %from, "skipping glossary entry: {e}");
                    None
                }
            }
        })
        .collect()
}

/// Longest prefix of `s` that fits in `max` UTF-16 units, cut on a char boundary.
fn truncate_utf16(s: &str, max: usize) -> String {
    let mut used = 0usize;
    s.chars()
        .take_while(|c| {
            used += c.len_utf16();
            used <= max
        })
        .collect()
}

/// Strips characters that would open Markdown entities.
fn plain(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, '*' | '_' | '`' | '[' | ']'))
        .collect()
}

fn link_target(url: &str) -> String {
    url.replace(')', "%29").replace(' ', "%20")
}

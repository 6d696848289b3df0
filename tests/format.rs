// tests/format.rs
use chrono::{TimeZone, Utc};
use regatta_watch::notify::format::rendered_len;
use regatta_watch::notify::{format_extraction_alert, format_notification, FormatConfig};
use regatta_watch::{BoatType, ClubSource, Event, EventType};

fn ev(title: &str, date: &str, club: &str) -> Event {
    let mut src = ClubSource::new(club, format!("https://{}.test/regatas", club.to_lowercase()));
    src.short_name = Some(format!("{club} short"));
    Event::new(
        title,
        vec![date.to_string()],
        "",
        &src,
        BoatType::Yacht,
        EventType::MultiDay,
    )
}

fn now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 2, 7, 15, 0).unwrap()
}

#[test]
fn empty_input_means_do_not_send() {
    assert!(format_notification(&[], &FormatConfig::default(), now()).is_none());
}

#[test]
fn sorted_by_club_then_date_with_separators() {
    let cfg = FormatConfig {
        calendar_url: Some("https://example.test/calendar".into()),
        ..FormatConfig::default()
    };
    let evs = vec![
        ev("Regata Beta dos", "2026-08-02", "Beta"),
        ev("Regata Alfa", "2026-07-01", "Alfa"),
        ev("Regata Beta uno", "2026-06-01", "Beta"),
    ];
    let msg = format_notification(&evs, &cfg, now()).unwrap();

    assert!(msg.starts_with(&cfg.header));
    assert!(msg.contains("📅 [View Full Calendar](https://example.test/calendar)"));
    let a = msg.find("*1. Alfa short* 🛥️📆").unwrap();
    let b1 = msg.find("🏆 Regata Beta uno").unwrap();
    let b2 = msg.find("🏆 Regata Beta dos").unwrap();
    assert!(a < b1 && b1 < b2);
    assert_eq!(msg.matches("---\n").count(), 1);
    assert!(msg.contains("🔗 [More info](https://beta.test/regatas)"));
    assert!(msg.contains("📊 3 new regattas"));
    assert!(msg.ends_with("🤖 _Updated: 2026-05-02 07:15 UTC_"));
}

#[test]
fn glossary_applies_to_titles_only() {
    let evs = vec![ev("Trofeo crucero ilca", "2026-07-01", "Alfa")];
    let msg = format_notification(&evs, &FormatConfig::default(), now()).unwrap();
    assert!(msg.contains("🏆 Trofeo crucero ILCA"));
    assert_eq!(evs[0].title(), "Trofeo crucero ilca");
}

#[test]
fn budget_truncates_whole_blocks_and_keeps_footer() {
    let cfg = FormatConfig::default();
    let evs: Vec<Event> = (0..80)
        .map(|i| {
            ev(
                &format!("Regata número {i:02} {}", "Trofeo de larga denominación ".repeat(4)),
                &format!("2026-07-{:02}", i % 28 + 1),
                if i % 2 == 0 { "Alfa" } else { "Beta" },
            )
        })
        .collect();
    let msg = format_notification(&evs, &cfg, now()).unwrap();

    assert!(rendered_len(&msg) <= cfg.hard_limit);
    let shown = msg.matches("🏆 ").count();
    assert!(shown > 0 && shown < 80);
    assert_eq!(msg.matches("🔗 [More info](").count(), shown);
    assert_eq!(msg.matches("📅 2026-07-").count(), shown);
    assert!(msg.contains(&format!("Showing {shown} of 80 new regattas")));
    assert!(msg.contains("🛥️ yacht"));
    assert!(msg.ends_with("UTC_"));

    let body_end = msg.find("🛥️ yacht").unwrap();
    assert!(rendered_len(&msg[..body_end]) <= cfg.soft_budget);
}

#[test]
fn tiny_budget_still_emits_footer() {
    let cfg = FormatConfig {
        soft_budget: 10,
        ..FormatConfig::default()
    };
    let msg = format_notification(&[ev("Regata Alfa", "2026-07-01", "Alfa")], &cfg, now()).unwrap();
    assert_eq!(msg.matches("🏆 ").count(), 0);
    assert!(msg.contains("Showing 0 of 1 new regattas"));
}

#[test]
fn alert_text_mentions_counts() {
    let alert = format_extraction_alert(8, 3, now());
    assert!(alert.contains("no events extracted"));
    assert!(alert.contains("8 club pages (3 failed to load)"));
}

#[test]
fn default_config_links_the_full_calendar() {
    let msg = format_notification(&[ev("Regata Alfa", "2026-07-01", "Alfa")], &FormatConfig::default(), now())
        .unwrap();
    let mut lines = msg.lines();
    assert_eq!(lines.next(), Some(FormatConfig::default().header.as_str()));
    assert_eq!(
        lines.next(),
        Some("📅 [View Full Calendar](https://abandm010.github.io/balearic-regatta-scraper)")
    );
}

#[test]
fn oversized_header_is_cut_to_stay_under_hard_limit() {
    let cfg = FormatConfig {
        header: "H".repeat(4090),
        ..FormatConfig::default()
    };
    let msg = format_notification(&[ev("Regata Alfa", "2026-07-01", "Alfa")], &cfg, now()).unwrap();
    assert!(rendered_len(&msg) <= cfg.hard_limit);
    assert!(msg.starts_with("HHHH"));
    assert!(msg.contains("📅 [View Full Calendar]("));
    assert!(msg.contains("Showing 0 of 1 new regattas"));
    assert!(msg.ends_with("UTC_"));
}

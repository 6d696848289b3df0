// src/classify/mod.rs
//! Keyword classifiers: relevance gate (include/exclude vocabulary) and
//! boat-type / event-type facets.
//!
//! `Vocabulary` is the plain config schema; `Classifier` is its compiled,
//! immutable form that the extractor borrows.

pub mod facets;
pub mod relevance;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

static GARBLED_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\?{4,}").expect("garbled regex"));

/// Keyword lists. Relevance terms match as substrings; facet terms match on
/// word boundaries, so facet terms must start and end with a letter or digit.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Vocabulary {
    pub regatta: Vec<String>,
    pub exclude: Vec<String>,
    pub yacht: Vec<String>,
    pub dinghy: Vec<String>,
    pub series: Vec<String>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::default_seed()
    }
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Vocabulary {
    /// Built-in multilingual seed (Spanish, Catalan, English, German + event brands).
    pub fn default_seed() -> Self {
        Self {
            regatta: owned(&[
                // Spanish
                "regata", "copa", "trofeo", "campeonato", "competición", "torneo",
                "inscripción", "inscripciones", "calendario", "evento", "series",
                "vuelta", "memorial", "navegación", "vela", "náutico",
                // Catalan
                "competició", "torneig", "campionat", "inscripció", "inscripcions",
                "calendari", "esdeveniment", "nàutic", "trofeu",
                // English
                "regatta", "race", "sailing", "competition", "championship",
                "registration", "event", "tournament", "yacht", "boat", "cup", "trophy",
                // German
                "wettfahrt", "segelregatta", "wettbewerb", "meisterschaft", "anmeldung",
                "veranstaltung", "segeln",
                // Event brands
                "mapfre", "palmavela", "princesa", "sofia",
            ]),
            exclude: owned(&[
                "results", "resultados", "resultado", "resultat",
                "latest news", "noticias", "notícies", "news",
                "regattas office", "oficina de regatas", "oficina",
                "finished regatta", "regata finalizada", "regata acabada",
                "next tank tops", "próximas camisetas",
                "read more", "leer más", "llegir més", "more information",
                "this sunday has begun", "este domingo ha comenzado",
            ]),
            yacht: owned(&[
                "crucero", "cruceros", "cruiser", "cruisers", "keelboat", "orc", "irc",
                "j70", "j/70", "j80", "tp52", "swan", "dragon", "maxi", "offshore",
                "altura", "multihull", "multicasco", "catamaran", "catamarán",
                "trimaran", "trimarán",
            ]),
            dinghy: owned(&[
                "optimist", "ilca", "laser", "420", "470", "29er", "49er", "snipe",
                "finn", "techno", "cadete", "vela ligera", "dinghy", "windsurf",
                "raceboard", "iqfoil", "patín", "patin",
            ]),
            series: owned(&[
                "liga", "lliga", "league", "circuito", "circuit", "series", "serie",
                "temporada", "season", "interclub", "ranking",
            ]),
        }
    }
}

/// Compiled vocabulary.
#[derive(Debug, Clone)]
pub struct Classifier {
    regatta: Vec<String>,
    exclude: Vec<String>,
    yacht: Option<Regex>,
    dinghy: Option<Regex>,
    series: Option<Regex>,
}

impl Classifier {
    pub fn new(vocab: &Vocabulary) -> anyhow::Result<Self> {
        Ok(Self {
            regatta: lowercase_terms(&vocab.regatta),
            exclude: lowercase_terms(&vocab.exclude),
            yacht: word_regex(&vocab.yacht)?,
            dinghy: word_regex(&vocab.dinghy)?,
            series: word_regex(&vocab.series)?,
        })
    }

    /// True if `text` contains any regatta term (substring, case-insensitive).
    pub fn has_regatta_keyword(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.regatta.iter().any(|k| lower.contains(k.as_str()))
    }

    fn has_exclusion(&self, lower: &str) -> bool {
        self.exclude.iter().any(|k| lower.contains(k.as_str())) || GARBLED_RE.is_match(lower)
    }
}

impl Default for Classifier {
    fn default() -> Self {
        // The seed is static and compiles.
        Self::new(&Vocabulary::default_seed()).expect("default vocabulary compiles")
    }
}

fn lowercase_terms(items: &[String]) -> Vec<String> {
    items
        .iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// `\b(?:a|b|c)\b`, case-insensitive; `None` for an empty list.
fn word_regex(items: &[String]) -> anyhow::Result<Option<Regex>> {
    let terms: Vec<String> = lowercase_terms(items)
        .iter()
        .map(|t| regex::escape(t))
        .collect();
    if terms.is_empty() {
        return Ok(None);
    }
    let pattern = format!(r"(?i)\b(?:{})\b", terms.join("|"));
    let re = Regex::new(&pattern)
        .map_err(|e| anyhow::anyhow!("invalid facet vocabulary: {e}"))?;
    Ok(Some(re))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_lists_compile_and_never_match() {
        let vocab = Vocabulary {
            regatta: vec![],
            exclude: vec![],
            yacht: vec![],
            dinghy: vec![" ".into()],
            series: vec![],
        };
        let c = Classifier::new(&vocab).unwrap();
        assert!(!c.has_regatta_keyword("Regata"));
        assert!(c.yacht.is_none());
        assert!(c.dinghy.is_none());
    }

    #[test]
    fn facet_terms_match_whole_words_only() {
        let c = Classifier::default();
        let re = c.yacht.as_ref().unwrap();
        assert!(re.is_match("Trofeo ORC Club"));
        assert!(!re.is_match("circuito de invierno"));
        assert!(re.is_match("clase J/70"));
    }
}

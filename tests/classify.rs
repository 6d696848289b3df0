// tests/classify.rs
use regatta_watch::{BoatType, Classifier, EventType, Vocabulary};

#[test]
fn exclusion_dominates_inclusion() {
    let c = Classifier::default();
    for (title, details) in [
        ("Regatta results", ""),
        ("Regata", "Resultados provisionales"),
        ("Trofeu Ciutat", "Resultat final"),
        ("Copa del Rey", "Read more"),
        ("Regata finalizada", ""),
    ] {
        assert!(!c.is_relevant(title, details), "{title} / {details}");
    }
}

#[test]
fn multilingual_inclusion() {
    let c = Classifier::default();
    for title in [
        "Regata Costa Nord",
        "Campionat de Balears",
        "Sailing week",
        "Segeln Meisterschaft",
        "PalmaVela 2026",
        "Trofeo Princesa Sofía",
    ] {
        assert!(c.is_relevant(title, ""), "{title}");
    }
}

#[test]
fn yacht_precedence_when_both_present() {
    let c = Classifier::default();
    assert_eq!(c.boat_type("ORC y clase Optimist"), BoatType::Yacht);
    assert_eq!(c.boat_type("Optimist y Cruceros"), BoatType::Yacht);
    assert_eq!(c.boat_type("Optimist, ILCA, 420"), BoatType::Dinghy);
}

#[test]
fn custom_vocabulary_changes_decisions() {
    let vocab = Vocabulary {
        regatta: vec!["bootsrennen".into()],
        exclude: vec!["abgesagt".into()],
        yacht: vec!["dickschiff".into()],
        dinghy: vec![],
        series: vec!["serie".into()],
    };
    let c = Classifier::new(&vocab).unwrap();
    assert!(c.is_relevant("Bootsrennen Palma", ""));
    assert!(!c.is_relevant("Bootsrennen Palma", "abgesagt"));
    assert!(!c.is_relevant("Regata", ""));
    assert_eq!(c.boat_type("Dickschiff Cup"), BoatType::Yacht);
    assert_eq!(c.boat_type("Optimist"), BoatType::Mixed);
    assert_eq!(c.event_type("Serie A", &[], ""), EventType::Series);
}

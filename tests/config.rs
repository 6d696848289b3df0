// tests/config.rs
use regatta_watch::config::{AppConfig, ENV_CONFIG_PATH};
use std::{env, fs};

#[test]
fn parse_toml_and_json_paths() {
    let dir = tempfile::tempdir().unwrap();

    let p_toml = dir.path().join("regatta.toml");
    fs::write(
        &p_toml,
        r#"
[run]
cutoff_year = 2026
pacing_ms = 0

[vocabulary]
regatta = ["regata"]

[[clubs]]
name = "CN Test"
url = "https://cn.test/regatas"
location = "Menorca"
"#,
    )
    .unwrap();
    let cfg = AppConfig::load_from(&p_toml).unwrap();
    assert_eq!(cfg.run.cutoff_year, Some(2026));
    assert_eq!(cfg.run.pacing_ms, 0);
    assert_eq!(cfg.vocabulary.regatta, vec!["regata".to_string()]);
    // Lists not given keep the built-in seed.
    assert!(!cfg.vocabulary.exclude.is_empty());
    assert_eq!(cfg.clubs.len(), 1);
    assert_eq!(cfg.clubs[0].display_name(), "CN Test");

    let p_json = dir.path().join("regatta.json");
    fs::write(&p_json, r#"{"format": {"soft_budget": 1000}, "clubs": []}"#).unwrap();
    let cj = AppConfig::load_from(&p_json).unwrap();
    assert_eq!(cj.format.soft_budget, 1000);
    assert!(cj.clubs.is_empty());
}

#[test]
fn malformed_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("broken.toml");
    fs::write(&p, "[run\ncutoff_year = ").unwrap();
    assert!(AppConfig::load_from(&p).is_err());
}

#[serial_test::serial]
#[test]
fn default_uses_env_then_fallbacks() {
    // Isolate CWD so the repo's own config/ is not picked up.
    let old = env::current_dir().unwrap();
    let tmp = tempfile::tempdir().unwrap();
    env::set_current_dir(tmp.path()).unwrap();
    env::remove_var(ENV_CONFIG_PATH);

    // 1) Nothing on disk: built-in defaults.
    let d = AppConfig::load_default().unwrap();
    assert_eq!(d.clubs.len(), 8);
    assert_eq!(d.run.cutoff_year, None);

    // 2) JSON fallback in ./config/
    let cfg_dir = tmp.path().join("config");
    fs::create_dir_all(&cfg_dir).unwrap();
    fs::write(cfg_dir.join("regatta.json"), r#"{"run": {"pacing_ms": 7}}"#).unwrap();
    assert_eq!(AppConfig::load_default().unwrap().run.pacing_ms, 7);

    // 3) TOML wins over JSON.
    fs::write(cfg_dir.join("regatta.toml"), "[run]\npacing_ms = 11\n").unwrap();
    assert_eq!(AppConfig::load_default().unwrap().run.pacing_ms, 11);

    // 4) ENV wins over both.
    let p_env = tmp.path().join("custom.toml");
    fs::write(&p_env, "[run]\npacing_ms = 13\n").unwrap();
    env::set_var(ENV_CONFIG_PATH, p_env.display().to_string());
    assert_eq!(AppConfig::load_default().unwrap().run.pacing_ms, 13);

    // 5) ENV pointing nowhere is an error, not a silent fallback.
    env::set_var(ENV_CONFIG_PATH, tmp.path().join("missing.toml").display().to_string());
    assert!(AppConfig::load_default().is_err());
    env::remove_var(ENV_CONFIG_PATH);

    env::set_current_dir(&old).unwrap();
}

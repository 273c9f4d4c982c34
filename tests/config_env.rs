// tests/config_env.rs
use credibility_scorer::config::AppConfig;
use std::{env, fs, path::PathBuf};

const VARS: [&str; 7] = [
    "SCORER_CONFIG_PATH",
    "MODEL_CACHE",
    "BOW_URL",
    "RF_URL",
    "INFERENCE_PROVIDER",
    "HF_API_TOKEN",
    "INFERENCE_TEST_MODE",
];

fn clear_env() {
    for v in VARS {
        env::remove_var(v);
    }
}

#[serial_test::serial]
#[test]
fn default_uses_env_then_fallbacks() {
    clear_env();
    // Isolate CWD so the test never reads the repo's config/
    let old = env::current_dir().unwrap();
    let dir = tempfile::tempdir().unwrap();
    env::set_current_dir(dir.path()).unwrap();

    // 1) nothing on disk -> built-in defaults
    let c = AppConfig::load_default().unwrap();
    assert_eq!(c.scoring.min_text_len, 100);
    assert_eq!(c.models.dir, PathBuf::from("models"));

    // 2) config/scorer.toml in CWD
    fs::create_dir_all("config").unwrap();
    fs::write("config/scorer.toml", "[scoring]\nmin_text_len = 300\n").unwrap();
    assert_eq!(AppConfig::load_default().unwrap().scoring.min_text_len, 300);

    // 3) explicit path wins
    let explicit = dir.path().join("custom.toml");
    fs::write(&explicit, "[scoring]\nmin_text_len = 50\n").unwrap();
    env::set_var("SCORER_CONFIG_PATH", &explicit);
    assert_eq!(AppConfig::load_default().unwrap().scoring.min_text_len, 50);

    // 4) explicit path that does not exist is an error
    env::set_var("SCORER_CONFIG_PATH", dir.path().join("missing.toml"));
    assert!(AppConfig::load_default().is_err());

    env::set_current_dir(old).unwrap();
    clear_env();
}

#[serial_test::serial]
#[test]
fn env_overrides_models_and_provider() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("scorer.toml");
    fs::write(&p, "[inference]\nprovider = \"disabled\"\n").unwrap();

    env::set_var("MODEL_CACHE", "/tmp/model-cache");
    env::set_var("BOW_URL", "https://example.org/bow.json");
    env::set_var("RF_URL", "https://example.org/rf.json");
    env::set_var("INFERENCE_PROVIDER", "Mock");

    let c = AppConfig::load_from_file(&p).unwrap();
    assert_eq!(c.models.dir, PathBuf::from("/tmp/model-cache"));
    assert_eq!(
        c.models.vectorizer_url.as_deref(),
        Some("https://example.org/bow.json")
    );
    assert_eq!(
        c.models.classifier_url.as_deref(),
        Some("https://example.org/rf.json")
    );
    assert_eq!(c.inference.provider, "mock");
    clear_env();
}

#[serial_test::serial]
#[test]
fn huggingface_requires_token() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("scorer.toml");
    fs::write(
        &p,
        "[inference]\nprovider = \"huggingface\"\napi_token = \"ENV\"\n",
    )
    .unwrap();

    assert!(AppConfig::load_from_file(&p).is_err());

    env::set_var("HF_API_TOKEN", "hf_test_token");
    let c = AppConfig::load_from_file(&p).unwrap();
    assert_eq!(c.inference.api_token, "hf_test_token");
    clear_env();
}

#[test]
fn malformed_toml_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("scorer.toml");
    fs::write(&p, "[scoring\nmin_text_len = ").unwrap();
    let err = AppConfig::load_from_file(&p).unwrap_err();
    assert!(format!("{err:#}").contains("parsing scorer config"));
}

use livesearch_common::observability::LogFormat;
use livesearch_config::LiveSearchConfigLoader;
use livesearch_core::Mode;
use serial_test::serial;
use std::{fs, path::PathBuf};
use tempfile::TempDir;

/// Helper to write a YAML file in a temp dir and return its path.
fn write_yaml(tmp: &TempDir, name: &str, yaml: &str) -> PathBuf {
    let p = tmp.path().join(name);
    fs::write(&p, yaml).expect("write yaml");
    p
}

const FILE_YAML: &str = r#"
api:
  api_key: "${LS_TEST_XAI_KEY}"
  model: "grok-2"
  timeout_secs: 30
search:
  mode: "off"
  max_results: 7
  return_citations: false
logging:
  format: json
  filter: "livesearch_core=debug"
"#;

#[test]
#[serial]
fn loads_file_and_expands_env() {
    let tmp = TempDir::new().unwrap();
    let p = write_yaml(&tmp, "livesearch.yaml", FILE_YAML);

    let config = temp_env::with_var("LS_TEST_XAI_KEY", Some("xai-from-file-env"), || {
        LiveSearchConfigLoader::new()
            .with_file(&p)
            .load()
            .expect("load config")
    });

    assert_eq!(config.api.api_key.as_deref(), Some("xai-from-file-env"));
    assert_eq!(config.api.model, "grok-2");
    assert_eq!(config.api.timeout_secs, 30);
    assert_eq!(config.search.mode, Mode::Off);
    assert_eq!(config.search.max_results, 7);
    assert!(!config.search.return_citations);
    assert_eq!(config.logging.format, LogFormat::Json);
    assert_eq!(config.api.base_url, "https://api.x.ai/v1/");
}

#[test]
#[serial]
fn environment_overrides_file() {
    let tmp = TempDir::new().unwrap();
    let p = write_yaml(&tmp, "livesearch.yaml", FILE_YAML);

    let config = temp_env::with_vars(
        [
            ("LS_TEST_XAI_KEY", Some("ignored")),
            ("LIVESEARCH__API__MODEL", Some("grok-3-latest")),
            ("LIVESEARCH__SEARCH__MAX_RESULTS", Some("42")),
            ("LIVESEARCH__API__API_KEY", Some("xai-direct")),
        ],
        || {
            LiveSearchConfigLoader::new()
                .with_file(&p)
                .load()
                .expect("load config")
        },
    );

    assert_eq!(config.api.model, "grok-3-latest");
    assert_eq!(config.search.max_results, 42);
    assert_eq!(config.api.api_key.as_deref(), Some("xai-direct"));
    assert_eq!(config.search.mode, Mode::Off);
}

#[test]
#[serial]
fn missing_optional_file_is_fine() {
    let tmp = TempDir::new().unwrap();
    let config = LiveSearchConfigLoader::new()
        .with_optional_file(tmp.path().join("absent.yaml"))
        .load()
        .expect("defaults");
    assert_eq!(config.api.model, "grok-3-latest");
    assert_eq!(config.search.max_results, 20);
}

#[test]
#[serial]
fn missing_required_file_errors() {
    let tmp = TempDir::new().unwrap();
    let result = LiveSearchConfigLoader::new()
        .with_file(tmp.path().join("absent.yaml"))
        .load();
    assert!(result.is_err());
}

#[test]
#[serial]
fn bad_mode_is_rejected() {
    let result = LiveSearchConfigLoader::new()
        .with_yaml_str("search:\n  mode: sometimes")
        .load();
    assert!(result.is_err());
}

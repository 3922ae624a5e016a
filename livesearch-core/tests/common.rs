use std::sync::OnceLock;

use livesearch_common::observability::{LogConfig, LogFormat};

static INIT_PATH: OnceLock<std::path::PathBuf> = OnceLock::new();

#[allow(dead_code)]
pub fn init_test_tracing() {
    let _ = INIT_PATH.get_or_init(|| {
        let config = LogConfig {
            app_name: "livesearch-tests".into(),
            dir: Some(std::env::temp_dir().join("livesearch-tests")),
            stderr: true,
            format: if std::env::var("LIVESEARCH_LOG_FORMAT")
                .map(|raw| raw.trim().eq_ignore_ascii_case("json"))
                .unwrap_or(false)
            {
                LogFormat::Json
            } else {
                LogFormat::Text
            },
            filter: "debug".into(),
        };

        livesearch_common::observability::init_logging(config).expect("test tracing")
    });
}

//! Tracing setup shared by the `livesearch` binary and integration tests.
//!
//! [`LogConfig`] doubles as the `logging` section of the YAML config, so the
//! loader hands it straight to [`init_logging`]. Only the first call installs a
//! subscriber; later calls get back the path resolved the first time.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::Context;
use chrono::Local;
use serde::Deserialize;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();
static LOG_PATH: OnceLock<PathBuf> = OnceLock::new();

const LOG_DIR_ENV: &str = "LIVESEARCH_LOG_DIR";
const DEFAULT_APP_NAME: &str = "livesearch";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Output encoding for the file sink and, when enabled, stderr.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// The `logging:` section.
///
/// ```yaml
/// logging:
///   format: json
///   filter: "info,livesearch_http=debug"
///   stderr: true
///   dir: ~/logs/livesearch
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Names the log file and the fallback directory. Set by code, not YAML.
    #[serde(skip, default = "default_app_name")]
    pub app_name: String,
    pub format: LogFormat,
    /// `EnvFilter` directives used when `RUST_LOG` is unset.
    pub filter: String,
    /// Mirror events to stderr as well as the file.
    pub stderr: bool,
    /// Log directory; `LIVESEARCH_LOG_DIR`, then `~/.local/share/<app_name>`, otherwise.
    pub dir: Option<PathBuf>,
}

fn default_app_name() -> String {
    DEFAULT_APP_NAME.into()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            app_name: default_app_name(),
            format: LogFormat::Text,
            filter: "info".into(),
            stderr: false,
            dir: None,
        }
    }
}

impl LogConfig {
    /// File name stem inside the log directory; the appender adds the date.
    fn file_stem(&self) -> String {
        format!("{}.log", self.app_name)
    }
}

/// Install the global subscriber and return today's log file path.
pub fn init_logging(config: LogConfig) -> anyhow::Result<PathBuf> {
    if let Some(path) = LOG_PATH.get() {
        return Ok(path.clone());
    }

    let dir = resolve_log_dir(&config.app_name, config.dir.as_deref());
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create log directory: {}", dir.display()))?;

    let stem = config.file_stem();
    let path = dir.join(format!("{stem}.{}", Local::now().format("%Y-%m-%d")));

    let (writer, guard) = tracing_appender::non_blocking(rolling::daily(&dir, &stem));
    let _ = LOG_GUARD.set(guard);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.filter));

    tracing_subscriber::registry()
        .with(sinks(&config, writer))
        .with(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("tracing setup failed: {e}"))?;

    tracing::debug!(path = %path.display(), format = ?config.format, "logging initialised");
    let _ = LOG_PATH.set(path.clone());
    Ok(path)
}

/// File sink always; stderr only when asked. ANSI colours never reach the file.
fn sinks(config: &LogConfig, file: NonBlocking) -> Vec<BoxedLayer> {
    let mut layers: Vec<BoxedLayer> = Vec::with_capacity(2);
    match config.format {
        LogFormat::Text => {
            layers.push(fmt::layer().with_writer(file).with_ansi(false).boxed());
            if config.stderr {
                layers.push(fmt::layer().with_writer(std::io::stderr).boxed());
            }
        }
        LogFormat::Json => {
            layers.push(fmt::layer().json().with_writer(file).boxed());
            if config.stderr {
                layers.push(fmt::layer().json().with_writer(std::io::stderr).boxed());
            }
        }
    }
    layers
}

fn resolve_log_dir(app_name: &str, explicit: Option<&Path>) -> PathBuf {
    if let Some(dir) = explicit {
        return expand_home(dir);
    }

    if let Ok(env_dir) = std::env::var(LOG_DIR_ENV) {
        return expand_home(Path::new(&env_dir));
    }

    default_data_dir(app_name)
}

fn expand_home(path: &Path) -> PathBuf {
    if let Some(rest) = path.to_str().and_then(|s| s.strip_prefix("~/")) {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(rest);
        }
    }
    path.to_path_buf()
}

fn default_data_dir(app_name: &str) -> PathBuf {
    if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home)
            .join(".local")
            .join("share")
            .join(app_name)
    } else {
        PathBuf::from(".").join(app_name)
    }
}

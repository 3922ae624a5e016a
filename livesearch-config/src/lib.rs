//! Loader for live search configuration with YAML + environment overlays.
//!
//! Sources are merged in the order they are added, with `LIVESEARCH__`-prefixed
//! environment variables applied on top (`__` separates nesting levels, so
//! `LIVESEARCH__API__MODEL=grok-2` sets `api.model`). After merging, `${VAR}`
//! placeholders in string values are expanded from the process environment.
//! Every field has a default, so an empty document is a valid configuration.
//!
//! ```yaml
//! api:
//!   api_key: "${XAI_API_KEY}"
//!   model: grok-3-latest
//! search:
//!   mode: "on"
//!   max_results: 10
//! logging:
//!   format: json
//! ```
use config::{Config, ConfigError, Environment, File, FileFormat};
use livesearch_common::observability::{LogConfig, LogFormat};
use livesearch_core::{
    DEFAULT_BASE_URL, DEFAULT_MAX_RESULTS, DEFAULT_MODEL, Mode, SearchClient, SearchError,
    SearchParameters, SearchParametersBuilder,
};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use std::time::Duration;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;
const ENV_PREFIX: &str = "LIVESEARCH";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LiveSearchConfig {
    pub api: ApiConfig,
    pub search: SearchDefaults,
    /// Passed as-is to [`livesearch_common::observability::init_logging`].
    pub logging: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.into(),
            model: DEFAULT_MODEL.into(),
            timeout_secs: 120,
        }
    }
}

/// Defaults for every search; CLI flags override them per call.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchDefaults {
    pub mode: Mode,
    pub max_results: u32,
    pub return_citations: bool,
}

impl Default for SearchDefaults {
    fn default() -> Self {
        Self {
            mode: Mode::Auto,
            max_results: DEFAULT_MAX_RESULTS,
            return_citations: true,
        }
    }
}

impl LiveSearchConfig {
    /// A client for the configured endpoint, with the key set when one is configured.
    pub fn client(&self) -> Result<SearchClient, SearchError> {
        let client = SearchClient::with_base_url(&self.api.base_url)?
            .with_timeout(Duration::from_secs(self.api.timeout_secs));
        if let Some(key) = &self.api.api_key {
            client.set_key(key.as_str());
        }
        Ok(client)
    }

    /// A parameters builder seeded with the configured search defaults.
    pub fn parameters(&self) -> SearchParametersBuilder {
        SearchParameters::builder()
            .mode(self.search.mode)
            .max_results(self.search.max_results)
            .return_citations(self.search.return_citations)
    }
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hides the `config` crate wiring (YAML + env overrides).
pub struct LiveSearchConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
    env: Environment,
}

impl Default for LiveSearchConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl LiveSearchConfigLoader {
    /// Start with defaults; `LIVESEARCH__` env overrides are applied last.
    ///
    /// ```
    /// use livesearch_config::LiveSearchConfigLoader;
    ///
    /// let config = LiveSearchConfigLoader::new()
    ///     .with_yaml_str("search:\n  max_results: 5")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(config.search.max_results, 5);
    /// assert_eq!(config.api.model, "grok-3-latest");
    /// assert!(config.search.return_citations);
    /// ```
    pub fn new() -> Self {
        let env = Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true);
        Self {
            builder: Config::builder(),
            env,
        }
    }

    /// Attach a YAML/TOML/JSON file; the `config` crate infers format by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Like [`with_file`](Self::with_file), but a missing file is skipped.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Allow tests/CLI to merge inline YAML snippets.
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self.builder.add_source(File::from_str(yaml, FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources.
    ///
    /// ```
    /// use livesearch_config::LiveSearchConfigLoader;
    ///
    /// let config = temp_env::with_var("DOC_XAI_KEY", Some("xai-from-env"), || {
    ///     LiveSearchConfigLoader::new()
    ///         .with_yaml_str("api:\n  api_key: \"${DOC_XAI_KEY}\"")
    ///         .load()
    ///         .expect("valid configuration")
    /// });
    ///
    /// assert_eq!(config.api.api_key.as_deref(), Some("xai-from-env"));
    /// ```
    pub fn load(self) -> Result<LiveSearchConfig, ConfigError> {
        let cfg = self.builder.add_source(self.env).build()?;

        // Convert to serde_json::Value first
        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))
    }
}

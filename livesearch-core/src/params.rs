//! The `search_parameters` object and its builder.
//!
//! Assembly only; dates and the result limit are checked by the client right
//! before a request goes out.
use crate::error::{Result, SearchError};
use crate::source::SourceConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_MAX_RESULTS: u32 = 20;

/// Whether the provider searches live data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Let the model decide.
    #[default]
    Auto,
    On,
    Off,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Auto => "auto",
            Mode::On => "on",
            Mode::Off => "off",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Mode::Auto),
            "on" => Ok(Mode::On),
            "off" => Ok(Mode::Off),
            other => Err(SearchError::InvalidRequest(format!(
                "unknown search mode {other:?}, expected auto, on or off"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchParameters {
    pub mode: Mode,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<SourceConfig>,
    /// `YYYY-MM-DD`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_date: Option<String>,
    /// `YYYY-MM-DD`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_date: Option<String>,
    #[serde(rename = "max_search_results")]
    pub max_results: u32,
    pub return_citations: bool,
}

impl Default for SearchParameters {
    fn default() -> Self {
        Self {
            mode: Mode::Auto,
            sources: Vec::new(),
            from_date: None,
            to_date: None,
            max_results: DEFAULT_MAX_RESULTS,
            return_citations: true,
        }
    }
}

impl SearchParameters {
    /// Start from the defaults: auto mode, no sources, 20 results, citations on.
    ///
    /// ```
    /// use livesearch_core::{Mode, SearchParameters, SourceConfig};
    ///
    /// let params = SearchParameters::builder()
    ///     .mode(Mode::On)
    ///     .source(SourceConfig::web())
    ///     .from_date("2025-01-01")
    ///     .max_results(10)
    ///     .build();
    ///
    /// assert_eq!(
    ///     serde_json::to_value(&params).unwrap(),
    ///     serde_json::json!({
    ///         "mode": "on",
    ///         "sources": [{"type": "web"}],
    ///         "from_date": "2025-01-01",
    ///         "max_search_results": 10,
    ///         "return_citations": true
    ///     })
    /// );
    /// ```
    pub fn builder() -> SearchParametersBuilder {
        SearchParametersBuilder::default()
    }
}

#[derive(Debug, Clone, Default)]
pub struct SearchParametersBuilder {
    params: SearchParameters,
}

impl SearchParametersBuilder {
    pub fn mode(mut self, mode: Mode) -> Self {
        self.params.mode = mode;
        self
    }

    /// Append one source; order is kept.
    pub fn source(mut self, source: SourceConfig) -> Self {
        self.params.sources.push(source);
        self
    }

    /// Replace the source list.
    pub fn sources<I>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = SourceConfig>,
    {
        self.params.sources = sources.into_iter().collect();
        self
    }

    pub fn from_date(mut self, date: impl Into<String>) -> Self {
        self.params.from_date = Some(date.into());
        self
    }

    pub fn to_date(mut self, date: impl Into<String>) -> Self {
        self.params.to_date = Some(date.into());
        self
    }

    /// Set or clear both ends of the date range; blank strings count as unset.
    pub fn date_range(mut self, from: Option<String>, to: Option<String>) -> Self {
        self.params.from_date = from.filter(|d| !d.trim().is_empty());
        self.params.to_date = to.filter(|d| !d.trim().is_empty());
        self
    }

    pub fn max_results(mut self, n: u32) -> Self {
        self.params.max_results = n;
        self
    }

    pub fn return_citations(mut self, yes: bool) -> Self {
        self.params.return_citations = yes;
        self
    }

    pub fn build(self) -> SearchParameters {
        self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_serialize_without_sources() {
        let v = serde_json::to_value(SearchParameters::default()).unwrap();
        assert_eq!(
            v,
            json!({"mode": "auto", "max_search_results": 20, "return_citations": true})
        );
        assert!(v.get("sources").is_none());
    }

    #[test]
    fn dates_are_independent() {
        let only_to = SearchParameters::builder().to_date("2025-02-01").build();
        let v = serde_json::to_value(only_to).unwrap();
        assert_eq!(v["to_date"], "2025-02-01");
        assert!(v.get("from_date").is_none());
    }

    #[test]
    fn inverted_range_is_passed_through() {
        let p = SearchParameters::builder()
            .from_date("2025-03-01")
            .to_date("2025-01-01")
            .build();
        assert_eq!(p.from_date.as_deref(), Some("2025-03-01"));
        assert_eq!(p.to_date.as_deref(), Some("2025-01-01"));
    }

    #[test]
    fn blank_dates_clear_the_range() {
        let p = SearchParameters::builder()
            .from_date("2025-01-01")
            .date_range(Some("  ".into()), Some("2025-01-31".into()))
            .build();
        assert_eq!(p.from_date, None);
        assert_eq!(p.to_date.as_deref(), Some("2025-01-31"));
    }

    #[test]
    fn sources_keep_order() {
        let p = SearchParameters::builder()
            .source(SourceConfig::news())
            .source(SourceConfig::social(["xai"]))
            .return_citations(false)
            .mode(Mode::Off)
            .build();
        assert_eq!(
            serde_json::to_value(p).unwrap(),
            json!({
                "mode": "off",
                "sources": [{"type": "news"}, {"type": "x", "x_handles": ["xai"]}],
                "max_search_results": 20,
                "return_citations": false
            })
        );
    }

    #[test]
    fn mode_parses_case_insensitively() {
        assert_eq!("ON".parse::<Mode>().unwrap(), Mode::On);
        assert_eq!(Mode::default().to_string(), "auto");
        assert!(matches!(
            "sometimes".parse::<Mode>(),
            Err(SearchError::InvalidRequest(_))
        ));
    }
}

//! Live search client: credential handling, envelope assembly, one POST.
//!
//! Each call is a single attempt. Nothing is retried or cached, and all
//! local checks (credential, query, dates) run before the network is touched.
use crate::error::{Result, SearchError};
use crate::params::SearchParameters;
use crate::parse::{parse, ParsedResult, RawResponse};
use chrono::NaiveDate;
use livesearch_http::{HttpClient, RequestOpts};
use serde::Serialize;
use std::fmt;
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.x.ai/v1/";
pub const CHAT_COMPLETIONS_PATH: &str = "chat/completions";
pub const DEFAULT_MODEL: &str = "grok-3-latest";
/// Models offered as choices to users; any identifier is accepted.
pub const KNOWN_MODELS: &[&str] = &["grok-3-latest", "grok-2", "grok-1.5-mini"];

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

/// The full request body: messages + search parameters + model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchRequest<'a> {
    pub messages: Vec<ChatMessage<'a>>,
    pub search_parameters: &'a SearchParameters,
    pub model: &'a str,
}

impl<'a> SearchRequest<'a> {
    /// Wrap `query` as the single user message.
    ///
    /// ```
    /// use livesearch_core::{SearchParameters, SearchRequest};
    ///
    /// let params = SearchParameters::default();
    /// let req = SearchRequest::new("latest AI news", "grok-3-latest", &params);
    /// let v = serde_json::to_value(&req).unwrap();
    ///
    /// assert_eq!(v["messages"][0]["role"], "user");
    /// assert_eq!(v["messages"][0]["content"], "latest AI news");
    /// assert_eq!(v["search_parameters"]["mode"], "auto");
    /// assert_eq!(v["model"], "grok-3-latest");
    /// ```
    pub fn new(query: &'a str, model: &'a str, search_parameters: &'a SearchParameters) -> Self {
        Self {
            messages: vec![ChatMessage {
                role: "user",
                content: query,
            }],
            search_parameters,
            model,
        }
    }

    /// Local checks run before anything is sent.
    pub fn validate(&self) -> Result<()> {
        let query = self.messages.first().map(|m| m.content).unwrap_or_default();
        if query.trim().is_empty() {
            return Err(SearchError::InvalidRequest("query is empty".into()));
        }
        if self.model.trim().is_empty() {
            return Err(SearchError::InvalidRequest("model is empty".into()));
        }

        let params = self.search_parameters;
        if params.max_results == 0 {
            return Err(SearchError::InvalidRequest(
                "max_search_results must be at least 1".into(),
            ));
        }
        for (field, date) in [("from_date", &params.from_date), ("to_date", &params.to_date)] {
            if let Some(d) = date {
                NaiveDate::parse_from_str(d, DATE_FORMAT).map_err(|e| {
                    SearchError::InvalidRequest(format!("{field} {d:?} is not YYYY-MM-DD: {e}"))
                })?;
            }
        }
        Ok(())
    }
}

/// Client for the live search endpoint.
///
/// The API key sits behind a lock so it can be replaced between calls through
/// a shared reference. Swapping it while a request is in flight is the
/// caller's problem: the in-flight request keeps the key it started with.
pub struct SearchClient {
    http: HttpClient,
    api_key: RwLock<Option<String>>,
    timeout: Option<Duration>,
}

impl fmt::Debug for SearchClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchClient")
            .field("base_url", &self.http.base_url().as_str())
            .field("has_valid_key", &self.is_valid())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl SearchClient {
    /// Client for the public endpoint with no key set.
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Client for an alternative base URL (gateway, proxy, mock server).
    ///
    /// `chat/completions` is joined onto `base`, so keep the trailing slash.
    pub fn with_base_url(base: &str) -> Result<Self> {
        let http = HttpClient::new(base)?;
        Ok(Self {
            http,
            api_key: RwLock::new(None),
            timeout: None,
        })
    }

    pub fn with_key(self, key: impl Into<String>) -> Self {
        self.set_key(key);
        self
    }

    /// Per-request transport timeout; exceeding it yields [`SearchError::Transport`].
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn set_key(&self, key: impl Into<String>) {
        *self.api_key.write().unwrap_or_else(PoisonError::into_inner) = Some(key.into());
    }

    pub fn clear_key(&self) {
        *self.api_key.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// True when a key is set and is not blank after trimming.
    ///
    /// The trimmed key is exactly what goes on the wire; inner characters,
    /// quotes included, are never rewritten.
    pub fn is_valid(&self) -> bool {
        self.current_key().is_some()
    }

    fn current_key(&self) -> Option<String> {
        self.api_key
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
    }

    /// Send one search request and return the decoded body as-is.
    pub async fn execute(
        &self,
        query: &str,
        model: &str,
        parameters: &SearchParameters,
    ) -> Result<RawResponse> {
        let key = self.current_key().ok_or(SearchError::MissingCredential)?;

        let request = SearchRequest::new(query, model, parameters);
        request.validate()?;

        tracing::info!(
            model,
            mode = %parameters.mode,
            sources = parameters.sources.len(),
            max_results = parameters.max_results,
            query_len = query.len(),
            "live_search.execute"
        );

        let opts = RequestOpts {
            timeout: self.timeout,
            bearer: Some(key.as_str()),
            ..Default::default()
        };
        let raw: RawResponse = self
            .http
            .post_json_opts(CHAT_COMPLETIONS_PATH, &request, opts)
            .await
            .map_err(|e| {
                let e = SearchError::from(e);
                tracing::warn!(error = %e, retryable = e.is_retryable(), "live_search.failed");
                e
            })?;

        tracing::debug!("live_search.ok");
        Ok(raw)
    }

    /// [`execute`](Self::execute) followed by [`parse`].
    pub async fn search(
        &self,
        query: &str,
        model: &str,
        parameters: &SearchParameters,
    ) -> Result<ParsedResult> {
        let raw = self.execute(query, model, parameters).await?;
        let parsed = parse(raw);
        tracing::debug!(
            content_len = parsed.content.len(),
            citations = parsed.citations.len(),
            "live_search.parsed"
        );
        Ok(parsed)
    }
}

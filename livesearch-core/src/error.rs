use livesearch_http::HttpError;

/// Failure kinds surfaced by the builders and the search client.
///
/// The parser has no entry here: it degrades to empty values instead.
#[derive(thiserror::Error, Debug)]
pub enum SearchError {
    /// The caller asked for a source kind outside web/news/social/feed.
    #[error("unknown source kind: {0:?}")]
    UnknownSourceKind(String),

    /// No API key, or one that is blank after trimming.
    #[error("API key is not set or is blank")]
    MissingCredential,

    /// The request was rejected locally before anything was sent.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// DNS, connect, TLS, or timeout failure. No HTTP status was received.
    #[error("transport error: {cause}")]
    Transport { cause: String, timed_out: bool },

    /// The endpoint answered with a non-2xx status.
    #[error("HTTP {status_code}: {body}")]
    Http { status_code: u16, body: String },

    /// A 2xx body that is not valid JSON.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The client itself could not be set up (bad base URL, unusable key bytes).
    #[error("client error: {0}")]
    Client(String),
}

impl SearchError {
    /// Whether resubmitting the same request could plausibly succeed.
    ///
    /// Advisory only; the client never retries on its own.
    pub fn is_retryable(&self) -> bool {
        match self {
            SearchError::Transport { .. } => true,
            SearchError::Http { status_code, .. } => {
                *status_code == 429 || (500..600).contains(status_code)
            }
            _ => false,
        }
    }
}

impl From<HttpError> for SearchError {
    fn from(e: HttpError) -> Self {
        match e {
            HttpError::Network { message, timed_out } => SearchError::Transport {
                cause: message,
                timed_out,
            },
            HttpError::Api { status, body, .. } => SearchError::Http {
                status_code: status.as_u16(),
                body,
            },
            HttpError::Decode(err, snippet) => {
                SearchError::MalformedResponse(format!("{err}; body starts with: {snippet}"))
            }
            HttpError::Url(msg) | HttpError::Build(msg) => SearchError::Client(msg),
        }
    }
}

/// Convenient alias for results that use [`SearchError`].
pub type Result<T> = std::result::Result<T, SearchError>;

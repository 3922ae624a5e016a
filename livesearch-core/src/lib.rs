//! Request building, transmission, and response parsing for xAI live search.
//!
//! The pieces compose leaf-first:
//!
//! - [`SourceConfig`]: one data source (web, news, X handles, RSS feeds)
//! - [`SearchParameters`]: mode, sources, date range, limits
//! - [`SearchClient`]: holds the API key and sends one request per call
//! - [`parse`]: turns the raw response into a [`ParsedResult`]
//!
//! # Examples
//! ```no_run
//! use livesearch_core::{Mode, SearchClient, SearchParameters, SourceConfig, DEFAULT_MODEL};
//!
//! # #[tokio::main]
//! # async fn main() -> livesearch_core::Result<()> {
//! let client = SearchClient::new()?.with_key(std::env::var("XAI_API_KEY").unwrap_or_default());
//! let params = SearchParameters::builder()
//!     .mode(Mode::On)
//!     .source(SourceConfig::web())
//!     .source(SourceConfig::social(["xai"]))
//!     .from_date("2025-01-01")
//!     .max_results(10)
//!     .build();
//!
//! let result = client
//!     .search("What are the latest developments in AI?", DEFAULT_MODEL, &params)
//!     .await?;
//! println!("{}", result.content);
//! for url in &result.citations {
//!     println!("- {url}");
//! }
//! # Ok(())
//! # }
//! ```
pub mod client;
pub mod error;
pub mod params;
pub mod parse;
pub mod source;

pub use client::{SearchClient, SearchRequest, DEFAULT_BASE_URL, DEFAULT_MODEL, KNOWN_MODELS};
pub use error::{Result, SearchError};
pub use params::{Mode, SearchParameters, SearchParametersBuilder, DEFAULT_MAX_RESULTS};
pub use parse::{parse, ParsedResult, RawResponse};
pub use source::{SiteFilter, SourceConfig, SourceKind, SourceOptions};

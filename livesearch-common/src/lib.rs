//! Shared utilities for the live search workspace.
//!
//! Currently this is the observability setup every binary and integration
//! test goes through. It stays dependency-light so any crate can pull it in.
//!
//! ```rust
//! use livesearch_common::observability::{LogConfig, LogFormat};
//!
//! let cfg = LogConfig {
//!     format: LogFormat::Json,
//!     ..LogConfig::default()
//! };
//! assert_eq!(cfg.app_name, "livesearch");
//! assert_eq!(cfg.filter, "info");
//! assert!(!cfg.stderr);
//! ```
pub mod observability;

//! Per-kind data source configuration.
//!
//! [`SourceOptions`] is the permissive input bag; [`SourceConfig`] is the
//! strict output. Building copies over only the fields a kind supports, so a
//! `country` handed to a social source is dropped rather than serialized.
use crate::error::{Result, SearchError};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// The four data origins a live search can draw from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Web,
    News,
    /// X/Twitter accounts; `"x"` on the wire.
    Social,
    /// RSS feeds; `"rss"` on the wire.
    Feed,
}

impl SourceKind {
    pub const ALL: [SourceKind; 4] = [
        SourceKind::Web,
        SourceKind::News,
        SourceKind::Social,
        SourceKind::Feed,
    ];

    /// The `type` tag sent to the endpoint.
    pub fn wire_name(self) -> &'static str {
        match self {
            SourceKind::Web => "web",
            SourceKind::News => "news",
            SourceKind::Social => "x",
            SourceKind::Feed => "rss",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl FromStr for SourceKind {
    type Err = SearchError;

    /// Accepts both the domain name and the wire name, ignoring case.
    ///
    /// ```
    /// use livesearch_core::SourceKind;
    ///
    /// assert_eq!("x".parse::<SourceKind>().unwrap(), SourceKind::Social);
    /// assert_eq!("Feed".parse::<SourceKind>().unwrap(), SourceKind::Feed);
    /// assert!("video".parse::<SourceKind>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "web" => Ok(SourceKind::Web),
            "news" => Ok(SourceKind::News),
            "social" | "x" => Ok(SourceKind::Social),
            "feed" | "rss" => Ok(SourceKind::Feed),
            _ => Err(SearchError::UnknownSourceKind(s.to_string())),
        }
    }
}

/// Everything a caller may supply for any source kind.
///
/// Fields that do not apply to the requested kind are ignored by
/// [`SourceConfig::for_kind`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceOptions {
    pub country: Option<String>,
    pub excluded_sites: Option<Vec<String>>,
    pub safe_search: Option<bool>,
    pub handles: Option<Vec<String>>,
    pub links: Option<Vec<String>>,
}

/// Options shared by the web and news sources.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SiteFilter {
    /// Two-letter region code, passed through as given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(rename = "excluded_websites", skip_serializing_if = "Option::is_none")]
    pub excluded_sites: Option<Vec<String>>,
    /// Unset omits the field; `Some(false)` is sent as `false`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub safe_search: Option<bool>,
}

/// A single configured source, serialized as `{"type": ..., <kind fields>}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum SourceConfig {
    #[serde(rename = "web")]
    Web(SiteFilter),
    #[serde(rename = "news")]
    News(SiteFilter),
    #[serde(rename = "x")]
    Social {
        /// Account names without the leading `@`.
        #[serde(rename = "x_handles", skip_serializing_if = "Option::is_none")]
        handles: Option<Vec<String>>,
    },
    #[serde(rename = "rss")]
    Feed {
        #[serde(skip_serializing_if = "Option::is_none")]
        links: Option<Vec<String>>,
    },
}

impl SourceConfig {
    /// Build from a textual kind, failing only when the kind is unknown.
    ///
    /// ```
    /// use livesearch_core::{SourceConfig, SourceOptions};
    ///
    /// let cfg = SourceConfig::build(
    ///     "web",
    ///     SourceOptions {
    ///         country: Some("US".into()),
    ///         excluded_sites: Some(vec!["x.com".into()]),
    ///         safe_search: Some(true),
    ///         ..Default::default()
    ///     },
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(
    ///     serde_json::to_value(&cfg).unwrap(),
    ///     serde_json::json!({
    ///         "type": "web",
    ///         "country": "US",
    ///         "excluded_websites": ["x.com"],
    ///         "safe_search": true
    ///     })
    /// );
    /// ```
    pub fn build(kind: &str, options: SourceOptions) -> Result<Self> {
        let kind: SourceKind = kind.parse()?;
        Ok(Self::for_kind(kind, options))
    }

    /// Keep only the options `kind` supports. Empty strings and lists count as unset.
    pub fn for_kind(kind: SourceKind, options: SourceOptions) -> Self {
        let SourceOptions {
            country,
            excluded_sites,
            safe_search,
            handles,
            links,
        } = options;

        let site_filter = || SiteFilter {
            country: country.clone().filter(|c| !c.is_empty()),
            excluded_sites: non_empty(excluded_sites.clone()),
            safe_search,
        };

        match kind {
            SourceKind::Web => SourceConfig::Web(site_filter()),
            SourceKind::News => SourceConfig::News(site_filter()),
            SourceKind::Social => SourceConfig::Social {
                handles: non_empty(handles),
            },
            SourceKind::Feed => SourceConfig::Feed {
                links: non_empty(links),
            },
        }
    }

    /// A web source with no filters.
    pub fn web() -> Self {
        SourceConfig::Web(SiteFilter::default())
    }

    /// A news source with no filters.
    pub fn news() -> Self {
        SourceConfig::News(SiteFilter::default())
    }

    pub fn social<I, S>(handles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SourceConfig::Social {
            handles: non_empty(Some(handles.into_iter().map(Into::into).collect())),
        }
    }

    pub fn feed<I, S>(links: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SourceConfig::Feed {
            links: non_empty(Some(links.into_iter().map(Into::into).collect())),
        }
    }

    pub fn kind(&self) -> SourceKind {
        match self {
            SourceConfig::Web(_) => SourceKind::Web,
            SourceConfig::News(_) => SourceKind::News,
            SourceConfig::Social { .. } => SourceKind::Social,
            SourceConfig::Feed { .. } => SourceKind::Feed,
        }
    }
}

fn non_empty(list: Option<Vec<String>>) -> Option<Vec<String>> {
    list.filter(|l| !l.is_empty())
}

/// Split comma-separated user input, trimming items and dropping blanks.
///
/// ```
/// assert_eq!(
///     livesearch_core::source::split_list(" a.com, ,b.com "),
///     vec!["a.com", "b.com"]
/// );
/// ```
pub fn split_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Like [`split_list`], but also drops a leading `@` from each handle.
pub fn split_handles(input: &str) -> Vec<String> {
    split_list(input)
        .into_iter()
        .map(|h| h.trim_start_matches('@').to_string())
        .filter(|h| !h.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn everything() -> SourceOptions {
        SourceOptions {
            country: Some("US".into()),
            excluded_sites: Some(vec!["x.com".into()]),
            safe_search: Some(false),
            handles: Some(vec!["xai".into()]),
            links: Some(vec!["https://example.com/feed.xml".into()]),
        }
    }

    fn keys(v: &Value) -> Vec<String> {
        let mut k: Vec<String> = v.as_object().unwrap().keys().cloned().collect();
        k.sort();
        k
    }

    #[test]
    fn each_kind_emits_only_its_fields() {
        let allowed: [(SourceKind, &[&str]); 4] = [
            (
                SourceKind::Web,
                &["country", "excluded_websites", "safe_search", "type"],
            ),
            (
                SourceKind::News,
                &["country", "excluded_websites", "safe_search", "type"],
            ),
            (SourceKind::Social, &["type", "x_handles"]),
            (SourceKind::Feed, &["links", "type"]),
        ];

        for (kind, expected) in allowed {
            let v = serde_json::to_value(SourceConfig::for_kind(kind, everything())).unwrap();
            assert_eq!(keys(&v), expected, "kind {kind}");
            assert_eq!(v["type"], kind.wire_name());
        }
    }

    #[test]
    fn social_ignores_country() {
        let cfg = SourceConfig::build(
            "social",
            SourceOptions {
                country: Some("US".into()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(serde_json::to_value(cfg).unwrap(), json!({"type": "x"}));
    }

    #[test]
    fn safe_search_is_tri_state() {
        let unset = SourceConfig::for_kind(SourceKind::News, SourceOptions::default());
        assert_eq!(serde_json::to_value(unset).unwrap(), json!({"type": "news"}));

        let off = SourceConfig::for_kind(
            SourceKind::Web,
            SourceOptions {
                safe_search: Some(false),
                ..Default::default()
            },
        );
        assert_eq!(
            serde_json::to_value(off).unwrap(),
            json!({"type": "web", "safe_search": false})
        );
    }

    #[test]
    fn web_round_trip_is_exact() {
        let cfg = SourceConfig::build(
            "web",
            SourceOptions {
                country: Some("US".into()),
                excluded_sites: Some(vec!["x.com".into()]),
                safe_search: Some(true),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(
            serde_json::to_value(cfg).unwrap(),
            json!({"type":"web","country":"US","excluded_websites":["x.com"],"safe_search":true})
        );
    }

    #[test]
    fn lists_keep_order_and_duplicates() {
        let cfg = SourceConfig::social(["b", "a", "b"]);
        assert_eq!(
            serde_json::to_value(cfg).unwrap(),
            json!({"type": "x", "x_handles": ["b", "a", "b"]})
        );
    }

    #[test]
    fn empty_values_are_omitted() {
        let cfg = SourceConfig::for_kind(
            SourceKind::Web,
            SourceOptions {
                country: Some(String::new()),
                excluded_sites: Some(vec![]),
                ..Default::default()
            },
        );
        assert_eq!(serde_json::to_value(cfg).unwrap(), json!({"type": "web"}));
        assert_eq!(
            serde_json::to_value(SourceConfig::feed(Vec::<String>::new())).unwrap(),
            json!({"type": "rss"})
        );
    }

    #[test]
    fn unknown_kind_fails() {
        let err = SourceConfig::build("podcast", SourceOptions::default()).unwrap_err();
        assert!(matches!(err, SearchError::UnknownSourceKind(ref k) if k == "podcast"));
    }

    #[test]
    fn kind_names_parse_both_ways() {
        for kind in SourceKind::ALL {
            assert_eq!(kind.wire_name().parse::<SourceKind>().unwrap(), kind);
            assert_eq!(SourceConfig::for_kind(kind, everything()).kind(), kind);
        }
        assert_eq!(" NEWS ".parse::<SourceKind>().unwrap(), SourceKind::News);
    }

    #[test]
    fn handles_lose_their_at_sign() {
        assert_eq!(split_handles("@xai, elonmusk ,@"), vec!["xai", "elonmusk"]);
        assert!(split_list(" , ").is_empty());
    }
}

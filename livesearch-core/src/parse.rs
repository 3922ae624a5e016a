//! Normalising a chat-completions response into content + citations.
use serde::Serialize;
use serde_json::Value;

/// The decoded response body, untouched.
pub type RawResponse = Value;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedResult {
    /// First choice's message text, or empty.
    pub content: String,
    /// First choice's citation URLs in provider order, or empty.
    pub citations: Vec<String>,
    /// The response exactly as received.
    pub raw: RawResponse,
}

/// Extract content and citations from a raw response. Never fails.
///
/// Anything missing or of the wrong shape yields empty values; `raw` is
/// always the input.
///
/// ```
/// use livesearch_core::parse;
/// use serde_json::json;
///
/// let parsed = parse(json!({
///     "choices": [{"message": {"content": "hello"}, "citations": ["https://a"]}]
/// }));
/// assert_eq!(parsed.content, "hello");
/// assert_eq!(parsed.citations, vec!["https://a"]);
/// ```
pub fn parse(raw: RawResponse) -> ParsedResult {
    let first = raw
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|choices| choices.first());

    let content = first
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_default();

    let citations = first
        .and_then(|c| c.get("citations"))
        .and_then(Value::as_array)
        .map(|list| {
            list.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    if first.is_none() {
        tracing::debug!("response has no choices; returning empty result");
    }

    ParsedResult {
        content,
        citations,
        raw,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_choices() {
        let raw = json!({"choices": []});
        let p = parse(raw.clone());
        assert_eq!(p.content, "");
        assert!(p.citations.is_empty());
        assert_eq!(p.raw, raw);
    }

    #[test]
    fn missing_choices() {
        let raw = json!({"id": "abc", "usage": {"total_tokens": 3}});
        let p = parse(raw.clone());
        assert_eq!(p.content, "");
        assert!(p.citations.is_empty());
        assert_eq!(p.raw, raw);
    }

    #[test]
    fn content_and_citations() {
        let p = parse(json!({
            "choices": [{"message": {"content": "hello"}, "citations": ["https://a"]}]
        }));
        assert_eq!(p.content, "hello");
        assert_eq!(p.citations, vec!["https://a".to_string()]);
    }

    #[test]
    fn content_is_verbatim() {
        let p = parse(json!({
            "choices": [{"message": {"role": "assistant", "content": "  spaced \n"}}]
        }));
        assert_eq!(p.content, "  spaced \n");
        assert!(p.citations.is_empty());
    }

    #[test]
    fn only_first_choice_counts() {
        let p = parse(json!({
            "choices": [
                {"message": {}},
                {"message": {"content": "second"}, "citations": ["https://b"]}
            ]
        }));
        assert_eq!(p.content, "");
        assert!(p.citations.is_empty());
    }

    #[test]
    fn citations_keep_order_and_duplicates() {
        let p = parse(json!({
            "choices": [{"citations": ["https://b", "https://a", "https://b", 7, null]}]
        }));
        assert_eq!(p.content, "");
        assert_eq!(p.citations, vec!["https://b", "https://a", "https://b"]);
    }

    #[test]
    fn wrong_shapes_degrade() {
        for raw in [
            json!(null),
            json!([1, 2]),
            json!({"choices": "nope"}),
            json!({"choices": [{"message": "flat"}]}),
            json!({"choices": [{"message": {"content": 42}, "citations": "https://a"}]}),
        ] {
            let p = parse(raw.clone());
            assert_eq!(p.content, "", "input {raw}");
            assert!(p.citations.is_empty(), "input {raw}");
            assert_eq!(p.raw, raw);
        }
    }
}

//! Tolerant parsing of JSON embedded in model output.
//!
//! Models wrap JSON in code fences, prefix it with prose, or trail off with
//! commentary. [`extract_json`] locates the first balanced object or array and
//! parses only that slice.

use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("no JSON object or array found in model output")]
    NoJson,

    #[error("JSON value starting at byte {start} is never closed")]
    Unbalanced { start: usize },

    #[error("invalid JSON: {0}")]
    Invalid(#[from] serde_json::Error),
}

/// Parse the first balanced JSON object or array in `text`.
///
/// A bracketed span that is not valid JSON (a `[source]` citation, say) is
/// skipped and the search resumes after it. The first error is reported when
/// nothing parses.
pub fn extract_json(text: &str) -> Result<Value, ExtractError> {
    let mut first_error = None;
    let mut from = 0;

    while let Some(offset) = text[from..].find(['{', '[']) {
        let start = from + offset;
        let slice = match balanced_span(text, start) {
            Ok(slice) => slice,
            // Everything after an unclosed opener is inside it.
            Err(e) => return Err(first_error.unwrap_or(e)),
        };
        match serde_json::from_str(slice) {
            Ok(value) => return Ok(value),
            Err(e) => {
                tracing::debug!("Skipping invalid JSON candidate at byte {}: {}", start, e);
                first_error.get_or_insert(ExtractError::Invalid(e));
            }
        }
        from = start + slice.len();
    }

    Err(first_error.unwrap_or(ExtractError::NoJson))
}

/// The balanced `{...}` or `[...]` span opening at `start`, honoring string literals.
fn balanced_span(text: &str, start: usize) -> Result<&str, ExtractError> {
    let mut stack: Vec<u8> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for (offset, byte) in text.as_bytes()[start..].iter().enumerate() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match byte {
            b'"' => in_string = true,
            b'{' => stack.push(b'}'),
            b'[' => stack.push(b']'),
            b'}' | b']' => {
                // A mismatched closer ends the span too; serde reports it as invalid.
                let matched = stack.pop() == Some(*byte);
                if !matched || stack.is_empty() {
                    return Ok(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }

    Err(ExtractError::Unbalanced { start })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn plain_object() {
        assert_eq!(extract_json(r#"{"a": 1}"#).unwrap(), json!({"a": 1}));
    }

    #[test]
    fn fenced_with_language_tag() {
        let text = "```json\n[{\"player\": \"Jokic\", \"points\": 31}]\n```";
        assert_eq!(
            extract_json(text).unwrap(),
            json!([{"player": "Jokic", "points": 31}])
        );
    }

    #[test]
    fn prose_around_value() {
        let text = "Here are the leaders: {\"leaders\": []} Let me know if you need more.";
        assert_eq!(extract_json(text).unwrap(), json!({"leaders": []}));
    }

    #[test]
    fn braces_inside_strings_are_ignored() {
        let text = r#"{"note": "score was {close} ] really", "ok": true} trailing }"#;
        assert_eq!(
            extract_json(text).unwrap(),
            json!({"note": "score was {close} ] really", "ok": true})
        );
    }

    #[test]
    fn escaped_quotes_inside_strings() {
        let text = r#"{"quote": "he said \"json\" twice"}"#;
        assert_eq!(
            extract_json(text).unwrap()["quote"],
            json!("he said \"json\" twice")
        );
    }

    #[test]
    fn word_json_in_values_survives() {
        // Blind stripping of "json" would corrupt this value.
        let text = "```json\n{\"source\": \"jsonfeed\"}\n```";
        assert_eq!(extract_json(text).unwrap()["source"], json!("jsonfeed"));
    }

    #[test]
    fn no_json_is_typed_error() {
        assert!(matches!(
            extract_json("I could not find any statistics."),
            Err(ExtractError::NoJson)
        ));
    }

    #[test]
    fn unclosed_value_is_typed_error() {
        assert!(matches!(
            extract_json("{\"games\": [1, 2"),
            Err(ExtractError::Unbalanced { start: 0 })
        ));
    }

    #[test]
    fn bracketed_prose_before_payload_is_skipped() {
        let text = "Per [source] and {ESPN}, the leaders are: [{\"player\": \"Jokic\"}]";
        assert_eq!(extract_json(text).unwrap(), json!([{"player": "Jokic"}]));
    }

    #[test]
    fn invalid_span_contents_are_not_reused() {
        // The inner array belongs to the broken object and must not be returned.
        assert!(matches!(
            extract_json("{\"a\": [1, 2], oops}"),
            Err(ExtractError::Invalid(_))
        ));
    }

    #[test]
    fn first_error_wins_when_nothing_parses() {
        assert!(matches!(
            extract_json("[citation] then {\"games\": [1"),
            Err(ExtractError::Invalid(_))
        ));
    }

    #[test]
    fn mismatched_closer_is_invalid() {
        assert!(matches!(
            extract_json("{\"a\": [1}"),
            Err(ExtractError::Invalid(_))
        ));
    }
}

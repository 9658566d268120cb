//! Genre list <-> JSON text conversion.
//!
//! The `users.genre` column is plain text, so the list is stored as a JSON
//! array. Reads never fail: anything that is not a list of strings decodes to
//! an empty list.

use serde_json::Value;

/// Encodes the list as JSON text. Non-ASCII is written verbatim.
///
/// ```
/// use domain_users::genre::encode;
///
/// assert_eq!(encode(&["로맨스".to_string()]), r#"["로맨스"]"#);
/// ```
pub fn encode(genre: &[String]) -> String {
    serde_json::to_string(genre).unwrap_or_else(|e| {
        tracing::warn!("Failed to encode genre list, storing empty list: {}", e);
        "[]".to_string()
    })
}

/// Decodes stored text back into a list.
///
/// ```
/// use domain_users::genre::decode;
///
/// assert_eq!(decode(Some(r#"["코미디"]"#)), vec!["코미디".to_string()]);
/// assert!(decode(Some("not json")).is_empty());
/// assert!(decode(None).is_empty());
/// ```
pub fn decode(raw: Option<&str>) -> Vec<String> {
    match raw {
        None => Vec::new(),
        Some(text) if text.trim().is_empty() => Vec::new(),
        Some(text) => match serde_json::from_str::<Value>(text) {
            Ok(value) => decode_value(value),
            Err(e) => {
                tracing::debug!("Stored genre is not valid JSON: {}", e);
                Vec::new()
            }
        },
    }
}

/// Normalizes an already-parsed value into a list.
///
/// An array of strings passes through. A JSON string is treated as encoded
/// text and parsed once more. Every other shape yields an empty list.
pub fn decode_value(value: Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect::<Option<Vec<_>>>()
            .unwrap_or_default(),
        Value::String(text) => match serde_json::from_str::<Value>(&text) {
            Ok(Value::Array(items)) => decode_value(Value::Array(items)),
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_encode_keeps_non_ascii_verbatim() {
        let encoded = encode(&strings(&["로맨스", "코미디"]));
        assert_eq!(encoded, r#"["로맨스","코미디"]"#);
        assert!(!encoded.contains("\\u"));
    }

    #[test]
    fn test_encode_empty_list() {
        assert_eq!(encode(&[]), "[]");
    }

    #[test]
    fn test_decode_round_trips_encoded_list() {
        let genre = strings(&["SF", "스릴러", "with \"quotes\""]);
        assert_eq!(decode(Some(&encode(&genre))), genre);
    }

    #[test]
    fn test_decode_corrupted_text_is_empty() {
        for raw in ["", "   ", "[\"로맨스\"", "로맨스,코미디", "{}", "42", "null", "[1, 2]"] {
            assert!(decode(Some(raw)).is_empty(), "{raw:?} should decode to []");
        }
    }

    #[test]
    fn test_decode_double_encoded_text() {
        let double = serde_json::to_string(r#"["액션"]"#).unwrap();
        assert_eq!(decode(Some(&double)), strings(&["액션"]));
    }

    #[test]
    fn test_decode_value_passes_string_arrays_through() {
        assert_eq!(decode_value(json!(["a", "b"])), strings(&["a", "b"]));
    }

    #[test]
    fn test_decode_value_rejects_mixed_arrays_and_other_shapes() {
        assert!(decode_value(json!(["a", 1])).is_empty());
        assert!(decode_value(json!({"genre": ["a"]})).is_empty());
        assert!(decode_value(json!(3.5)).is_empty());
        assert!(decode_value(json!("plain text")).is_empty());
    }
}

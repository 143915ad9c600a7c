//! Error body parsing for Bedrock responses

use serde_json::Value;

/// Fields tried, in order, for a human-readable message.
const MESSAGE_FIELDS: [&str; 4] = ["message", "Message", "error", "__type"];

/// Reduce a Bedrock error body to a single message.
///
/// Returns `None` when the body is empty, not JSON, or carries none of the known
/// fields; callers then fall back to a transport-supplied message.
pub fn parse_error_message(body: &str) -> Option<String> {
    if body.trim().is_empty() {
        return None;
    }

    match serde_json::from_str::<Value>(body).ok()? {
        Value::String(message) => Some(message),
        Value::Object(fields) => MESSAGE_FIELDS
            .iter()
            .filter_map(|key| fields.get(*key))
            .find_map(|value| match value {
                Value::String(s) if !s.is_empty() => Some(s.clone()),
                _ => None,
            }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(r#"{"message":"lower"}"#, Some("lower"))]
    #[case(r#"{"Message":"upper"}"#, Some("upper"))]
    #[case(r#"{"error":"plain error"}"#, Some("plain error"))]
    #[case(r#"{"__type":"ValidationException"}"#, Some("ValidationException"))]
    #[case(r#"{"message":"first","__type":"Second"}"#, Some("first"))]
    #[case(r#"{"error":{"code":1},"__type":"Typed"}"#, Some("Typed"))]
    #[case(r#""a bare string""#, Some("a bare string"))]
    #[case(r#"{"detail":"unknown"}"#, None)]
    #[case("not json", None)]
    #[case("", None)]
    #[case("   ", None)]
    #[case("[1,2]", None)]
    fn test_parse_error_message(#[case] body: &str, #[case] expected: Option<&str>) {
        assert_eq!(parse_error_message(body).as_deref(), expected);
    }
}

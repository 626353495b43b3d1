use serde_json::Value;

/// Shape of an error body returned through the proxy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorBodyShape {
    /// Valid JSON with a top-level `error` key, i.e. a clean upstream error.
    Structured { message: Option<String> },
    /// Valid JSON, but not a recognized upstream error shape.
    UnrecognizedJson,
    /// Not JSON at all. Usually raw HTML or plain text, which points at a
    /// misconfigured proxy rather than the upstream.
    NotJson,
}

/// Classify a non-2xx response body.
///
/// Upstreams reached through these proxies report errors as JSON with a
/// top-level `error` key carrying either a `message` field or a bare string.
pub fn classify_error_body(body: &str) -> ErrorBodyShape {
    let parsed: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(_) => return ErrorBodyShape::NotJson,
    };

    match parsed.as_object().and_then(|fields| fields.get("error")) {
        Some(error) => ErrorBodyShape::Structured {
            message: extract_message(error),
        },
        None => ErrorBodyShape::UnrecognizedJson,
    }
}

fn extract_message(error: &Value) -> Option<String> {
    match error {
        Value::String(message) => Some(message.clone()),
        Value::Object(fields) => fields
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    }
}

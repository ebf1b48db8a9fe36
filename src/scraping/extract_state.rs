use serde_json::Value;

use crate::errors::ExtractionError;

/// Literal marker prefixing the inline JSON assignment the site uses for
/// client-side hydration.
pub const STATE_MARKER: &str = "window.__INITIAL_STATE__ = ";

/// Statement terminator that follows the JSON expression.
const STATE_TERMINATOR: &str = ";\n";

/// Isolates and parses the embedded hydration state out of a server-rendered
/// HTML document.
///
/// The document is split on the marker; everything up to the statement
/// terminator is parsed as JSON. When the terminator is missing the whole
/// remainder is handed to the parser, which then reports the malformation.
pub fn extract_initial_state(html: &str) -> Result<Value, ExtractionError> {
    let (_, rest) = html
        .split_once(STATE_MARKER)
        .ok_or(ExtractionError::MarkerNotFound)?;

    let json_str = rest.split(STATE_TERMINATOR).next().unwrap_or(rest);

    Ok(serde_json::from_str(json_str)?)
}

/// Walks a fixed path of nested keys, naming the first missing key. Guarded
/// step-by-step navigation instead of blind indexing: a drifted page reports
/// exactly where the structure broke.
pub fn walk<'a>(value: &'a Value, path: &[&str]) -> Result<&'a Value, ExtractionError> {
    let mut current = value;
    for key in path {
        current = current
            .get(key)
            .ok_or_else(|| ExtractionError::SchemaMismatch((*key).to_string()))?;
    }
    Ok(current)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_state_up_to_terminator() {
        let html = "<html><script>window.__INITIAL_STATE__ = {\"a\": 1};\nwindow.other = 2;</script></html>";
        let state = extract_initial_state(html).unwrap();
        assert_eq!(state, json!({"a": 1}));
    }

    #[test]
    fn missing_marker_is_reported() {
        let err = extract_initial_state("<html><body>no state here</body></html>").unwrap_err();
        assert!(matches!(err, ExtractionError::MarkerNotFound));
    }

    #[test]
    fn malformed_json_is_reported() {
        let html = "window.__INITIAL_STATE__ = {\"a\": ;\n";
        let err = extract_initial_state(html).unwrap_err();
        assert!(matches!(err, ExtractionError::MalformedJson(_)));
    }

    #[test]
    fn walk_names_the_missing_key() {
        let value = json!({"a": {"b": 1}});
        assert_eq!(walk(&value, &["a", "b"]).unwrap(), &json!(1));

        let err = walk(&value, &["a", "c"]).unwrap_err();
        assert!(matches!(err, ExtractionError::SchemaMismatch(key) if key == "c"));
    }
}

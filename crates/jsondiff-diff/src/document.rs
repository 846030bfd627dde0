//! Text-level entry points: parse, validate, and compare JSON documents.
//!
//! Parsing happens strictly before diffing. If either document is malformed
//! the call fails as a whole and no partial diff is produced.

use serde::Serialize;

use jsondiff_types::JsonValue;

use crate::error::{DiffError, DiffResult, DocumentSide};
use crate::json_diff::{diff, JsonDiff};

/// Parse one document, tagging failures with the side it came from.
///
/// Text is parsed by `serde_json`, which rejects arrays and objects nested
/// more than 127 levels deep with a "recursion limit exceeded" message.
/// Values built in memory have no such limit; [`diff`] handles any depth.
pub fn parse_document(text: &str, side: DocumentSide) -> DiffResult<JsonValue> {
    serde_json::from_str(text).map_err(|e| DiffError::InvalidJson {
        side,
        message: e.to_string(),
    })
}

/// Parse two documents and diff them.
///
/// `before` is parsed first; if both are malformed, the error names `before`.
pub fn diff_documents(before: &str, after: &str) -> DiffResult<JsonDiff> {
    let before = parse_document(before, DocumentSide::Before)?;
    let after = parse_document(after, DocumentSide::After)?;
    let result = diff(&before, &after);
    tracing::debug!(
        added = result.additions(),
        removed = result.removals(),
        modified = result.modifications(),
        "documents compared"
    );
    Ok(result)
}

/// Outcome of validating a single document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Validation {
    pub valid: bool,
    /// Two-space indented text with object keys sorted.
    pub formatted: Option<String>,
    /// Parser message when the document is malformed.
    pub error: Option<String>,
}

impl Validation {
    fn invalid(error: String) -> Self {
        Self {
            valid: false,
            formatted: None,
            error: Some(error),
        }
    }
}

/// Check that `text` is well-formed JSON and pretty-print it.
///
/// Never fails: malformed input is reported through [`Validation::error`].
pub fn validate_document(text: &str) -> Validation {
    let value = match serde_json::from_str::<JsonValue>(text) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!(error = %e, "document failed validation");
            return Validation::invalid(e.to_string());
        }
    };
    match serde_json::to_string_pretty(&value) {
        Ok(formatted) => Validation {
            valid: true,
            formatted: Some(formatted),
            error: None,
        },
        Err(e) => Validation::invalid(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn diff_documents_parses_and_compares() {
        let d = diff_documents(
            r#"{"name": "John", "age": 30}"#,
            r#"{"name": "Jane", "age": 30, "city": "NYC"}"#,
        )
        .unwrap();
        assert_eq!(
            d.to_contract(),
            json!({"added": {"city": "NYC"}, "removed": {}, "modified": {"name": "Jane"}})
        );
    }

    #[test]
    fn malformed_before_is_reported() {
        let err = diff_documents("{not json", "{}").unwrap_err();
        match &err {
            DiffError::InvalidJson { side, message } => {
                assert_eq!(*side, DocumentSide::Before);
                assert!(!message.is_empty());
            }
        }
        assert!(err.to_string().starts_with("Invalid JSON (before): "));
    }

    #[test]
    fn malformed_after_is_reported() {
        let err = diff_documents("{}", "[1,").unwrap_err();
        assert!(matches!(err, DiffError::InvalidJson { side: DocumentSide::After, .. }));
    }

    #[test]
    fn first_failure_wins() {
        let err = diff_documents("", "").unwrap_err();
        assert!(matches!(err, DiffError::InvalidJson { side: DocumentSide::Before, .. }));
    }

    #[test]
    fn nesting_beyond_the_parser_limit_is_reported() {
        let nested = |depth: usize| format!("{}{}", "[".repeat(depth), "]".repeat(depth));

        assert!(parse_document(&nested(100), DocumentSide::Before).is_ok());

        let err = parse_document(&nested(200), DocumentSide::After).unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Invalid JSON (after): "), "{message}");
        assert!(message.contains("recursion limit exceeded"), "{message}");
    }

    #[test]
    fn scalar_documents_are_accepted() {
        let d = diff_documents("1", "\"one\"").unwrap();
        assert_eq!(d.modifications(), 1);
    }

    #[test]
    fn validate_formats_with_sorted_keys() {
        let v = validate_document(r#"{"b": [1, 2], "a": {"y": null, "x": true}}"#);
        assert!(v.valid);
        assert!(v.error.is_none());
        let expected = "{\n  \"a\": {\n    \"x\": true,\n    \"y\": null\n  },\n  \"b\": [\n    1,\n    2\n  ]\n}";
        assert_eq!(v.formatted.as_deref(), Some(expected));
    }

    #[test]
    fn validate_reports_parse_errors() {
        let v = validate_document("{\"a\": }");
        assert!(!v.valid);
        assert!(v.formatted.is_none());
        assert!(v.error.unwrap().contains("line 1"));
    }

    #[test]
    fn validation_serializes_for_consumers() {
        let v = validate_document("[]");
        assert_eq!(
            serde_json::to_value(&v).unwrap(),
            json!({"valid": true, "formatted": "[]", "error": null})
        );
    }
}

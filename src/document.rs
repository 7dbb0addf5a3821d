//! Decoding of JSON-based descriptor files.

use log::error;
use serde_json::Value;

/// Errors that abort a descriptor extraction.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// Input is not valid JSON
    #[error("Malformed descriptor document: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Input bytes are not UTF-8 text
    #[error("Descriptor document is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),
}

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Decode raw descriptor bytes into a JSON tree.
///
/// A leading UTF-8 byte order mark is skipped. `kind` names the document in
/// the diagnostic logged on failure.
pub fn parse_document(bytes: &[u8], kind: &str) -> Result<Value, DocumentError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let text = std::str::from_utf8(bytes).map_err(|e| {
        error!("Error decoding {} text: {}", kind, e);
        DocumentError::from(e)
    })?;
    serde_json::from_str(text).map_err(|e| {
        error!("Error decoding {} JSON: {}", kind, e);
        DocumentError::from(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let v = parse_document(br#"{"a": 1}"#, "test").unwrap();
        assert_eq!(v["a"], 1);
    }

    #[test]
    fn test_parse_with_bom() {
        let v = parse_document(b"\xEF\xBB\xBF[1, 2]", "test").unwrap();
        assert_eq!(v.as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_malformed_json() {
        let err = parse_document(b"{not json", "test").unwrap_err();
        assert!(matches!(err, DocumentError::Malformed(_)));
    }

    #[test]
    fn test_invalid_utf8() {
        let err = parse_document(b"{\"a\": \"\xFF\"}", "test").unwrap_err();
        assert!(matches!(err, DocumentError::Encoding(_)));
    }
}

//! Display formatting
//!
//! Structured content is pretty-printed with a fixed indent; key order and
//! element order are kept exactly as parsed so renderings diff stably.
//! Everything else is shown verbatim.

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Serializer, Value};

use crate::content_detection::is_structured_type;

/// Indent used for every pretty-printed document
pub const INDENT: &[u8] = b"  ";

/// Human-readable rendering of `content`. Never fails: malformed structured
/// content comes back unchanged.
pub fn format_content(content: &str, content_type: &str) -> String {
    if !is_structured_type(content_type) {
        return content.to_string();
    }
    serde_json::from_str::<Value>(content)
        .ok()
        .and_then(|tree| to_pretty(&tree))
        .unwrap_or_else(|| content.to_string())
}

/// Serialize a document tree with `INDENT`
fn to_pretty(tree: &Value) -> Option<String> {
    let mut buf = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    tree.serialize(&mut serializer).ok()?;
    String::from_utf8(buf).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pretty_prints_json() {
        let formatted = format_content(r#"{"b":1,"a":[true,null]}"#, "application/json");
        assert_eq!(formatted, "{\n  \"b\": 1,\n  \"a\": [\n    true,\n    null\n  ]\n}");
    }

    #[test]
    fn test_key_order_preserved() {
        let formatted = format_content(r#"{"z":1,"m":2,"a":3}"#, "application/json");
        let z = formatted.find("\"z\"").unwrap();
        let m = formatted.find("\"m\"").unwrap();
        let a = formatted.find("\"a\"").unwrap();
        assert!(z < m && m < a);
    }

    #[test]
    fn test_number_literals_preserved() {
        let formatted = format_content(r#"[1.50, 1e3, 12345678901234567890]"#, "application/json");
        assert!(formatted.contains("1.50"));
        assert!(formatted.contains("1e3"));
        assert!(formatted.contains("12345678901234567890"));
    }

    #[test]
    fn test_non_structured_verbatim() {
        let html = "<div class=\"a\">\n  x</div>";
        assert_eq!(format_content(html, "text/html"), html);
        assert_eq!(format_content(r#"{"a":1}"#, "text/plain"), r#"{"a":1}"#);
    }

    #[test]
    fn test_malformed_structured_falls_back() {
        assert_eq!(format_content(r#"{"a":"#, "application/json"), r#"{"a":"#);
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            (r#"{"a":{"b":[1,2,{"c":"d e"}]},"e":[]}"#, "application/json"),
            ("plain text", "text/plain"),
            ("[]", "application/json"),
            ("{ broken", "application/json"),
        ];
        for (content, content_type) in inputs {
            let once = format_content(content, content_type);
            assert_eq!(format_content(&once, content_type), once);
        }
    }
}

//! Splitting and joining markdown files with a leading YAML block.
//!
//! ```text
//! ---
//! description: Review the staged diff
//! targets: ["*"]
//! ---
//!
//! Body text, kept verbatim.
//! ```

use serde_yaml::{Mapping, Value};
use thiserror::Error;

/// Parsed metadata block. Keys are always strings; insertion order is kept.
pub type Frontmatter = Mapping;

const DELIMITER: &str = "---";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrontmatterError {
    #[error("frontmatter block opened with --- but never closed")]
    Unclosed,

    #[error("content is not valid UTF-8: {0}")]
    InvalidUtf8(String),

    #[error("invalid YAML in frontmatter: {0}")]
    Yaml(String),

    #[error("frontmatter must be a mapping, found {0}")]
    NotAMapping(&'static str),

    #[error("frontmatter keys must be strings, found {0}")]
    NonStringKey(&'static str),
}

/// A file split into its frontmatter and body.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub frontmatter: Frontmatter,
    pub body: String,
}

impl Document {
    pub fn new(frontmatter: Frontmatter, body: impl Into<String>) -> Self {
        Self {
            frontmatter,
            body: body.into(),
        }
    }

    pub fn to_file_content(&self) -> Result<String, FrontmatterError> {
        serialize(&self.frontmatter, &self.body)
    }
}

/// Decode raw file bytes and split them into frontmatter and body.
pub fn parse_bytes(bytes: &[u8]) -> Result<Document, FrontmatterError> {
    let text =
        std::str::from_utf8(bytes).map_err(|e| FrontmatterError::InvalidUtf8(e.to_string()))?;
    parse(text)
}

/// Split text into frontmatter and body.
///
/// Text whose first line is not exactly `---` has no frontmatter and is
/// returned whole as the body. One blank line after the closing delimiter
/// is treated as the separator and dropped.
pub fn parse(text: &str) -> Result<Document, FrontmatterError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let Some(after_open) = strip_opening_delimiter(text) else {
        return Ok(Document::new(Frontmatter::new(), text));
    };

    let mut offset = 0;
    for line in after_open.split_inclusive('\n') {
        if line.trim_end_matches(['\n', '\r']) == DELIMITER {
            let block = &after_open[..offset];
            let rest = &after_open[offset + line.len()..];
            let body = rest
                .strip_prefix("\r\n")
                .or_else(|| rest.strip_prefix('\n'))
                .unwrap_or(rest);
            let frontmatter = parse_block(block)?;
            return Ok(Document::new(frontmatter, body));
        }
        offset += line.len();
    }

    Err(FrontmatterError::Unclosed)
}

/// Render frontmatter and body in the form [`parse`] reads back unchanged.
pub fn serialize(frontmatter: &Frontmatter, body: &str) -> Result<String, FrontmatterError> {
    let mut out = String::with_capacity(body.len() + 64);
    out.push_str(DELIMITER);
    out.push('\n');
    if !frontmatter.is_empty() {
        let yaml =
            serde_yaml::to_string(frontmatter).map_err(|e| FrontmatterError::Yaml(e.to_string()))?;
        out.push_str(&yaml);
        if !yaml.ends_with('\n') {
            out.push('\n');
        }
    }
    out.push_str(DELIMITER);
    out.push_str("\n\n");
    out.push_str(body);
    Ok(out)
}

fn strip_opening_delimiter(text: &str) -> Option<&str> {
    if text == DELIMITER {
        return Some("");
    }
    let rest = text.strip_prefix(DELIMITER)?;
    rest.strip_prefix("\r\n").or_else(|| rest.strip_prefix('\n'))
}

fn parse_block(block: &str) -> Result<Frontmatter, FrontmatterError> {
    if block.trim().is_empty() {
        return Ok(Frontmatter::new());
    }

    let value: Value =
        serde_yaml::from_str(block).map_err(|e| FrontmatterError::Yaml(e.to_string()))?;

    match value {
        Value::Null => Ok(Frontmatter::new()),
        Value::Mapping(mapping) => {
            if let Some(key) = mapping.keys().find(|k| !k.is_string()) {
                return Err(FrontmatterError::NonStringKey(value_type_name(key)));
            }
            Ok(mapping)
        }
        other => Err(FrontmatterError::NotAMapping(value_type_name(&other))),
    }
}

/// Human-readable YAML type name used in error messages.
pub(crate) fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "list",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(pairs: &[(&str, Value)]) -> Frontmatter {
        let mut m = Frontmatter::new();
        for (k, v) in pairs {
            m.insert(Value::from(*k), v.clone());
        }
        m
    }

    #[test]
    fn test_parse_with_frontmatter() {
        let doc = parse("---\ndescription: Review code\n---\n\n# Review\n\nLook closely.\n").unwrap();
        assert_eq!(
            doc.frontmatter.get("description").and_then(Value::as_str),
            Some("Review code")
        );
        assert_eq!(doc.body, "# Review\n\nLook closely.\n");
    }

    #[test]
    fn test_parse_without_frontmatter() {
        let doc = parse("# Just markdown\n\n---\nnot a block\n").unwrap();
        assert!(doc.frontmatter.is_empty());
        assert_eq!(doc.body, "# Just markdown\n\n---\nnot a block\n");
    }

    #[test]
    fn test_parse_body_without_blank_separator() {
        let doc = parse("---\ndescription: d\n---\nBody").unwrap();
        assert_eq!(doc.body, "Body");
    }

    #[test]
    fn test_parse_empty_block() {
        let doc = parse("---\n---\n\nBody").unwrap();
        assert!(doc.frontmatter.is_empty());
        assert_eq!(doc.body, "Body");
    }

    #[test]
    fn test_parse_closing_delimiter_at_eof() {
        let doc = parse("---\ndescription: d\n---").unwrap();
        assert_eq!(doc.frontmatter.len(), 1);
        assert_eq!(doc.body, "");
    }

    #[test]
    fn test_parse_crlf() {
        let doc = parse("---\r\ndescription: d\r\n---\r\n\r\nBody\r\n").unwrap();
        assert_eq!(
            doc.frontmatter.get("description").and_then(Value::as_str),
            Some("d")
        );
        assert_eq!(doc.body, "Body\r\n");
    }

    #[test]
    fn test_parse_unclosed_block_fails() {
        let err = parse("---\ndescription: d\n\nBody never closes\n").unwrap_err();
        assert_eq!(err, FrontmatterError::Unclosed);
        assert_eq!(parse("---").unwrap_err(), FrontmatterError::Unclosed);
    }

    #[test]
    fn test_parse_invalid_utf8_fails() {
        let err = parse_bytes(&[b'-', b'-', b'-', b'\n', 0xff, 0xfe]).unwrap_err();
        assert!(matches!(err, FrontmatterError::InvalidUtf8(_)));
    }

    #[test]
    fn test_parse_non_mapping_fails() {
        let err = parse("---\n- a\n- b\n---\n\nBody").unwrap_err();
        assert_eq!(err, FrontmatterError::NotAMapping("list"));
    }

    #[test]
    fn test_parse_non_string_key_fails() {
        let err = parse("---\n1: one\n---\n\nBody").unwrap_err();
        assert_eq!(err, FrontmatterError::NonStringKey("number"));
    }

    #[test]
    fn test_parse_invalid_yaml_fails() {
        let err = parse("---\ndescription: [unterminated\n---\n\nBody").unwrap_err();
        assert!(matches!(err, FrontmatterError::Yaml(_)));
    }

    #[test]
    fn test_serialize_then_parse_reproduces_document() {
        let fm = mapping(&[
            ("targets", Value::Sequence(vec![Value::from("*")])),
            ("description", Value::from("Test description from rulesync")),
            ("root", Value::from(false)),
        ]);
        for body in ["Test body", "", "\nLeading newline\n", "---\nlooks like a block\n"] {
            let text = serialize(&fm, body).unwrap();
            let doc = parse(&text).unwrap();
            assert_eq!(doc.frontmatter, fm);
            assert_eq!(doc.body, body);
        }
    }

    #[test]
    fn test_serialize_empty_frontmatter() {
        let text = serialize(&Frontmatter::new(), "Body").unwrap();
        assert_eq!(text, "---\n---\n\nBody");
        assert_eq!(parse(&text).unwrap(), Document::new(Frontmatter::new(), "Body"));
    }
}

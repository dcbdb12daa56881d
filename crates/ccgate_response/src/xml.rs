//! The XML reply: a small tree built from reader events, then field extraction.
//!
//! The service answers with
//!
//! ```text
//! <compilationResult>
//!   <compiledCode>...</compiledCode>
//!   <warnings><warning type=".." file=".." lineno=".." charno=".." line="..">text</warning></warnings>
//!   <errors><error type=".." ...>text</error></errors>
//!   <serverErrors><error code="..">text</error></serverErrors>
//!   <statistics><originalSize>..</originalSize>...</statistics>
//! </compilationResult>
//! ```
//!
//! Diagnostics carry their fields as attributes with the description as the
//! element text.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::ParseError;
use crate::result::{CompileResult, Diagnostic, ServerError, Statistics};

/// Top-level fields this parser knows how to extract.
const KNOWN_FIELDS: [&str; 5] = [
    "compiledCode",
    "warnings",
    "errors",
    "serverErrors",
    "statistics",
];

/// A node of a parsed XML document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    /// An element with its attributes (in document order) and children.
    Element {
        /// Tag name.
        name: String,
        /// Unescaped attribute values.
        attributes: Vec<(String, String)>,
        /// Child nodes in document order.
        children: Vec<XmlNode>,
    },
    /// Unescaped character data.
    Text(String),
}

impl XmlNode {
    /// The tag name, or `None` for text.
    pub fn name(&self) -> Option<&str> {
        match self {
            XmlNode::Element { name, .. } => Some(name),
            XmlNode::Text(_) => None,
        }
    }

    /// Looks up an attribute value.
    pub fn attr(&self, key: &str) -> Option<&str> {
        match self {
            XmlNode::Element { attributes, .. } => attributes
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str()),
            XmlNode::Text(_) => None,
        }
    }

    /// Concatenated text of the direct text children (or the text itself).
    pub fn text(&self) -> String {
        match self {
            XmlNode::Text(value) => value.clone(),
            XmlNode::Element { children, .. } => children
                .iter()
                .filter_map(|child| match child {
                    XmlNode::Text(value) => Some(value.as_str()),
                    XmlNode::Element { .. } => None,
                })
                .collect(),
        }
    }

    /// Iterates over child elements, skipping text.
    pub fn elements(&self) -> impl Iterator<Item = &XmlNode> {
        let children: &[XmlNode] = match self {
            XmlNode::Element { children, .. } => children,
            XmlNode::Text(_) => &[],
        };
        children.iter().filter(|c| c.name().is_some())
    }

    /// Returns the first child element with the given name.
    pub fn child(&self, name: &str) -> Option<&XmlNode> {
        self.elements().find(|c| c.name() == Some(name))
    }
}

/// Parses a document into its top-level nodes.
///
/// Fails on mismatched or unclosed tags, bad escapes, and documents without
/// a root element.
pub fn parse_document(text: &str) -> Result<Vec<XmlNode>, ParseError> {
    let mut reader = Reader::from_str(text);
    let mut roots: Vec<XmlNode> = Vec::new();
    let mut stack: Vec<XmlNode> = Vec::new();

    loop {
        let position = reader.buffer_position() as u64;
        let event = reader.read_event().map_err(|e| ParseError::Xml {
            position,
            reason: e.to_string(),
        })?;

        match event {
            Event::Start(start) => stack.push(element(&start, position)?),
            Event::Empty(start) => {
                let node = element(&start, position)?;
                attach(&mut stack, &mut roots, node);
            }
            Event::End(_) => {
                let node = stack.pop().ok_or_else(|| ParseError::Xml {
                    position,
                    reason: "closing tag without matching opening tag".to_string(),
                })?;
                attach(&mut stack, &mut roots, node);
            }
            Event::Text(text) => {
                let value = text.unescape().map_err(|e| ParseError::Xml {
                    position,
                    reason: e.to_string(),
                })?;
                attach(&mut stack, &mut roots, XmlNode::Text(value.into_owned()));
            }
            Event::CData(data) => {
                let value = String::from_utf8_lossy(&data.into_inner()).into_owned();
                attach(&mut stack, &mut roots, XmlNode::Text(value));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(ParseError::Xml {
            position: text.len() as u64,
            reason: format!("unclosed element <{}>", open.name().unwrap_or_default()),
        });
    }
    if !roots.iter().any(|node| node.name().is_some()) {
        return Err(ParseError::Xml {
            position: 0,
            reason: "document has no root element".to_string(),
        });
    }
    Ok(roots)
}

/// Builds an element node (without children) from a start tag.
fn element(start: &BytesStart<'_>, position: u64) -> Result<XmlNode, ParseError> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| ParseError::Xml {
            position,
            reason: e.to_string(),
        })?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value().map_err(|e| ParseError::Xml {
            position,
            reason: e.to_string(),
        })?;
        attributes.push((key, value.into_owned()));
    }
    Ok(XmlNode::Element {
        name,
        attributes,
        children: Vec::new(),
    })
}

/// Appends a finished node to the innermost open element, or to the roots.
fn attach(stack: &mut [XmlNode], roots: &mut Vec<XmlNode>, node: XmlNode) {
    match stack.last_mut() {
        Some(XmlNode::Element { children, .. }) => children.push(node),
        _ => roots.push(node),
    }
}

/// Parses an XML reply into a [`CompileResult`].
pub fn parse_xml(body: &[u8]) -> Result<CompileResult, ParseError> {
    let text = std::str::from_utf8(body).map_err(|e| ParseError::Encoding {
        reason: e.to_string(),
    })?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let roots = parse_document(text)?;
    Ok(extract(&roots))
}

/// Walks the top-level fields of a parsed reply.
///
/// A single root that is not itself a known field (the service's
/// `<compilationResult>` wrapper) is descended into.
pub fn extract(roots: &[XmlNode]) -> CompileResult {
    let mut fields: Vec<&XmlNode> = roots.iter().filter(|n| n.name().is_some()).collect();
    if let [root] = fields[..] {
        if !is_known_field(root) {
            fields = root.elements().collect();
        }
    }

    let mut result = CompileResult::default();
    for field in fields {
        match field.name().unwrap_or_default() {
            "compiledCode" => result.compiled_code = field.text(),
            "warnings" => result.warnings = diagnostics(field, "warning"),
            "errors" => result.errors = diagnostics(field, "error"),
            "serverErrors" => result.server_errors = server_errors(field),
            "statistics" => result.statistics = statistics(field),
            _ => {}
        }
    }
    result
}

fn is_known_field(node: &XmlNode) -> bool {
    node.name().is_some_and(|name| KNOWN_FIELDS.contains(&name))
}

fn diagnostics(list: &XmlNode, tag: &str) -> Vec<Diagnostic> {
    list.elements()
        .filter(|e| e.name() == Some(tag))
        .map(|e| Diagnostic {
            kind: e.attr("type").unwrap_or_default().to_string(),
            file: e.attr("file").unwrap_or_default().to_string(),
            description: e.text(),
            line_number: parse_int(e.attr("lineno")),
            char_number: parse_int(e.attr("charno")),
            source_line: e.attr("line").unwrap_or_default().to_string(),
        })
        .collect()
}

fn server_errors(list: &XmlNode) -> Vec<ServerError> {
    list.elements()
        .filter(|e| e.name() == Some("error"))
        .map(|e| ServerError {
            code: parse_int(e.attr("code")),
            message: e.text(),
        })
        .collect()
}

fn statistics(stats: &XmlNode) -> Statistics {
    let value = |name: &str| -> u64 {
        stats
            .child(name)
            .and_then(|e| e.text().trim().parse().ok())
            .unwrap_or(0)
    };
    Statistics {
        original_size: value("originalSize"),
        original_gzip_size: value("originalGzipSize"),
        compressed_size: value("compressedSize"),
        compressed_gzip_size: value("compressedGzipSize"),
        compile_time_ms: value("compileTime"),
    }
}

fn parse_int(value: Option<&str>) -> i64 {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_REPLY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<compilationResult>
  <compiledCode>var a=1;alert(a &amp;&amp; 2);</compiledCode>
  <warnings>
    <warning type="JSC_WRONG_ARGUMENT_COUNT" file="Input_0" lineno="3" charno="5" line="foo(1, 2);">Function foo: called with 2 argument(s).</warning>
  </warnings>
  <errors>
    <error type="JSC_PARSE_ERROR" file="Input_1" lineno="7" charno="0" line="var = ;">Parse error. syntax error</error>
  </errors>
  <statistics>
    <originalSize>120</originalSize>
    <originalGzipSize>90</originalGzipSize>
    <compressedSize>40</compressedSize>
    <compressedGzipSize>50</compressedGzipSize>
    <compileTime>3</compileTime>
  </statistics>
</compilationResult>"#;

    #[test]
    fn parses_full_reply() {
        let result = parse_xml(FULL_REPLY.as_bytes()).unwrap();
        assert_eq!(result.compiled_code, "var a=1;alert(a && 2);");

        assert_eq!(result.warnings.len(), 1);
        let w = &result.warnings[0];
        assert_eq!(w.kind, "JSC_WRONG_ARGUMENT_COUNT");
        assert_eq!(w.file, "Input_0");
        assert_eq!(w.description, "Function foo: called with 2 argument(s).");
        assert_eq!(w.line_number, 3);
        assert_eq!(w.char_number, 5);
        assert_eq!(w.source_line, "foo(1, 2);");

        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].kind, "JSC_PARSE_ERROR");
        assert_eq!(result.errors[0].line_number, 7);

        assert_eq!(
            result.statistics,
            Statistics {
                original_size: 120,
                original_gzip_size: 90,
                compressed_size: 40,
                compressed_gzip_size: 50,
                compile_time_ms: 3,
            }
        );
    }

    #[test]
    fn bare_compiled_code_root() {
        let result = parse_xml(b"<compiledCode>alert(1)</compiledCode>").unwrap();
        assert_eq!(result.compiled_code, "alert(1)");
        assert!(result.warnings.is_empty());
        assert!(result.errors.is_empty());
    }

    #[test]
    fn compiled_code_whitespace_preserved() {
        let result =
            parse_xml(b"<compilationResult><compiledCode>  a();\n</compiledCode></compilationResult>")
                .unwrap();
        assert_eq!(result.compiled_code, "  a();\n");
    }

    #[test]
    fn cdata_code() {
        let result = parse_xml(
            b"<compilationResult><compiledCode><![CDATA[if(a<b)c();]]></compiledCode></compilationResult>",
        )
        .unwrap();
        assert_eq!(result.compiled_code, "if(a<b)c();");
    }

    #[test]
    fn server_errors_extracted() {
        let result = parse_xml(
            br#"<compilationResult><serverErrors><error code="22">Too many compiles performed recently.</error></serverErrors></compilationResult>"#,
        )
        .unwrap();
        assert_eq!(
            result.server_errors,
            vec![ServerError {
                code: 22,
                message: "Too many compiles performed recently.".to_string(),
            }]
        );
    }

    #[test]
    fn self_closing_lists_are_empty() {
        let result =
            parse_xml(b"<compilationResult><compiledCode/><warnings/><errors/></compilationResult>")
                .unwrap();
        assert_eq!(result, CompileResult::default());
    }

    #[test]
    fn bad_numbers_read_as_zero() {
        let result = parse_xml(
            br#"<compilationResult><warnings><warning type="T" lineno="x">d</warning></warnings><statistics><originalSize>abc</originalSize></statistics></compilationResult>"#,
        )
        .unwrap();
        assert_eq!(result.warnings[0].line_number, 0);
        assert_eq!(result.statistics.original_size, 0);
    }

    #[test]
    fn mismatched_tags_error() {
        let err = parse_xml(b"<compilationResult><compiledCode>x</errors></compilationResult>")
            .unwrap_err();
        assert!(matches!(err, ParseError::Xml { .. }));
    }

    #[test]
    fn unclosed_element_errors() {
        let err = parse_xml(b"<compilationResult><compiledCode>x").unwrap_err();
        assert!(matches!(err, ParseError::Xml { .. }));
    }

    #[test]
    fn empty_body_errors() {
        assert!(matches!(parse_xml(b""), Err(ParseError::Xml { .. })));
    }

    #[test]
    fn invalid_utf8_errors() {
        let err = parse_xml(&[0x3c, 0xff, 0xfe, 0x3e]).unwrap_err();
        assert!(matches!(err, ParseError::Encoding { .. }));
    }

    #[test]
    fn tree_accessors() {
        let roots = parse_document(r#"<a x="1"><b>hi</b>tail<c/></a>"#).unwrap();
        assert_eq!(roots.len(), 1);
        let a = &roots[0];
        assert_eq!(a.name(), Some("a"));
        assert_eq!(a.attr("x"), Some("1"));
        assert_eq!(a.attr("y"), None);
        assert_eq!(a.text(), "tail");
        assert_eq!(a.elements().count(), 2);
        assert_eq!(a.child("b").map(XmlNode::text), Some("hi".to_string()));
        assert!(a.child("missing").is_none());
    }

    #[test]
    fn attribute_values_unescaped() {
        let roots = parse_document(r#"<w line="if (a &lt; b) {"/>"#).unwrap();
        assert_eq!(roots[0].attr("line"), Some("if (a < b) {"));
    }
}

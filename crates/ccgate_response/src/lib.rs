//! Normalization of the compiler's XML and JSON replies.
//!
//! Both wire formats are reduced to one [`CompileResult`]. Format-specific
//! logic lives in [`xml`] and [`json`]; everything downstream (the debug
//! [`banner`] and the cache) sees only the normalized record.
//!
//! The two formats fail differently: malformed XML is a [`ParseError`],
//! malformed JSON yields an empty result and a warning in the log.

#![warn(missing_docs)]

pub mod banner;
pub mod error;
pub mod json;
pub mod result;
pub mod xml;

pub use banner::render;
pub use error::ParseError;
pub use result::{CompileResult, Diagnostic, ServerError, Statistics};
pub use xml::XmlNode;

use ccgate_config::OutputFormat;

/// Parses a reply body in the declared format.
pub fn parse(body: &[u8], format: OutputFormat) -> Result<CompileResult, ParseError> {
    match format {
        OutputFormat::Xml => xml::parse_xml(body),
        OutputFormat::Json => Ok(json::parse_json(body)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const XML_REPLY: &str = r#"<?xml version="1.0"?>
<compilationResult>
  <compiledCode>var b=function(){return"&lt;ok&gt;"};</compiledCode>
  <warnings>
    <warning type="JSC_UNREACHABLE_CODE" file="Input_0" lineno="4" charno="2" line="  return 1;">unreachable code</warning>
    <warning type="JSC_USELESS_CODE" file="Input_1" lineno="1" charno="0" line="x;">Suspicious code. This code lacks side-effects.</warning>
  </warnings>
  <errors>
    <error type="JSC_TYPE_MISMATCH" file="Input_1" lineno="9" charno="11" line="var y = 'it''s';">actual parameter 1 does not match</error>
  </errors>
  <serverErrors>
    <error code="8">File too large.</error>
  </serverErrors>
  <statistics>
    <originalSize>512</originalSize>
    <originalGzipSize>300</originalGzipSize>
    <compressedSize>128</compressedSize>
    <compressedGzipSize>110</compressedGzipSize>
    <compileTime>17</compileTime>
  </statistics>
</compilationResult>"#;

    const JSON_REPLY: &str = r#"{
  "compiledCode": "var b=function(){return\"<ok>\"};",
  "warnings": [
    {"type": "JSC_UNREACHABLE_CODE", "file": "Input_0", "lineno": 4, "charno": 2,
     "warning": "unreachable code", "line": "  return 1;"},
    {"type": "JSC_USELESS_CODE", "file": "Input_1", "lineno": 1, "charno": 0,
     "warning": "Suspicious code. This code lacks side-effects.", "line": "x;"}
  ],
  "errors": [
    {"type": "JSC_TYPE_MISMATCH", "file": "Input_1", "lineno": 9, "charno": 11,
     "error": "actual parameter 1 does not match", "line": "var y = 'it''s';"}
  ],
  "serverErrors": [{"code": 8, "error": "File too large."}],
  "statistics": {
    "originalSize": 512, "originalGzipSize": 300, "compressedSize": 128,
    "compressedGzipSize": 110, "compileTime": 17
  }
}"#;

    #[test]
    fn xml_and_json_agree() {
        let from_xml = parse(XML_REPLY.as_bytes(), OutputFormat::Xml).unwrap();
        let from_json = parse(JSON_REPLY.as_bytes(), OutputFormat::Json).unwrap();
        assert_eq!(from_xml, from_json);
        assert_eq!(from_xml.warnings.len(), 2);
        assert_eq!(from_xml.compiled_code, r#"var b=function(){return"<ok>"};"#);
    }

    #[test]
    fn malformed_xml_fails_but_json_degrades() {
        assert!(parse(b"<compilationResult>", OutputFormat::Xml).is_err());
        assert_eq!(
            parse(b"{\"compiledCode\":", OutputFormat::Json).unwrap(),
            CompileResult::default()
        );
    }

    #[test]
    fn render_parsed_reply() {
        let result = parse(b"<compiledCode>alert(1)</compiledCode>", OutputFormat::Xml).unwrap();
        assert_eq!(render(&result, false), "alert(1) \r\n");
    }
}

//! The JSON reply.
//!
//! Same logical content as the XML reply, different shape: diagnostics are
//! objects whose description sits under a `warning` or `error` key next to
//! `type`, `file`, `lineno`, `charno` and `line`.
//!
//! Parsing never fails. A body that is not a JSON object produces an empty
//! result, and missing or mistyped fields fall back to their defaults.

use serde_json::{Map, Value};
use tracing::warn;

use crate::result::{CompileResult, Diagnostic, ServerError, Statistics};

/// Parses a JSON reply into a [`CompileResult`].
pub fn parse_json(body: &[u8]) -> CompileResult {
    let root = match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(root)) => root,
        Ok(other) => {
            warn!(kind = json_kind(&other), "JSON reply is not an object; using empty result");
            return CompileResult::default();
        }
        Err(e) => {
            warn!(error = %e, "malformed JSON reply; using empty result");
            return CompileResult::default();
        }
    };

    CompileResult {
        compiled_code: string_field(&root, "compiledCode"),
        warnings: diagnostics(&root, "warnings", "warning"),
        errors: diagnostics(&root, "errors", "error"),
        server_errors: server_errors(&root),
        statistics: statistics(root.get("statistics")),
    }
}

fn diagnostics(root: &Map<String, Value>, list: &str, description_key: &str) -> Vec<Diagnostic> {
    objects(root.get(list))
        .map(|entry| Diagnostic {
            kind: string_field(entry, "type"),
            file: string_field(entry, "file"),
            description: string_field(entry, description_key),
            line_number: int_field(entry, "lineno"),
            char_number: int_field(entry, "charno"),
            source_line: string_field(entry, "line"),
        })
        .collect()
}

fn server_errors(root: &Map<String, Value>) -> Vec<ServerError> {
    objects(root.get("serverErrors"))
        .map(|entry| ServerError {
            code: int_field(entry, "code"),
            message: string_field(entry, "error"),
        })
        .collect()
}

fn statistics(stats: Option<&Value>) -> Statistics {
    let Some(Value::Object(stats)) = stats else {
        return Statistics::default();
    };
    let value = |key: &str| u64::try_from(int_field(stats, key)).unwrap_or(0);
    Statistics {
        original_size: value("originalSize"),
        original_gzip_size: value("originalGzipSize"),
        compressed_size: value("compressedSize"),
        compressed_gzip_size: value("compressedGzipSize"),
        compile_time_ms: value("compileTime"),
    }
}

/// Iterates over the object entries of an array value, skipping anything else.
fn objects(value: Option<&Value>) -> impl Iterator<Item = &Map<String, Value>> {
    value
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
}

fn string_field(object: &Map<String, Value>, key: &str) -> String {
    match object.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// Reads an integer that the service may send as a number or a numeric string.
fn int_field(object: &Map<String, Value>, key: &str) -> i64 {
    match object.get(key) {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

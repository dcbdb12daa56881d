//! Encoding a compile request as `application/x-www-form-urlencoded` fields.

use ccgate_config::{CompileRequestConfig, SourceRef};

use crate::error::TransportError;

/// The information blocks requested from the compiler, in request order.
const OUTPUT_INFO: [&str; 4] = ["compiled_code", "statistics", "warnings", "errors"];

/// An ordered list of form fields ready to be url-encoded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormBody {
    fields: Vec<(String, String)>,
}

impl FormBody {
    /// Appends a field.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.push((name.into(), value.into()));
    }

    /// The fields in the order they will be sent.
    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    /// Returns the value of the first field with the given name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Url-encodes the fields into a request body.
    pub fn encode(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (name, value) in &self.fields {
            serializer.append_pair(name, value);
        }
        serializer.finish()
    }
}

/// Builds the form fields for one compile request.
///
/// Local sources are inlined into a single `js_code` field unless a code-URL
/// prefix is configured, in which case each becomes `code_url_N` pointing at
/// `prefix + path`, with the path as written rather than as resolved on disk. URL sources are always sent as `code_url_N`.
pub fn build_form(config: &CompileRequestConfig) -> Result<FormBody, TransportError> {
    let mut form = FormBody::default();
    let mut js_code = String::new();
    let mut inlined = false;
    let mut url_index = 0usize;

    for source in config.sources() {
        let url = match (source, config.code_url_prefix()) {
            (SourceRef::Url(url), _) => url.clone(),
            (SourceRef::Local { .. }, Some(prefix)) => {
                format!("{prefix}{}", source.identifier())
            }
            (SourceRef::Local { resolved, .. }, None) => {
                let code = std::fs::read_to_string(resolved).map_err(|e| {
                    TransportError::SourceRead {
                        path: resolved.clone(),
                        source: e,
                    }
                })?;
                js_code.push_str(&code);
                js_code.push('\n');
                inlined = true;
                continue;
            }
        };
        form.push(format!("code_url_{url_index}"), url);
        url_index += 1;
    }

    if inlined {
        form.fields.insert(0, ("js_code".to_string(), js_code));
    }

    form.push("compilation_level", config.compilation_level().as_wire());
    form.push("output_format", config.output_format().as_wire());
    form.push("warning_level", config.warning_level().as_wire());
    if config.pretty_print() {
        form.push("formatting", "pretty_print");
    }
    if config.use_closure_library() {
        form.push("use_closure_library", "true");
    }
    for (i, info) in OUTPUT_INFO.iter().enumerate() {
        form.push(format!("output_info_{i}"), *info);
    }

    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ccgate_config::{load_config_from_str, CompilationLevel, OutputFormat, WarningLevel};
    use std::path::Path;

    #[test]
    fn inlines_local_sources_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.js");
        let b = dir.path().join("b.js");
        std::fs::write(&a, "var a = 1;").unwrap();
        std::fs::write(&b, "var b = 2;").unwrap();

        let config = CompileRequestConfig::builder()
            .source(a.as_path())
            .source(b.as_path())
            .build();
        let form = build_form(&config).unwrap();
        assert_eq!(form.fields()[0].0, "js_code");
        assert_eq!(form.get("js_code"), Some("var a = 1;\nvar b = 2;\n"));
        assert!(form.get("code_url_0").is_none());
    }

    #[test]
    fn prefix_turns_locals_into_urls() {
        let config = CompileRequestConfig::builder()
            .sources(["js/a.js", "js/b.js"])
            .code_url_prefix("http://static.example.com/")
            .build();
        let form = build_form(&config).unwrap();
        assert!(form.get("js_code").is_none());
        assert_eq!(form.get("code_url_0"), Some("http://static.example.com/js/a.js"));
        assert_eq!(form.get("code_url_1"), Some("http://static.example.com/js/b.js"));
    }

    #[test]
    fn prefix_uses_path_as_written_in_loaded_config() {
        let toml = "[compile]\n\
                    sources = [\"js/a.js\"]\n\
                    code_url_prefix = \"http://static.example.com/\"\n";
        let config = load_config_from_str(toml, Path::new("/srv/site")).unwrap();
        let form = build_form(&config.compile).unwrap();
        assert_eq!(form.get("code_url_0"), Some("http://static.example.com/js/a.js"));
    }

    #[test]
    fn inlining_reads_resolved_path_of_loaded_config() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("js")).unwrap();
        std::fs::write(dir.path().join("js/a.js"), "var a = 1;").unwrap();

        let toml = "[compile]\nsources = [\"js/a.js\"]\n";
        let config = load_config_from_str(toml, dir.path()).unwrap();
        let form = build_form(&config.compile).unwrap();
        assert_eq!(form.get("js_code"), Some("var a = 1;\n"));
    }

    #[test]
    fn url_sources_pass_through() {
        let config = CompileRequestConfig::builder()
            .source("https://cdn.example.com/lib.js")
            .build();
        let form = build_form(&config).unwrap();
        assert_eq!(form.get("code_url_0"), Some("https://cdn.example.com/lib.js"));
        assert!(form.get("js_code").is_none());
    }

    #[test]
    fn mode_and_format_fields() {
        let config = CompileRequestConfig::builder()
            .source("http://x/a.js")
            .compilation_level(CompilationLevel::Advanced)
            .warning_level(WarningLevel::Quiet)
            .output_format(OutputFormat::Json)
            .build();
        let form = build_form(&config).unwrap();
        assert_eq!(form.get("compilation_level"), Some("ADVANCED_OPTIMIZATIONS"));
        assert_eq!(form.get("warning_level"), Some("QUIET"));
        assert_eq!(form.get("output_format"), Some("json"));
        assert!(form.get("formatting").is_none());
        assert!(form.get("use_closure_library").is_none());
    }

    #[test]
    fn optional_flags() {
        let config = CompileRequestConfig::builder()
            .source("http://x/a.js")
            .pretty_print(true)
            .use_closure_library(true)
            .build();
        let form = build_form(&config).unwrap();
        assert_eq!(form.get("formatting"), Some("pretty_print"));
        assert_eq!(form.get("use_closure_library"), Some("true"));
    }

    #[test]
    fn requests_all_output_info() {
        let config = CompileRequestConfig::builder().source("http://x/a.js").build();
        let form = build_form(&config).unwrap();
        assert_eq!(form.get("output_info_0"), Some("compiled_code"));
        assert_eq!(form.get("output_info_1"), Some("statistics"));
        assert_eq!(form.get("output_info_2"), Some("warnings"));
        assert_eq!(form.get("output_info_3"), Some("errors"));
    }

    #[test]
    fn missing_local_source_errors() {
        let config = CompileRequestConfig::builder()
            .source("/nonexistent/dir/a.js")
            .build();
        let err = build_form(&config).unwrap_err();
        assert!(matches!(err, TransportError::SourceRead { .. }));
    }

    #[test]
    fn encode_escapes_values() {
        let mut form = FormBody::default();
        form.push("js_code", "alert('a b&c');");
        form.push("output_format", "xml");
        assert_eq!(
            form.encode(),
            "js_code=alert%28%27a+b%26c%27%29%3B&output_format=xml"
        );
    }
}

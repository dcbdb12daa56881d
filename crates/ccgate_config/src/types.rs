//! Configuration types for a compile request and its surroundings.

use serde::Deserialize;
use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// The top-level gateway configuration parsed from `ccgate.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// The compile request: sources, optimization mode, flags.
    pub compile: CompileRequestConfig,
    /// Where the remote compiler lives.
    #[serde(default)]
    pub remote: RemoteEndpoint,
    /// Artifact cache settings.
    #[serde(default)]
    pub cache: CacheSettings,
}

/// One script to compile: a local file or a URL the compiler fetches itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum SourceRef {
    /// A file on the local filesystem.
    Local {
        /// The path as written in the request, used when publishing the
        /// source under a code-URL prefix.
        written: PathBuf,
        /// Where the file is on disk. Equal to `written` unless the config
        /// was loaded relative to another directory.
        resolved: PathBuf,
    },
    /// A URL passed through to the remote compiler.
    Url(String),
}

impl SourceRef {
    /// A local source whose on-disk location is the path as written.
    pub fn local(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        SourceRef::Local {
            written: path.clone(),
            resolved: path,
        }
    }

    /// Returns the on-disk path, if this is a local source.
    pub fn local_path(&self) -> Option<&Path> {
        match self {
            SourceRef::Local { resolved, .. } => Some(resolved),
            SourceRef::Url(_) => None,
        }
    }

    /// The identifier as written, used for URL prefixing.
    pub fn identifier(&self) -> Cow<'_, str> {
        match self {
            SourceRef::Local { written, .. } => written.to_string_lossy(),
            SourceRef::Url(url) => Cow::Borrowed(url),
        }
    }
}

impl From<String> for SourceRef {
    fn from(s: String) -> Self {
        if s.contains("://") {
            SourceRef::Url(s)
        } else {
            SourceRef::local(s)
        }
    }
}

impl From<&str> for SourceRef {
    fn from(s: &str) -> Self {
        SourceRef::from(s.to_string())
    }
}

impl From<PathBuf> for SourceRef {
    fn from(path: PathBuf) -> Self {
        SourceRef::local(path)
    }
}

impl From<&Path> for SourceRef {
    fn from(path: &Path) -> Self {
        SourceRef::local(path)
    }
}

impl fmt::Display for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceRef::Local { written, .. } => write!(f, "{}", written.display()),
            SourceRef::Url(url) => f.write_str(url),
        }
    }
}

/// Optimization mode requested from the compiler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompilationLevel {
    /// Strip whitespace and comments only.
    WhitespaceOnly,
    /// Local renaming and dead-code removal (default).
    #[default]
    Simple,
    /// Whole-program optimization.
    Advanced,
}

impl CompilationLevel {
    /// The value sent in the `compilation_level` form field.
    pub fn as_wire(self) -> &'static str {
        match self {
            CompilationLevel::WhitespaceOnly => "WHITESPACE_ONLY",
            CompilationLevel::Simple => "SIMPLE_OPTIMIZATIONS",
            CompilationLevel::Advanced => "ADVANCED_OPTIMIZATIONS",
        }
    }
}

/// How chatty the compiler's warnings should be.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningLevel {
    /// The compiler's default set.
    #[default]
    Default,
    /// Suppress most warnings.
    Quiet,
    /// Report everything.
    Verbose,
}

impl WarningLevel {
    /// The value sent in the `warning_level` form field.
    pub fn as_wire(self) -> &'static str {
        match self {
            WarningLevel::Default => "DEFAULT",
            WarningLevel::Quiet => "QUIET",
            WarningLevel::Verbose => "VERBOSE",
        }
    }
}

/// Wire format of the compiler's reply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// An XML document (default).
    #[default]
    Xml,
    /// A JSON object.
    Json,
}

impl OutputFormat {
    /// The value sent in the `output_format` form field.
    pub fn as_wire(self) -> &'static str {
        match self {
            OutputFormat::Xml => "xml",
            OutputFormat::Json => "json",
        }
    }
}

/// A single compile request.
///
/// Built with [`CompileRequestConfig::builder`] or deserialized from the
/// `[compile]` table. Fields are read through accessors only.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CompileRequestConfig {
    #[serde(default)]
    sources: Vec<SourceRef>,
    #[serde(default)]
    compilation_level: CompilationLevel,
    #[serde(default)]
    warning_level: WarningLevel,
    #[serde(default)]
    use_closure_library: bool,
    #[serde(default)]
    pretty_print: bool,
    #[serde(default)]
    debug: bool,
    #[serde(default)]
    output_format: OutputFormat,
    #[serde(default)]
    code_url_prefix: Option<String>,
}

impl CompileRequestConfig {
    /// Starts a builder with the default settings and no sources.
    pub fn builder() -> CompileRequestBuilder {
        CompileRequestBuilder::default()
    }

    /// Sources in the order they will be compiled.
    pub fn sources(&self) -> &[SourceRef] {
        &self.sources
    }

    /// Optimization mode.
    pub fn compilation_level(&self) -> CompilationLevel {
        self.compilation_level
    }

    /// Warning verbosity.
    pub fn warning_level(&self) -> WarningLevel {
        self.warning_level
    }

    /// Whether the Closure library is made available to the compiler.
    pub fn use_closure_library(&self) -> bool {
        self.use_closure_library
    }

    /// Whether the output is pretty-printed.
    pub fn pretty_print(&self) -> bool {
        self.pretty_print
    }

    /// Whether the debug banner is prepended to the output.
    pub fn debug(&self) -> bool {
        self.debug
    }

    /// Wire format requested from the compiler.
    pub fn output_format(&self) -> OutputFormat {
        self.output_format
    }

    /// Prefix under which local sources are publicly reachable, if any.
    ///
    /// When set, local sources are sent as `code_url_N` fields instead of
    /// being inlined into `js_code`.
    pub fn code_url_prefix(&self) -> Option<&str> {
        self.code_url_prefix.as_deref()
    }

    /// Resolves relative local sources against `base`, keeping the path as
    /// written for URL prefixing.
    pub(crate) fn rebase_sources(&mut self, base: &Path) {
        for source in &mut self.sources {
            if let SourceRef::Local { written, resolved } = source {
                if written.is_relative() {
                    *resolved = base.join(&*written);
                }
            }
        }
    }
}

impl Default for CompileRequestConfig {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            compilation_level: CompilationLevel::default(),
            warning_level: WarningLevel::default(),
            use_closure_library: false,
            pretty_print: false,
            debug: false,
            output_format: OutputFormat::default(),
            code_url_prefix: None,
        }
    }
}

/// Consuming builder for [`CompileRequestConfig`].
#[derive(Debug, Default)]
pub struct CompileRequestBuilder {
    config: CompileRequestConfig,
}

impl CompileRequestBuilder {
    /// Appends one source.
    pub fn source(mut self, source: impl Into<SourceRef>) -> Self {
        self.config.sources.push(source.into());
        self
    }

    /// Appends several sources, preserving order.
    pub fn sources<I, S>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SourceRef>,
    {
        self.config
            .sources
            .extend(sources.into_iter().map(Into::into));
        self
    }

    /// Sets the optimization mode.
    pub fn compilation_level(mut self, level: CompilationLevel) -> Self {
        self.config.compilation_level = level;
        self
    }

    /// Sets the warning verbosity.
    pub fn warning_level(mut self, level: WarningLevel) -> Self {
        self.config.warning_level = level;
        self
    }

    /// Enables or disables the Closure library.
    pub fn use_closure_library(mut self, enabled: bool) -> Self {
        self.config.use_closure_library = enabled;
        self
    }

    /// Enables or disables pretty printing.
    pub fn pretty_print(mut self, enabled: bool) -> Self {
        self.config.pretty_print = enabled;
        self
    }

    /// Enables or disables the debug banner.
    pub fn debug(mut self, enabled: bool) -> Self {
        self.config.debug = enabled;
        self
    }

    /// Sets the reply format.
    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.config.output_format = format;
        self
    }

    /// Sets the public URL prefix for local sources.
    pub fn code_url_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.code_url_prefix = Some(prefix.into());
        self
    }

    /// Finishes the configuration.
    pub fn build(self) -> CompileRequestConfig {
        self.config
    }
}

/// Location of the remote compiler service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteEndpoint {
    /// Host name, also sent as the `Host` header.
    #[serde(default = "default_host")]
    pub host: String,
    /// TCP port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Request path of the compile endpoint.
    #[serde(default = "default_path")]
    pub path: String,
    /// Socket read/write timeout in seconds. Unset means block indefinitely.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// Default compiler service host.
pub const DEFAULT_HOST: &str = "closure-compiler.appspot.com";

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    80
}

fn default_path() -> String {
    "/compile".to_string()
}

impl RemoteEndpoint {
    /// Creates an endpoint for the given host and port with the default path.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    /// The socket timeout, if one is configured.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl Default for RemoteEndpoint {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            path: default_path(),
            timeout_secs: None,
        }
    }
}

/// Artifact cache settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CacheSettings {
    /// Directory holding `<fingerprint>.js` files. Unset or empty disables caching.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl CacheSettings {
    /// The cache directory, treating an empty path as unset.
    pub fn dir(&self) -> Option<&Path> {
        self.dir
            .as_deref()
            .filter(|dir| !dir.as_os_str().is_empty())
    }
}

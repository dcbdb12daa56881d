//! The normalized compile result shared by both wire formats.

/// Everything the compiler reported about one compile.
///
/// Produced fresh from each reply and never persisted as-is; only its
/// rendered text (see [`crate::banner::render`]) reaches the cache.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileResult {
    /// The compiled script, verbatim.
    pub compiled_code: String,
    /// Warnings in the order the compiler reported them.
    pub warnings: Vec<Diagnostic>,
    /// Errors in the order the compiler reported them.
    pub errors: Vec<Diagnostic>,
    /// Service-level failures (quota, oversized input, bad parameters).
    pub server_errors: Vec<ServerError>,
    /// Size and timing statistics.
    pub statistics: Statistics,
}

impl CompileResult {
    /// Returns `true` if the compiler reported errors of any kind.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty() || !self.server_errors.is_empty()
    }
}

/// A single warning or error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostic {
    /// Compiler diagnostic identifier, e.g. `JSC_UNDEFINED_VARIABLE`.
    pub kind: String,
    /// Input the diagnostic refers to, e.g. `Input_0`.
    pub file: String,
    /// Human-readable message.
    pub description: String,
    /// 1-based line number, or 0 when unknown.
    pub line_number: i64,
    /// Character offset within the line.
    pub char_number: i64,
    /// The offending source line.
    pub source_line: String,
}

/// A failure of the compile service itself rather than of the input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerError {
    /// Service error code.
    pub code: i64,
    /// Human-readable message.
    pub message: String,
}

/// Sizes in bytes and compile time in milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Statistics {
    /// Size of the input.
    pub original_size: u64,
    /// Gzipped size of the input.
    pub original_gzip_size: u64,
    /// Size of the output.
    pub compressed_size: u64,
    /// Gzipped size of the output.
    pub compressed_gzip_size: u64,
    /// Time the compiler spent, as reported by the service.
    pub compile_time_ms: u64,
}

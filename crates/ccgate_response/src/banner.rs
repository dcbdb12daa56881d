//! Rendering a compile result as the text served to clients.
//!
//! With debugging enabled the compiled code is preceded by a script block
//! that logs the compile statistics and every diagnostic to the browser
//! console:
//!
//! ```text
//! if(window.console&&window.console.log){
//! window.console.log('Closure Compiler Stats:\n...');
//! window.console.warn('WARNING\n...');
//! window.console.error('ERROR\n...');
//! }
//! ```

use crate::result::{CompileResult, Diagnostic, Statistics};

/// Line separator inside the banner and after the code.
const EOL: &str = "\r\n";

/// Renders the final response text: banner (when enabled), code, trailing blank.
pub fn render(result: &CompileResult, debug: bool) -> String {
    let mut out = if debug { banner(result) } else { String::new() };
    out.push_str(&result.compiled_code);
    out.push(' ');
    out.push_str(EOL);
    out
}

/// Builds the diagnostic script block.
pub fn banner(result: &CompileResult) -> String {
    let mut out = String::new();
    out.push_str("if(window.console&&window.console.log){");
    out.push_str(EOL);
    console_line(&mut out, "log", &stats_message(&result.statistics));
    for warning in &result.warnings {
        console_line(&mut out, "warn", &diagnostic_message("WARNING", warning));
    }
    for error in &result.errors {
        console_line(&mut out, "error", &diagnostic_message("ERROR", error));
    }
    for error in &result.server_errors {
        let message = format!("SERVER ERROR {}\n{}", error.code, error.message);
        console_line(&mut out, "error", &message);
    }
    out.push('}');
    out.push_str(EOL);
    out
}

fn console_line(out: &mut String, level: &str, message: &str) {
    out.push_str(&format!(
        "window.console.{level}('{}');{EOL}",
        escape_js(message)
    ));
}

fn stats_message(stats: &Statistics) -> String {
    format!(
        "Closure Compiler Stats:\n\
         -----------------------\n\
         Original Size: {} bytes ({} bytes gzipped)\n\
         Compiled Size: {} bytes ({} bytes gzipped)\n\
         Compile Time: {} ms",
        stats.original_size,
        stats.original_gzip_size,
        stats.compressed_size,
        stats.compressed_gzip_size,
        stats.compile_time_ms,
    )
}

fn diagnostic_message(label: &str, diag: &Diagnostic) -> String {
    format!(
        "{label}\n{}\n{}\nLine: {}, Char: {}\n{}",
        diag.kind, diag.description, diag.line_number, diag.char_number, diag.source_line
    )
}

/// Escapes text for a single-quoted JavaScript string inside a `<script>`.
pub fn escape_js(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            '<' if chars.peek() == Some(&'/') => out.push_str("<\\"),
            c => out.push(c),
        }
    }
    out
}

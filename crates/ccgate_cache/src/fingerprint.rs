//! Cache fingerprints of compile requests.

use ccgate_common::{Digest, DigestBuilder};
use ccgate_config::CompileRequestConfig;

/// Extension of cache files.
pub const CACHE_FILE_EXT: &str = "js";

/// Computes the cache fingerprint of a request.
///
/// Covers the source list (in order, local files by their on-disk path),
/// mode, warning level, and the library, pretty-print and debug flags. The output format and the
/// code-URL prefix are not part of it: switching either reuses the entry.
pub fn fingerprint(config: &CompileRequestConfig) -> Digest {
    let mut builder = DigestBuilder::new().field((config.sources().len() as u64).to_le_bytes());
    for source in config.sources() {
        builder = match source.local_path() {
            Some(path) => builder.field(path.to_string_lossy().as_bytes()),
            None => builder.field(source.identifier().as_bytes()),
        };
    }
    builder
        .field(config.compilation_level().as_wire())
        .field(config.warning_level().as_wire())
        .flag(config.use_closure_library())
        .flag(config.pretty_print())
        .flag(config.debug())
        .finish()
}

/// File name of the cache entry for a fingerprint: `<32 hex chars>.js`.
pub fn cache_file_name(fingerprint: &Digest) -> String {
    format!("{fingerprint}.{CACHE_FILE_EXT}")
}

//! Modification-time staleness checks.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::time::SystemTime;

use tracing::debug;

use crate::error::CacheError;

/// Returns the modification time of `path`.
pub fn modified(path: &Path) -> Result<SystemTime, CacheError> {
    fs::metadata(path)
        .and_then(|meta| meta.modified())
        .map_err(|e| CacheError::io(path, e))
}

/// Decides whether the cache file must be regenerated.
///
/// The entry is stale when it does not exist, or when any local source or
/// the invoking script was modified strictly after it. Sources are checked
/// in order and the check stops at the first newer one. A source that
/// cannot be stat'ed is an error, not a miss.
pub fn is_stale<'a>(
    cache_file: &Path,
    sources: impl IntoIterator<Item = &'a Path>,
    invoking_script: Option<&'a Path>,
) -> Result<bool, CacheError> {
    let cache_mtime = match fs::metadata(cache_file) {
        Ok(meta) => meta.modified().map_err(|e| CacheError::io(cache_file, e))?,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %cache_file.display(), "no cache entry");
            return Ok(true);
        }
        Err(e) => return Err(CacheError::io(cache_file, e)),
    };

    for path in sources.into_iter().chain(invoking_script) {
        if modified(path)? > cache_mtime {
            debug!(path = %path.display(), "input is newer than cache entry");
            return Ok(true);
        }
    }
    Ok(false)
}

//! Request resolution against the on-disk artifact cache.
//!
//! Each distinct request maps to one file, `<fingerprint>.js`, holding the
//! fully rendered response text. A request is served from that file while it
//! is newer than every local source and the invoking script; otherwise the
//! compiler runs and the file is rewritten.
//!
//! There is no cross-process lock: concurrent misses for the same fingerprint
//! each compile and the last writer wins.

use std::fs;
use std::path::{Path, PathBuf};

use ccgate_common::Digest;
use ccgate_config::CompileRequestConfig;
use tracing::{debug, info};

use crate::compiler::Compiler;
use crate::conditional::{format_etag, format_http_date, InboundRequest};
use crate::error::CacheError;
use crate::fingerprint::{cache_file_name, fingerprint};
use crate::response::{CacheOutcome, RenderedResponse};
use crate::staleness::{is_stale, modified};

/// Serves compile requests, from disk when possible.
#[derive(Debug)]
pub struct ArtifactCache<C> {
    /// Directory holding cache files; `None` disables caching.
    cache_dir: Option<PathBuf>,

    /// File whose modification also invalidates every entry.
    invoking_script: Option<PathBuf>,

    compiler: C,
}

impl<C: Compiler> ArtifactCache<C> {
    /// Creates a cache over `cache_dir`. `None` or an empty path disables
    /// caching, in which case every request compiles and nothing touches disk.
    pub fn new(cache_dir: Option<PathBuf>, compiler: C) -> Self {
        Self {
            cache_dir: cache_dir.filter(|dir| !dir.as_os_str().is_empty()),
            invoking_script: None,
            compiler,
        }
    }

    /// Sets the file whose modification time also invalidates entries.
    pub fn with_invoking_script(mut self, path: impl Into<PathBuf>) -> Self {
        self.invoking_script = Some(path.into());
        self
    }

    /// The cache directory, if caching is enabled.
    pub fn cache_dir(&self) -> Option<&Path> {
        self.cache_dir.as_deref()
    }

    /// Path of the cache file for `config`, if caching is enabled.
    pub fn cache_path(&self, config: &CompileRequestConfig) -> Option<PathBuf> {
        self.cache_dir
            .as_ref()
            .map(|dir| dir.join(cache_file_name(&fingerprint(config))))
    }

    /// Resolves a request to a rendered response.
    ///
    /// With caching disabled the compiler always runs and no validators are
    /// attached. Otherwise a stale or missing entry is compiled and written
    /// before responding, and a fresh entry is read once, then answered with
    /// 304 if the client's validators match it or 200 with its contents.
    ///
    /// Two processes missing on the same fingerprint both compile and both
    /// write; readers may see either complete file.
    pub fn resolve(
        &self,
        config: &CompileRequestConfig,
        request: &InboundRequest,
    ) -> Result<RenderedResponse, CacheError> {
        let Some(dir) = &self.cache_dir else {
            debug!("caching disabled");
            let body = self.compile(config, request)?;
            return Ok(RenderedResponse::uncached(body));
        };

        let digest = fingerprint(config);
        let path = dir.join(cache_file_name(&digest));
        let sources = config.sources().iter().filter_map(|source| source.local_path());

        if is_stale(&path, sources, self.invoking_script.as_deref())? {
            info!(fingerprint = %digest, "cache miss; compiling");
            let body = self.compile(config, request)?;
            fs::create_dir_all(dir).map_err(|e| CacheError::io(dir, e))?;
            fs::write(&path, &body).map_err(|e| CacheError::io(&path, e))?;
            let mtime = modified(&path)?;
            return Ok(RenderedResponse {
                outcome: CacheOutcome::Compiled,
                last_modified: Some(format_http_date(mtime)),
                etag: Some(format_etag(&Digest::from_bytes(body.as_bytes()))),
                body,
            });
        }

        let mtime = modified(&path)?;
        let body = fs::read_to_string(&path).map_err(|e| CacheError::io(&path, e))?;
        let etag = Digest::from_bytes(body.as_bytes());
        let not_modified = request.matches(mtime, &etag);
        debug!(fingerprint = %digest, not_modified, "cache hit");

        Ok(RenderedResponse {
            outcome: if not_modified {
                CacheOutcome::NotModified
            } else {
                CacheOutcome::Cached
            },
            body: if not_modified { String::new() } else { body },
            last_modified: Some(format_http_date(mtime)),
            etag: Some(format_etag(&etag)),
        })
    }

    fn compile(
        &self,
        config: &CompileRequestConfig,
        request: &InboundRequest,
    ) -> Result<String, CacheError> {
        let result = self.compiler.compile(config, request.referer.as_deref())?;
        Ok(ccgate_response::render(&result, config.debug()))
    }
}

//! Artifact cache for compiled JavaScript.
//!
//! Maps each compile request to a cache file named by its fingerprint, keeps
//! that file fresh against source and script modification times, and answers
//! HTTP conditional requests against it. Compilation itself happens behind
//! the [`Compiler`] trait; [`RemoteCompiler`] sends the request to the remote
//! compilation service.

#![warn(missing_docs)]

pub mod cache;
pub mod compiler;
pub mod conditional;
pub mod error;
pub mod fingerprint;
pub mod response;
pub mod staleness;

pub use cache::ArtifactCache;
pub use compiler::{Compiler, RemoteCompiler};
pub use conditional::InboundRequest;
pub use error::CacheError;
pub use fingerprint::{cache_file_name, fingerprint};
pub use response::{CacheOutcome, RenderedResponse, CONTENT_TYPE};

use std::path::Path;

use ccgate_config::{CompileRequestConfig, RemoteEndpoint};

/// Resolves one request against the default remote compiler.
///
/// `cache_dir` of `None` (or an empty path) disables caching.
pub fn resolve_and_render(
    config: &CompileRequestConfig,
    cache_dir: Option<&Path>,
    request: &InboundRequest,
) -> Result<RenderedResponse, CacheError> {
    let compiler = RemoteCompiler::new(RemoteEndpoint::default());
    ArtifactCache::new(cache_dir.map(Path::to_path_buf), compiler).resolve(config, request)
}

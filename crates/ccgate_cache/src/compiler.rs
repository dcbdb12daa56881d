//! The compiler seam.
//!
//! [`ArtifactCache`](crate::ArtifactCache) only needs something that turns a
//! request into a [`CompileResult`]. [`RemoteCompiler`] is the real one; tests
//! plug in their own.

use ccgate_config::{CompileRequestConfig, RemoteEndpoint};
use ccgate_response::CompileResult;
use tracing::{info, warn};

use crate::error::CacheError;

/// Produces a compile result for a request.
pub trait Compiler {
    /// Compiles the request. `referer` is forwarded to the service when present.
    fn compile(
        &self,
        config: &CompileRequestConfig,
        referer: Option<&str>,
    ) -> Result<CompileResult, CacheError>;
}

impl<C: Compiler + ?Sized> Compiler for &C {
    fn compile(
        &self,
        config: &CompileRequestConfig,
        referer: Option<&str>,
    ) -> Result<CompileResult, CacheError> {
        (**self).compile(config, referer)
    }
}

/// Compiles by POSTing to the remote compilation service.
#[derive(Debug, Clone, Default)]
pub struct RemoteCompiler {
    endpoint: RemoteEndpoint,
}

impl RemoteCompiler {
    /// Creates a compiler talking to `endpoint`.
    pub fn new(endpoint: RemoteEndpoint) -> Self {
        Self { endpoint }
    }
}

impl Compiler for RemoteCompiler {
    fn compile(
        &self,
        config: &CompileRequestConfig,
        referer: Option<&str>,
    ) -> Result<CompileResult, CacheError> {
        let form = ccgate_transport::build_form(config)?;
        let response = ccgate_transport::send(&self.endpoint, &form, referer)?;
        let result = ccgate_response::parse(&response.body, config.output_format())?;
        info!(
            host = %self.endpoint.host,
            warnings = result.warnings.len(),
            errors = result.errors.len(),
            server_errors = result.server_errors.len(),
            compile_time_ms = result.statistics.compile_time_ms,
            "remote compile finished"
        );
        if result.has_errors() {
            warn!(
                errors = result.errors.len(),
                server_errors = result.server_errors.len(),
                "compiler reported errors; serving its output as is"
            );
        }
        Ok(result)
    }
}

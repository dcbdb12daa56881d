//! `ccgate compile`: resolve the configured request and print the result.
//!
//! Pipeline:
//! 1. Load `ccgate.toml` (or `--config`)
//! 2. Pick the cache directory: `--no-cache`, `--cache-dir`, then `[cache] dir`
//! 3. Resolve through the artifact cache, compiling remotely on a miss
//! 4. Write the body to stdout and, with `--headers`, the head to stderr

use std::io::{self, Write};
use std::path::PathBuf;

use ccgate_cache::{ArtifactCache, InboundRequest, RemoteCompiler, RenderedResponse};
use ccgate_config::GatewayConfig;
use tracing::info;

use crate::{CompileArgs, GlobalArgs};

/// Runs the `ccgate compile` command.
///
/// The config file doubles as the invoking script: editing it invalidates
/// every cache entry it produced.
pub fn run(args: &CompileArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config_path = global.config_path();
    let config = ccgate_config::load_config(&config_path)?;

    let cache = ArtifactCache::new(
        cache_dir(args, &config),
        RemoteCompiler::new(config.remote.clone()),
    )
    .with_invoking_script(&config_path);
    let response = cache.resolve(&config.compile, &inbound_request(args))?;
    info!(outcome = ?response.outcome, bytes = response.body.len(), "resolved");

    if args.headers {
        eprint!("{}", format_head(&response));
    }
    let mut stdout = io::stdout().lock();
    stdout.write_all(response.body.as_bytes())?;
    stdout.flush()?;
    Ok(0)
}

/// The effective cache directory for this invocation.
fn cache_dir(args: &CompileArgs, config: &GatewayConfig) -> Option<PathBuf> {
    if args.no_cache {
        return None;
    }
    args.cache_dir
        .clone()
        .or_else(|| config.cache.dir().map(PathBuf::from))
}

fn inbound_request(args: &CompileArgs) -> InboundRequest {
    InboundRequest {
        if_modified_since: args.if_modified_since.clone(),
        if_none_match: args.if_none_match.clone(),
        referer: args.referer.clone(),
    }
}

/// Formats the status line and headers as they would appear on the wire.
fn format_head(response: &RenderedResponse) -> String {
    let reason = if response.is_not_modified() {
        "Not Modified"
    } else {
        "OK"
    };
    let mut head = format!("HTTP/1.1 {} {reason}\r\n", response.status_code());
    for (name, value) in response.headers() {
        head.push_str(&format!("{name}: {value}\r\n"));
    }
    head.push_str("\r\n");
    head
}

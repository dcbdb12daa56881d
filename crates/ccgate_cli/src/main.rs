//! ccgate CLI: compile a configured script bundle through the remote
//! Closure Compiler service, with on-disk caching.
//!
//! `ccgate compile` resolves the request in `ccgate.toml` and writes the
//! rendered JavaScript to stdout. `ccgate fingerprint` prints the cache key
//! and the cache file it maps to.

#![warn(missing_docs)]

mod compile;
mod fingerprint;
mod logging;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

/// ccgate, a caching gateway to the Closure Compiler service.
#[derive(Parser, Debug)]
#[command(name = "ccgate", version, about = "Closure Compiler gateway")]
pub struct Cli {
    /// Suppress all log output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) log output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a custom `ccgate.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile the configured sources and print the result.
    Compile(CompileArgs),
    /// Print the cache fingerprint of the configured request.
    Fingerprint,
}

/// Arguments for the `ccgate compile` subcommand.
#[derive(Parser, Debug)]
pub struct CompileArgs {
    /// Cache directory, overriding `[cache] dir` from the config file.
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,

    /// Compile without reading or writing the cache.
    #[arg(long, conflicts_with = "cache_dir")]
    pub no_cache: bool,

    /// Entity tag the client already holds.
    #[arg(long)]
    pub if_none_match: Option<String>,

    /// HTTP date of the client's copy.
    #[arg(long)]
    pub if_modified_since: Option<String>,

    /// Referer forwarded to the compiler service.
    #[arg(long)]
    pub referer: Option<String>,

    /// Print the status line and response headers to stderr.
    #[arg(long)]
    pub headers: bool,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Optional path to a custom config file.
    pub config: Option<PathBuf>,
}

impl GlobalArgs {
    /// The config file to load: `--config`, or `ccgate.toml` in the working directory.
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(|| PathBuf::from(ccgate_config::CONFIG_FILE))
    }
}

fn main() {
    let cli = Cli::parse();

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        config: cli.config,
    };
    logging::init_logging(global.quiet, global.verbose);

    let result = match cli.command {
        Command::Compile(ref args) => compile::run(args, &global),
        Command::Fingerprint => fingerprint::run(&global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_compile_default() {
        let cli = Cli::parse_from(["ccgate", "compile"]);
        match cli.command {
            Command::Compile(ref args) => {
                assert!(args.cache_dir.is_none());
                assert!(!args.no_cache);
                assert!(args.if_none_match.is_none());
                assert!(args.if_modified_since.is_none());
                assert!(args.referer.is_none());
                assert!(!args.headers);
            }
            _ => panic!("expected Compile command"),
        }
    }

    #[test]
    fn parse_compile_with_args() {
        let cli = Cli::parse_from([
            "ccgate",
            "compile",
            "--cache-dir",
            "/tmp/ccgate",
            "--if-none-match",
            "\"abc\"",
            "--if-modified-since",
            "Sun, 06 Nov 1994 08:49:37 GMT",
            "--referer",
            "http://site.example/",
            "--headers",
        ]);
        match cli.command {
            Command::Compile(ref args) => {
                assert_eq!(args.cache_dir, Some(PathBuf::from("/tmp/ccgate")));
                assert_eq!(args.if_none_match.as_deref(), Some("\"abc\""));
                assert_eq!(
                    args.if_modified_since.as_deref(),
                    Some("Sun, 06 Nov 1994 08:49:37 GMT")
                );
                assert_eq!(args.referer.as_deref(), Some("http://site.example/"));
                assert!(args.headers);
            }
            _ => panic!("expected Compile command"),
        }
    }

    #[test]
    fn no_cache_conflicts_with_cache_dir() {
        let result =
            Cli::try_parse_from(["ccgate", "compile", "--no-cache", "--cache-dir", "/tmp/x"]);
        assert!(result.is_err());
    }

    #[test]
    fn parse_fingerprint() {
        let cli = Cli::parse_from(["ccgate", "fingerprint"]);
        assert!(matches!(cli.command, Command::Fingerprint));
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::parse_from(["ccgate", "--quiet", "--config", "site/ccgate.toml", "compile"]);
        assert!(cli.quiet);
        assert!(!cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("site/ccgate.toml")));
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["ccgate", "fingerprint", "--verbose"]);
        assert!(cli.verbose);
    }

    #[test]
    fn default_config_path() {
        let global = GlobalArgs {
            quiet: false,
            verbose: false,
            config: None,
        };
        assert_eq!(global.config_path(), PathBuf::from("ccgate.toml"));
    }
}

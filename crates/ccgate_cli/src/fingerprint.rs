//! `ccgate fingerprint`: print the cache key of the configured request.

use ccgate_cache::{cache_file_name, fingerprint};

use crate::GlobalArgs;

/// Runs the `ccgate fingerprint` command.
///
/// Prints the fingerprint, then the cache file path when a cache directory
/// is configured.
pub fn run(global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = ccgate_config::load_config(&global.config_path())?;
    let digest = fingerprint(&config.compile);
    println!("{digest}");
    if let Some(dir) = config.cache.dir() {
        println!("{}", dir.join(cache_file_name(&digest)).display());
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn missing_config_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let global = GlobalArgs {
            quiet: true,
            verbose: false,
            config: Some(dir.path().join("ccgate.toml")),
        };
        assert!(run(&global).is_err());
    }

    #[test]
    fn prints_for_valid_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ccgate.toml");
        fs::write(&path, "[compile]\nsources = [\"app.js\"]\n").unwrap();
        let global = GlobalArgs {
            quiet: true,
            verbose: false,
            config: Some(path),
        };
        assert_eq!(run(&global).unwrap(), 0);
    }
}

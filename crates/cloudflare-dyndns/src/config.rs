//! Config file discovery and loading
//!
//! The file is TOML with `[main]`, `[cloudflare]` and `[ipify]` tables. When
//! `--config` is not given, the first regular file among these wins:
//!
//! 1. `./.cloudflare-dyndns`
//! 2. `~/.cloudflare-dyndns`
//! 3. `~/.config/cloudflare-dyndns/.cloudflare-dyndns`
//!
//! `DYNDNS_API_TOKEN` replaces `cloudflare.api_token` when set.

use std::path::{Path, PathBuf};

use directories::BaseDirs;
use dyndns_core::{DyndnsConfig, Error, Result};

/// File name searched for in each candidate directory
pub const CONFIG_FILE_NAME: &str = ".cloudflare-dyndns";

/// Environment variable overriding the API token
pub const API_TOKEN_ENV: &str = "DYNDNS_API_TOKEN";

/// Config file locations in search order
pub fn candidate_paths() -> Vec<PathBuf> {
    let home = BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf());
    candidate_paths_in(Path::new("."), home.as_deref())
}

fn candidate_paths_in(cwd: &Path, home: Option<&Path>) -> Vec<PathBuf> {
    let mut paths = vec![cwd.join(CONFIG_FILE_NAME)];
    if let Some(home) = home {
        paths.push(home.join(CONFIG_FILE_NAME));
        paths.push(
            home.join(".config")
                .join("cloudflare-dyndns")
                .join(CONFIG_FILE_NAME),
        );
    }
    paths
}

/// First candidate that exists as a regular file
fn find_config(candidates: &[PathBuf]) -> Result<PathBuf> {
    candidates
        .iter()
        .find(|path| path.is_file())
        .cloned()
        .ok_or_else(|| {
            let searched: Vec<String> = candidates
                .iter()
                .map(|path| path.display().to_string())
                .collect();
            Error::config(format!(
                "Config file not found in paths: [{}]",
                searched.join(", ")
            ))
        })
}

/// Locate, parse and validate the configuration
///
/// Returns the path that was used together with the validated config.
pub fn load(explicit: Option<&Path>) -> Result<(PathBuf, DyndnsConfig)> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => find_config(&candidate_paths())?,
    };

    let config = load_file(&path, std::env::var(API_TOKEN_ENV).ok())?;
    Ok((path, config))
}

fn load_file(path: &Path, token_override: Option<String>) -> Result<DyndnsConfig> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        Error::config(format!(
            "Config file {} cannot be loaded: {e}",
            path.display()
        ))
    })?;

    let mut config = parse(&text)
        .map_err(|e| Error::config(format!("Config file {}: {e}", path.display())))?;
    apply_token_override(&mut config, token_override);
    config.validate()?;

    Ok(config)
}

/// Parse TOML text into a config, filling in defaults
pub fn parse(text: &str) -> Result<DyndnsConfig> {
    toml::from_str(text).map_err(|e| Error::config(format!("invalid TOML: {e}")))
}

fn apply_token_override(config: &mut DyndnsConfig, token: Option<String>) {
    if let Some(token) = token.filter(|token| !token.trim().is_empty()) {
        config.cloudflare.api_token = token;
    }
}

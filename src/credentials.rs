//! Registry credential resolution.
//!
//! This module locates the npm bearer token used to authenticate against
//! the registry. An explicit `--token` / `NPM_TOKEN` value wins; otherwise
//! the token is read from the `_authToken` entry in `~/.npmrc`.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Failure to locate a usable registry token.
///
/// All variants are fatal: without a token the program cannot
/// authenticate and must exit before any network activity.
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("could not determine the home directory")]
    HomeNotFound,

    #[error("no .npmrc found at {0}")]
    NpmrcMissing(PathBuf),

    #[error("failed to read {path}: {source}")]
    NpmrcUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("no _authToken entry for //{host}/ in {path}")]
    TokenNotFound { host: String, path: PathBuf },
}

/// Resolve the registry token for the given registry URL.
///
/// `explicit` (from the CLI or `NPM_TOKEN`) short-circuits the `.npmrc`
/// lookup entirely.
pub fn resolve_token(
    registry_url: &str,
    explicit: Option<&str>,
) -> Result<String, CredentialError> {
    if let Some(token) = explicit {
        debug!("Using token from CLI/environment");
        return Ok(token.to_string());
    }

    let home = dirs::home_dir().ok_or(CredentialError::HomeNotFound)?;
    token_from_npmrc_file(&home.join(".npmrc"), registry_url)
}

/// Read and parse an `.npmrc` file, extracting the token for a registry.
pub fn token_from_npmrc_file(path: &Path, registry_url: &str) -> Result<String, CredentialError> {
    if !path.exists() {
        return Err(CredentialError::NpmrcMissing(path.to_path_buf()));
    }

    let content =
        std::fs::read_to_string(path).map_err(|source| CredentialError::NpmrcUnreadable {
            path: path.to_path_buf(),
            source,
        })?;

    let host = registry_host(registry_url);
    token_from_npmrc(&content, &host).ok_or_else(|| CredentialError::TokenNotFound {
        host,
        path: path.to_path_buf(),
    })
}

/// Extract the `_authToken` value for a registry host from `.npmrc` text.
///
/// Matches lines of the form `//<host>/:_authToken=<token>`; the token is
/// the rest of the line, trimmed.
pub fn token_from_npmrc(content: &str, host: &str) -> Option<String> {
    let key = format!("//{host}/:_authToken=");

    content.lines().find_map(|line| {
        let token = line.trim().strip_prefix(&key)?.trim();
        if token.is_empty() {
            None
        } else {
            Some(token.to_string())
        }
    })
}

/// Strip the scheme and trailing slash from a registry URL, leaving the
/// host part used in `.npmrc` keys.
fn registry_host(registry_url: &str) -> String {
    registry_url
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_end_matches('/')
        .to_string()
}

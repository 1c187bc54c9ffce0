//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// Orgsize - npm organization package size reporter
///
/// Lists every package published under an npm organization, fetches the
/// unpacked size of each package's latest version, and writes a sorted
/// report as a console table and a CSV file.
///
/// Examples:
///   orgsize my-org
///   orgsize my-org --output sizes.csv
///   orgsize my-org --concurrency 0        (unlimited fan-out)
///   NPM_TOKEN=xxx orgsize my-org --registry https://registry.npmjs.org
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Name of the npm organization to report on
    ///
    /// Validated manually rather than by clap so a missing argument
    /// exits with code 1.
    #[arg(value_name = "ORG")]
    pub org: Option<String>,

    /// Output file path for the CSV report
    #[arg(short, long, default_value = "package-sizes.csv", value_name = "FILE")]
    pub output: PathBuf,

    /// Registry base URL
    ///
    /// Point this at a local mock server for testing.
    #[arg(long, default_value = "https://registry.npmjs.org", value_name = "URL")]
    pub registry: String,

    /// Authentication token for the registry
    ///
    /// Takes precedence over the token found in ~/.npmrc.
    #[arg(short, long, env = "NPM_TOKEN", value_name = "TOKEN")]
    pub token: Option<String>,

    /// Number of concurrent package metadata fetches (0 = unlimited)
    #[arg(long, default_value = "16", value_name = "NUM")]
    pub concurrency: usize,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (no progress bar, errors only)
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the organization name, panicking if not set (validate first).
    pub fn org_name(&self) -> &str {
        self.org.as_deref().unwrap_or("")
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        match self.org.as_deref() {
            None | Some("") => {
                return Err("Missing organization name. Usage: orgsize <ORG>".to_string());
            }
            Some(_) => {}
        }

        if !self.registry.starts_with("http://") && !self.registry.starts_with("https://") {
            return Err("Registry URL must start with 'http://' or 'https://'".to_string());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// Concurrency limit for the fetch fan-out; `None` means unlimited.
    pub fn concurrency_limit(&self) -> Option<usize> {
        if self.concurrency == 0 {
            None
        } else {
            Some(self.concurrency)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            org: Some("my-org".to_string()),
            output: PathBuf::from("package-sizes.csv"),
            registry: "https://registry.npmjs.org".to_string(),
            token: None,
            concurrency: 16,
            verbose: false,
            quiet: false,
        }
    }

    #[test]
    fn test_validation_accepts_defaults() {
        assert!(make_args().validate().is_ok());
    }

    #[test]
    fn test_validation_missing_org() {
        let mut args = make_args();
        args.org = None;
        assert!(args.validate().is_err());

        args.org = Some(String::new());
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_invalid_registry_url() {
        let mut args = make_args();
        args.registry = "registry.npmjs.org".to_string();
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }

    #[test]
    fn test_concurrency_limit() {
        let mut args = make_args();
        assert_eq!(args.concurrency_limit(), Some(16));

        args.concurrency = 0;
        assert_eq!(args.concurrency_limit(), None);
    }
}

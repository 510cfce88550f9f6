//! Command-line configuration.

use crate::types::{CheckRequest, HttpConfig, NameCheckError, ProviderGroup, Result};
use clap::Parser;
use std::time::Duration;

/// TLDs checked when `--tlds` is not given.
pub const DEFAULT_TLDS: [&str; 5] = ["com", "io", "org", "dev", "ai"];

/// Slack on top of the HTTP timeout before the checker gives up on a provider.
const PROVIDER_TIMEOUT_GRACE: Duration = Duration::from_millis(500);

/// Check name availability across Comfy Registry, PyPI, npm, GitHub, and domains.
#[derive(Parser, Debug, Clone)]
#[command(name = "name-check")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Name(s) to check (comma-separated for multiple)
    pub names: String,

    /// Comma-separated TLDs to check
    #[arg(long, value_delimiter = ',', default_values = DEFAULT_TLDS)]
    pub tlds: Vec<String>,

    /// Skip checks (comma-separated)
    #[arg(long, value_delimiter = ',', value_enum, ignore_case = true)]
    pub skip: Vec<ProviderGroup>,

    /// Request timeout in seconds
    #[arg(long, env = "NAME_CHECK_TIMEOUT", default_value = "10")]
    pub timeout: u64,

    /// Number of names to check in parallel
    #[arg(long, short = 'p', default_value = "1")]
    pub parallel: usize,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,

    /// Exit with status 2 if any provider could not be checked
    #[arg(long)]
    pub strict: bool,

    /// Do not look up a GitHub token (gh CLI or environment)
    #[arg(long)]
    pub no_gh_auth: bool,

    /// Custom User-Agent string
    #[arg(long)]
    pub user_agent: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Split the comma-separated names argument, dropping blanks.
    pub fn names(&self) -> Vec<String> {
        self.names
            .split(',')
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// One request per name, sharing the skip list and TLDs.
    pub fn build_requests(&self) -> Result<Vec<CheckRequest>> {
        let names = self.names();
        if names.is_empty() {
            return Err(NameCheckError::NoNames);
        }

        names
            .iter()
            .map(|name| CheckRequest::new(name, &self.skip, &self.tlds))
            .collect()
    }

    /// Get HTTP configuration.
    pub fn http_config(&self) -> HttpConfig {
        let defaults = HttpConfig::default();
        HttpConfig {
            timeout: Duration::from_secs(self.timeout),
            user_agent: self.user_agent.clone().unwrap_or(defaults.user_agent),
        }
    }

    /// Upper bound for a single provider check.
    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout) + PROVIDER_TIMEOUT_GRACE
    }

    pub fn wants_github(&self) -> bool {
        !self.skip.contains(&ProviderGroup::Github)
    }
}

//! Core types and errors for the availability checker.

use serde::Serialize;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur outside of a single provider check.
#[derive(Error, Debug)]
pub enum NameCheckError {
    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("name cannot be empty")]
    EmptyName,

    #[error("no names to check")]
    NoNames,
}

pub type Result<T> = std::result::Result<T, NameCheckError>;

/// Why a single provider could not give a definitive answer.
///
/// Every variant ends up as [`AvailabilityStatus::Unknown`] with the
/// `Display` text as its reason.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckFailure {
    #[error("{0}")]
    Transport(String),

    #[error("timeout")]
    Timeout,

    #[error("auth failed (HTTP {0})")]
    Auth(u16),

    #[error("rate limited")]
    RateLimited,

    #[error("parse error")]
    Malformed,

    #[error("ambiguous record")]
    Ambiguous,

    #[error("HTTP {0}")]
    UnexpectedStatus(u16),

    #[error("internal error")]
    Internal,

    #[error("no client configured")]
    MissingClient,
}

impl CheckFailure {
    /// Classify a reqwest error from sending a request or reading its body.
    pub fn from_reqwest(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Malformed
        } else if err.is_connect() {
            Self::Transport("connection failed".to_string())
        } else if err.is_redirect() {
            Self::Transport("too many redirects".to_string())
        } else {
            Self::Transport("request failed".to_string())
        }
    }
}

/// A bearer credential for the source-host clients.
///
/// `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    /// Wrap a raw token, returning `None` when it is blank.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(***)")
    }
}

/// Provider families selectable with `--skip`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ProviderGroup {
    /// Comfy Registry publisher and node namespaces.
    Comfy,
    /// Python Package Index.
    Pypi,
    /// npm registry.
    Npm,
    /// GitHub users and organizations.
    Github,
    /// Domain names via RDAP.
    Domain,
}

/// One platform a name is checked against.
///
/// Declaration order here is the order results appear in a report.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "tld", rename_all = "snake_case")]
pub enum ProviderKind {
    /// Comfy Registry publisher namespace.
    ComfyPublisher,
    /// Comfy Registry node id.
    ComfyNode,
    /// PyPI project name.
    PyPi,
    /// npm package name.
    Npm,
    /// GitHub user account.
    GithubUser,
    /// GitHub organization.
    GithubOrg,
    /// Domain registration under one top-level domain.
    Domain(String),
}

impl ProviderKind {
    /// All non-domain providers in declaration order.
    pub fn standard() -> Vec<ProviderKind> {
        vec![
            ProviderKind::ComfyPublisher,
            ProviderKind::ComfyNode,
            ProviderKind::PyPi,
            ProviderKind::Npm,
            ProviderKind::GithubUser,
            ProviderKind::GithubOrg,
        ]
    }

    /// Human-readable label for a result row.
    pub fn label(&self, name: &str) -> String {
        match self {
            ProviderKind::ComfyPublisher => "Comfy Publisher".to_string(),
            ProviderKind::ComfyNode => "Comfy Node".to_string(),
            ProviderKind::PyPi => "PyPI".to_string(),
            ProviderKind::Npm => "npm".to_string(),
            ProviderKind::GithubUser => "GitHub User".to_string(),
            ProviderKind::GithubOrg => "GitHub Org".to_string(),
            ProviderKind::Domain(tld) => format!("{}.{}", name.trim(), tld),
        }
    }

    pub fn group(&self) -> ProviderGroup {
        match self {
            ProviderKind::ComfyPublisher | ProviderKind::ComfyNode => ProviderGroup::Comfy,
            ProviderKind::PyPi => ProviderGroup::Pypi,
            ProviderKind::Npm => ProviderGroup::Npm,
            ProviderKind::GithubUser | ProviderKind::GithubOrg => ProviderGroup::Github,
            ProviderKind::Domain(_) => ProviderGroup::Domain,
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::ComfyPublisher => write!(f, "comfy-publisher"),
            ProviderKind::ComfyNode => write!(f, "comfy-node"),
            ProviderKind::PyPi => write!(f, "pypi"),
            ProviderKind::Npm => write!(f, "npm"),
            ProviderKind::GithubUser => write!(f, "github-user"),
            ProviderKind::GithubOrg => write!(f, "github-org"),
            ProviderKind::Domain(tld) => write!(f, "domain(.{})", tld),
        }
    }
}

/// Outcome of checking one provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AvailabilityStatus {
    /// The name is free on this platform.
    Available,
    /// The name is in use.
    Taken { details: Option<String> },
    /// No definitive answer (network, auth, rate limit, bad payload).
    Unknown { reason: String },
}

impl AvailabilityStatus {
    pub fn taken() -> Self {
        AvailabilityStatus::Taken { details: None }
    }

    pub fn taken_with(details: impl Into<String>) -> Self {
        AvailabilityStatus::Taken {
            details: Some(details.into()),
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, AvailabilityStatus::Available)
    }

    pub fn is_taken(&self) -> bool {
        matches!(self, AvailabilityStatus::Taken { .. })
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, AvailabilityStatus::Unknown { .. })
    }

    /// Detail text for display: the taken detail or the unknown reason.
    pub fn details(&self) -> Option<&str> {
        match self {
            AvailabilityStatus::Available => None,
            AvailabilityStatus::Taken { details } => details.as_deref(),
            AvailabilityStatus::Unknown { reason } => Some(reason),
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        match self {
            AvailabilityStatus::Unknown { reason } => {
                *reason == CheckFailure::RateLimited.to_string()
            }
            _ => false,
        }
    }
}

impl From<CheckFailure> for AvailabilityStatus {
    fn from(failure: CheckFailure) -> Self {
        AvailabilityStatus::Unknown {
            reason: failure.to_string(),
        }
    }
}

/// Result of one provider for one name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderResult {
    pub provider: ProviderKind,
    pub label: String,
    pub status: AvailabilityStatus,
}

/// Counts of each status in a report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub available: usize,
    pub taken: usize,
    pub unknown: usize,
}

impl Summary {
    pub fn from_results(results: &[ProviderResult]) -> Self {
        results.iter().fold(Summary::default(), |mut summary, result| {
            match result.status {
                AvailabilityStatus::Available => summary.available += 1,
                AvailabilityStatus::Taken { .. } => summary.taken += 1,
                AvailabilityStatus::Unknown { .. } => summary.unknown += 1,
            }
            summary
        })
    }

    pub fn total(&self) -> usize {
        self.available + self.taken + self.unknown
    }
}

/// Aggregate report for one name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    pub name: String,
    pub results: Vec<ProviderResult>,
    pub summary: Summary,
}

impl CheckReport {
    pub fn new(name: impl Into<String>, results: Vec<ProviderResult>) -> Self {
        let summary = Summary::from_results(&results);
        Self {
            name: name.into(),
            results,
            summary,
        }
    }

    /// Labels of providers that rejected the request for rate limiting.
    pub fn rate_limited(&self) -> Vec<&str> {
        self.results
            .iter()
            .filter(|r| r.status.is_rate_limited())
            .map(|r| r.label.as_str())
            .collect()
    }

    pub fn has_unknown(&self) -> bool {
        self.summary.unknown > 0
    }
}

/// A name plus the providers to check it against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckRequest {
    name: String,
    enabled: Vec<ProviderKind>,
    tlds: Vec<String>,
}

impl CheckRequest {
    /// Build a request with every provider except the skipped groups.
    ///
    /// TLDs are normalized and de-duplicated; they are dropped entirely
    /// when the domain group is skipped.
    pub fn new(name: &str, skip: &[ProviderGroup], tlds: &[String]) -> Result<Self> {
        let mut enabled: Vec<ProviderKind> = ProviderKind::standard()
            .into_iter()
            .filter(|kind| !skip.contains(&kind.group()))
            .collect();

        let mut normalized_tlds: Vec<String> = Vec::new();
        if !skip.contains(&ProviderGroup::Domain) {
            for tld in tlds.iter().filter_map(|t| crate::normalize::normalize_tld(t)) {
                if !normalized_tlds.contains(&tld) {
                    normalized_tlds.push(tld);
                }
            }
        }
        enabled.extend(normalized_tlds.iter().cloned().map(ProviderKind::Domain));

        Self::with_providers(name, enabled)
    }

    /// Build a request for an explicit provider list, kept in the given order.
    pub fn with_providers(name: &str, enabled: Vec<ProviderKind>) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(NameCheckError::EmptyName);
        }

        let tlds = enabled
            .iter()
            .filter_map(|kind| match kind {
                ProviderKind::Domain(tld) => Some(tld.clone()),
                _ => None,
            })
            .collect();

        Ok(Self {
            name: name.to_string(),
            enabled,
            tlds,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn enabled(&self) -> &[ProviderKind] {
        &self.enabled
    }

    pub fn tlds(&self) -> &[String] {
        &self.tlds
    }
}

/// Configuration for HTTP requests.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            user_agent: concat!("name-check/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

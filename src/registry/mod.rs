//! Provider clients for every platform a name is checked against.
//!
//! Each client issues exactly one request per check and classifies the
//! response into an [`AvailabilityStatus`]. Failures never escape a client;
//! they become `Unknown` with a readable reason.

pub mod comfy;
pub mod github;
pub mod npm;
pub mod pypi;
pub mod rdap;

pub use comfy::{ComfyNodeClient, ComfyPublisherClient};
pub use github::{GithubClient, GithubNamespace};
pub use npm::NpmClient;
pub use pypi::PypiClient;
pub use rdap::RdapClient;

use crate::types::{AvailabilityStatus, CheckFailure, HttpConfig, ProviderKind, Result, Token};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Common contract for every availability check.
#[async_trait]
pub trait ProviderClient: Send + Sync {
    fn kind(&self) -> ProviderKind;

    fn label(&self, name: &str) -> String {
        self.kind().label(name)
    }

    /// Check `name`. Must not panic; every failure is an `Unknown` status.
    async fn check(&self, name: &str, credential: Option<&Token>) -> AvailabilityStatus;
}

/// Base URLs of the upstream services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub comfy: String,
    pub pypi: String,
    pub npm: String,
    pub github: String,
    pub rdap: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            comfy: "https://api.comfy.org".to_string(),
            pypi: "https://pypi.org".to_string(),
            npm: "https://registry.npmjs.org".to_string(),
            github: "https://api.github.com".to_string(),
            rdap: "https://rdap.org".to_string(),
        }
    }
}

impl Endpoints {
    /// Point every service at one base URL (used against mock servers).
    pub fn all(base: &str) -> Self {
        Self {
            comfy: base.to_string(),
            pypi: base.to_string(),
            npm: base.to_string(),
            github: base.to_string(),
            rdap: base.to_string(),
        }
    }

    /// Ensure every base URL parses.
    pub fn validate(&self) -> Result<()> {
        for base in [&self.comfy, &self.pypi, &self.npm, &self.github, &self.rdap] {
            Url::parse(base)?;
        }
        Ok(())
    }
}

/// Build the HTTP client shared by all provider clients.
pub fn build_http_client(config: &HttpConfig) -> Result<Client> {
    let client = Client::builder()
        .timeout(config.timeout)
        .user_agent(&config.user_agent)
        .redirect(reqwest::redirect::Policy::limited(5))
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Duration::from_secs(30))
        .build()?;
    Ok(client)
}

/// The closed set of provider clients, selected per [`ProviderKind`].
pub enum Provider {
    ComfyPublisher(ComfyPublisherClient),
    ComfyNode(ComfyNodeClient),
    PyPi(PypiClient),
    Npm(NpmClient),
    Github(GithubClient),
    Domain(RdapClient),
}

impl Provider {
    /// Static mapping from a provider kind to its client.
    pub fn for_kind(kind: &ProviderKind, client: &Client, endpoints: &Endpoints) -> Self {
        let client = client.clone();
        match kind {
            ProviderKind::ComfyPublisher => {
                Provider::ComfyPublisher(ComfyPublisherClient::new(client, &endpoints.comfy))
            }
            ProviderKind::ComfyNode => {
                Provider::ComfyNode(ComfyNodeClient::new(client, &endpoints.comfy))
            }
            ProviderKind::PyPi => Provider::PyPi(PypiClient::new(client, &endpoints.pypi)),
            ProviderKind::Npm => Provider::Npm(NpmClient::new(client, &endpoints.npm)),
            ProviderKind::GithubUser => Provider::Github(GithubClient::new(
                client,
                &endpoints.github,
                GithubNamespace::User,
            )),
            ProviderKind::GithubOrg => Provider::Github(GithubClient::new(
                client,
                &endpoints.github,
                GithubNamespace::Org,
            )),
            ProviderKind::Domain(tld) => {
                Provider::Domain(RdapClient::new(client, &endpoints.rdap, tld))
            }
        }
    }

    /// One client per distinct kind, in first-seen order.
    pub fn for_kinds<'a>(
        kinds: impl IntoIterator<Item = &'a ProviderKind>,
        client: &Client,
        endpoints: &Endpoints,
    ) -> Vec<Provider> {
        let mut seen: Vec<&ProviderKind> = Vec::new();
        for kind in kinds {
            if !seen.contains(&kind) {
                seen.push(kind);
            }
        }
        seen.into_iter()
            .map(|kind| Provider::for_kind(kind, client, endpoints))
            .collect()
    }
}

#[async_trait]
impl ProviderClient for Provider {
    fn kind(&self) -> ProviderKind {
        match self {
            Provider::ComfyPublisher(c) => c.kind(),
            Provider::ComfyNode(c) => c.kind(),
            Provider::PyPi(c) => c.kind(),
            Provider::Npm(c) => c.kind(),
            Provider::Github(c) => c.kind(),
            Provider::Domain(c) => c.kind(),
        }
    }

    async fn check(&self, name: &str, credential: Option<&Token>) -> AvailabilityStatus {
        match self {
            Provider::ComfyPublisher(c) => c.check(name, credential).await,
            Provider::ComfyNode(c) => c.check(name, credential).await,
            Provider::PyPi(c) => c.check(name, credential).await,
            Provider::Npm(c) => c.check(name, credential).await,
            Provider::Github(c) => c.check(name, credential).await,
            Provider::Domain(c) => c.check(name, credential).await,
        }
    }
}

/// Send a request, classifying transport failures.
pub(crate) async fn send(request: RequestBuilder) -> std::result::Result<Response, CheckFailure> {
    request
        .send()
        .await
        .map_err(|e| CheckFailure::from_reqwest(&e))
}

/// Classify a status that is neither "found" nor "not found".
pub(crate) fn classify_status(status: StatusCode) -> CheckFailure {
    match status {
        StatusCode::UNAUTHORIZED => CheckFailure::Auth(status.as_u16()),
        StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => CheckFailure::RateLimited,
        other => CheckFailure::UnexpectedStatus(other.as_u16()),
    }
}

/// Collapse a lookup result into a status.
pub(crate) fn settle(
    kind: &ProviderKind,
    name: &str,
    outcome: std::result::Result<AvailabilityStatus, CheckFailure>,
) -> AvailabilityStatus {
    match outcome {
        Ok(status) => {
            debug!("{} {}: {:?}", kind, name, status);
            status
        }
        Err(failure) => {
            debug!("{} {}: unknown ({})", kind, name, failure);
            failure.into()
        }
    }
}

pub(crate) fn trim_base(base: &str) -> String {
    base.trim_end_matches('/').to_string()
}

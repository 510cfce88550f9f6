//! Comfy Registry checkers: publisher namespaces and node ids.

use crate::normalize::normalize;
use crate::registry::{classify_status, send, settle, trim_base, ProviderClient};
use crate::types::{AvailabilityStatus, CheckFailure, ProviderKind, Token};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::trace;

/// Response of `/publishers/validate`.
#[derive(Debug, Deserialize)]
struct PublisherValidation {
    #[serde(rename = "isAvailable")]
    is_available: Option<bool>,
}

/// Response of `/nodes/search`.
#[derive(Debug, Deserialize)]
struct NodeSearch {
    #[serde(default)]
    nodes: Vec<NodeEntry>,
}

#[derive(Debug, Deserialize)]
struct NodeEntry {
    #[serde(default)]
    id: String,
    publisher: Option<NodePublisher>,
}

#[derive(Debug, Deserialize)]
struct NodePublisher {
    id: Option<String>,
}

/// Asks the registry whether a publisher username is free.
pub struct ComfyPublisherClient {
    client: Client,
    base_url: String,
}

impl ComfyPublisherClient {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: trim_base(base_url),
        }
    }

    async fn lookup(&self, name: &str) -> Result<AvailabilityStatus, CheckFailure> {
        let username = normalize(&ProviderKind::ComfyPublisher, name);
        let url = format!("{}/publishers/validate", self.base_url);
        trace!("Checking Comfy publisher: {} ({})", url, username);

        let response = send(self.client.get(&url).query(&[("username", &username)])).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(classify_status(status));
        }

        let validation: PublisherValidation = response
            .json()
            .await
            .map_err(|e| CheckFailure::from_reqwest(&e))?;

        match validation.is_available {
            Some(true) => Ok(AvailabilityStatus::Available),
            Some(false) => Ok(AvailabilityStatus::taken_with("taken")),
            None => Err(CheckFailure::Malformed),
        }
    }
}

#[async_trait]
impl ProviderClient for ComfyPublisherClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::ComfyPublisher
    }

    async fn check(&self, name: &str, _credential: Option<&Token>) -> AvailabilityStatus {
        settle(&ProviderKind::ComfyPublisher, name, self.lookup(name).await)
    }
}

/// Searches registry nodes for one whose id matches the name exactly.
pub struct ComfyNodeClient {
    client: Client,
    base_url: String,
}

impl ComfyNodeClient {
    /// Number of search hits inspected for an exact id match.
    const SEARCH_LIMIT: &'static str = "5";

    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: trim_base(base_url),
        }
    }

    async fn lookup(&self, name: &str) -> Result<AvailabilityStatus, CheckFailure> {
        let node_id = normalize(&ProviderKind::ComfyNode, name);
        let url = format!("{}/nodes/search", self.base_url);
        trace!("Checking Comfy node: {} ({})", url, node_id);

        let request = self
            .client
            .get(&url)
            .query(&[("search", node_id.as_str()), ("limit", Self::SEARCH_LIMIT)]);
        let response = send(request).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(classify_status(status));
        }

        let search: NodeSearch = response
            .json()
            .await
            .map_err(|e| CheckFailure::from_reqwest(&e))?;

        Ok(classify_nodes(&search.nodes, &node_id))
    }
}

/// Search is fuzzy; only an exact (case-insensitive) id match means taken.
fn classify_nodes(nodes: &[NodeEntry], node_id: &str) -> AvailabilityStatus {
    match nodes.iter().find(|n| n.id.eq_ignore_ascii_case(node_id)) {
        Some(node) => {
            let publisher = node
                .publisher
                .as_ref()
                .and_then(|p| p.id.as_deref())
                .unwrap_or("unknown");
            AvailabilityStatus::taken_with(format!("by @{}", publisher))
        }
        None => AvailabilityStatus::Available,
    }
}

#[async_trait]
impl ProviderClient for ComfyNodeClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::ComfyNode
    }

    async fn check(&self, name: &str, _credential: Option<&Token>) -> AvailabilityStatus {
        settle(&ProviderKind::ComfyNode, name, self.lookup(name).await)
    }
}

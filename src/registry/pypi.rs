//! PyPI project name checker.

use crate::normalize::normalize;
use crate::registry::{classify_status, send, settle, trim_base, ProviderClient};
use crate::types::{AvailabilityStatus, CheckFailure, ProviderKind, Token};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::trace;

/// Checks project names against the PyPI JSON API, after PEP 503 normalization.
pub struct PypiClient {
    client: Client,
    base_url: String,
}

impl PypiClient {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: trim_base(base_url),
        }
    }

    async fn lookup(&self, name: &str) -> Result<AvailabilityStatus, CheckFailure> {
        let normalized = normalize(&ProviderKind::PyPi, name);
        let url = format!(
            "{}/pypi/{}/json",
            self.base_url,
            urlencoding::encode(&normalized)
        );
        trace!("Checking PyPI: {}", url);

        let response = send(self.client.get(&url)).await?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(AvailabilityStatus::Available),
            status if status.is_success() => {
                if normalized != name {
                    Ok(AvailabilityStatus::taken_with(format!(
                        "(normalized: {})",
                        normalized
                    )))
                } else {
                    Ok(AvailabilityStatus::taken())
                }
            }
            status => Err(classify_status(status)),
        }
    }
}

#[async_trait]
impl ProviderClient for PypiClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::PyPi
    }

    async fn check(&self, name: &str, _credential: Option<&Token>) -> AvailabilityStatus {
        let name = name.trim();
        settle(&ProviderKind::PyPi, name, self.lookup(name).await)
    }
}

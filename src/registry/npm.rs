//! npm registry checker for package name availability.

use crate::normalize::normalize;
use crate::registry::{classify_status, send, settle, trim_base, ProviderClient};
use crate::types::{AvailabilityStatus, CheckFailure, ProviderKind, Token};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{trace, warn};

/// npm registry API response for package info.
#[derive(Debug, Deserialize)]
struct NpmPackageInfo {
    #[serde(rename = "dist-tags")]
    dist_tags: Option<DistTags>,
}

#[derive(Debug, Deserialize)]
struct DistTags {
    latest: Option<String>,
}

/// Checker for package names against the npm registry.
pub struct NpmClient {
    client: Client,
    registry_url: String,
}

impl NpmClient {
    pub fn new(client: Client, registry_url: &str) -> Self {
        Self {
            client,
            registry_url: trim_base(registry_url),
        }
    }

    async fn lookup(&self, name: &str) -> Result<AvailabilityStatus, CheckFailure> {
        let package_name = normalize(&ProviderKind::Npm, name);
        let url = format!(
            "{}/{}",
            self.registry_url,
            urlencoding::encode(&package_name)
        );
        trace!("Checking npm: {}", url);

        let response = send(self.client.get(&url)).await?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(AvailabilityStatus::Available),
            status if status.is_success() => {
                // The status alone proves the package exists; the version is a bonus.
                match response.json::<NpmPackageInfo>().await {
                    Ok(info) => Ok(match info.dist_tags.and_then(|dt| dt.latest) {
                        Some(latest) => AvailabilityStatus::taken_with(format!("v{}", latest)),
                        None => AvailabilityStatus::taken(),
                    }),
                    Err(e) => {
                        warn!("Failed to parse npm response for {}: {}", package_name, e);
                        Ok(AvailabilityStatus::taken())
                    }
                }
            }
            status => Err(classify_status(status)),
        }
    }
}

#[async_trait]
impl ProviderClient for NpmClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Npm
    }

    async fn check(&self, name: &str, _credential: Option<&Token>) -> AvailabilityStatus {
        settle(&ProviderKind::Npm, name, self.lookup(name).await)
    }
}

//! GitHub user and organization namespace checkers.

use crate::normalize::normalize;
use crate::registry::{classify_status, send, settle, trim_base, ProviderClient};
use crate::types::{AvailabilityStatus, CheckFailure, ProviderKind, Token};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::trace;

const GITHUB_ACCEPT: &str = "application/vnd.github+json";

#[derive(Debug, Deserialize)]
struct UserInfo {
    #[serde(rename = "type")]
    account_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OrgInfo {
    public_repos: Option<u64>,
}

/// Which GitHub namespace a client looks in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GithubNamespace {
    User,
    Org,
}

impl GithubNamespace {
    fn path(self) -> &'static str {
        match self {
            GithubNamespace::User => "users",
            GithubNamespace::Org => "orgs",
        }
    }
}

/// Checks a GitHub login against `/users/{name}` or `/orgs/{name}`.
///
/// The token only raises the rate limit; without one the check still runs.
pub struct GithubClient {
    client: Client,
    base_url: String,
    namespace: GithubNamespace,
}

impl GithubClient {
    pub fn new(client: Client, base_url: &str, namespace: GithubNamespace) -> Self {
        Self {
            client,
            base_url: trim_base(base_url),
            namespace,
        }
    }

    async fn lookup(
        &self,
        name: &str,
        credential: Option<&Token>,
    ) -> Result<AvailabilityStatus, CheckFailure> {
        let login = normalize(&self.kind(), name);
        let url = format!(
            "{}/{}/{}",
            self.base_url,
            self.namespace.path(),
            urlencoding::encode(&login)
        );
        trace!("Checking GitHub: {} (authenticated: {})", url, credential.is_some());

        let mut request = self.client.get(&url).header(ACCEPT, GITHUB_ACCEPT);
        if let Some(token) = credential {
            request = request.bearer_auth(token.as_str());
        }

        let response = send(request).await?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(AvailabilityStatus::Available),
            status if status.is_success() => {
                let body = response.text().await.unwrap_or_default();
                Ok(self.describe_existing(&body))
            }
            status => Err(classify_status(status)),
        }
    }

    /// A 200 settles it; the body only adds detail.
    fn describe_existing(&self, body: &str) -> AvailabilityStatus {
        match self.namespace {
            GithubNamespace::User => {
                let account_type = serde_json::from_str::<UserInfo>(body)
                    .ok()
                    .and_then(|info| info.account_type)
                    .unwrap_or_else(|| "User".to_string());
                AvailabilityStatus::taken_with(account_type)
            }
            GithubNamespace::Org => {
                let repos = serde_json::from_str::<OrgInfo>(body)
                    .ok()
                    .and_then(|info| info.public_repos)
                    .unwrap_or(0);
                AvailabilityStatus::taken_with(format!("{} repos", repos))
            }
        }
    }
}

#[async_trait]
impl ProviderClient for GithubClient {
    fn kind(&self) -> ProviderKind {
        match self.namespace {
            GithubNamespace::User => ProviderKind::GithubUser,
            GithubNamespace::Org => ProviderKind::GithubOrg,
        }
    }

    async fn check(&self, name: &str, credential: Option<&Token>) -> AvailabilityStatus {
        settle(&self.kind(), name, self.lookup(name, credential).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(namespace: GithubNamespace) -> GithubClient {
        GithubClient::new(Client::new(), "https://api.github.com/", namespace)
    }

    #[test]
    fn test_user_detail_is_account_type() {
        let status = client(GithubNamespace::User).describe_existing(r#"{"type":"Organization"}"#);
        assert_eq!(status, AvailabilityStatus::taken_with("Organization"));
    }

    #[test]
    fn test_user_detail_defaults_when_body_is_not_json() {
        let status = client(GithubNamespace::User).describe_existing("<html>");
        assert_eq!(status, AvailabilityStatus::taken_with("User"));
    }

    #[test]
    fn test_org_detail_counts_repos() {
        let status = client(GithubNamespace::Org).describe_existing(r#"{"public_repos":42}"#);
        assert_eq!(status, AvailabilityStatus::taken_with("42 repos"));
    }

    #[test]
    fn test_kind_follows_namespace() {
        assert_eq!(client(GithubNamespace::User).kind(), ProviderKind::GithubUser);
        assert_eq!(client(GithubNamespace::Org).kind(), ProviderKind::GithubOrg);
        assert_eq!(client(GithubNamespace::Org).base_url, "https://api.github.com");
    }
}

//! Domain availability via RDAP (Registration Data Access Protocol).
//!
//! One client exists per TLD. The lookup goes through an RDAP bootstrap
//! service that redirects to the authoritative registry server.

use crate::normalize::normalize;
use crate::registry::{classify_status, send, settle, trim_base, ProviderClient};
use crate::types::{AvailabilityStatus, CheckFailure, ProviderKind, Token};
use async_trait::async_trait;
use chrono::DateTime;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::trace;

/// The parts of an RDAP domain response the classification needs.
#[derive(Debug, Deserialize)]
struct RdapRecord {
    #[serde(rename = "errorCode")]
    error_code: Option<serde_json::Value>,
    #[serde(rename = "objectClassName")]
    object_class_name: Option<String>,
    #[serde(rename = "ldhName")]
    ldh_name: Option<String>,
    #[serde(default)]
    events: Vec<RdapEvent>,
}

#[derive(Debug, Deserialize)]
struct RdapEvent {
    #[serde(rename = "eventAction", default)]
    action: String,
    #[serde(rename = "eventDate")]
    date: Option<String>,
}

/// Checks `{name}.{tld}` registration.
pub struct RdapClient {
    client: Client,
    base_url: String,
    tld: String,
}

impl RdapClient {
    pub fn new(client: Client, base_url: &str, tld: &str) -> Self {
        Self {
            client,
            base_url: trim_base(base_url),
            tld: tld.to_string(),
        }
    }

    async fn lookup(&self, name: &str) -> Result<AvailabilityStatus, CheckFailure> {
        let label = normalize(&self.kind(), name);
        let domain = format!("{}.{}", label, self.tld);
        let url = format!("{}/domain/{}", self.base_url, urlencoding::encode(&domain));
        trace!("Checking RDAP: {}", url);

        let response = send(self.client.get(&url)).await?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(AvailabilityStatus::Available),
            status if status.is_success() => {
                let body = response
                    .text()
                    .await
                    .map_err(|e| CheckFailure::from_reqwest(&e))?;
                classify_record(&body)
            }
            status => Err(classify_status(status)),
        }
    }
}

/// Classify a 200 RDAP body.
///
/// Some registries answer 200 with an error object for unregistered names.
fn classify_record(body: &str) -> Result<AvailabilityStatus, CheckFailure> {
    let record: RdapRecord = serde_json::from_str(body).map_err(|_| CheckFailure::Malformed)?;

    if record.error_code.is_some() {
        return Ok(AvailabilityStatus::Available);
    }

    let is_domain = record.object_class_name.as_deref() == Some("domain")
        || record.ldh_name.is_some();
    if !is_domain {
        return Err(CheckFailure::Ambiguous);
    }

    let expiry = record
        .events
        .iter()
        .find(|e| e.action == "expiration")
        .and_then(|e| e.date.as_deref())
        .map(format_event_date);

    Ok(match expiry {
        Some(date) => AvailabilityStatus::taken_with(format!("exp {}", date)),
        None => AvailabilityStatus::taken(),
    })
}

/// Render an RDAP event date as `YYYY-MM-DD`, keeping the record's offset.
fn format_event_date(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(date) => date.format("%Y-%m-%d").to_string(),
        Err(_) => raw.get(..10).unwrap_or(raw).to_string(),
    }
}

#[async_trait]
impl ProviderClient for RdapClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Domain(self.tld.clone())
    }

    async fn check(&self, name: &str, _credential: Option<&Token>) -> AvailabilityStatus {
        settle(&self.kind(), name, self.lookup(name).await)
    }
}

//! Checker orchestrating all provider clients.
//!
//! For one name, every enabled provider is queried concurrently and the
//! results are gathered back in declaration order. A failing, hanging, or
//! panicking provider only affects its own row.

use crate::registry::{Provider, ProviderClient};
use crate::types::{
    AvailabilityStatus, CheckFailure, CheckReport, CheckRequest, ProviderKind, ProviderResult,
    Token,
};
use futures::future::join_all;
use futures::stream::{self, StreamExt};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::time::Duration;
use tracing::{debug, warn};

/// Runs availability checks against a fixed set of provider clients.
pub struct Checker<C = Provider> {
    clients: Vec<C>,
    provider_timeout: Duration,
    parallel: usize,
}

impl<C: ProviderClient> Checker<C> {
    /// Create a checker. `provider_timeout` bounds every single provider check.
    pub fn new(clients: Vec<C>, provider_timeout: Duration) -> Self {
        Self {
            clients,
            provider_timeout,
            parallel: 1,
        }
    }

    /// Number of names checked at once by [`Checker::run_all`].
    pub fn with_parallel(mut self, parallel: usize) -> Self {
        self.parallel = parallel.max(1);
        self
    }

    /// Check one name against every provider enabled in `request`.
    pub async fn run(&self, request: &CheckRequest, credential: Option<&Token>) -> CheckReport {
        let name = request.name();
        debug!(
            "Checking {} against {} providers",
            name,
            request.enabled().len()
        );

        // join_all yields outputs in input order, whatever order they finish in.
        let checks = request
            .enabled()
            .iter()
            .map(|kind| self.check_one(kind, name, credential));
        let results = join_all(checks).await;

        let report = CheckReport::new(name, results);
        debug!(
            "{}: {} available, {} taken, {} unknown",
            name, report.summary.available, report.summary.taken, report.summary.unknown
        );
        report
    }

    /// Check several names, returning reports in input order.
    pub async fn run_all(
        &self,
        requests: &[CheckRequest],
        credential: Option<&Token>,
    ) -> Vec<CheckReport> {
        stream::iter(requests)
            .map(|request| self.run(request, credential))
            .buffered(self.parallel)
            .collect()
            .await
    }

    async fn check_one(
        &self,
        kind: &ProviderKind,
        name: &str,
        credential: Option<&Token>,
    ) -> ProviderResult {
        let Some(client) = self.clients.iter().find(|c| c.kind() == *kind) else {
            warn!("No client configured for {}", kind);
            return ProviderResult {
                provider: kind.clone(),
                label: kind.label(name),
                status: CheckFailure::MissingClient.into(),
            };
        };

        let guarded = AssertUnwindSafe(client.check(name, credential)).catch_unwind();
        let status: AvailabilityStatus =
            match tokio::time::timeout(self.provider_timeout, guarded).await {
                Ok(Ok(status)) => status,
                Ok(Err(_)) => {
                    warn!("{} check panicked for {}", kind, name);
                    CheckFailure::Internal.into()
                }
                Err(_) => {
                    debug!("{} check timed out for {}", kind, name);
                    CheckFailure::Timeout.into()
                }
            };

        if let AvailabilityStatus::Unknown { reason } = &status {
            debug!("{} unknown for {}: {}", kind, name, reason);
        }

        ProviderResult {
            provider: kind.clone(),
            label: client.label(name),
            status,
        }
    }
}

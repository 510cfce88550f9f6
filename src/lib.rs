//! name-check - check whether a name is free across package registries,
//! GitHub, and domains.
//!
//! This library provides:
//! - Per-provider name normalization (PEP 503 for PyPI, case folding elsewhere)
//! - One client per platform: Comfy Registry, PyPI, npm, GitHub, RDAP domains
//! - A checker that queries all providers concurrently and isolates failures
//! - Aggregate reports with available/taken/unknown counts
//!
//! # Example
//!
//! ```no_run
//! use name_check::registry::{build_http_client, Endpoints, Provider};
//! use name_check::{CheckRequest, Checker, HttpConfig};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> name_check::Result<()> {
//!     let request = CheckRequest::new("my-cool-name", &[], &["com".to_string()])?;
//!     let http = build_http_client(&HttpConfig::default())?;
//!     let clients = Provider::for_kinds(request.enabled(), &http, &Endpoints::default());
//!     let checker = Checker::new(clients, Duration::from_secs(11));
//!
//!     let report = checker.run(&request, None).await;
//!     println!("{} available", report.summary.available);
//!     Ok(())
//! }
//! ```

pub mod checker;
pub mod config;
pub mod credentials;
pub mod normalize;
pub mod notify;
pub mod registry;
pub mod types;

pub use checker::Checker;
pub use config::Config;
pub use normalize::normalize;
pub use types::{
    AvailabilityStatus, CheckFailure, CheckReport, CheckRequest, HttpConfig, NameCheckError,
    ProviderGroup, ProviderKind, ProviderResult, Result, Summary, Token,
};

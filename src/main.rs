//! name-check - name availability checker.
//!
//! CLI entry point.

use clap::Parser;
use name_check::credentials::resolve_token;
use name_check::notify::ConsoleOutput;
use name_check::registry::{build_http_client, Endpoints, Provider};
use name_check::{CheckReport, Checker, Config, Result};
use std::process::ExitCode;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    // Set up logging
    let filter = if config.verbose {
        EnvFilter::new("name_check=debug,info")
    } else {
        EnvFilter::new("name_check=info,warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(&config).await {
        Ok(code) => code,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: &Config) -> Result<ExitCode> {
    let requests = config.build_requests()?;

    let endpoints = Endpoints::default();
    endpoints.validate()?;
    let http = build_http_client(&config.http_config())?;
    let clients = Provider::for_kinds(
        requests.iter().flat_map(|r| r.enabled()),
        &http,
        &endpoints,
    );

    let token = if config.wants_github() && !config.no_gh_auth {
        resolve_token().await
    } else {
        debug!("Skipping GitHub token discovery");
        None
    };

    let checker = Checker::new(clients, config.provider_timeout()).with_parallel(config.parallel);
    let console = ConsoleOutput::new(config.json);

    let spinner = console.create_spinner(&format!(
        "Checking {} name(s)...",
        requests.len()
    ));
    let reports = checker.run_all(&requests, token.as_ref()).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    console.print_reports(&reports)?;

    if config.strict && reports.iter().any(CheckReport::has_unknown) {
        return Ok(ExitCode::from(2));
    }

    Ok(ExitCode::SUCCESS)
}

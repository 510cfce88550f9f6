//! GitHub credential discovery.
//!
//! Sources, in order: the GitHub CLI's cached token (`gh auth token`), then
//! the `GITHUB_TOKEN` and `GH_TOKEN` environment variables. No token is a
//! valid outcome; checks then run under the unauthenticated rate limit.

use crate::types::Token;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, trace};

/// Environment variables consulted after the GitHub CLI.
pub const TOKEN_ENV_VARS: [&str; 2] = ["GITHUB_TOKEN", "GH_TOKEN"];

const GH_CLI_TIMEOUT: Duration = Duration::from_secs(5);

/// Resolve a GitHub token, if one is available.
pub async fn resolve_token() -> Option<Token> {
    if let Some(token) = gh_cli_token().await {
        debug!("Using GitHub token from gh CLI");
        return Some(token);
    }

    let token = token_from_env(|key| std::env::var(key).ok());
    if token.is_some() {
        debug!("Using GitHub token from environment");
    } else {
        debug!("No GitHub token found, using unauthenticated requests");
    }
    token
}

/// Pick the first non-blank token among [`TOKEN_ENV_VARS`].
pub fn token_from_env<F>(lookup: F) -> Option<Token>
where
    F: Fn(&str) -> Option<String>,
{
    TOKEN_ENV_VARS
        .iter()
        .find_map(|key| lookup(key).and_then(Token::new))
}

async fn gh_cli_token() -> Option<Token> {
    let mut command = Command::new("gh");
    command.args(["auth", "token"]).kill_on_drop(true);

    match tokio::time::timeout(GH_CLI_TIMEOUT, command.output()).await {
        Ok(Ok(output)) if output.status.success() => {
            Token::new(String::from_utf8_lossy(&output.stdout).into_owned())
        }
        Ok(Ok(output)) => {
            trace!("gh auth token exited with {}", output.status);
            None
        }
        Ok(Err(e)) => {
            trace!("gh CLI unavailable: {}", e);
            None
        }
        Err(_) => {
            debug!("gh auth token timed out");
            None
        }
    }
}

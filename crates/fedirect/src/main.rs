//! fedirect - WebFinger redirect service
//!
//! Accepts a `user@host` identifier over HTTP and redirects the caller to
//! the account's profile page, discovered via WebFinger.

mod server;

use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use webfinger_client::WebFingerResolver;

use crate::server::{start_server, ServerConfig};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "fedirect=info".into()),
        )
        .init();

    let config = load_config();
    info!(port = config.port, "Starting fedirect");

    let resolver = Arc::new(WebFingerResolver::new());
    if let Err(err) = start_server(resolver, config).await {
        error!(error = %err, "Server error");
        std::process::exit(1);
    }
}

fn load_config() -> ServerConfig {
    let port = std::env::var("PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(8080);

    let footer = std::env::var("FEDIRECT_FOOTER")
        .ok()
        .filter(|s| !s.is_empty());

    ServerConfig { port, footer }
}

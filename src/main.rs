mod config;
mod domain;
mod error;
mod perplexica;
mod presentation;
mod server;
mod tools;
mod translate;
mod usecase;

#[cfg(test)]
mod testing;

use anyhow::Result;
use rmcp::{transport::stdio, ServiceExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::perplexica::PerplexicaClient;
use crate::server::PerplexicaSearchServer;
use crate::usecase::SearchUseCase;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load();
    let log_level = config.as_ref().map(|c| c.log_level.as_str()).unwrap_or("info");

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting Perplexica Search MCP Server v{}", env!("CARGO_PKG_VERSION"));

    let config = config?;
    let client = Arc::new(PerplexicaClient::new(
        &config.perplexica_url,
        Duration::from_secs_f64(config.timeout_secs),
    ));
    tracing::debug!(
        "Configuration loaded: url={} timeout={}s",
        client.base_url(),
        config.timeout_secs
    );

    let server = PerplexicaSearchServer::new(SearchUseCase::new(client.clone()), config.defaults.clone());
    let service = server.serve(stdio()).await?;

    tokio::select! {
        result = service.waiting() => {
            if let Err(e) = result {
                tracing::warn!("Service ended with error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            tracing::info!("Shutdown signal received");
        }
    }

    client.close();
    tracing::info!("Perplexica Search MCP Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}

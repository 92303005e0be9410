use std::net::SocketAddr;

use anyhow::{Context, Result};
use netainfo_service::config::Config;
use netainfo_service::metric;
use netainfo_service::service::DashboardService;

use crate::endpoints;

/// Loads the dataset and serves the dashboard API on the configured address.
pub fn run(config: Config) -> Result<()> {
    // Log this metric before actually starting the server. This allows to see restarts even if
    // loading the dataset fails.
    metric!(counter("server.starting") += 1);

    let megs = 1024 * 1024;
    let web_pool = tokio::runtime::Builder::new_multi_thread()
        .thread_name("netainfo-web")
        .enable_all()
        .thread_stack_size(8 * megs)
        .build()?;

    let service = DashboardService::create(&config).context("failed to load candidate dataset")?;
    let socket = config
        .bind
        .parse::<SocketAddr>()
        .with_context(|| format!("invalid bind address `{}`", config.bind))?;

    let server =
        axum_server::bind(socket).serve(endpoints::create_app(service).into_make_service());
    tracing::info!("Starting HTTP server on {}", socket);

    web_pool.block_on(server)?;
    tracing::info!("System shutdown complete");

    Ok(())
}

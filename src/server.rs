//! MCP server initialization for stdio and Streamable HTTP transports.
//!
//! Provides [`serve_stdio`] and [`serve_http`] entry points that wire up the
//! database, geocoder, and MCP tool handler into a running server.

use anyhow::Result;
use kliniki::config::KlinikiConfig;
use kliniki::db;
use kliniki::geocode::{self, GeocoderAdapter};
use kliniki::service::LocationSearchService;
use rmcp::ServiceExt;
use std::sync::{Arc, Mutex};

use crate::tools::KlinikiTools;

/// Shared setup: open DB, create the geocoder, build the search service.
pub fn build_service(config: &KlinikiConfig) -> Result<Arc<LocationSearchService>> {
    let db_path = config.resolved_db_path();
    let conn = db::open_database(&db_path)?;

    let health = db::check_database_health(&conn)?;
    if health.clinic_count == 0 && health.hospital_count == 0 {
        tracing::warn!(
            db = %db_path.display(),
            "facility registries are empty, run `kliniki import <snapshot.json>`"
        );
    }
    tracing::info!(
        db = %db_path.display(),
        clinics = health.clinic_count,
        hospitals = health.hospital_count,
        "database ready"
    );

    let provider = geocode::create_geocoder(&config.geocoder)?;
    tracing::info!(provider = provider.name(), "geocoder ready");
    let geocoder = GeocoderAdapter::new(provider, &config.geocoder);

    Ok(Arc::new(LocationSearchService::new(
        Arc::new(Mutex::new(conn)),
        geocoder,
        config.search.clone(),
    )))
}

/// Start the MCP server over stdio transport.
pub async fn serve_stdio(config: KlinikiConfig) -> Result<()> {
    tracing::info!("starting Kliniki MCP server on stdio");

    let service = build_service(&config)?;

    let tools = KlinikiTools::new(service);
    let transport = rmcp::transport::stdio();

    let server = tools.serve(transport).await?;
    tracing::info!("MCP server running, waiting for client");

    server.waiting().await?;
    tracing::info!("MCP server shut down");

    Ok(())
}

/// Start the MCP server over Streamable HTTP transport.
pub async fn serve_http(config: KlinikiConfig) -> Result<()> {
    let host = config.server.host.clone();
    let port = config.server.port;
    let bind_addr = format!("{host}:{port}");

    tracing::info!(addr = %bind_addr, "starting Kliniki MCP server on HTTP");

    let service = build_service(&config)?;

    let http_service = rmcp::transport::streamable_http_server::StreamableHttpService::new(
        move || Ok(KlinikiTools::new(service.clone())),
        rmcp::transport::streamable_http_server::session::local::LocalSessionManager::default()
            .into(),
        Default::default(),
    );

    let router = axum::Router::new().nest_service("/mcp", http_service);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "MCP server listening at http://{bind_addr}/mcp");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for ctrl-c");
            }
            tracing::info!("shutting down HTTP server");
        })
        .await?;

    Ok(())
}

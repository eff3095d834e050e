mod api;
mod cli;
mod dao;
mod error;
mod model;
mod service;

use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, Level};

use api::AccessLog;
use cli::Args;
use dao::MaxMindDatabase;
use service::GeoService;

#[actix_web::main]
async fn main() -> Result<()> {
    let config = Args::parse().merge_with_config()?;

    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(if config.verbose { Level::DEBUG } else { Level::INFO })
        .with_target(false)
        .init();

    info!("Geo service starting");
    info!(
        "Config: listen={}, port={}, mmdb={}, workers={:?}",
        config.listen,
        config.port,
        config.mmdb_dir.display(),
        config.workers
    );

    let database = MaxMindDatabase::open(&config.mmdb_dir).with_context(|| {
        format!("Failed to open GeoIP databases in {}", config.mmdb_dir.display())
    })?;
    for metadata in database.metadata() {
        let built_at = metadata
            .built_at()
            .map(|dt| dt.to_string())
            .unwrap_or_else(|| "-".to_string());
        info!(
            "Using {} build on {} (epoch={})",
            metadata.description.as_deref().unwrap_or(&metadata.database_type),
            built_at,
            metadata.build_epoch
        );
    }

    let service = web::Data::new(GeoService::new(Arc::new(database)));

    let mut server = HttpServer::new(move || {
        App::new()
            .app_data(service.clone())
            .wrap(api::default_headers())
            .wrap(AccessLog)
            .configure(api::init_routes)
    });
    if let Some(workers) = config.workers {
        server = server.workers(workers);
    }

    info!("Listening on {}:{}", config.listen, config.port);
    server
        .bind((config.listen.as_str(), config.port))
        .with_context(|| format!("Failed to bind {}:{}", config.listen, config.port))?
        .run()
        .await?;

    info!("Geo service stopped");
    Ok(())
}

/*****************************************************************************************
 *
 *  SusuWhisper – Minimal self-hosted article publishing
 *  ----------------------------------------------------
 *
 *  Articles live in memory behind one lock and are mirrored to a JSON snapshot
 *  on every write. Uploaded images are stored per article and served statically.
 *
 *****************************************************************************************/

mod app;
mod config;
mod errors;
mod logging;
mod persistence;
mod routes;
mod services;
mod state;
mod views;

use std::net::SocketAddr;

use axum::serve;
use tokio::net::TcpListener;

use crate::config::AppConfig;
use crate::errors::StartupError;
use crate::state::{AppState, ArticleStore, SharedStore};

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    //
    // ────────────────────────────────────────────────────────
    //  Locate and load config.json (EXE folder or its parent)
    // ────────────────────────────────────────────────────────
    //
    let exe_path = std::env::current_exe()?;
    let exe_dir = exe_path.parent().unwrap_or_else(|| std::path::Path::new("."));

    let config_path = AppConfig::locate(exe_dir)?;
    let cfg = AppConfig::load_from_file(&config_path)?;

    //
    // ────────────────────────────────────────────────────────
    //  Configure logging
    // ────────────────────────────────────────────────────────
    //
    logging::init(&cfg)?;

    tracing::info!(path = %config_path.display(), "loaded config.json");
    tracing::info!("Loaded configuration: {:?}", cfg);

    //
    // ────────────────────────────────────────────────────────
    //  Create article store and load snapshot
    // ────────────────────────────────────────────────────────
    //
    let store = ArticleStore::shared(&cfg.data_path);
    if let Err(e) = store.load() {
        tracing::error!(error = %e, "failed to load articles, starting empty");
    }
    if store.is_empty() {
        tracing::info!("no articles yet");
    }

    //
    // ────────────────────────────────────────────────────────
    //  Build Axum app
    // ────────────────────────────────────────────────────────
    //
    let state = AppState::new(store.clone(), cfg.clone());
    let app = app::build_app(state);

    //
    // ────────────────────────────────────────────────────────
    //  Bind server and start listening
    // ────────────────────────────────────────────────────────
    //
    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.port));
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("Server running on http://{}", addr);

    serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown(store))
    .await?;

    Ok(())
}

//
// ─────────────────────────────────────────────────────────────
//  Graceful shutdown handler
// ─────────────────────────────────────────────────────────────
//
async fn shutdown(store: SharedStore) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }

    tracing::warn!("CTRL+C received, flushing articles");
    match store.persist() {
        Ok(()) => tracing::info!("Articles saved. Goodbye."),
        Err(e) => tracing::error!(error = %e, "final save failed"),
    }
}

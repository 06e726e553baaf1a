use std::net::SocketAddr;

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{header::USER_AGENT, Request},
    Router,
};
use tower_http::{
    services::ServeDir,
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

use crate::routes::{article_routes, system_routes};
use crate::state::AppState;

/// Build the complete Axum application:
/// - /, /article, /overview, /upload  (articles)
/// - /uploads/*                       (uploaded files)
/// - /tinymce/*                       (editor bundle)
/// - /system/*                        (alive, version, stats)
pub fn build_app(state: AppState) -> Router {
    let uploads = ServeDir::new(&state.config.uploads_dir);
    let tinymce = ServeDir::new(&state.config.tinymce_dir);

    Router::new()
        .merge(article_routes::routes(state.clone()))
        .nest_service("/uploads", uploads)
        .nest_service("/tinymce", tinymce)
        .nest("/system", system_routes::routes(state))
        // Request logging
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(request_span)
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

fn request_span(req: &Request<Body>) -> Span {
    let user_agent = req
        .headers()
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    let remote_addr = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_default();

    tracing::info_span!(
        "request",
        method = %req.method(),
        path = %req.uri().path(),
        remote_addr = %remote_addr,
        user_agent = %user_agent,
    )
}

mod config;
mod dto;
mod handlers;
mod models;
mod repository;
mod service;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::any,
};

use std::sync::Arc;

use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use handlers::rest;
use repository::Repository;
use service::{NoteService, RandomFaults};

#[tokio::main]
async fn main() {
    // Log setup
    tracing_subscriber::fmt::init();

    // Load config
    let cfg = config::Config::from_env();

    // Repository creation, loading the storage file once at startup
    let repo = Repository::new(&cfg.storage_path).unwrap_or_else(|e| {
        tracing::error!("Failed to load note storage: {e}");
        panic!("failed to load note storage: {e}");
    });
    let repo_ptr = Arc::new(tokio::sync::Mutex::new(repo));

    // Service creation
    let service = Arc::new(NoteService::new(
        repo_ptr,
        Box::new(RandomFaults::new(cfg.fault_probability)),
    ));

    // Router config
    let router = rest::router(service)
        .route("/", any(root))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", rest::ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", cfg.port))
        .await
        .expect("failed to bind to address");

    // Starting router
    tracing::info!("Started listening on {}", listener.local_addr().unwrap());
    axum::serve(listener, router)
        .await
        .expect("failed to start server");
}

async fn root() -> Response {
    (StatusCode::OK, "Notes API is up!").into_response()
}

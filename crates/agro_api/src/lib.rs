//! HTTP boundary for the agro record backend.
//!
//! # Responsibility
//! - Map REST routes onto core services.
//! - Translate core errors into status codes and JSON bodies.
//!
//! # Invariants
//! - One SQLite connection is shared behind an async mutex; handlers never
//!   hold repository borrows across an await point.

pub mod error;
mod handlers;
pub mod pagination;

use agro_core::config::PaginationConfig;
use agro_core::{AgroConfig, DocumentPolicy};
use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use log::info;
use rusqlite::Connection;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;

pub use error::ApiResult;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    db: Arc<Mutex<Connection>>,
    pagination: PaginationConfig,
    documents: DocumentPolicy,
}

impl AppState {
    pub fn new(conn: Connection, config: &AgroConfig) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
            pagination: config.pagination.clone(),
            documents: config.documents,
        }
    }

    /// Runs `f` with exclusive access to the connection.
    ///
    /// `f` blocks the calling worker while it holds the lock. Every caller
    /// issues a few short indexed SQLite statements, so they run inline
    /// rather than on the blocking pool.
    pub(crate) async fn with_conn<T>(
        &self,
        f: impl FnOnce(&Connection) -> ApiResult<T>,
    ) -> ApiResult<T> {
        let conn = self.db.lock().await;
        f(&conn)
    }

    pub(crate) fn pagination(&self) -> &PaginationConfig {
        &self.pagination
    }

    pub(crate) fn documents(&self) -> DocumentPolicy {
        self.documents
    }
}

/// Builds the full router with every `/agro` route plus `/health`.
pub fn router(state: AppState) -> Router {
    let agro = Router::new()
        .route(
            "/farmers/",
            get(handlers::farmers::list).post(handlers::farmers::create),
        )
        .route(
            "/farmers/:id/",
            get(handlers::farmers::retrieve)
                .put(handlers::farmers::update)
                .patch(handlers::farmers::partial_update)
                .delete(handlers::farmers::destroy),
        )
        .route(
            "/farms/",
            get(handlers::farms::list).post(handlers::farms::create),
        )
        .route(
            "/farms/:id/",
            get(handlers::farms::retrieve)
                .put(handlers::farms::update)
                .patch(handlers::farms::partial_update)
                .delete(handlers::farms::destroy),
        )
        .route(
            "/crops_type/",
            get(handlers::crop_types::list).post(handlers::crop_types::create),
        )
        .route(
            "/crops_type/:id/",
            get(handlers::crop_types::retrieve)
                .put(handlers::crop_types::update)
                .patch(handlers::crop_types::partial_update)
                .delete(handlers::crop_types::destroy),
        )
        .route(
            "/crops/",
            get(handlers::crops::list).post(handlers::crops::create),
        )
        .route(
            "/crops/:id/",
            get(handlers::crops::retrieve)
                .put(handlers::crops::update)
                .patch(handlers::crops::partial_update)
                .delete(handlers::crops::destroy),
        )
        .route("/dashboard/", get(handlers::dashboard::snapshot));

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .nest("/agro", agro)
        .fallback(handlers::not_found)
        .layer(middleware::from_fn(log_request))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Binds `addr` and serves until Ctrl-C.
pub async fn serve(state: AppState, addr: SocketAddr) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("event=server_start module=api status=ok addr={addr}");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("event=server_stop module=api status=ok");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        log::error!("event=server_signal module=api status=error error={err}");
    }
}

async fn log_request(request: Request, next: Next) -> Response {
    let started_at = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let response = next.run(request).await;
    info!(
        "event=http_request module=api status=ok method={} path={} status_code={} duration_ms={}",
        method,
        path,
        response.status().as_u16(),
        started_at.elapsed().as_millis()
    );
    response
}

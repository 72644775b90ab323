// file: src/server/mod.rs
// description: axum service exposing a Direct dataface over the json protocol
// reference: https://docs.rs/axum

pub mod handlers;
pub mod routes;

pub use routes::build_router;

use crate::datafaces::Direct;
use crate::error::Result;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Shared application state injected into all handlers via axum's State extractor.
#[derive(Clone)]
pub struct AppState {
    pub dataface: Arc<Direct>,
}

impl AppState {
    pub fn new(dataface: Arc<Direct>) -> Self {
        Self { dataface }
    }
}

/// Serves until `shutdown` resolves, then lets in-flight requests finish.
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let address = listener.local_addr()?;
    info!("xchembku dataface service listening on {}", address);

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("xchembku dataface service on {} stopped", address);
    Ok(())
}

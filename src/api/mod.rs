//! HTTP layer of the notes service.
//!
//! Handlers program against [`Storer`]; the binary decides which backend
//! they talk to.

mod handlers;
mod routes;
mod state;


use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use miette::Diagnostic;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::store::{StoreError, Storer};

pub use routes::{ApiDoc, create_router};
pub use state::AppState;

/// API server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Host address to bind to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 80,
        }
    }
}

impl Config {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Errors raised while running the server.
#[derive(Error, Diagnostic, Debug)]
pub enum ApiError {
    #[error("Failed to bind {addr}")]
    #[diagnostic(code(notes::api::bind), help("Is another process using this port?"))]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("Server error: {0}")]
    #[diagnostic(code(notes::api::serve))]
    Serve(#[source] io::Error),

    #[error("Failed to close note store: {0}")]
    #[diagnostic(code(notes::api::close))]
    Close(#[source] StoreError),
}

/// Run the API server until a shutdown signal arrives, then close the store.
///
/// The store is closed exactly once, whether the server stopped cleanly or
/// failed.
pub async fn run<S: Storer + 'static>(config: Config, store: S) -> Result<(), ApiError> {
    let state = AppState::new(store);
    let app = create_router(state.clone()).layer(TraceLayer::new_for_http());

    let served = serve(config.addr(), app).await;

    let closed = state.store().close().await.map_err(ApiError::Close);
    match (served, closed) {
        (Err(e), Err(close_err)) => {
            error!("{}", close_err);
            Err(e)
        }
        (Err(e), Ok(())) | (Ok(()), Err(e)) => Err(e),
        (Ok(()), Ok(())) => {
            info!("note store closed");
            Ok(())
        }
    }
}

async fn serve(addr: SocketAddr, app: axum::Router) -> Result<(), ApiError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ApiError::Bind { addr, source })?;
    info!("API server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ApiError::Serve)
}

/// Resolve on Ctrl-C, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to install Ctrl-C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received, draining requests");
}

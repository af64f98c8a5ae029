use std::{io, net::SocketAddr, str::FromStr};

use axum::{Extension, Router, routing::get};
use tokio::net::TcpListener;

use crate::api::{self, CallbackState};

pub fn router(state: CallbackState) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/callback", get(api::callback))
        .layer(Extension(state))
}

/// Binds the callback listener. Done before the browser opens so the
/// redirect cannot race the server start.
pub async fn bind(addr: &str) -> io::Result<TcpListener> {
    let addr = SocketAddr::from_str(addr).map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("invalid server address {addr}: {e}"),
        )
    })?;
    TcpListener::bind(addr).await
}

pub async fn serve(listener: TcpListener, state: CallbackState) -> io::Result<()> {
    axum::serve(listener, router(state)).await
}

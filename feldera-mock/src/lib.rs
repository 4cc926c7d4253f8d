//! In-memory mock of the Feldera program API (`/v0/programs`).
//!
//! Used by the provider's integration tests and for trying the provider
//! without a Feldera instance.

pub mod routes;
pub mod state;

use std::net::SocketAddr;

use axum::{routing::post, Router};
pub use axum::http::StatusCode;
use tokio::net::TcpListener;
use tracing::error;

pub use state::{MockState, Program};

/// Build the API router.
pub fn router(state: MockState) -> Router {
    Router::new()
        .route("/v0/programs", post(routes::new_program))
        .route(
            "/v0/programs/{program_id}",
            axum::routing::get(routes::get_program)
                .patch(routes::update_program)
                .delete(routes::delete_program),
        )
        .with_state(state)
}

/// A mock server running on a background task.
pub struct MockServer {
    pub addr: SocketAddr,
    pub state: MockState,
    shutdown_tx: tokio::sync::oneshot::Sender<()>,
}

impl MockServer {
    /// Spawn a server on an OS-assigned local port.
    pub async fn spawn() -> std::io::Result<Self> {
        let state = MockState::new();
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        let app = router(state.clone());
        tokio::spawn(async move {
            let result = axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await;
            if let Err(e) = result {
                error!("Mock server error: {}", e);
            }
        });

        Ok(Self {
            addr,
            state,
            shutdown_tx,
        })
    }

    /// Endpoint to configure the provider with (without `/v0`).
    pub fn endpoint(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn shutdown(self) {
        let _ = self.shutdown_tx.send(());
    }
}

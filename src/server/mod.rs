//! HTTP boundary for a local presentation layer

use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::cors::{Any, CorsLayer};

use crate::command::pipeline::CommandPipeline;
use crate::core::error::{AgentError, Result};

pub mod error;
pub mod routes;

pub use error::ApiError;

/// Router with every endpoint, sharing one pipeline
pub fn router(pipeline: Arc<CommandPipeline>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    Router::new()
        .route("/", get(routes::health))
        .route("/v1/system/status", get(routes::system_status))
        .route("/v1/llm/think", post(routes::think))
        .route("/v1/action/execute", post(routes::execute))
        .with_state(pipeline)
        .layer(cors)
}

pub struct Server {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl Server {
    /// Bind `addr` (port 0 picks a free port) and serve in the background
    pub async fn start(addr: SocketAddr, pipeline: Arc<CommandPipeline>) -> Result<Self> {
        let app = router(pipeline);
        let listener = TcpListener::bind(addr).await?;
        let addr = listener.local_addr()?;
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            let served = axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await;
            if let Err(e) = served {
                tracing::error!("HTTP server stopped: {}", e);
            }
        });

        tracing::info!("Listening on http://{}", addr);
        Ok(Server {
            addr,
            shutdown: Some(shutdown_tx),
            task: Some(task),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn shutdown(&mut self) -> Result<()> {
        if let Some(sender) = self.shutdown.take() {
            sender
                .send(())
                .map_err(|_| AgentError::Internal("failed to send server shutdown signal".into()))
        } else {
            Ok(())
        }
    }

    /// Wait for the serving task to finish
    pub async fn wait(mut self) {
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::error!("HTTP server task failed: {}", e);
            }
        }
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        let _ = self.shutdown();
    }
}

//! HTTP server: one POST route per use case, plus a health check.

use axum::{
    extract::State,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::ai::prompts::UseCase;
use crate::config::ServerConfig;
use crate::error::CoachError;
use crate::handlers::{handle, health_check, AppState, JsonBody};

pub fn build_router(state: Arc<AppState>) -> Router {
    let mut router: Router<Arc<AppState>> = Router::new().route("/health", get(health_check));

    for spec in state.tutor.catalog().iter() {
        let use_case: UseCase = spec.use_case;
        router = router.route(
            &use_case.route(),
            post(move |State(state): State<Arc<AppState>>, body: JsonBody| async move {
                handle(state, use_case, body).await
            }),
        );
    }

    router.layer(CorsLayer::permissive()).with_state(state)
}

pub struct ApiServer {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl ApiServer {
    pub fn new(config: ServerConfig, state: Arc<AppState>) -> Self {
        Self { config, state }
    }

    pub async fn start(&self) -> Result<(), CoachError> {
        let app = build_router(self.state.clone());
        let addr = self.config.addr();

        let listener = tokio::net::TcpListener::bind(addr).await?;
        log::info!("🚀 CodeCraft API listening on http://{addr}");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        log::info!("👋 Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    wait_for_signal(tokio::signal::ctrl_c()).await
}

/// Resolves when `signal` fires. If the signal handler cannot be installed the
/// server keeps running instead of stopping right after bind.
async fn wait_for_signal<F>(signal: F)
where
    F: std::future::Future<Output = std::io::Result<()>>,
{
    if let Err(e) = signal.await {
        log::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}

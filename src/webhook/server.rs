//! Long-running HTTP transport for the webhook
//!
//! Serves `POST <webhook path>` and `GET /health`. Used outside Lambda
//! (containers, local development behind a tunnel).

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;

use crate::webhook::handler::{WebhookHandler, WebhookRequest, WebhookResponse};

impl IntoResponse for WebhookResponse {
    fn into_response(self) -> Response {
        (self.status, self.body).into_response()
    }
}

/// Builds the router: the webhook route plus `/health`.
pub fn create_router(handler: Arc<WebhookHandler>, webhook_path: &str) -> Router {
    Router::new()
        .route(webhook_path, post(webhook_endpoint))
        .route("/health", get(health_handler))
        .with_state(handler)
}

/// Binds `addr` and serves until Ctrl+C.
pub async fn start_webhook_server(
    addr: SocketAddr,
    webhook_path: &str,
    handler: Arc<WebhookHandler>,
) -> anyhow::Result<()> {
    let listener = TcpListener::bind(&addr).await?;
    serve(listener, webhook_path, handler).await
}

/// Serves on an already bound listener until Ctrl+C.
pub async fn serve(listener: TcpListener, webhook_path: &str, handler: Arc<WebhookHandler>) -> anyhow::Result<()> {
    let app = create_router(handler, webhook_path);

    log::info!("Starting webhook server on http://{}", listener.local_addr()?);
    log::info!("  POST {:<10} - Telegram updates", webhook_path);
    log::info!("  GET  {:<10} - Health check", "/health");

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    log::info!("Webhook server stopped");
    Ok(())
}

/// POST <webhook path>
async fn webhook_endpoint(State(handler): State<Arc<WebhookHandler>>, headers: HeaderMap, body: Bytes) -> Response {
    // A body that is not UTF-8 cannot be JSON; it goes through as missing so
    // the pipeline still authenticates before answering 400.
    let body = String::from_utf8(body.to_vec()).ok();

    let request = WebhookRequest {
        headers,
        body,
        is_base64_encoded: false,
    };
    handler.handle(request).await.into_response()
}

/// GET /health: simple health check.
async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    log::info!("Shutdown signal received");
}

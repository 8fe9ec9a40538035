//! GreenBot - sustainability assistant chat
//!
//! Serves one conversation: the bot asks for the user's name, then relays
//! questions to a remote answer service and shows the normalized replies.

mod answer;
mod api;
mod config;
mod normalize;
mod persona;
mod runtime;
mod state_machine;
mod transcript;

use answer::{AnswerService, HttpAnswerService, LoggingService};
use api::{create_router, AppState};
use config::AppConfig;
use runtime::SessionHandle;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "greenbot=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    let config = AppConfig::from_env()?;
    tracing::info!(
        backend = %config.backend_url,
        timeout_secs = config.answer_timeout.as_secs(),
        "Configuration loaded"
    );

    let http = HttpAnswerService::new(config.backend_url.clone())?;
    let service: Arc<dyn AnswerService> = Arc::new(LoggingService::new(Arc::new(http)));

    let session_id = uuid::Uuid::new_v4().to_string();
    let session = Arc::new(SessionHandle::start(
        session_id.clone(),
        service,
        config.answer_timeout,
    ));
    tracing::info!(session_id = %session_id, "Session started");

    let state = AppState::new(session.clone());

    // Create router
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let compression = CompressionLayer::new().gzip(true).br(true).deflate(true);

    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(compression);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("GreenBot server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    session.shutdown();
    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use invitation_dispatcher::api;
use invitation_dispatcher::config::{Config, LogFormat};
use invitation_dispatcher::dispatch::BatchInvitationDispatcher;
use invitation_dispatcher::jobs::{JobQueue, JobRegistry, RetryPolicy, Worker};
use invitation_dispatcher::mail::ResendMailer;
use invitation_dispatcher::render::{AskamaRenderer, WkhtmltopdfRenderer};
use invitation_dispatcher::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_tracing(config.log_format);

    tracing::info!("Starting invitation dispatcher...");
    tracing::info!(
        host = %config.server_host,
        port = %config.server_port,
        queue_capacity = config.queue_capacity,
        max_concurrent_jobs = config.max_concurrent_jobs,
        "Configuration loaded"
    );

    // Rendering + provider collaborators
    let dispatcher = BatchInvitationDispatcher::new(
        Arc::new(AskamaRenderer::new()),
        Arc::new(WkhtmltopdfRenderer::new(config.wkhtmltopdf_path.clone())),
        Arc::new(ResendMailer::new(&config)?),
    );

    // Queue + worker
    let registry = Arc::new(JobRegistry::new());
    let (queue, receiver) = JobQueue::bounded(config.queue_capacity, registry.clone());
    let worker = Worker::new(
        dispatcher,
        registry,
        RetryPolicy::invitation_batch(),
        config.max_concurrent_jobs,
        config.shutdown_grace(),
    );
    let worker_handle = tokio::spawn(worker.run(receiver));

    let addr: SocketAddr = config.server_addr().parse()?;
    let state = AppState::new(config, queue);

    // Build router
    let app = Router::new().merge(api::create_router(state)).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(std::time::Duration::from_secs(30))),
    );

    // Start server
    let listener = TcpListener::bind(addr).await?;

    tracing::info!(address = %addr, "Server listening");

    // Run server with graceful shutdown; dropping the router closes the queue.
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped, draining invitation worker");
    worker_handle.await?;

    tracing::info!("Shutdown complete");

    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(fmt::layer()).init(),
    }
}

/// Handle shutdown signals
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down...");
        },
        _ = terminate => {
            tracing::info!("Received terminate signal, shutting down...");
        },
    }
}

use anyhow::{Context, Result};
use axum::serve;
use recent_patients::api::client::ApiClient;
use recent_patients::core::config::Config;
use recent_patients::core::routes::build_router;
use recent_patients::core::startup::{apply_wal_operations, populate_from_api};
use recent_patients::core::state::AppState;
use recent_patients::core::tracing_init::init_tracing;
use recent_patients::wal::wal::Wal;
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{error, info, warn, Level};

fn main() -> Result<()> {
    let config_path = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.toml"));

    let config = Config::from_file(&config_path).context(format!(
        "Failed to load configuration from '{}'. \
        Copy config.example.toml to config.toml and adjust the values.",
        config_path.display()
    ))?;

    init_tracing(&config.logging);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.server.num_threads)
        .enable_all()
        .build()
        .context("Failed to build Tokio runtime")?;

    runtime.block_on(async_main(config, config_path))
}

async fn async_main(config: Config, config_path: PathBuf) -> Result<()> {
    info!(
        config_path = %config_path.display(),
        port = config.server.port,
        num_threads = config.server.num_threads,
        last_viewed_limit = config.recent.last_viewed_limit,
        log_level = %config.logging.level,
        log_format = %config.logging.format,
        "Recent patients service starting"
    );

    let wal_path = config.storage.wal_path.clone();
    let wal = Wal::new(wal_path.clone()).context("Failed to initialize WAL")?;

    info!(wal_path = %wal_path.display(), "WAL initialized");

    let state = AppState::new(config.clone(), wal);

    // Seed from the platform first, the WAL holds changes made since
    info!(endpoint = %config.sync.data_endpoint, "Fetching data from external API");

    let api_client = ApiClient::new(
        config.sync.data_endpoint.clone(),
        config.sync.api_key.clone(),
    )
    .context("Failed to create API client")?;

    if let Err(e) = populate_from_api(&state, &api_client).await {
        error!(
            error = %e,
            "Failed to fetch data from external API, continuing with WAL data only"
        );
    }

    let operations = state.wal.replay().context("Failed to replay WAL")?;
    let unapplied = apply_wal_operations(&state, &operations);

    if unapplied > 0 {
        warn!(unapplied, "Some WAL operations could not be applied");
    }

    info!(
        operations_replayed = operations.len(),
        patients = state.patients.len(),
        users = state.users.len(),
        "WAL replay completed"
    );

    let listener = Arc::new(state.patient_viewed_listener());
    tokio::spawn(listener.run(state.bus.subscribe()));

    info!(
        buffer = config.recent.event_buffer,
        "Patient viewed listener started"
    );

    let app = build_router(Arc::new(state)).layer(
        ServiceBuilder::new().layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
        ),
    );

    let addr = format!("0.0.0.0:{}", config.server.port);
    let tcp_listener = TcpListener::bind(&addr)
        .await
        .context(format!("Failed to bind TCP listener to {}", addr))?;

    info!(address = %addr, "HTTP server started, waiting for shutdown signal");

    serve(tcp_listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Shutting down gracefully");

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }

    info!("Shutdown signal received, starting graceful shutdown");
}

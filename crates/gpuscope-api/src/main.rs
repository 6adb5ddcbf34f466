mod args;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use gpuscope_api::{build_router, AppState};
use gpuscope_prom::{GpuCollector, HttpQueryClient};

use crate::args::Args;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let otel_provider = gpuscope_common::telemetry::init_tracing(
        "gpuscope-api",
        args.otlp_endpoint.as_deref(),
        args.otlp_token.as_deref(),
        args.log_format,
    );

    let query_timeout = Duration::from_secs(args.query_timeout_secs);
    let client = HttpQueryClient::new(&args.prometheus_url)?
        .with_timeouts(query_timeout, Duration::from_secs(args.probe_timeout_secs));
    let collector = GpuCollector::new(Arc::new(client)).with_request_timeout(query_timeout);
    let st = AppState::with_collector(collector);

    let static_dir = if args.static_dir.is_dir() {
        Some(args.static_dir.clone())
    } else {
        tracing::warn!(dir = %args.static_dir.display(), "static dir not found, frontend disabled");
        None
    };

    let app = build_router(st, static_dir);

    let listen_addr = args.listen_addr();
    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    tracing::info!(
        addr = %listen_addr,
        prometheus = %args.prometheus_url,
        version = env!("CARGO_PKG_VERSION"),
        "gpuscope-api listening"
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("gpuscope-api stopped");
    if let Some(provider) = otel_provider {
        if let Err(e) = provider.shutdown() {
            eprintln!("failed to flush traces: {e}");
        }
    }
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error=%e, "failed to install ctrl-c handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error=%e, "failed to install SIGTERM handler");
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
    tracing::info!("shutdown signal received, draining connections");
}

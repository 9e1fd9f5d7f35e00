//! Server startup and graceful shutdown

use std::future::Future;
use std::time::Duration;

use anyhow::Result;
use axum::Router;
use pictor_core::Config;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

/// Serve until SIGINT/SIGTERM, then drain. `shutdown` is cancelled once serving ends, or
/// earlier if requests are still running after `SHUTDOWN_GRACE_SECONDS`.
pub async fn start_server(config: &Config, app: Router, shutdown: CancellationToken) -> Result<()> {
    let addr = format!("0.0.0.0:{}", config.server_port());
    tracing::info!(addr = %addr, "Starting server");

    let listener = TcpListener::bind(&addr).await?;

    tracing::info!(
        max_upload_mb = config.max_upload_size_bytes() / 1024 / 1024,
        request_deadline_seconds = config.request_deadline_seconds(),
        shutdown_grace_seconds = config.shutdown_grace_seconds(),
        backend = %config.media_backend(),
        "Server ready and accepting connections"
    );

    let grace = Duration::from_secs(config.shutdown_grace_seconds());
    serve_with_drain(listener, app, shutdown, grace, wait_for_signal()).await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Serve `app` until `signal` resolves (or `shutdown` is cancelled elsewhere).
///
/// New connections stop at the signal while in-flight requests keep running with their
/// deadlines intact. Only when `grace` runs out is `shutdown` cancelled, which interrupts
/// whatever media host or store call is still pending.
pub async fn serve_with_drain<F>(
    listener: TcpListener,
    app: Router,
    shutdown: CancellationToken,
    grace: Duration,
    signal: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let token = shutdown.clone();
    let result = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            tokio::select! {
                _ = signal => {},
                _ = token.cancelled() => {},
            }
            tracing::info!(
                grace_seconds = grace.as_secs_f64(),
                "Shutting down gracefully, draining in-flight requests"
            );
            tokio::spawn(async move {
                tokio::select! {
                    _ = tokio::time::sleep(grace) => {
                        tracing::warn!("Shutdown grace period over, interrupting remaining requests");
                        token.cancel();
                    }
                    _ = token.cancelled() => {}
                }
            });
        })
        .await;

    shutdown.cancel();
    result
}

/// Resolve on Ctrl+C (SIGINT) or SIGTERM.
///
/// A handler that cannot be installed is logged and never fires; the other one still does.
async fn wait_for_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            tracing::info!("Received terminate signal");
        },
    }
}

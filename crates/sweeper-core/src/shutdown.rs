use tokio_util::sync::CancellationToken;
#[allow(unused_imports)]
use tracing::{error, info};

/// Wait for a shutdown signal (SIGTERM or SIGINT/Ctrl-C).
///
/// Cancels `token` when the signal arrives so in-flight sweeps stop starting
/// new calls and return partial reports.
pub async fn wait_for_shutdown_signal(token: CancellationToken) -> Result<(), std::io::Error> {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        let mut sigterm =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;

        tokio::select! {
            _ = ctrl_c => {
                info!(event = "core.shutdown.signal_received", signal = "SIGINT");
            }
            _ = sigterm.recv() => {
                info!(event = "core.shutdown.signal_received", signal = "SIGTERM");
            }
            _ = token.cancelled() => return Ok(()),
        }
    }

    #[cfg(not(unix))]
    {
        tokio::select! {
            result = ctrl_c => match result {
                Ok(()) => {
                    info!(event = "core.shutdown.signal_received", signal = "SIGINT");
                }
                Err(e) => {
                    error!(
                        event = "core.shutdown.signal_handler_failed",
                        error = %e,
                        "Ctrl-C signal handler failed, cancelling anyway",
                    );
                }
            },
            _ = token.cancelled() => return Ok(()),
        }
    }

    token.cancel();
    Ok(())
}

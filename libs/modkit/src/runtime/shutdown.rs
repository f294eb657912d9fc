use anyhow::Result;
use tokio_util::sync::CancellationToken;

/// Resolve on SIGTERM/SIGINT (Ctrl+C on Windows) or when `cancel` fires, whichever comes first.
pub async fn wait_for_shutdown(cancel: CancellationToken) -> Result<()> {
    tokio::select! {
        res = os_signal() => {
            res?;
            tracing::info!("shutdown: signal received");
            cancel.cancel();
        }
        _ = cancel.cancelled() => {
            tracing::info!("shutdown: cancellation requested");
        }
    }
    Ok(())
}

#[cfg(unix)]
async fn os_signal() -> Result<()> {
    use tokio::signal::unix::{signal, SignalKind};
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?; // Ctrl+C
    tokio::select! {
        _ = sigterm.recv() => {},
        _ = sigint.recv()  => {},
    }
    Ok(())
}

#[cfg(not(unix))]
async fn os_signal() -> Result<()> {
    tokio::signal::ctrl_c().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn cancellation_token_releases_the_waiter() {
        let cancel = CancellationToken::new();
        let waiter = tokio::spawn(wait_for_shutdown(cancel.clone()));

        cancel.cancel();

        let res = tokio::time::timeout(Duration::from_secs(2), waiter)
            .await
            .expect("waiter should finish")
            .expect("task should not panic");
        assert!(res.is_ok());
    }
}

use crate::error::CliError;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Cancels `token` on the first SIGINT or SIGTERM. A pull already underway
/// finishes its current log type before it notices.
pub fn cancel_on_signal(token: CancellationToken) {
    tokio::spawn(async move {
        let signal = next_signal().await;
        info!(signal, "Stopping after the current log type");
        token.cancel();
    });
}

async fn next_signal() -> &'static str {
    let interrupt = async {
        match signal::ctrl_c().await {
            Ok(()) => "SIGINT",
            Err(e) => {
                warn!("Cannot listen for SIGINT: {}", e);
                std::future::pending::<&'static str>().await
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                "SIGTERM"
            }
            Err(e) => {
                warn!("Cannot listen for SIGTERM: {}", e);
                std::future::pending::<&'static str>().await
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<&'static str>();

    tokio::select! {
        name = interrupt => name,
        name = terminate => name,
    }
}

/// Process exit status of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Success = 0,
    Failure = 1,
    /// Same status a shell reports for SIGINT.
    Interrupted = 130,
}

impl ExitStatus {
    pub fn of(result: &Result<(), CliError>) -> Self {
        match result {
            Ok(()) => ExitStatus::Success,
            Err(err) if err.is_shutdown() => ExitStatus::Interrupted,
            Err(_) => ExitStatus::Failure,
        }
    }

    pub fn code(self) -> i32 {
        self as i32
    }
}

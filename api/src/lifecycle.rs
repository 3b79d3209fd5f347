//! Process boundary: shutdown signals and fault capture
//!
//! A panic anywhere in the process is logged and reported on the fault
//! channel, so `main` can tear the transport down and exit non-zero instead
//! of limping on with a dead task.

use tokio::signal;
use tokio::sync::mpsc;

/// Why the process is stopping
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitReason {
    /// SIGINT or SIGTERM
    Signal(&'static str),
    /// The HTTP server stopped on its own
    ServerStopped,
    /// The HTTP server failed
    ServerFailed(String),
    /// The transport event loop ended
    EventLoopStopped(String),
    /// A task panicked
    Fault(String),
}

impl ExitReason {
    /// Whether the supervisor should see a failure exit
    pub fn is_failure(&self) -> bool {
        !matches!(self, ExitReason::Signal(_))
    }
}

impl std::fmt::Display for ExitReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExitReason::Signal(name) => write!(f, "received {}", name),
            ExitReason::ServerStopped => write!(f, "HTTP server stopped"),
            ExitReason::ServerFailed(e) => write!(f, "HTTP server failed: {}", e),
            ExitReason::EventLoopStopped(e) => write!(f, "transport event loop stopped: {}", e),
            ExitReason::Fault(e) => write!(f, "panic: {}", e),
        }
    }
}

/// Wait for SIGINT or SIGTERM; returns the signal name
pub async fn shutdown_signal() -> &'static str {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for SIGINT");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => "SIGINT",
        _ = terminate => "SIGTERM",
    }
}

/// Log panics through tracing and report them on the returned channel
pub fn install_panic_hook() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    let default_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |info| {
        let payload = info
            .payload()
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| info.payload().downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic payload".to_string());
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_default();

        tracing::error!(panic = %payload, %location, "Unhandled panic");
        let _ = tx.send(format!("{} at {}", payload, location));
        default_hook(info);
    }));

    rx
}

//! OS signal plumbing for the lifecycle controller.

use tokio::signal;

/// What a received signal asks the controller to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalEvent {
    /// Graceful stop, then process exit with code 0.
    Terminate,
    /// Graceful stop, then a fresh launch with the original arguments.
    Restart,
}

/// Per-process signal streams.
///
/// Registered once, after the startup steps complete; a signal received
/// before registration has no effect since there is nothing running yet
/// to stop. The streams buffer signals arriving between registration and
/// the next [`SignalListener::recv`], so restart requests issued while a
/// relaunch is in flight are not lost.
pub struct SignalListener {
    #[cfg(unix)]
    terminate: signal::unix::Signal,
    #[cfg(unix)]
    quit: signal::unix::Signal,
    #[cfg(unix)]
    restart: signal::unix::Signal,
}

impl SignalListener {
    /// Install the termination (SIGTERM, SIGQUIT) and restart (SIGUSR2)
    /// streams. Ctrl+C is awaited per-call in [`Self::recv`].
    ///
    /// Restart is a Unix-only facility; other platforms only ever observe
    /// termination.
    pub fn register() -> Self {
        #[cfg(unix)]
        {
            use signal::unix::{SignalKind, signal};

            return Self {
                terminate: signal(SignalKind::terminate())
                    .expect("Failed to install SIGTERM handler"),
                quit: signal(SignalKind::quit()).expect("Failed to install SIGQUIT handler"),
                restart: signal(SignalKind::user_defined2())
                    .expect("Failed to install SIGUSR2 handler"),
            };
        }

        #[cfg(not(unix))]
        {
            Self {}
        }
    }

    /// Wait for the next signal of interest.
    pub async fn recv(&mut self) -> SignalEvent {
        let ctrl_c = async {
            if signal::ctrl_c().await.is_err() {
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let event = tokio::select! {
            _ = ctrl_c => SignalEvent::Terminate,
            _ = self.terminate.recv() => SignalEvent::Terminate,
            _ = self.quit.recv() => SignalEvent::Terminate,
            _ = self.restart.recv() => SignalEvent::Restart,
        };

        #[cfg(not(unix))]
        let event = {
            ctrl_c.await;
            SignalEvent::Terminate
        };

        event
    }
}

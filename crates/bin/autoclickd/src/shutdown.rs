//! Termination signals.
//!
//! The OS handlers are registered when [`Shutdown::install`] returns, so a
//! signal that arrives while the first pass is still running is kept until
//! the loop looks for it.

use std::io;

#[cfg(unix)]
use tokio::signal::unix::{Signal, SignalKind, signal};

pub struct Shutdown {
    #[cfg(unix)]
    interrupt: Signal,
    #[cfg(unix)]
    terminate: Signal,
    #[cfg(windows)]
    ctrl_c: tokio::signal::windows::CtrlC,
}

impl Shutdown {
    /// Listen for Ctrl+C, and SIGTERM on Unix.
    ///
    /// Must be called from inside the runtime.
    pub fn install() -> io::Result<Self> {
        Ok(Self {
            #[cfg(unix)]
            interrupt: signal(SignalKind::interrupt())?,
            #[cfg(unix)]
            terminate: signal(SignalKind::terminate())?,
            #[cfg(windows)]
            ctrl_c: tokio::signal::windows::ctrl_c()?,
        })
    }

    /// Resolves on the first signal received since [`Shutdown::install`].
    pub async fn wait(mut self) {
        #[cfg(unix)]
        let signal = tokio::select! {
            _ = self.interrupt.recv() => "SIGINT",
            _ = self.terminate.recv() => "SIGTERM",
        };

        #[cfg(windows)]
        let signal = {
            self.ctrl_c.recv().await;
            "ctrl-c"
        };

        tracing::info!(signal, "shutdown requested, finishing current pass");
    }
}

//! Shutdown signalling for the poll loop

use std::sync::Arc;
use tokio::sync::watch;

/// Requests shutdown of the loops holding the paired [`ShutdownSignal`].
///
/// Dropping every handle counts as a shutdown request: the owner going away
/// stops the loop.
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl ShutdownHandle {
    pub fn shutdown(&self) {
        self.tx.send_replace(true);
    }
}

/// Receiving side of a shutdown request
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    rx: watch::Receiver<bool>,
}

impl ShutdownSignal {
    /// Resolve once shutdown has been requested
    pub async fn wait(&mut self) {
        // Err means every handle is gone
        let _ = self.rx.wait_for(|&stop| stop).await;
    }

    pub fn is_shutdown(&self) -> bool {
        *self.rx.borrow() || self.rx.has_changed().is_err()
    }
}

/// Create a connected handle / signal pair
pub fn shutdown_channel() -> (ShutdownHandle, ShutdownSignal) {
    let (tx, rx) = watch::channel(false);
    (ShutdownHandle { tx: Arc::new(tx) }, ShutdownSignal { rx })
}

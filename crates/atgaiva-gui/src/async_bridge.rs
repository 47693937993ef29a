//! Async runtime bridge for running background tasks in egui

use atgaiva_core::{ImagePayload, RequestId, RestoreError};
use tokio::runtime::Runtime;
use tokio::sync::mpsc;

/// Bridge between async runtime and egui
pub struct AsyncBridge {
    /// Tokio runtime for async operations (wrapped in Option for clean shutdown)
    runtime: Option<Runtime>,

    updates_tx: mpsc::UnboundedSender<RestoreUpdate>,
    updates_rx: mpsc::UnboundedReceiver<RestoreUpdate>,
}

/// Outcome of one background restoration, delivered to the UI thread.
#[derive(Debug)]
pub struct RestoreUpdate {
    pub request: RequestId,
    pub result: Result<ImagePayload, RestoreError>,
    pub elapsed_ms: f64,
}

impl AsyncBridge {
    /// Create a new async bridge
    pub fn new() -> std::io::Result<Self> {
        let runtime = Runtime::new()?;
        let (updates_tx, updates_rx) = mpsc::unbounded_channel();

        Ok(Self {
            runtime: Some(runtime),
            updates_tx,
            updates_rx,
        })
    }

    /// Get the runtime handle for spawning tasks
    pub fn handle(&self) -> Option<&tokio::runtime::Handle> {
        self.runtime.as_ref().map(Runtime::handle)
    }

    /// Sender that background tasks report through.
    pub fn sender(&self) -> mpsc::UnboundedSender<RestoreUpdate> {
        self.updates_tx.clone()
    }

    /// Drain pending updates and call the handler for each
    pub fn poll_updates<F>(&mut self, mut handler: F)
    where
        F: FnMut(RestoreUpdate),
    {
        while let Ok(update) = self.updates_rx.try_recv() {
            handler(update);
        }
    }
}

impl Drop for AsyncBridge {
    fn drop(&mut self) {
        // Dropping a runtime inside the eframe callback would block; shut it down in the background.
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}

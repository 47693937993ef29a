//! Runs restoration jobs on the bridge's runtime

use std::time::Instant;

use atgaiva_core::{ImageRestorer, RestoreJob};

use crate::async_bridge::{AsyncBridge, RestoreUpdate};

/// Spawn `job` in the background; its outcome arrives through [`AsyncBridge::poll_updates`].
///
/// `repaint` is called once the update has been queued so the UI wakes up.
pub fn start_restore<R, F>(bridge: &AsyncBridge, job: RestoreJob<R>, repaint: F) -> Result<(), String>
where
    R: ImageRestorer,
    F: Fn() + Send + 'static,
{
    let handle = bridge
        .handle()
        .ok_or_else(|| "Async runtime has been shut down".to_string())?;
    let tx = bridge.sender();

    handle.spawn(async move {
        let started = Instant::now();
        let (request, result) = job.run().await;
        let _ = tx.send(RestoreUpdate {
            request,
            result,
            elapsed_ms: started.elapsed().as_secs_f64() * 1000.0,
        });
        repaint();
    });

    Ok(())
}

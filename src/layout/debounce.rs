//! Coalesces bursts of container resize notifications.
//!
//! Widths travel over a flume channel to a task that waits for a quiet
//! period and then hands the last width to a callback.

use std::future::Future;
use std::time::Duration;

use flume::{Receiver, Sender};
use tokio::task::JoinHandle;
use tracing::{debug, trace};

/// Live resize listener. Dropping or cancelling it stops the task.
pub struct ResizeSubscription {
    tx: Option<Sender<f32>>,
    task: Option<JoinHandle<()>>,
}

impl ResizeSubscription {
    /// Spawns the listener on the current Tokio runtime.
    pub fn spawn<F, Fut>(quiet: Duration, on_settled: F) -> Self
    where
        F: FnMut(f32) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (tx, rx) = flume::unbounded();
        let task = tokio::spawn(debounce_loop(rx, quiet, on_settled));
        debug!(?quiet, "Started resize listener");
        Self {
            tx: Some(tx),
            task: Some(task),
        }
    }

    /// Queues a new container width. Returns false once cancelled.
    pub fn notify(&self, width: f32) -> bool {
        match &self.tx {
            Some(tx) => tx.send(width).is_ok(),
            None => false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.tx.is_some()
    }

    /// Stops listening. Safe to call repeatedly.
    pub fn cancel(&mut self) {
        let had_sender = self.tx.take().is_some();
        if let Some(task) = self.task.take() {
            task.abort();
        }
        if had_sender {
            debug!("Stopped resize listener");
        }
    }
}

impl Drop for ResizeSubscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

async fn debounce_loop<F, Fut>(rx: Receiver<f32>, quiet: Duration, mut on_settled: F)
where
    F: FnMut(f32) -> Fut,
    Fut: Future<Output = ()>,
{
    while let Ok(mut width) = rx.recv_async().await {
        loop {
            match tokio::time::timeout(quiet, rx.recv_async()).await {
                Ok(Ok(next)) => {
                    trace!(width = next, "Coalesced resize");
                    width = next;
                }
                Ok(Err(_)) => return,
                Err(_) => break,
            }
        }
        trace!(width, "Resize settled");
        on_settled(width).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn recorder() -> (Arc<Mutex<Vec<f32>>>, impl FnMut(f32) -> std::future::Ready<()>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        (seen, move |width| {
            sink.lock().push(width);
            std::future::ready(())
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_coalesces_to_last_width() {
        let (seen, callback) = recorder();
        let subscription = ResizeSubscription::spawn(Duration::from_millis(80), callback);

        assert!(subscription.notify(500.0));
        assert!(subscription.notify(600.0));
        assert!(subscription.notify(700.0));
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(*seen.lock(), vec![700.0]);

        subscription.notify(800.0);
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(*seen.lock(), vec![700.0, 800.0]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_spaced_events_fire_separately() {
        let (seen, callback) = recorder();
        let subscription = ResizeSubscription::spawn(Duration::from_millis(50), callback);

        subscription.notify(100.0);
        tokio::time::sleep(Duration::from_millis(120)).await;
        subscription.notify(200.0);
        tokio::time::sleep(Duration::from_millis(120)).await;
        assert_eq!(*seen.lock(), vec![100.0, 200.0]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_is_idempotent() {
        let (seen, callback) = recorder();
        let mut subscription = ResizeSubscription::spawn(Duration::from_millis(50), callback);

        subscription.notify(100.0);
        subscription.cancel();
        subscription.cancel();
        assert!(!subscription.is_active());
        assert!(!subscription.notify(200.0));

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(seen.lock().is_empty());
    }
}

use std::future::Future;
use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use tracing::{debug, warn};

/// Ergonomic receive for the bus channels.
///
/// Broadcast receivers skip over lagged messages instead of failing; watch
/// receivers wait for the next published value.
pub trait EventReceiverExt<T> {
    /// Next event, `None` once the bus is gone.
    fn next_event(&mut self) -> impl Future<Output = Option<Arc<T>>> + Send;
}

impl<T> EventReceiverExt<T> for broadcast::Receiver<Arc<T>>
where
    T: Send + Sync + 'static,
{
    async fn next_event(&mut self) -> Option<Arc<T>> {
        let mut skipped = 0u64;

        loop {
            match self.recv().await {
                Ok(event) => {
                    if skipped > 0 {
                        warn!(skipped, "Event receiver lagged; continuing from oldest retained event");
                    }
                    return Some(event);
                },
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    skipped = skipped.saturating_add(n);
                    debug!(skipped = n, total_skipped = skipped, "Event receiver lagged");
                },
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

impl<T> EventReceiverExt<T> for watch::Receiver<Option<Arc<T>>>
where
    T: Send + Sync + 'static,
{
    async fn next_event(&mut self) -> Option<Arc<T>> {
        loop {
            self.changed().await.ok()?;
            if let Some(value) = self.borrow_and_update().clone() {
                return Some(value);
            }
        }
    }
}

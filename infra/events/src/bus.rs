use crate::error::EventBusError;
use crate::event::{CustomizationApplied, EngineEvent};
use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use tracing::trace;

/// A safe default for the broadcast buffer.
pub const DEFAULT_CAPACITY: usize = 128;

/// Latest finished customization, `None` until the first run.
pub type LatestCustomization = Option<Arc<CustomizationApplied>>;

/// Cloneable handle to the engine's outbound channels.
///
/// Every [`EngineEvent`] goes to a bounded broadcast channel (fan-out, slow
/// receivers lag). Customization results are additionally kept in a watch
/// channel so late subscribers can read the latest one.
#[derive(Debug, Clone)]
pub struct EventBus {
    events: broadcast::Sender<Arc<EngineEvent>>,
    latest: Arc<watch::Sender<LatestCustomization>>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    /// Creates a bus with [`DEFAULT_CAPACITY`].
    #[must_use]
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(DEFAULT_CAPACITY);
        let (latest, _) = watch::channel(None);
        Self { events, latest: Arc::new(latest) }
    }

    /// Creates a bus with a specific broadcast buffer capacity.
    ///
    /// # Errors
    /// Returns [`EventBusError::InvalidCapacity`] if `capacity` is zero.
    ///
    /// # Examples
    /// ```rust
    /// use tessera_events::EventBus;
    ///
    /// # fn main() -> Result<(), tessera_events::EventBusError> {
    /// let bus = EventBus::with_capacity(16)?;
    /// assert_eq!(bus.receiver_count(), 0);
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_capacity(capacity: usize) -> Result<Self, EventBusError> {
        if capacity == 0 {
            return Err(EventBusError::InvalidCapacity {
                message: "capacity must be greater than zero".into(),
                context: Some("EventBus::with_capacity".into()),
            });
        }
        let (events, _) = broadcast::channel(capacity);
        let (latest, _) = watch::channel(None);
        Ok(Self { events, latest: Arc::new(latest) })
    }

    /// Subscribes to every engine event published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<EngineEvent>> {
        self.events.subscribe()
    }

    /// Subscribes to the latest finished customization.
    #[must_use]
    pub fn watch_customizations(&self) -> watch::Receiver<LatestCustomization> {
        self.latest.subscribe()
    }

    #[must_use]
    pub fn latest_customization(&self) -> LatestCustomization {
        self.latest.borrow().clone()
    }

    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.events.receiver_count()
    }

    /// Publishes an event, returning how many receivers got it.
    ///
    /// Publishing without subscribers is not an error; the event is dropped.
    pub fn publish(&self, event: EngineEvent) -> usize {
        if let EngineEvent::CustomizationApplied(applied) = &event {
            self.latest.send_replace(Some(Arc::clone(applied)));
        }

        let name = event.name();
        self.events.send(Arc::new(event)).map_or_else(
            |_| {
                trace!(event = name, "Event dropped: no active subscribers");
                0
            },
            |count| {
                trace!(event = name, count, "Event dispatched");
                count
            },
        )
    }
}

//! # Engine Events
//!
//! Outbound notifications for collaborators that sit outside the resolution
//! algorithm: a preview layer that injects CSS custom properties, a persistence
//! layer that stores settings, audit trails.
//!
//! ## Channels
//!
//! * **Broadcast**: every [`EngineEvent`], fan-out to any number of receivers.
//! * **Watch**: the latest [`CustomizationApplied`], for late joiners.
//!
//! # Example
//!
//! ```rust
//! use tessera_events::{EngineEvent, EventBus, EventReceiverExt};
//!
//! #[tokio::main]
//! async fn main() {
//!     let bus = EventBus::new();
//!     let mut rx = bus.subscribe();
//!
//!     bus.publish(EngineEvent::TokenResolved { token: "primary".into(), updates: 2, valid: true });
//!
//!     let event = rx.next_event().await.unwrap();
//!     assert_eq!(event.name(), "token-resolved");
//! }
//! ```

mod bus;
mod error;
mod event;
mod receiver;

pub use bus::{DEFAULT_CAPACITY, EventBus, LatestCustomization};
pub use error::{EventBusError, EventBusErrorExt};
pub use event::{CustomizationApplied, EngineEvent};
pub use receiver::EventReceiverExt;

//! PlayScore event bus and notification infrastructure.
//!
//! Building blocks for the platform-wide event system:
//!
//! - [`EventBus`] — in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`PlatformEvent`] — the canonical domain event envelope, published by
//!   API handlers after a successful state change.
//! - [`EventPersistence`] — durable write of every consumed event to the
//!   `events` table.
//! - [`delivery`] — the SMTP email channel.
//!
//! Side effects are decoupled from persistence: handlers publish events and
//! return; subscribers persist and fan out notifications on their own
//! schedule. Delivery failures are logged, never surfaced to the request
//! that triggered them.

pub mod bus;
pub mod delivery;
pub mod persistence;

pub use bus::{EventBus, PlatformEvent};
pub use delivery::email::{EmailConfig, EmailDelivery};
pub use persistence::EventPersistence;

//! Notification fan-out driven by platform events.

pub mod dispatcher;

pub use dispatcher::NotificationDispatcher;

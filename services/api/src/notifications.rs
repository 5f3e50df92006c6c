//! Notification delivery
//!
//! Handlers describe what happened as a [`NotificationIntent`] and hand it to
//! the [`Notifier`]. A single dispatcher task persists each intent, resolves
//! its sender and publishes it to the [`NotificationHub`], where connected
//! sockets of the recipient pick it up. Delivery is best-effort.
//!
//! [`NotificationIntent`]: crate::models::notification::NotificationIntent

pub mod dispatcher;
pub mod hub;

pub use dispatcher::{NotificationDispatcher, Notifier};
pub use hub::NotificationHub;

//! Notification bus for Tally.
//!
//! Every accepted mutation produces exactly one [`Notification`]. The
//! [`EventBus`] stamps it with a sequence number in acceptance order, keeps a
//! bounded history, and fans it out to filtered subscribers.

pub mod bus;
pub mod event;

pub use bus::{BusConfig, EventBus, EventFilter, EventStream};
pub use event::{EventRecord, Notification, NotificationKind};

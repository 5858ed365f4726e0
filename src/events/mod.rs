//! Runtime events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to events emitted by the gateway, the toast queue and the
//! scheduler.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `NotificationGateway` (admission, cancel, eviction),
//!   `Scheduler` (showing, completed, display failures), `SubscriberSet` workers.
//! - **Consumers**: the gateway's subscriber listener (fans out to `SubscriberSet`)
//!   and anyone holding a receiver from [`NotificationGateway::subscribe`](crate::NotificationGateway::subscribe).

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};

//! # Event subscribers.
//!
//! This module provides the [`Subscribe`] trait and the [`SubscriberSet`]
//! fan-out used to deliver [`Event`](crate::Event)s published on the gateway's
//! [`Bus`](crate::events::Bus).
//!
//! ```text
//! Gateway / Scheduler ── publish(Event) ──► Bus ──► subscriber listener
//!                                                         │
//!                                                  SubscriberSet::emit
//!                                                  ┌──────┼──────┐
//!                                                  ▼      ▼      ▼
//!                                              LogWriter Metrics Custom
//! ```
//!
//! Built-in: [`LogWriter`] (feature `logging`) renders events through `tracing`.

#[cfg(feature = "logging")]
mod log;
mod set;
mod subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use set::SubscriberSet;
pub use subscribe::Subscribe;

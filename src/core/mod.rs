//! Gateway core: queueing and display scheduling.
//!
//! The only public API from this module is [`NotificationGateway`] (plus its
//! builder and result types).
//!
//! Internal modules:
//! - [`queue`]: the lock-protected ordered toast queue;
//! - [`scheduler`]: shows the head and advances past failed shows;
//! - [`gateway`]: admission, cancel, completion and eviction entry points;
//! - [`builder`]: wiring of bus, subscribers and listener.

mod builder;
mod gateway;
mod outcome;
mod queue;
mod scheduler;

#[cfg(test)]
mod tests;

pub use builder::GatewayBuilder;
pub use gateway::NotificationGateway;
pub use outcome::{Enqueued, ShowOutcome};
pub use queue::ToastSnapshot;

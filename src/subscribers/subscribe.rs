//! # Core subscriber trait
//!
//! `Subscribe` is the extension point for plugging custom event handlers into the
//! gateway. Each subscriber is driven by a dedicated worker loop fed by a bounded
//! queue owned by the [`SubscriberSet`](crate::SubscriberSet).
//!
//! ## Contract
//! - Implementations may be slow (I/O, batching) – they do **not** block the
//!   queue lock, the publisher, or other subscribers.
//! - Each subscriber declares its preferred queue capacity via
//!   [`Subscribe::queue_capacity`]. On overflow, events for that subscriber are
//!   **dropped** and a `SubscriberOverflow` event is published.
//!
//! ## Example
//! ```rust
//! use async_trait::async_trait;
//! use toastvisor::{Event, EventKind, Subscribe};
//!
//! struct RejectCounter;
//!
//! #[async_trait]
//! impl Subscribe for RejectCounter {
//!     async fn on_event(&self, ev: &Event) {
//!         if ev.kind == EventKind::ToastRejected {
//!             // increment a counter...
//!         }
//!     }
//!     fn name(&self) -> &'static str { "reject-counter" }
//! }
//! ```

use async_trait::async_trait;

use crate::events::Event;

/// Contract for event subscribers.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handle a single event for this subscriber.
    async fn on_event(&self, event: &Event);

    /// Human-readable name (for logs/metrics).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Preferred capacity of this subscriber's queue.
    fn queue_capacity(&self) -> usize {
        1024
    }
}

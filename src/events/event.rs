//! # Runtime events emitted by the gateway, queue and scheduler.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Admission events**: a request was queued, refreshed, or dropped
//! - **Display events**: the head toast was shown, completed, cancelled, evicted, or failed
//! - **Subscriber events**: fan-out workers overflowed or panicked
//!
//! The [`Event`] struct carries additional metadata such as timestamps, package,
//! token, queue index, duration and a reason.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore the exact order when events are delivered out of order.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use toastvisor::{Event, EventKind, ToastToken};
//!
//! let token = ToastToken::from_raw(7);
//! let ev = Event::new(EventKind::ToastEnqueued)
//!     .with_package("com.example")
//!     .with_token(token)
//!     .with_index(0)
//!     .with_duration(Duration::from_secs(2));
//!
//! assert_eq!(ev.kind, EventKind::ToastEnqueued);
//! assert_eq!(ev.package.as_deref(), Some("com.example"));
//! assert_eq!(ev.duration_ms, Some(2000));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

use crate::toast::ToastToken;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Admission events ===
    /// A new toast was appended to the queue.
    ///
    /// Sets:
    /// - `package`, `token`
    /// - `index`: position it was appended at
    /// - `duration_ms`: requested display duration
    ToastEnqueued,

    /// A duplicate enqueue refreshed an existing toast in place.
    ///
    /// Sets:
    /// - `package`, `token`
    /// - `index`: unchanged position
    /// - `duration_ms`: new duration
    ToastUpdated,

    /// A request was dropped before reaching the queue, or by the quota.
    ///
    /// Sets:
    /// - `package` (if known), `token` (if known)
    /// - `reason`: stable label of the [`ToastError`](crate::ToastError)
    ToastRejected,

    /// A policy probe failed and the gateway fell back to its default.
    ///
    /// Sets:
    /// - `package`, `token`
    /// - `reason`: probe error message
    ProbeFailed,

    // === Display events ===
    /// The head toast was handed to its renderer.
    ///
    /// Sets:
    /// - `package`, `token`, `duration_ms`
    ToastShowing,

    /// The head toast finished and left the queue.
    ///
    /// Sets:
    /// - `package`, `token`
    /// - `reason`: outcome label (`hidden`, `timed_out`, `failed`)
    ToastCompleted,

    /// A toast was cancelled by its poster.
    ///
    /// Sets:
    /// - `package`, `token`
    /// - `index`: position it was removed from
    ToastCancelled,

    /// A toast was removed because its owning process died.
    ///
    /// Sets:
    /// - `package`, `token`
    ToastEvicted,

    /// The renderer's show call raised; the toast was dropped.
    ///
    /// Sets:
    /// - `package`, `token`
    /// - `reason`: render error message
    DisplayFailed,

    // === Subscriber events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `reason`: subscriber name and panic info
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `reason`: subscriber name and cause
    SubscriberOverflow,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Posting package, if applicable.
    pub package: Option<Arc<str>>,
    /// Caller-supplied toast token, if applicable.
    pub token: Option<ToastToken>,
    /// Queue position at the time of the event.
    pub index: Option<usize>,
    /// Display duration in milliseconds (compact).
    pub duration_ms: Option<u32>,
    /// Human-readable reason (labels, errors, overflow details).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            package: None,
            token: None,
            index: None,
            duration_ms: None,
            reason: None,
        }
    }

    /// Attaches a package name.
    #[inline]
    pub fn with_package(mut self, package: impl Into<Arc<str>>) -> Self {
        self.package = Some(package.into());
        self
    }

    /// Attaches a toast token.
    #[inline]
    pub fn with_token(mut self, token: ToastToken) -> Self {
        self.token = Some(token);
        self
    }

    /// Attaches a queue index.
    #[inline]
    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    /// Attaches a display duration (stored as milliseconds).
    #[inline]
    pub fn with_duration(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.duration_ms = Some(ms);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_reason(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_reason(format!("subscriber={subscriber} info={info}"))
    }

    #[inline]
    pub fn is_subscriber_event(&self) -> bool {
        matches!(
            self.kind,
            EventKind::SubscriberOverflow | EventKind::SubscriberPanicked
        )
    }
}

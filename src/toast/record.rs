//! # Queued toast records.
//!
//! A [`ToastRecord`] is created by the queue only after admission, from a
//! validated [`PendingToast`]. The payload enum is the record's variant:
//!
//! ```text
//! ToastPayload::Text   { text, callback }  ──► drawn by the StatusBar
//! ToastPayload::Custom { renderer }        ──► drawn by the caller's ToastRenderer
//! ```
//!
//! ## Display states
//! ```text
//! Queued ──► Showing ──► Completed
//!               └──► Failed ──► Completed
//! ```

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::Duration;

use crate::collab::{TextToastCallback, ToastRenderer};
use crate::toast::{CallerId, DisplayId, DisplayLease, ToastToken, WindowToken};

static NEXT_RECORD_ID: AtomicU64 = AtomicU64::new(1);

/// Internal identity of one queued record.
///
/// Unlike `(package, token)` it is never reused, so late show failures can
/// target exactly the record they were issued for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct RecordId(u64);

impl RecordId {
    fn next() -> Self {
        Self(NEXT_RECORD_ID.fetch_add(1, AtomicOrdering::Relaxed))
    }
}

/// What a toast displays.
#[derive(Clone)]
pub enum ToastPayload {
    /// Plain text, rendered by the system.
    Text {
        text: Arc<str>,
        callback: Option<Arc<dyn TextToastCallback>>,
    },
    /// Rendered by the posting app.
    Custom { renderer: Arc<dyn ToastRenderer> },
}

impl ToastPayload {
    /// True for payloads the posting app renders itself.
    #[inline]
    pub fn is_app_rendered(&self) -> bool {
        matches!(self, ToastPayload::Custom { .. })
    }

    #[inline]
    pub fn as_label(&self) -> &'static str {
        match self {
            ToastPayload::Text { .. } => "text",
            ToastPayload::Custom { .. } => "custom",
        }
    }
}

impl fmt::Debug for ToastPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToastPayload::Text { text, callback } => f
                .debug_struct("Text")
                .field("text", text)
                .field("callback", &callback.is_some())
                .finish(),
            ToastPayload::Custom { .. } => f.debug_struct("Custom").finish_non_exhaustive(),
        }
    }
}

/// Display state of a record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastState {
    /// Waiting for its turn.
    Queued,
    /// Handed to its renderer; only ever the head of the queue.
    Showing,
    /// The show call raised; the record is about to be removed.
    Failed,
    /// Removed from the queue (terminal).
    Completed,
}

/// An admitted toast that has not been queued yet.
#[derive(Clone, Debug)]
pub struct PendingToast {
    pub caller: CallerId,
    pub token: ToastToken,
    pub duration: Duration,
    pub display: DisplayId,
    pub payload: ToastPayload,
}

/// One entry of the toast queue.
#[derive(Debug)]
pub struct ToastRecord {
    pub(crate) id: RecordId,
    caller: CallerId,
    token: ToastToken,
    duration: Duration,
    display: DisplayId,
    state: ToastState,
    payload: ToastPayload,
    lease: DisplayLease,
}

impl ToastRecord {
    pub(crate) fn new(pending: PendingToast, lease: DisplayLease) -> Self {
        Self {
            id: RecordId::next(),
            caller: pending.caller,
            token: pending.token,
            duration: pending.duration,
            display: pending.display,
            state: ToastState::Queued,
            payload: pending.payload,
            lease,
        }
    }

    #[inline]
    pub fn package(&self) -> &str {
        &self.caller.package
    }

    #[inline]
    pub fn caller(&self) -> &CallerId {
        &self.caller
    }

    #[inline]
    pub fn token(&self) -> ToastToken {
        self.token
    }

    #[inline]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    #[inline]
    pub fn display(&self) -> DisplayId {
        self.display
    }

    #[inline]
    pub fn state(&self) -> ToastState {
        self.state
    }

    #[inline]
    pub fn payload(&self) -> &ToastPayload {
        &self.payload
    }

    #[inline]
    pub fn window(&self) -> WindowToken {
        self.lease.window()
    }

    /// True if this record occupies the `(package, token)` slot.
    #[inline]
    pub fn matches(&self, package: &str, token: ToastToken) -> bool {
        self.token == token && &*self.caller.package == package
    }

    /// Refreshes the duration of a duplicate enqueue. Position and state are kept.
    pub(crate) fn update(&mut self, duration: Duration) {
        self.duration = duration;
    }

    pub(crate) fn set_state(&mut self, state: ToastState) {
        self.state = state;
    }

    /// Releases the window token; idempotent.
    pub(crate) fn release(&mut self) -> bool {
        self.lease.release()
    }

    pub fn is_released(&self) -> bool {
        self.lease.is_released()
    }
}

//! Admission policies.
//!
//! This module groups the knobs that decide **whether** a toast request may
//! enter the queue.
//!
//! ## Contents
//! - [`PolicyGate`] validation, suspension / disabled-notification veto, background custom block
//! - [`QuotaTracker`] per-package limit on queued toasts
//!
//! ## Quick wiring
//! ```text
//! NotificationGateway (outside the queue lock)
//!      └─► PolicyGate::validate ─► probes ─► PolicyGate::admit
//! ToastQueue::upsert (inside the queue lock)
//!      └─► QuotaTracker::check  (new toasts only)
//! ```

mod gate;
mod quota;

pub use gate::{AdmissionFacts, PolicyGate, Verdict};
pub use quota::QuotaTracker;

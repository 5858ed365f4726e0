//! # toastvisor
//!
//! **toastvisor** is the admission and scheduling core of a system toast
//! service: many application processes post short-lived notifications, and the
//! gateway decides which ones may be shown and shows them one at a time.
//!
//! It validates and deduplicates requests, enforces a per-package quota,
//! applies suspension / foreground / compat-flag policy, and guarantees that at
//! most one toast is visible at a time, in arrival order.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   app process #1      app process #2      app process #3
//!         │ enqueue_text       │ enqueue_custom     │ cancel / on_show_completed
//!         ▼                    ▼                    ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  NotificationGateway                                              │
//! │  - PolicyGate (validate, suspension/disabled veto, custom block)  │
//! │  - probes (importance, visibility, compat, suspension, settings)  │
//! └──────┬────────────────────────────────────────────────────────────┘
//!        │ lock
//!        ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  ToastQueue  (one tokio Mutex)                                    │
//! │  [0] Showing   [1] Queued   [2] Queued ...                        │
//! │  - QuotaTracker on insert                                         │
//! │  - DisplayLease (window token) per record                         │
//! │  - KeepAliveHook pin/unpin                                        │
//! └──────┬────────────────────────────────────────────────────────────┘
//!        │ head Queued → Showing (lock released before show)
//!        ▼
//! ┌──────────────────────────────┐      ┌────────────────────────────┐
//! │ Scheduler                    │ ───► │ StatusBar / ToastRenderer  │
//! └──────────────────────────────┘      └────────────────────────────┘
//!
//! Gateway / Scheduler ── publish(Event) ──► Bus ──► SubscriberSet ──► subscribers
//! ```
//!
//! ### Record lifecycle
//! ```text
//! enqueue ─► admitted ─► upsert
//!                         ├─ duplicate ─► duration refreshed in place (position kept)
//!                         └─ new       ─► window token acquired, process pinned, appended
//!
//! at index 0:  Queued ─► Showing ─► (renderer) ─► on_show_completed ─► Completed
//!                           └─ show error ─► Failed ─► Completed (never retried)
//!
//! removal (completion, cancel, process death) releases the window token exactly once
//! and shows the next head.
//! ```
//!
//! ## Features
//! | Area              | Description                                               | Key types / traits                          |
//! |-------------------|-----------------------------------------------------------|---------------------------------------------|
//! | **Gateway**       | Enqueue, cancel, completion and eviction entry points.    | [`NotificationGateway`], [`GatewayBuilder`] |
//! | **Policies**      | Admission rules and per-package quota.                    | [`PolicyGate`], [`QuotaTracker`]            |
//! | **Collaborators** | Probes, display service, keep-alive, renderers.           | [`Collaborators`], [`StatusBar`], [`ToastRenderer`] |
//! | **Events**        | Observe admission and display transitions.                | [`Event`], [`EventKind`], [`Subscribe`]     |
//! | **Errors**        | Typed, labeled rejection and failure reasons.             | [`ToastError`], [`ProbeError`], [`RenderError`] |
//! | **Configuration** | Quota, system callers, policy switches.                   | [`ToastConfig`]                             |
//!
//! ## Optional features
//! - `logging`: exports the built-in [`LogWriter`] subscriber.

mod collab;
mod config;
mod core;
mod error;
mod policy;
mod subscribers;
mod toast;

pub mod events;

// ---- Public re-exports ----

pub use collab::{
    Collaborators, CompatFlagProbe, DisplayResourceService, ImportanceProbe, KeepAliveHook,
    NotificationsEnabledProbe, StatusBar, SuspensionProbe, TextToast, TextToastCallback,
    ToastRenderer, VisibilityProbe,
};
pub use config::{CHANGE_BACKGROUND_CUSTOM_TOAST_BLOCK, MAX_PACKAGE_NOTIFICATIONS, ToastConfig};
pub use self::core::{Enqueued, GatewayBuilder, NotificationGateway, ShowOutcome, ToastSnapshot};
pub use error::{ProbeError, RenderError, ToastError};
pub use events::{Event, EventKind};
pub use policy::{AdmissionFacts, PolicyGate, QuotaTracker, Verdict};
pub use subscribers::{Subscribe, SubscriberSet};
pub use toast::{
    CallerId, ChangeId, DisplayId, DisplayLease, PendingToast, ToastPayload, ToastRecord,
    ToastRequest, ToastState, ToastToken, WindowToken,
};

// Optional: expose a built-in logger subscriber.
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;

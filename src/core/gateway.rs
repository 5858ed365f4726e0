//! # NotificationGateway: admission, queueing and display of toasts.
//!
//! The gateway is the only entry point the binding layer talks to. It resolves
//! the caller's policy facts, runs the [`PolicyGate`], mutates the
//! [`ToastQueue`](crate::core::queue) under its lock and lets the scheduler show
//! whatever ends up at the head.
//!
//! ## Enqueue path
//! ```text
//! enqueue(caller, request)
//!   ├─► PolicyGate::validate              ── Err ─► ToastRejected (InvalidRequest)
//!   ├─► probes (concurrently, no lock):
//!   │     suspension, notification settings, importance
//!   ├─► PolicyGate::admit                 ── Reject ─► ToastRejected
//!   │     (visibility + compat probes)    ── probe Err ─► ProbeFailed, admit
//!   ├─► lock ─► ToastQueue::upsert ─► unlock
//!   │     ├─ Updated(i)   ─► ToastUpdated
//!   │     ├─ Inserted(i)  ─► ToastEnqueued
//!   │     └─ Rejected     ─► ToastRejected (QuotaExceeded)
//!   └─► index 0 ─► Scheduler::drive   (marks a Queued head Showing, spawns its show)
//! ```
//!
//! ## Completion / cancel / eviction
//! ```text
//! on_show_completed(caller, token) ─► lock ─► head matches && Showing ─► remove_head ─► drive
//! cancel(caller, token)            ─► lock ─► remove ─► (was showing ─► hide) ─► drive
//! on_process_died(pid)             ─► lock ─► remove_pid ─► drive
//! ```
//!
//! Every rejection is final and logged; nothing is retried and nothing is
//! surfaced as a panic to the host. No entry point awaits a renderer's show call.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, broadcast};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::collab::{Collaborators, TextToastCallback, ToastRenderer};
use crate::config::ToastConfig;
use crate::core::builder::GatewayBuilder;
use crate::core::outcome::{Enqueued, ShowOutcome};
use crate::core::queue::{Removed, ToastQueue, ToastSnapshot, Upsert};
use crate::core::scheduler::Scheduler;
use crate::error::ToastError;
use crate::events::{Bus, Event, EventKind};
use crate::policy::{AdmissionFacts, PolicyGate, QuotaTracker, Verdict};
use crate::toast::{CallerId, DisplayId, PendingToast, ToastRequest, ToastState, ToastToken};

/// Entry point for posting, cancelling and completing toasts.
pub struct NotificationGateway {
    cfg: ToastConfig,
    gate: PolicyGate,
    collab: Collaborators,
    queue: Arc<Mutex<ToastQueue>>,
    scheduler: Scheduler,
    bus: Bus,
    runtime_token: CancellationToken,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl NotificationGateway {
    /// Starts building a gateway.
    pub fn builder(cfg: ToastConfig, collab: Collaborators) -> GatewayBuilder {
        GatewayBuilder::new(cfg, collab)
    }

    pub(crate) fn new_internal(
        cfg: ToastConfig,
        collab: Collaborators,
        bus: Bus,
        runtime_token: CancellationToken,
        listener: Option<JoinHandle<()>>,
    ) -> Self {
        let queue = ToastQueue::new(
            QuotaTracker::new(cfg.quota_limit()),
            Arc::clone(&collab.display),
            Arc::clone(&collab.keep_alive),
        );
        Self {
            gate: PolicyGate::new(&cfg),
            scheduler: Scheduler::new(Arc::clone(&collab.status_bar), bus.clone()),
            queue: Arc::new(Mutex::new(queue)),
            cfg,
            collab,
            bus,
            runtime_token,
            listener: Mutex::new(listener),
        }
    }

    /// Posts a system-rendered text toast.
    ///
    /// # Errors
    /// See [`NotificationGateway::enqueue`].
    pub async fn enqueue_text(
        &self,
        caller: &CallerId,
        token: ToastToken,
        text: impl Into<Arc<str>>,
        duration: Duration,
        display: DisplayId,
        callback: Option<Arc<dyn TextToastCallback>>,
    ) -> Result<Enqueued, ToastError> {
        let request = ToastRequest::text(token, text, duration, display, callback);
        self.enqueue(caller, request).await
    }

    /// Posts an app-rendered custom toast.
    ///
    /// # Errors
    /// See [`NotificationGateway::enqueue`].
    pub async fn enqueue_custom(
        &self,
        caller: &CallerId,
        token: ToastToken,
        renderer: Arc<dyn ToastRenderer>,
        duration: Duration,
        display: DisplayId,
    ) -> Result<Enqueued, ToastError> {
        let request = ToastRequest::custom(token, renderer, duration, display);
        self.enqueue(caller, request).await
    }

    /// Validates, gates and queues a raw request.
    ///
    /// # Errors
    /// - [`ToastError::InvalidRequest`] malformed request
    /// - [`ToastError::PolicyBlocked`] suspended, or notifications off in the background
    /// - [`ToastError::CustomRenderBlocked`] background custom toast with the block change on
    /// - [`ToastError::QuotaExceeded`] package already owns the maximum of queued toasts
    ///
    /// The binding layer drops these silently; they are already logged and published.
    pub async fn enqueue(
        &self,
        caller: &CallerId,
        request: ToastRequest,
    ) -> Result<Enqueued, ToastError> {
        tracing::debug!(
            package = %caller.package,
            pid = caller.pid,
            token = ?request.token,
            duration = ?request.duration,
            display = request.display.0,
            "enqueue toast"
        );

        let token = request.token;
        let pending = match self.gate.validate(caller, request) {
            Ok(p) => p,
            Err(err) => return Err(self.reject(caller, token, err)),
        };

        let facts = self.gather_facts(caller, &pending).await;
        let verdict = self
            .gate
            .admit(
                caller,
                &facts,
                self.collab.visibility.as_ref(),
                self.collab.compat.as_ref(),
            )
            .await;
        match verdict {
            Verdict::Admit => {}
            Verdict::AdmitFailOpen(err) => {
                tracing::error!(
                    package = %caller.package,
                    error = %err,
                    "compat check for background custom toasts failed, admitting"
                );
                self.bus.publish(
                    Event::new(EventKind::ProbeFailed)
                        .with_package(caller.package.clone())
                        .with_token(pending.token)
                        .with_reason(err.as_message()),
                );
            }
            Verdict::Reject(err) => return Err(self.reject(caller, Some(pending.token), err)),
        }

        let token = pending.token;
        let duration = pending.duration;
        let upsert = self.queue.lock().await.upsert(pending);

        let enqueued = match upsert {
            Upsert::Rejected(err) => return Err(self.reject(caller, Some(token), err)),
            Upsert::Updated(index) => {
                self.publish_admitted(EventKind::ToastUpdated, caller, token, index, duration);
                Enqueued::Updated { index }
            }
            Upsert::Inserted(index) => {
                self.publish_admitted(EventKind::ToastEnqueued, caller, token, index, duration);
                Enqueued::Inserted { index }
            }
        };

        if enqueued.is_head() {
            self.scheduler.drive(&self.queue).await;
        }
        Ok(enqueued)
    }

    /// Cancels the caller's toast `token`.
    ///
    /// A showing head is hidden and the queue advances; any other position is
    /// removed in place. Returns `false` if no such toast is queued.
    pub async fn cancel(&self, caller: &CallerId, token: ToastToken) -> bool {
        let removed = self.queue.lock().await.remove(&caller.package, token);
        let Some(removed) = removed else {
            tracing::debug!(package = %caller.package, token = %token, "cancel: toast not queued");
            return false;
        };

        if removed.was_showing {
            self.scheduler.hide(&removed.record).await;
        }
        self.bus.publish(
            Event::new(EventKind::ToastCancelled)
                .with_package(caller.package.clone())
                .with_token(token)
                .with_index(removed.index),
        );

        self.scheduler.drive(&self.queue).await;
        true
    }

    /// Completion signal from the renderer for the showing toast.
    ///
    /// Ignored unless `(caller.package, token)` is the head and currently
    /// showing; a stale or repeated signal is a no-op. Returns `true` if the
    /// head was completed.
    pub async fn on_show_completed(
        &self,
        caller: &CallerId,
        token: ToastToken,
        outcome: ShowOutcome,
    ) -> bool {
        let removed = {
            let mut queue = self.queue.lock().await;
            let is_showing_head = queue.find_index(&caller.package, token) == Some(0)
                && queue
                    .peek_head()
                    .is_some_and(|r| r.state() == ToastState::Showing);
            if is_showing_head {
                queue.remove_head()
            } else {
                None
            }
        };
        let Some(removed) = removed else {
            tracing::debug!(package = %caller.package, token = %token, "stale completion ignored");
            return false;
        };

        if let ShowOutcome::Failed(err) = &outcome {
            tracing::error!(package = %caller.package, token = %token, error = %err, "toast renderer failed");
            self.bus.publish(
                Event::new(EventKind::DisplayFailed)
                    .with_package(caller.package.clone())
                    .with_token(token)
                    .with_reason(err.as_message()),
            );
        }
        self.publish_removed(EventKind::ToastCompleted, &removed, outcome.as_label());

        self.scheduler.drive(&self.queue).await;
        true
    }

    /// Evicts every toast owned by the dead process `pid`.
    ///
    /// Returns the number of evicted toasts.
    pub async fn on_process_died(&self, pid: u32) -> usize {
        let removed = self.queue.lock().await.remove_pid(pid);
        if removed.is_empty() {
            return 0;
        }

        for r in &removed {
            // The custom renderer lived in the dead process; only the status bar needs telling.
            if r.was_showing && !r.record.payload().is_app_rendered() {
                self.scheduler.hide(&r.record).await;
            }
            self.publish_removed(EventKind::ToastEvicted, r, "process_died");
        }
        tracing::info!(pid, count = removed.len(), "evicted toasts of dead process");

        self.scheduler.drive(&self.queue).await;
        removed.len()
    }

    /// Copy of the current queue, head first.
    pub async fn snapshot(&self) -> Vec<ToastSnapshot> {
        self.queue.lock().await.snapshot()
    }

    /// Number of queued toasts, including the one showing.
    pub async fn queue_len(&self) -> usize {
        self.queue.lock().await.len()
    }

    /// True if nothing is queued or showing.
    pub async fn is_idle(&self) -> bool {
        self.queue.lock().await.is_empty()
    }

    /// Receiver for events published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }

    pub fn config(&self) -> &ToastConfig {
        &self.cfg
    }

    /// Stops the subscriber listener and waits for subscriber workers to drain.
    pub async fn shutdown(&self) {
        self.runtime_token.cancel();
        let listener = self.listener.lock().await.take();
        if let Some(handle) = listener {
            let _ = handle.await;
        }
    }

    /// Waits for in-flight show calls to finish.
    #[cfg(test)]
    pub(crate) async fn settle(&self) {
        self.scheduler.settle().await;
    }

    /// Runs the probes the blocked-caller veto needs, concurrently and outside the queue lock.
    async fn gather_facts(&self, caller: &CallerId, pending: &PendingToast) -> AdmissionFacts {
        let is_system = self.cfg.is_system_caller(caller.uid, &caller.package);
        let (is_suspended, notifications_enabled, is_foreground) = tokio::join!(
            self.collab.suspension.is_package_suspended(&caller.package),
            self.collab.notifications.is_enabled(&caller.package, caller),
            self.collab.importance.is_foreground(caller),
        );
        AdmissionFacts {
            is_system,
            is_suspended,
            notifications_disabled: !notifications_enabled,
            is_foreground,
            is_app_rendered: pending.payload.is_app_rendered(),
        }
    }

    fn reject(&self, caller: &CallerId, token: Option<ToastToken>, err: ToastError) -> ToastError {
        tracing::warn!(
            package = %caller.package,
            token = ?token,
            reason = err.as_label(),
            "not enqueuing toast: {}",
            err.as_message()
        );
        let mut ev = Event::new(EventKind::ToastRejected)
            .with_package(caller.package.clone())
            .with_reason(err.as_label());
        if let Some(token) = token {
            ev = ev.with_token(token);
        }
        self.bus.publish(ev);
        err
    }

    fn publish_admitted(
        &self,
        kind: EventKind,
        caller: &CallerId,
        token: ToastToken,
        index: usize,
        duration: Duration,
    ) {
        self.bus.publish(
            Event::new(kind)
                .with_package(caller.package.clone())
                .with_token(token)
                .with_index(index)
                .with_duration(duration),
        );
    }

    fn publish_removed(&self, kind: EventKind, removed: &Removed, reason: &'static str) {
        self.bus.publish(
            Event::new(kind)
                .with_package(removed.record.caller().package.clone())
                .with_token(removed.record.token())
                .with_index(removed.index)
                .with_reason(reason),
        );
    }
}

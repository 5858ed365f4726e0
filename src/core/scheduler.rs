//! # Scheduler - drives the head of the queue through its display states.
//!
//! ```text
//! drive():                                 (caller's task)
//!   lock ─► begin_show()                   head Queued → Showing (or nothing to do)
//!   unlock
//!   publish ToastShowing
//!   spawn run(job) ─► return
//!
//! run(job):                                (spawned task)
//!   loop {
//!     show(job) ── Ok  ──► return          (renderer reports completion later)
//!               └─ Err ──► publish DisplayFailed
//!                          lock ─► remove_record(job.id) ─► begin_show() ─► unlock
//!                          next head? publish ToastShowing, continue (never retried)
//!   }
//! ```
//!
//! ## Rules
//! - Show and hide calls run with the queue lock **released**.
//! - Show calls never run on the caller's task: a renderer that hangs only
//!   stalls its own show task, never another caller's enqueue, cancel or completion.
//! - The head is marked `Showing` before the lock is dropped, so concurrent
//!   drivers never show the same record twice.
//! - A failed show removes exactly the record it was issued for; if that
//!   record already left the queue (cancel, completion) the removal is a no-op.
//! - There is no timer here: completion comes from the renderer.

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio_util::task::TaskTracker;

use crate::collab::{StatusBar, TextToast};
use crate::core::queue::{ShowJob, ToastQueue};
use crate::error::RenderError;
use crate::events::{Bus, Event, EventKind};
use crate::toast::{ToastPayload, ToastRecord};

#[derive(Clone)]
pub(crate) struct Scheduler {
    status_bar: Arc<dyn StatusBar>,
    bus: Bus,
    shows: TaskTracker,
}

impl Scheduler {
    pub fn new(status_bar: Arc<dyn StatusBar>, bus: Bus) -> Self {
        Self {
            status_bar,
            bus,
            shows: TaskTracker::new(),
        }
    }

    /// Marks a `Queued` head as `Showing` and hands its show call to a background task.
    ///
    /// Returns as soon as the head is marked; the show itself is not awaited.
    pub async fn drive(&self, queue: &Arc<Mutex<ToastQueue>>) {
        let Some(job) = queue.lock().await.begin_show() else {
            return;
        };
        self.publish_showing(&job);

        let this = self.clone();
        let queue = Arc::clone(queue);
        self.shows.spawn(async move { this.run(job, queue).await });
    }

    /// Hides a toast that was showing when it left the queue.
    pub async fn hide(&self, record: &ToastRecord) {
        match record.payload() {
            ToastPayload::Text { .. } => {
                self.status_bar
                    .hide_text(record.package(), record.token())
                    .await;
            }
            ToastPayload::Custom { renderer } => renderer.hide().await,
        }
    }

    /// Waits until every show task spawned so far has finished.
    #[cfg(test)]
    pub async fn settle(&self) {
        self.shows.close();
        self.shows.wait().await;
        self.shows.reopen();
    }

    /// Shows `job`, and on failure drops it and moves on to the next head.
    async fn run(self, mut job: ShowJob, queue: Arc<Mutex<ToastQueue>>) {
        loop {
            let err = match self.show(&job).await {
                Ok(()) => return,
                Err(err) => err,
            };

            tracing::error!(package = %job.caller.package, token = %job.token, error = %err, "toast show failed, dropping");
            self.bus.publish(
                Event::new(EventKind::DisplayFailed)
                    .with_package(job.caller.package.clone())
                    .with_token(job.token)
                    .with_reason(err.as_message()),
            );

            let (removed, next) = {
                let mut queue = queue.lock().await;
                let removed = queue.remove_record(job.id);
                (removed, queue.begin_show())
            };
            if removed.is_some() {
                self.bus.publish(
                    Event::new(EventKind::ToastCompleted)
                        .with_package(job.caller.package.clone())
                        .with_token(job.token)
                        .with_reason("failed"),
                );
            }

            let Some(next) = next else {
                return;
            };
            self.publish_showing(&next);
            job = next;
        }
    }

    fn publish_showing(&self, job: &ShowJob) {
        tracing::debug!(package = %job.caller.package, token = %job.token, kind = job.payload.as_label(), "showing toast");
        self.bus.publish(
            Event::new(EventKind::ToastShowing)
                .with_package(job.caller.package.clone())
                .with_token(job.token)
                .with_duration(job.duration),
        );
    }

    async fn show(&self, job: &ShowJob) -> Result<(), RenderError> {
        match &job.payload {
            ToastPayload::Text { text, callback } => {
                self.status_bar
                    .show_text(TextToast {
                        uid: job.caller.uid,
                        package: job.caller.package.clone(),
                        token: job.token,
                        text: text.clone(),
                        duration: job.duration,
                        window: job.window,
                        display: job.display,
                        callback: callback.clone(),
                    })
                    .await
            }
            ToastPayload::Custom { renderer } => renderer.show(job.window).await,
        }
    }
}

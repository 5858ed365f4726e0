//! # Toast queue - the single ordered, lock-protected collection of toasts.
//!
//! The gateway wraps one [`ToastQueue`] in a `tokio::sync::Mutex`; every method
//! here runs with that lock held, so each one is atomic with respect to other
//! callers. In particular the quota check and the append of [`ToastQueue::upsert`]
//! happen in one critical section.
//!
//! ## Rules
//! - At most one record per `(package, token)`.
//! - Order is insertion order; duplicates are refreshed in place, never moved.
//! - Only index 0 may be `Showing`.
//! - A record's window token is acquired on insert and released on removal.
//! - The owning process is pinned on insert and unpinned when its last record leaves.
//!
//! Nothing here awaits: collaborators called under the lock are synchronous.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use crate::collab::{DisplayResourceService, KeepAliveHook};
use crate::error::ToastError;
use crate::policy::QuotaTracker;
use crate::toast::{
    CallerId, DisplayId, DisplayLease, PendingToast, RecordId, ToastPayload, ToastRecord,
    ToastState, ToastToken, WindowToken,
};

/// Result of [`ToastQueue::upsert`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Upsert {
    /// Duplicate refreshed in place.
    Updated(usize),
    /// New record appended.
    Inserted(usize),
    Rejected(ToastError),
}

/// A record taken out of the queue, already released.
#[derive(Debug)]
pub(crate) struct Removed {
    pub index: usize,
    pub was_showing: bool,
    pub record: ToastRecord,
}

/// Everything the scheduler needs to show the head outside the lock.
#[derive(Debug, Clone)]
pub(crate) struct ShowJob {
    pub id: RecordId,
    pub caller: CallerId,
    pub token: ToastToken,
    pub duration: Duration,
    pub display: DisplayId,
    pub window: WindowToken,
    pub payload: ToastPayload,
}

/// Point-in-time copy of one queue entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastSnapshot {
    pub package: Arc<str>,
    pub token: ToastToken,
    pub pid: u32,
    pub duration: Duration,
    pub state: ToastState,
}

/// Ordered toast queue. Not synchronized by itself.
pub(crate) struct ToastQueue {
    records: VecDeque<ToastRecord>,
    quota: QuotaTracker,
    display: Arc<dyn DisplayResourceService>,
    keep_alive: Arc<dyn KeepAliveHook>,
}

impl ToastQueue {
    pub fn new(
        quota: QuotaTracker,
        display: Arc<dyn DisplayResourceService>,
        keep_alive: Arc<dyn KeepAliveHook>,
    ) -> Self {
        Self {
            records: VecDeque::new(),
            quota,
            display,
            keep_alive,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Position of the record occupying `(package, token)`.
    pub fn find_index(&self, package: &str, token: ToastToken) -> Option<usize> {
        self.records.iter().position(|r| r.matches(package, token))
    }

    /// Refreshes a duplicate in place, or appends a new record if the quota allows.
    pub fn upsert(&mut self, pending: PendingToast) -> Upsert {
        if let Some(index) = self.find_index(&pending.caller.package, pending.token) {
            if let Some(record) = self.records.get_mut(index) {
                record.update(pending.duration);
            }
            return Upsert::Updated(index);
        }

        let queued = self.records.iter().map(|r| r.package());
        if let Err(err) = self.quota.check(&pending.caller.package, queued) {
            return Upsert::Rejected(err);
        }

        let pid = pending.caller.pid;
        let lease = DisplayLease::acquire(Arc::clone(&self.display), pending.display);
        self.records.push_back(ToastRecord::new(pending, lease));
        self.keep_alive.pin(pid);
        Upsert::Inserted(self.records.len() - 1)
    }

    pub fn peek_head(&self) -> Option<&ToastRecord> {
        self.records.front()
    }

    /// Pops index 0 and releases its window token.
    pub fn remove_head(&mut self) -> Option<Removed> {
        self.remove_at(0)
    }

    /// Removes the record occupying `(package, token)`, wherever it is.
    pub fn remove(&mut self, package: &str, token: ToastToken) -> Option<Removed> {
        let index = self.find_index(package, token)?;
        self.remove_at(index)
    }

    /// Removes the record `id` if it is still queued.
    pub fn remove_record(&mut self, id: RecordId) -> Option<Removed> {
        let index = self.records.iter().position(|r| r.id == id)?;
        if let Some(record) = self.records.get_mut(index) {
            record.set_state(ToastState::Failed);
        }
        self.remove_at(index)
    }

    /// Removes every record owned by `pid`, preserving the order of the rest.
    pub fn remove_pid(&mut self, pid: u32) -> Vec<Removed> {
        let mut removed = Vec::new();
        let mut index = 0;
        let mut original_index = 0;
        while index < self.records.len() {
            if self.records[index].caller().pid == pid {
                if let Some(mut r) = self.remove_at(index) {
                    r.index = original_index;
                    removed.push(r);
                }
            } else {
                index += 1;
            }
            original_index += 1;
        }
        removed
    }

    /// Marks a `Queued` head as `Showing` and hands out what is needed to show it.
    ///
    /// Returns `None` if the queue is empty or the head is already showing.
    pub fn begin_show(&mut self) -> Option<ShowJob> {
        let head = self.records.front_mut()?;
        if head.state() != ToastState::Queued {
            return None;
        }
        head.set_state(ToastState::Showing);
        Some(ShowJob {
            id: head.id,
            caller: head.caller().clone(),
            token: head.token(),
            duration: head.duration(),
            display: head.display(),
            window: head.window(),
            payload: head.payload().clone(),
        })
    }

    pub fn snapshot(&self) -> Vec<ToastSnapshot> {
        self.records
            .iter()
            .map(|r| ToastSnapshot {
                package: Arc::clone(&r.caller().package),
                token: r.token(),
                pid: r.caller().pid,
                duration: r.duration(),
                state: r.state(),
            })
            .collect()
    }

    fn remove_at(&mut self, index: usize) -> Option<Removed> {
        let mut record = self.records.remove(index)?;
        let was_showing = record.state() == ToastState::Showing;
        record.release();
        record.set_state(ToastState::Completed);

        let pid = record.caller().pid;
        if !self.records.iter().any(|r| r.caller().pid == pid) {
            self.keep_alive.unpin(pid);
        }

        Some(Removed {
            index,
            was_showing,
            record,
        })
    }
}

//! # Per-package queue quota.
//!
//! The quota is derived, not stored: every check scans the packages of the
//! currently queued toasts. The scan is bounded by the quota itself times the
//! number of posting packages, so no per-package counter is kept in sync.
//!
//! Only insertions are checked. Refreshing an already queued toast never
//! grows the queue and is always allowed.

use crate::error::ToastError;

/// Enforces the per-package maximum of queued toasts.
#[derive(Clone, Copy, Debug)]
pub struct QuotaTracker {
    max: usize,
}

impl QuotaTracker {
    /// Creates a tracker with the given maximum (clamped to at least 1).
    pub fn new(max: usize) -> Self {
        Self { max: max.max(1) }
    }

    #[inline]
    pub fn max(&self) -> usize {
        self.max
    }

    /// Checks whether `package` may add one more toast to a queue holding `queued`.
    ///
    /// # Errors
    /// [`ToastError::QuotaExceeded`] if `package` already owns `max` toasts.
    pub fn check<'a>(
        &self,
        package: &str,
        queued: impl IntoIterator<Item = &'a str>,
    ) -> Result<(), ToastError> {
        let count = queued.into_iter().filter(|p| *p == package).count();
        if count >= self.max {
            return Err(ToastError::QuotaExceeded {
                count,
                max: self.max,
            });
        }
        Ok(())
    }

    /// True if inserting one more toast for `package` would break the quota.
    #[inline]
    pub fn would_exceed<'a>(&self, package: &str, queued: impl IntoIterator<Item = &'a str>) -> bool {
        self.check(package, queued).is_err()
    }
}

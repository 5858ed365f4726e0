//! # Display-resource lease.
//!
//! A [`DisplayLease`] owns one [`WindowToken`] from acquisition (the toast is
//! inserted into the queue) until release (the toast leaves it).
//!
//! ## Rules
//! - `release()` destroys the token at most once; later calls are no-ops.
//! - Dropping an unreleased lease releases it.

use std::fmt;
use std::sync::Arc;

use crate::collab::DisplayResourceService;
use crate::toast::{DisplayId, WindowToken};

/// Owned window token with idempotent release.
pub struct DisplayLease {
    window: WindowToken,
    released: bool,
    service: Arc<dyn DisplayResourceService>,
}

impl DisplayLease {
    /// Allocates a window token on `display`.
    pub(crate) fn acquire(service: Arc<dyn DisplayResourceService>, display: DisplayId) -> Self {
        let window = service.acquire(display);
        Self {
            window,
            released: false,
            service,
        }
    }

    #[inline]
    pub fn window(&self) -> WindowToken {
        self.window
    }

    #[inline]
    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Releases the token. Returns `true` only for the call that actually released it.
    pub(crate) fn release(&mut self) -> bool {
        if self.released {
            return false;
        }
        self.released = true;
        self.service.release(self.window);
        true
    }
}

impl Drop for DisplayLease {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for DisplayLease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DisplayLease")
            .field("window", &self.window)
            .field("released", &self.released)
            .finish()
    }
}

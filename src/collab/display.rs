//! # Display attachment and process keep-alive.
//!
//! Both collaborators are called **inside** the queue lock, so they are
//! synchronous and must not wait on other callers.

use crate::toast::{DisplayId, WindowToken};

/// Allocates and destroys the window token a toast renders into.
pub trait DisplayResourceService: Send + Sync + 'static {
    /// Allocates a toast window token on `display`.
    fn acquire(&self, display: DisplayId) -> WindowToken;

    /// Destroys `token`. Releasing an unknown or already released token is a no-op.
    fn release(&self, token: WindowToken);
}

/// Keeps processes with queued toasts alive.
pub trait KeepAliveHook: Send + Sync + 'static {
    /// Called once per newly queued toast owned by `pid`.
    fn pin(&self, pid: u32);

    /// Called when the last queued toast owned by `pid` leaves the queue.
    fn unpin(&self, pid: u32);
}

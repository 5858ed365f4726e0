//! # Policy probes.
//!
//! Remote lookups the gateway consults before admitting a toast. Every probe is
//! called **outside** the queue lock; implementations may block on IPC.
//!
//! Only [`CompatFlagProbe`] is fallible. The gateway treats its failure as
//! "change disabled" (fail-open).

use async_trait::async_trait;

use crate::error::ProbeError;
use crate::toast::{CallerId, ChangeId};

/// Process importance lookup.
#[async_trait]
pub trait ImportanceProbe: Send + Sync + 'static {
    /// True if the caller's process currently has foreground importance.
    async fn is_foreground(&self, caller: &CallerId) -> bool;
}

/// Top-activity visibility lookup.
///
/// Distinct from [`ImportanceProbe`]: a process can be important (e.g. bound by
/// a foreground app) without any of its windows being visible.
#[async_trait]
pub trait VisibilityProbe: Send + Sync + 'static {
    /// True if `package` (running as `uid`) has a visible top activity.
    async fn is_package_visible(&self, package: &str, uid: u32) -> bool;
}

/// Compatibility-flag lookup.
#[async_trait]
pub trait CompatFlagProbe: Send + Sync + 'static {
    /// True if `change` is enabled for `package` under `user_id`.
    ///
    /// # Errors
    /// [`ProbeError::RemoteUnavailable`] on transport failure.
    async fn is_change_enabled(
        &self,
        change: ChangeId,
        package: &str,
        user_id: u32,
    ) -> Result<bool, ProbeError>;
}

/// Package suspension lookup.
#[async_trait]
pub trait SuspensionProbe: Send + Sync + 'static {
    async fn is_package_suspended(&self, package: &str) -> bool;
}

/// Per-package notification settings lookup.
#[async_trait]
pub trait NotificationsEnabledProbe: Send + Sync + 'static {
    /// False if the user disabled notifications for `package`.
    async fn is_enabled(&self, package: &str, caller: &CallerId) -> bool;
}

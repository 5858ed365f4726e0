//! # Global gateway configuration.
//!
//! Provides [`ToastConfig`], the centralized settings for a
//! [`NotificationGateway`](crate::NotificationGateway).
//!
//! ## Sentinel values
//! - `max_package_toasts = 0` → clamped to 1 (a package may always queue one toast)
//! - `bus_capacity = 0` → clamped to 1

use crate::toast::ChangeId;

/// Default per-package limit of queued toasts.
pub const MAX_PACKAGE_NOTIFICATIONS: usize = 50;

/// Package name of the platform itself; always treated as a system caller.
pub const PLATFORM_PACKAGE_NAME: &str = "android";

/// Compat change gating the block on background custom toasts.
pub const CHANGE_BACKGROUND_CUSTOM_TOAST_BLOCK: ChangeId = ChangeId(128_611_929);

/// Global configuration for the toast gateway.
///
/// ## Field semantics
/// - `max_package_toasts`: queued toasts allowed per package (min 1)
/// - `enable_blocked_toasts`: apply the suspension / disabled-notification veto
/// - `platform_package`: package name treated as a system caller
/// - `system_uids`: uids treated as system callers (root, system, phone)
/// - `bus_capacity`: event bus ring buffer size (min 1)
/// - `block_background_custom_change`: change id consulted for background custom toasts
#[derive(Clone, Debug)]
pub struct ToastConfig {
    /// Maximum number of toasts a single package may have queued at once.
    ///
    /// Updates of an already queued toast never count against this limit.
    pub max_package_toasts: usize,

    /// Whether toasts from suspended packages, or from background packages with
    /// notifications disabled, are suppressed.
    pub enable_blocked_toasts: bool,

    /// Package name that always counts as a system caller.
    pub platform_package: String,

    /// Caller uids that count as system callers.
    pub system_uids: Vec<u32>,

    /// Capacity of the event bus broadcast channel ring buffer.
    pub bus_capacity: usize,

    /// Compat change that blocks custom toasts from background packages.
    pub block_background_custom_change: ChangeId,
}

impl ToastConfig {
    /// Returns the per-package limit clamped to a minimum of 1.
    #[inline]
    pub fn quota_limit(&self) -> usize {
        self.max_package_toasts.max(1)
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }

    /// True if a caller with `uid` posting as `package` is a system caller.
    #[inline]
    pub fn is_system_caller(&self, uid: u32, package: &str) -> bool {
        self.system_uids.contains(&uid) || package == self.platform_package
    }
}

impl Default for ToastConfig {
    /// Default configuration:
    ///
    /// - `max_package_toasts = 50`
    /// - `enable_blocked_toasts = true`
    /// - `platform_package = "android"`
    /// - `system_uids = [0, 1000, 1001]`
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            max_package_toasts: MAX_PACKAGE_NOTIFICATIONS,
            enable_blocked_toasts: true,
            platform_package: PLATFORM_PACKAGE_NAME.to_string(),
            system_uids: vec![0, 1000, 1001],
            bus_capacity: 1024,
            block_background_custom_change: CHANGE_BACKGROUND_CUSTOM_TOAST_BLOCK,
        }
    }
}

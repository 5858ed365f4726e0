//! # Caller and toast identities.
//!
//! - [`CallerId`]: who is calling, as attributed by the platform (trusted).
//! - [`ToastToken`]: caller-supplied opaque value naming a logical toast slot.
//! - [`WindowToken`]: display-attachment handle allocated per queued toast.
//! - [`DisplayId`] / [`ChangeId`]: plain newtypes for display and compat-change ids.
//!
//! A toast is identified by `(package, ToastToken)`; the token alone is not an
//! ownership proof.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

/// Number of uids reserved per user.
const PER_USER_RANGE: u32 = 100_000;

static NEXT_TOAST_TOKEN: AtomicU64 = AtomicU64::new(1);
static NEXT_WINDOW_TOKEN: AtomicU64 = AtomicU64::new(1);

/// Identity of the calling process.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CallerId {
    /// Calling process id.
    pub pid: u32,
    /// Calling uid.
    pub uid: u32,
    /// Package the caller posts as.
    pub package: Arc<str>,
}

impl CallerId {
    /// Creates a new caller identity.
    pub fn new(pid: u32, uid: u32, package: impl Into<Arc<str>>) -> Self {
        Self {
            pid,
            uid,
            package: package.into(),
        }
    }

    /// User the caller's uid belongs to.
    #[inline]
    pub fn user_id(&self) -> u32 {
        self.uid / PER_USER_RANGE
    }
}

/// Opaque caller-supplied toast identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ToastToken(u64);

impl ToastToken {
    /// Allocates a fresh token, unique within this process.
    pub fn new() -> Self {
        Self(NEXT_TOAST_TOKEN.fetch_add(1, AtomicOrdering::Relaxed))
    }

    /// Wraps a raw value handed over by the binding layer.
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn as_raw(self) -> u64 {
        self.0
    }
}

impl Default for ToastToken {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ToastToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "toast#{}", self.0)
    }
}

/// Handle a toast uses to attach to a display.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WindowToken(u64);

impl WindowToken {
    /// Allocates a fresh handle; for [`DisplayResourceService`](crate::DisplayResourceService)
    /// implementations that have no native id of their own.
    pub fn new() -> Self {
        Self(NEXT_WINDOW_TOKEN.fetch_add(1, AtomicOrdering::Relaxed))
    }

    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn as_raw(self) -> u64 {
        self.0
    }
}

impl Default for WindowToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Target display.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct DisplayId(pub u32);

impl DisplayId {
    /// The built-in default display.
    pub const DEFAULT: DisplayId = DisplayId(0);
}

/// Compatibility change identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChangeId(pub u64);

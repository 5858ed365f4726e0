//! Error types used by the toast gateway and its collaborators.
//!
//! This module defines three error enums:
//!
//! - [`ToastError`]: why an enqueue request was dropped.
//! - [`ProbeError`]: a remote policy probe could not answer.
//! - [`RenderError`]: a renderer failed to show a toast.
//!
//! All of them provide `as_label` (stable snake_case, for logs/metrics) and
//! `as_message` helpers. None of them is ever retried by the gateway: every
//! rejection is final for that request and the caller may enqueue again.

use thiserror::Error;

/// # Reasons an enqueue request is dropped.
///
/// The binding layer discards these (toast posting is fire-and-forget for
/// applications); they are returned so hosts and tests can observe the verdict.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ToastError {
    /// Malformed arguments: missing package/token, or not exactly one payload.
    #[error("invalid toast request: {reason}")]
    InvalidRequest {
        /// What was wrong with the request.
        reason: &'static str,
    },

    /// Package is suspended, or notifications are disabled while it is in the background.
    #[error("toast blocked by policy (suspended: {suspended})")]
    PolicyBlocked {
        /// `true` when the veto came from package suspension.
        suspended: bool,
    },

    /// Custom-rendered toast from a background app with the block change enabled.
    #[error("custom toast blocked while package is in the background")]
    CustomRenderBlocked,

    /// The package already owns the maximum number of queued toasts.
    #[error("package has already posted {count} toasts (max {max})")]
    QuotaExceeded {
        /// Toasts currently queued for the package.
        count: usize,
        /// Configured per-package maximum.
        max: usize,
    },
}

impl ToastError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use toastvisor::ToastError;
    ///
    /// let err = ToastError::QuotaExceeded { count: 50, max: 50 };
    /// assert_eq!(err.as_label(), "toast_quota_exceeded");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ToastError::InvalidRequest { .. } => "toast_invalid_request",
            ToastError::PolicyBlocked { .. } => "toast_policy_blocked",
            ToastError::CustomRenderBlocked => "toast_custom_render_blocked",
            ToastError::QuotaExceeded { .. } => "toast_quota_exceeded",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ToastError::InvalidRequest { reason } => format!("invalid: {reason}"),
            ToastError::PolicyBlocked { suspended: true } => {
                "suppressed: package suspended".to_string()
            }
            ToastError::PolicyBlocked { suspended: false } => {
                "suppressed: by user request".to_string()
            }
            ToastError::CustomRenderBlocked => {
                "blocked: custom toast while package not in foreground".to_string()
            }
            ToastError::QuotaExceeded { count, max } => {
                format!("quota: {count} toasts queued, max {max}")
            }
        }
    }
}

/// # Errors reported by remote policy probes.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    /// Transport to the probe's backing service failed.
    #[error("remote probe unavailable: {error}")]
    RemoteUnavailable {
        /// The underlying transport error message.
        error: String,
    },
}

impl ProbeError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ProbeError::RemoteUnavailable { .. } => "probe_remote_unavailable",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ProbeError::RemoteUnavailable { error } => format!("remote unavailable: {error}"),
        }
    }
}

/// # Errors raised while invoking a toast renderer.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// The show callback raised; the toast is dropped and the queue advances.
    #[error("display invocation failed: {error}")]
    DisplayInvocationFailed {
        /// The underlying error message.
        error: String,
    },
}

impl RenderError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            RenderError::DisplayInvocationFailed { .. } => "render_display_failed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            RenderError::DisplayInvocationFailed { error } => format!("show failed: {error}"),
        }
    }
}

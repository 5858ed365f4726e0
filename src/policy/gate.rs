//! # Admission policy gate.
//!
//! [`PolicyGate`] decides whether a toast request may enter the queue. Rules are
//! evaluated in order and the first match wins:
//!
//! ```text
//! 1. malformed request                                   ─► Reject(InvalidRequest)
//! 2. !system && ((notifications off && !foreground)
//!                || suspended)                           ─► Reject(PolicyBlocked)
//! 3. custom && !system && !visible
//!       └─► compat(block background custom toasts)
//!              ├─ Ok(true)   ─► Reject(CustomRenderBlocked)
//!              ├─ Ok(false)  ─► Admit
//!              └─ Err(e)     ─► AdmitFailOpen(e)
//! 4.                                                      ─► Admit
//! ```
//!
//! Rule 2 uses process **importance**; rule 3 uses top-activity **visibility**.
//! They are different signals and are gathered by different probes.
//!
//! The gate holds no state and never touches the queue; the gateway calls it
//! outside the queue lock.

use crate::collab::{CompatFlagProbe, VisibilityProbe};
use crate::config::ToastConfig;
use crate::error::{ProbeError, ToastError};
use crate::toast::{CallerId, ChangeId, PendingToast, ToastRequest};

/// Facts gathered by the gateway before rules 2–4 run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AdmissionFacts {
    /// Caller is the system, the phone process, root, or the platform package.
    pub is_system: bool,
    pub is_suspended: bool,
    pub notifications_disabled: bool,
    /// Foreground by process importance.
    pub is_foreground: bool,
    /// Payload is rendered by the posting app.
    pub is_app_rendered: bool,
}

/// Outcome of [`PolicyGate::admit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Admit,
    /// Admitted because the compat probe failed; the anomaly should be reported.
    AdmitFailOpen(ProbeError),
    Reject(ToastError),
}

impl Verdict {
    #[inline]
    pub fn is_admitted(&self) -> bool {
        !matches!(self, Verdict::Reject(_))
    }
}

/// Stateless admission rules.
#[derive(Clone, Copy, Debug)]
pub struct PolicyGate {
    enable_blocked_toasts: bool,
    block_background_custom: ChangeId,
}

impl PolicyGate {
    pub fn new(cfg: &ToastConfig) -> Self {
        Self {
            enable_blocked_toasts: cfg.enable_blocked_toasts,
            block_background_custom: cfg.block_background_custom_change,
        }
    }

    /// Rule 1: shape check. No probe is consulted.
    ///
    /// # Errors
    /// [`ToastError::InvalidRequest`] for malformed requests.
    pub fn validate(
        &self,
        caller: &CallerId,
        request: ToastRequest,
    ) -> Result<PendingToast, ToastError> {
        request.into_pending(caller)
    }

    /// Rule 2: suspension and disabled-notification veto.
    pub fn check_blocked(&self, facts: &AdmissionFacts) -> Option<ToastError> {
        if !self.enable_blocked_toasts || facts.is_system {
            return None;
        }
        if facts.is_suspended {
            return Some(ToastError::PolicyBlocked { suspended: true });
        }
        if facts.notifications_disabled && !facts.is_foreground {
            return Some(ToastError::PolicyBlocked { suspended: false });
        }
        None
    }

    /// Rules 2–4 for an already validated request.
    ///
    /// The visibility and compat probes are only consulted when rule 3 applies.
    pub async fn admit(
        &self,
        caller: &CallerId,
        facts: &AdmissionFacts,
        visibility: &dyn VisibilityProbe,
        compat: &dyn CompatFlagProbe,
    ) -> Verdict {
        if let Some(err) = self.check_blocked(facts) {
            return Verdict::Reject(err);
        }

        if !facts.is_app_rendered || facts.is_system {
            return Verdict::Admit;
        }
        if visibility.is_package_visible(&caller.package, caller.uid).await {
            return Verdict::Admit;
        }

        match compat
            .is_change_enabled(
                self.block_background_custom,
                &caller.package,
                caller.user_id(),
            )
            .await
        {
            Ok(true) => Verdict::Reject(ToastError::CustomRenderBlocked),
            Ok(false) => Verdict::Admit,
            // TODO: decide with product policy whether a failed compat check should block instead.
            Err(e) => Verdict::AdmitFailOpen(e),
        }
    }
}

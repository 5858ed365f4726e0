//! # Raw enqueue requests.
//!
//! [`ToastRequest`] mirrors what the binding layer receives: every field is
//! optional and nothing has been checked yet. [`ToastRequest::into_pending`]
//! is the only way to turn it into a [`PendingToast`].

use std::sync::Arc;
use std::time::Duration;

use crate::collab::{TextToastCallback, ToastRenderer};
use crate::error::ToastError;
use crate::toast::{CallerId, DisplayId, PendingToast, ToastPayload, ToastToken};

/// Unvalidated toast request.
#[derive(Clone, Default)]
pub struct ToastRequest {
    pub token: Option<ToastToken>,
    pub text: Option<Arc<str>>,
    pub renderer: Option<Arc<dyn ToastRenderer>>,
    /// Only meaningful for text toasts.
    pub text_callback: Option<Arc<dyn TextToastCallback>>,
    pub duration: Duration,
    pub display: DisplayId,
}

impl ToastRequest {
    /// Request for a system-rendered text toast.
    pub fn text(
        token: ToastToken,
        text: impl Into<Arc<str>>,
        duration: Duration,
        display: DisplayId,
        callback: Option<Arc<dyn TextToastCallback>>,
    ) -> Self {
        Self {
            token: Some(token),
            text: Some(text.into()),
            renderer: None,
            text_callback: callback,
            duration,
            display,
        }
    }

    /// Request for an app-rendered custom toast.
    pub fn custom(
        token: ToastToken,
        renderer: Arc<dyn ToastRenderer>,
        duration: Duration,
        display: DisplayId,
    ) -> Self {
        Self {
            token: Some(token),
            text: None,
            renderer: Some(renderer),
            text_callback: None,
            duration,
            display,
        }
    }

    /// True if the request carries a caller-supplied renderer.
    #[inline]
    pub fn is_app_rendered(&self) -> bool {
        self.renderer.is_some()
    }

    /// Checks the request's shape and binds it to `caller`.
    ///
    /// # Errors
    /// [`ToastError::InvalidRequest`] if the package is empty, the token is
    /// missing, or not exactly one of text / renderer is set.
    pub fn into_pending(self, caller: &CallerId) -> Result<PendingToast, ToastError> {
        if caller.package.is_empty() {
            return Err(ToastError::InvalidRequest {
                reason: "missing package",
            });
        }
        let Some(token) = self.token else {
            return Err(ToastError::InvalidRequest {
                reason: "missing token",
            });
        };
        let payload = match (self.text, self.renderer) {
            (Some(text), None) => ToastPayload::Text {
                text,
                callback: self.text_callback,
            },
            (None, Some(renderer)) => ToastPayload::Custom { renderer },
            (Some(_), Some(_)) => {
                return Err(ToastError::InvalidRequest {
                    reason: "both text and renderer set",
                });
            }
            (None, None) => {
                return Err(ToastError::InvalidRequest {
                    reason: "neither text nor renderer set",
                });
            }
        };

        Ok(PendingToast {
            caller: caller.clone(),
            token,
            duration: self.duration,
            display: self.display,
            payload,
        })
    }
}

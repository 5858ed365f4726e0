//! # Toast renderers.
//!
//! Two render paths exist, one per payload kind:
//! - text toasts are drawn by the system [`StatusBar`];
//! - custom toasts are drawn by the caller through its own [`ToastRenderer`].
//!
//! Both `show` calls are fire-and-forget: they return once the renderer has
//! accepted the toast, not once it disappears. Completion is reported back via
//! [`NotificationGateway::on_show_completed`](crate::NotificationGateway::on_show_completed).

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::RenderError;
use crate::toast::{DisplayId, ToastToken, WindowToken};

/// Callback a text toast's poster receives from the status bar.
#[async_trait]
pub trait TextToastCallback: Send + Sync + 'static {
    async fn on_toast_shown(&self);
    async fn on_toast_hidden(&self);
}

/// Everything the status bar needs to draw a text toast.
#[derive(Clone)]
pub struct TextToast {
    pub uid: u32,
    pub package: Arc<str>,
    pub token: ToastToken,
    pub text: Arc<str>,
    pub duration: Duration,
    pub window: WindowToken,
    pub display: DisplayId,
    /// Forwarded untouched; the gateway never calls it.
    pub callback: Option<Arc<dyn TextToastCallback>>,
}

/// System renderer for text toasts.
#[async_trait]
pub trait StatusBar: Send + Sync + 'static {
    /// # Errors
    /// [`RenderError::DisplayInvocationFailed`] if the toast could not be handed over.
    async fn show_text(&self, toast: TextToast) -> Result<(), RenderError>;

    async fn hide_text(&self, package: &str, token: ToastToken);
}

/// Caller-supplied renderer for custom toasts.
#[async_trait]
pub trait ToastRenderer: Send + Sync + 'static {
    /// # Errors
    /// [`RenderError::DisplayInvocationFailed`] if the caller's renderer raised.
    async fn show(&self, window: WindowToken) -> Result<(), RenderError>;

    async fn hide(&self);
}

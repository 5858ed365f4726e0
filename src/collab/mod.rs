//! External collaborators consumed by the gateway.
//!
//! ## Contents
//! - [`probes`]: importance, visibility, compat-flag, suspension, notification settings
//! - [`display`]: window-token allocation and process keep-alive
//! - [`render`]: status bar (text toasts) and caller renderers (custom toasts)
//!
//! [`Collaborators`] bundles one shared handle per service for the builder.

mod display;
mod probes;
mod render;

use std::sync::Arc;

pub use display::{DisplayResourceService, KeepAliveHook};
pub use probes::{
    CompatFlagProbe, ImportanceProbe, NotificationsEnabledProbe, SuspensionProbe, VisibilityProbe,
};
pub use render::{StatusBar, TextToast, TextToastCallback, ToastRenderer};

/// Shared handles to every external service the gateway talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub importance: Arc<dyn ImportanceProbe>,
    pub visibility: Arc<dyn VisibilityProbe>,
    pub compat: Arc<dyn CompatFlagProbe>,
    pub suspension: Arc<dyn SuspensionProbe>,
    pub notifications: Arc<dyn NotificationsEnabledProbe>,
    pub display: Arc<dyn DisplayResourceService>,
    pub keep_alive: Arc<dyn KeepAliveHook>,
    pub status_bar: Arc<dyn StatusBar>,
}

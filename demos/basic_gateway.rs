//! # Example: basic_gateway
//!
//! Wires a [`NotificationGateway`] to in-memory collaborators and walks two apps
//! through the toast lifecycle.
//!
//! Shows how to:
//! - Implement the collaborator traits ([`StatusBar`], [`ToastRenderer`], probes).
//! - Attach a [`Subscribe`] implementation through the builder.
//! - Drive completion from the renderer side with [`NotificationGateway::on_show_completed`].
//!
//! ## Flow
//! ```text
//! com.example.mail   enqueue_text(t1)    ──► index 0, Showing
//! com.example.mail   enqueue_text(t1)    ──► index 0, duration refreshed
//! com.example.player enqueue_custom(t2)  ──► index 1, Queued
//! com.example.mail   on_show_completed   ──► t2 Showing
//! com.example.player on_show_completed   ──► queue idle
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=debug cargo run --example basic_gateway
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use toastvisor::{
    CallerId, ChangeId, Collaborators, CompatFlagProbe, DisplayId, DisplayResourceService, Event,
    EventKind, ImportanceProbe, KeepAliveHook, NotificationGateway, NotificationsEnabledProbe,
    ProbeError, RenderError, ShowOutcome, StatusBar, Subscribe, SuspensionProbe, TextToast,
    ToastConfig, ToastRenderer, ToastToken, VisibilityProbe, WindowToken,
};

/// Fixed policy answers: nothing suspended, notifications on, only the player visible.
struct FixedPolicy;

#[async_trait]
impl ImportanceProbe for FixedPolicy {
    async fn is_foreground(&self, _caller: &CallerId) -> bool {
        false
    }
}

#[async_trait]
impl VisibilityProbe for FixedPolicy {
    async fn is_package_visible(&self, package: &str, _uid: u32) -> bool {
        package == "com.example.player"
    }
}

#[async_trait]
impl CompatFlagProbe for FixedPolicy {
    async fn is_change_enabled(
        &self,
        _change: ChangeId,
        _package: &str,
        _user_id: u32,
    ) -> Result<bool, ProbeError> {
        Ok(true)
    }
}

#[async_trait]
impl SuspensionProbe for FixedPolicy {
    async fn is_package_suspended(&self, _package: &str) -> bool {
        false
    }
}

#[async_trait]
impl NotificationsEnabledProbe for FixedPolicy {
    async fn is_enabled(&self, _package: &str, _caller: &CallerId) -> bool {
        true
    }
}

/// Hands out sequential window tokens.
#[derive(Default)]
struct Windows {
    next: AtomicU64,
}

impl DisplayResourceService for Windows {
    fn acquire(&self, display: DisplayId) -> WindowToken {
        let w = WindowToken::from_raw(self.next.fetch_add(1, Ordering::Relaxed));
        println!("[wm] acquire window {} on display {}", w.as_raw(), display.0);
        w
    }

    fn release(&self, token: WindowToken) {
        println!("[wm] release window {}", token.as_raw());
    }
}

struct Pinner;

impl KeepAliveHook for Pinner {
    fn pin(&self, pid: u32) {
        println!("[am] pin pid={pid}");
    }

    fn unpin(&self, pid: u32) {
        println!("[am] unpin pid={pid}");
    }
}

struct ConsoleStatusBar;

#[async_trait]
impl StatusBar for ConsoleStatusBar {
    async fn show_text(&self, toast: TextToast) -> Result<(), RenderError> {
        println!(
            "[status bar] \"{}\" from {} for {:?}",
            toast.text, toast.package, toast.duration
        );
        Ok(())
    }

    async fn hide_text(&self, package: &str, token: ToastToken) {
        println!("[status bar] hide {token} of {package}");
    }
}

struct PlayerRenderer;

#[async_trait]
impl ToastRenderer for PlayerRenderer {
    async fn show(&self, window: WindowToken) -> Result<(), RenderError> {
        println!("[player] drawing custom toast into window {}", window.as_raw());
        Ok(())
    }

    async fn hide(&self) {
        println!("[player] hide");
    }
}

/// Prints admission and display transitions.
struct ConsoleSubscriber;

#[async_trait]
impl Subscribe for ConsoleSubscriber {
    async fn on_event(&self, ev: &Event) {
        let package = ev.package.as_deref().unwrap_or("-");
        match ev.kind {
            EventKind::ToastEnqueued | EventKind::ToastUpdated => {
                println!("[sub] {:?}: {package} index={:?}", ev.kind, ev.index);
            }
            EventKind::ToastShowing => println!("[sub] showing: {package}"),
            EventKind::ToastCompleted => {
                println!("[sub] completed: {package} ({})", ev.reason.as_deref().unwrap_or(""));
            }
            EventKind::ToastRejected => {
                println!("[sub] rejected: {package} ({})", ev.reason.as_deref().unwrap_or(""));
            }
            _ => {}
        }
    }

    fn name(&self) -> &'static str {
        "console"
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let policy = Arc::new(FixedPolicy);
    let collab = Collaborators {
        importance: policy.clone(),
        visibility: policy.clone(),
        compat: policy.clone(),
        suspension: policy.clone(),
        notifications: policy,
        display: Arc::new(Windows::default()),
        keep_alive: Arc::new(Pinner),
        status_bar: Arc::new(ConsoleStatusBar),
    };

    let gateway = NotificationGateway::builder(ToastConfig::default(), collab)
        .with_subscribers(vec![Arc::new(ConsoleSubscriber) as Arc<dyn Subscribe>])
        .build();

    let mail = CallerId::new(4100, 10_041, "com.example.mail");
    let player = CallerId::new(4200, 10_042, "com.example.player");
    let (t1, t2) = (ToastToken::new(), ToastToken::new());
    let short = Duration::from_millis(200);

    let shown = gateway
        .enqueue_text(&mail, t1, "1 new message", short, DisplayId::DEFAULT, None)
        .await;
    println!("[main] mail t1 -> {shown:?}");

    let refreshed = gateway
        .enqueue_text(&mail, t1, "1 new message", short * 2, DisplayId::DEFAULT, None)
        .await;
    println!("[main] mail t1 again -> {refreshed:?}");

    let queued = gateway
        .enqueue_custom(&player, t2, Arc::new(PlayerRenderer), short, DisplayId::DEFAULT)
        .await;
    println!("[main] player t2 -> {queued:?}");

    for s in gateway.snapshot().await {
        println!("[main] queue: {} {} {:?}", s.package, s.token, s.state);
    }

    // The status bar's timer fires.
    tokio::time::sleep(short * 2).await;
    gateway.on_show_completed(&mail, t1, ShowOutcome::TimedOut).await;

    tokio::time::sleep(short).await;
    gateway.on_show_completed(&player, t2, ShowOutcome::Hidden).await;

    println!("[main] idle: {}", gateway.is_idle().await);
    gateway.shutdown().await;
}

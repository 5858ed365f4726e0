use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::collab::{
    Collaborators, CompatFlagProbe, DisplayResourceService, ImportanceProbe, KeepAliveHook,
    NotificationsEnabledProbe, StatusBar, SuspensionProbe, TextToast, ToastRenderer,
    VisibilityProbe,
};
use crate::config::ToastConfig;
use crate::error::{ProbeError, RenderError, ToastError};
use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;
use crate::toast::{
    CallerId, ChangeId, DisplayId, ToastRequest, ToastState, ToastToken, WindowToken,
};

use super::{Enqueued, NotificationGateway, ShowOutcome};

/// In-memory stand-in for every external service.
struct FakeSystem {
    foreground: AtomicBool,
    visible: AtomicBool,
    suspended: AtomicBool,
    notifications_enabled: AtomicBool,
    compat: Mutex<Result<bool, ProbeError>>,
    probe_calls: AtomicUsize,

    acquired: Mutex<Vec<WindowToken>>,
    released: Mutex<Vec<WindowToken>>,
    pins: Mutex<Vec<u32>>,
    unpins: Mutex<Vec<u32>>,

    status_bar_fails: AtomicBool,
    shown_texts: Mutex<Vec<(String, Duration)>>,
    hidden_texts: AtomicUsize,
}

impl Default for FakeSystem {
    fn default() -> Self {
        Self {
            foreground: AtomicBool::new(false),
            visible: AtomicBool::new(false),
            suspended: AtomicBool::new(false),
            notifications_enabled: AtomicBool::new(true),
            compat: Mutex::new(Ok(false)),
            probe_calls: AtomicUsize::new(0),
            acquired: Mutex::default(),
            released: Mutex::default(),
            pins: Mutex::default(),
            unpins: Mutex::default(),
            status_bar_fails: AtomicBool::new(false),
            shown_texts: Mutex::default(),
            hidden_texts: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ImportanceProbe for FakeSystem {
    async fn is_foreground(&self, _caller: &CallerId) -> bool {
        self.probe_calls.fetch_add(1, Ordering::SeqCst);
        self.foreground.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VisibilityProbe for FakeSystem {
    async fn is_package_visible(&self, _package: &str, _uid: u32) -> bool {
        self.probe_calls.fetch_add(1, Ordering::SeqCst);
        self.visible.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompatFlagProbe for FakeSystem {
    async fn is_change_enabled(
        &self,
        _change: ChangeId,
        _package: &str,
        _user_id: u32,
    ) -> Result<bool, ProbeError> {
        self.probe_calls.fetch_add(1, Ordering::SeqCst);
        self.compat.lock().unwrap().clone()
    }
}

#[async_trait]
impl SuspensionProbe for FakeSystem {
    async fn is_package_suspended(&self, _package: &str) -> bool {
        self.probe_calls.fetch_add(1, Ordering::SeqCst);
        self.suspended.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NotificationsEnabledProbe for FakeSystem {
    async fn is_enabled(&self, _package: &str, _caller: &CallerId) -> bool {
        self.probe_calls.fetch_add(1, Ordering::SeqCst);
        self.notifications_enabled.load(Ordering::SeqCst)
    }
}

impl DisplayResourceService for FakeSystem {
    fn acquire(&self, _display: DisplayId) -> WindowToken {
        let w = WindowToken::new();
        self.acquired.lock().unwrap().push(w);
        w
    }
    fn release(&self, token: WindowToken) {
        self.released.lock().unwrap().push(token);
    }
}

impl KeepAliveHook for FakeSystem {
    fn pin(&self, pid: u32) {
        self.pins.lock().unwrap().push(pid);
    }
    fn unpin(&self, pid: u32) {
        self.unpins.lock().unwrap().push(pid);
    }
}

#[async_trait]
impl StatusBar for FakeSystem {
    async fn show_text(&self, toast: TextToast) -> Result<(), RenderError> {
        if self.status_bar_fails.load(Ordering::SeqCst) {
            return Err(RenderError::DisplayInvocationFailed {
                error: "status bar gone".into(),
            });
        }
        self.shown_texts
            .lock()
            .unwrap()
            .push((toast.text.to_string(), toast.duration));
        Ok(())
    }

    async fn hide_text(&self, _package: &str, _token: ToastToken) {
        self.hidden_texts.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
struct FakeRenderer {
    fail: bool,
    shows: Mutex<Vec<WindowToken>>,
    hides: AtomicUsize,
}

impl FakeRenderer {
    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn show_count(&self) -> usize {
        self.shows.lock().unwrap().len()
    }
}

#[async_trait]
impl ToastRenderer for FakeRenderer {
    async fn show(&self, window: WindowToken) -> Result<(), RenderError> {
        self.shows.lock().unwrap().push(window);
        if self.fail {
            return Err(RenderError::DisplayInvocationFailed {
                error: "renderer died".into(),
            });
        }
        Ok(())
    }

    async fn hide(&self) {
        self.hides.fetch_add(1, Ordering::SeqCst);
    }
}

/// Renderer whose show call never returns.
#[derive(Default)]
struct StuckRenderer {
    hides: AtomicUsize,
}

#[async_trait]
impl ToastRenderer for StuckRenderer {
    async fn show(&self, _window: WindowToken) -> Result<(), RenderError> {
        std::future::pending().await
    }

    async fn hide(&self) {
        self.hides.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
struct Recorder {
    kinds: Mutex<Vec<EventKind>>,
}

#[async_trait]
impl Subscribe for Recorder {
    async fn on_event(&self, ev: &Event) {
        self.kinds.lock().unwrap().push(ev.kind);
    }
    fn name(&self) -> &'static str {
        "recorder"
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn collaborators(sys: &Arc<FakeSystem>) -> Collaborators {
    Collaborators {
        importance: sys.clone(),
        visibility: sys.clone(),
        compat: sys.clone(),
        suspension: sys.clone(),
        notifications: sys.clone(),
        display: sys.clone(),
        keep_alive: sys.clone(),
        status_bar: sys.clone(),
    }
}

fn harness(cfg: ToastConfig) -> (Arc<NotificationGateway>, Arc<FakeSystem>) {
    init_tracing();
    let sys = Arc::new(FakeSystem::default());
    let gateway = NotificationGateway::builder(cfg, collaborators(&sys)).build();
    (gateway, sys)
}

const SHORT: Duration = Duration::from_secs(1);

async fn post_text(
    gateway: &NotificationGateway,
    caller: &CallerId,
    raw: u64,
) -> Result<Enqueued, ToastError> {
    gateway
        .enqueue_text(caller, ToastToken::from_raw(raw), "x", SHORT, DisplayId::DEFAULT, None)
        .await
}

async fn post_custom(
    gateway: &NotificationGateway,
    caller: &CallerId,
    raw: u64,
    renderer: Arc<dyn ToastRenderer>,
) -> Result<Enqueued, ToastError> {
    gateway
        .enqueue_custom(caller, ToastToken::from_raw(raw), renderer, SHORT, DisplayId::DEFAULT)
        .await
}

fn app(pid: u32, package: &str) -> CallerId {
    CallerId::new(pid, 10_000 + pid, package)
}

fn drain(rx: &mut broadcast::Receiver<Event>) -> Vec<Event> {
    let mut out = Vec::new();
    while let Ok(ev) = rx.try_recv() {
        out.push(ev);
    }
    out
}

fn kinds(events: &[Event]) -> Vec<EventKind> {
    events.iter().map(|e| e.kind).collect()
}

async fn states(gateway: &NotificationGateway) -> Vec<(ToastToken, ToastState)> {
    gateway
        .snapshot()
        .await
        .into_iter()
        .map(|s| (s.token, s.state))
        .collect()
}

#[tokio::test]
async fn test_update_keeps_showing_head_then_completion_advances() {
    let (gateway, sys) = harness(ToastConfig::default());
    let a = app(1, "com.a");
    let b = app(2, "com.b");
    let t1 = ToastToken::from_raw(1);
    let t2 = ToastToken::from_raw(2);

    let first = gateway
        .enqueue_text(&a, t1, "hello", Duration::from_secs(2), DisplayId::DEFAULT, None)
        .await;
    assert_eq!(first, Ok(Enqueued::Inserted { index: 0 }));
    assert_eq!(states(&gateway).await, vec![(t1, ToastState::Showing)]);
    gateway.settle().await;

    let again = gateway
        .enqueue_text(&a, t1, "hello", Duration::from_secs(5), DisplayId::DEFAULT, None)
        .await;
    assert_eq!(again, Ok(Enqueued::Updated { index: 0 }));
    let snap = gateway.snapshot().await;
    assert_eq!(snap[0].state, ToastState::Showing);
    assert_eq!(snap[0].duration, Duration::from_secs(5));
    // Not re-triggered.
    gateway.settle().await;
    assert_eq!(sys.shown_texts.lock().unwrap().len(), 1);

    let renderer = Arc::new(FakeRenderer::default());
    sys.visible.store(true, Ordering::SeqCst);
    let custom = post_custom(&gateway, &b, 2, renderer.clone()).await;
    assert_eq!(custom, Ok(Enqueued::Inserted { index: 1 }));
    assert_eq!(
        states(&gateway).await,
        vec![(t1, ToastState::Showing), (t2, ToastState::Queued)]
    );
    assert_eq!(renderer.show_count(), 0);

    assert!(gateway.on_show_completed(&a, t1, ShowOutcome::TimedOut).await);
    assert_eq!(states(&gateway).await, vec![(t2, ToastState::Showing)]);
    gateway.settle().await;
    assert_eq!(renderer.show_count(), 1);
    assert_eq!(sys.released.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_stuck_renderer_does_not_block_other_callers() {
    let (gateway, sys) = harness(ToastConfig::default());
    sys.visible.store(true, Ordering::SeqCst);
    let a = app(1, "com.a");
    let b = app(2, "com.b");
    let (t1, t2, t3) = (ToastToken::from_raw(1), ToastToken::from_raw(2), ToastToken::from_raw(3));
    let stuck = Arc::new(StuckRenderer::default());
    let limit = Duration::from_secs(2);

    post_text(&gateway, &a, 1).await.unwrap();
    post_custom(&gateway, &b, 2, stuck.clone()).await.unwrap();

    // Completing com.a's toast hands the head to com.b's renderer, which never returns.
    let completed =
        tokio::time::timeout(limit, gateway.on_show_completed(&a, t1, ShowOutcome::Hidden)).await;
    assert_eq!(completed, Ok(true));
    assert_eq!(states(&gateway).await, vec![(t2, ToastState::Showing)]);

    let queued = tokio::time::timeout(limit, post_text(&gateway, &a, 3)).await;
    assert_eq!(queued, Ok(Ok(Enqueued::Inserted { index: 1 })));

    let cancelled = tokio::time::timeout(limit, gateway.cancel(&b, t2)).await;
    assert_eq!(cancelled, Ok(true));
    assert_eq!(stuck.hides.load(Ordering::SeqCst), 1);
    assert_eq!(states(&gateway).await, vec![(t3, ToastState::Showing)]);
}

#[tokio::test]
async fn test_quota_boundary_and_update_past_quota() {
    let (gateway, sys) = harness(ToastConfig::default());
    let p = app(7, "com.spammy");
    let max = crate::config::MAX_PACKAGE_NOTIFICATIONS;

    for raw in 0..max as u64 {
        let res = post_text(&gateway, &p, raw).await;
        assert_eq!(res, Ok(Enqueued::Inserted { index: raw as usize }));
    }

    let mut rx = gateway.subscribe();
    let over = post_text(&gateway, &p, max as u64).await;
    assert_eq!(over, Err(ToastError::QuotaExceeded { count: max, max }));
    let events = drain(&mut rx);
    assert_eq!(kinds(&events), vec![EventKind::ToastRejected]);
    assert_eq!(events[0].reason.as_deref(), Some("toast_quota_exceeded"));

    let update = gateway
        .enqueue_text(
            &p,
            ToastToken::from_raw(3),
            "x",
            Duration::from_secs(9),
            DisplayId::DEFAULT,
            None,
        )
        .await;
    assert_eq!(update, Ok(Enqueued::Updated { index: 3 }));

    assert_eq!(gateway.queue_len().await, max);
    assert_eq!(sys.acquired.lock().unwrap().len(), max);
    assert_eq!(sys.pins.lock().unwrap().len(), max);

    // Another package is unaffected.
    let other = post_text(&gateway, &app(8, "com.other"), 0).await;
    assert_eq!(other, Ok(Enqueued::Inserted { index: max }));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_enqueues_keep_identity_unique_and_quota_exact() {
    let cfg = ToastConfig {
        max_package_toasts: 5,
        ..ToastConfig::default()
    };
    let (gateway, _sys) = harness(cfg);

    let mut handles = Vec::new();
    for i in 0..40u64 {
        let gw = Arc::clone(&gateway);
        handles.push(tokio::spawn(async move {
            post_text(&gw, &app(1, "com.busy"), i % 10).await
        }));
    }

    let mut inserted = 0;
    for h in handles {
        if let Ok(Enqueued::Inserted { .. }) = h.await.unwrap() {
            inserted += 1;
        }
    }
    assert_eq!(inserted, 5);

    let snap = gateway.snapshot().await;
    assert_eq!(snap.len(), 5);
    let mut tokens: Vec<u64> = snap.iter().map(|s| s.token.as_raw()).collect();
    tokens.sort_unstable();
    tokens.dedup();
    assert_eq!(tokens.len(), 5);
    assert_eq!(snap[0].state, ToastState::Showing);
    assert!(snap[1..].iter().all(|s| s.state == ToastState::Queued));
}

#[tokio::test]
async fn test_completion_preserves_order_of_remainder() {
    let (gateway, _sys) = harness(ToastConfig::default());
    let tokens: Vec<ToastToken> = (1..=4).map(ToastToken::from_raw).collect();
    for (i, t) in tokens.iter().enumerate() {
        post_text(&gateway, &app(i as u32 + 1, "com.a"), t.as_raw())
            .await
            .unwrap();
    }

    let a = app(1, "com.a");
    assert!(gateway.on_show_completed(&a, tokens[0], ShowOutcome::Hidden).await);
    assert_eq!(
        states(&gateway).await,
        vec![
            (tokens[1], ToastState::Showing),
            (tokens[2], ToastState::Queued),
            (tokens[3], ToastState::Queued),
        ]
    );
}

#[tokio::test]
async fn test_stale_and_repeated_completion_ignored() {
    let (gateway, sys) = harness(ToastConfig::default());
    let a = app(1, "com.a");
    let (t1, t2) = (ToastToken::from_raw(1), ToastToken::from_raw(2));
    post_text(&gateway, &a, 1).await.unwrap();
    post_text(&gateway, &a, 2).await.unwrap();

    // t2 is not the head.
    assert!(!gateway.on_show_completed(&a, t2, ShowOutcome::Hidden).await);
    // Right token, wrong package.
    assert!(
        !gateway
            .on_show_completed(&app(1, "com.b"), t1, ShowOutcome::Hidden)
            .await
    );
    assert_eq!(gateway.queue_len().await, 2);

    assert!(gateway.on_show_completed(&a, t1, ShowOutcome::Hidden).await);
    assert!(!gateway.on_show_completed(&a, t1, ShowOutcome::Hidden).await);
    assert_eq!(states(&gateway).await, vec![(t2, ToastState::Showing)]);
    assert_eq!(sys.released.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_show_failure_drops_toast_and_advances() {
    let (gateway, sys) = harness(ToastConfig::default());
    sys.visible.store(true, Ordering::SeqCst);
    let a = app(1, "com.a");
    let ok = Arc::new(FakeRenderer::default());
    let broken = Arc::new(FakeRenderer::failing());
    let (t1, t3) = (ToastToken::from_raw(1), ToastToken::from_raw(3));

    post_custom(&gateway, &a, 1, ok.clone()).await.unwrap();
    post_custom(&gateway, &a, 2, broken.clone()).await.unwrap();
    gateway
        .enqueue_text(&a, t3, "after", SHORT, DisplayId::DEFAULT, None)
        .await
        .unwrap();
    gateway.settle().await;

    let mut rx = gateway.subscribe();
    assert!(gateway.on_show_completed(&a, t1, ShowOutcome::Hidden).await);
    gateway.settle().await;

    assert_eq!(broken.show_count(), 1);
    assert_eq!(states(&gateway).await, vec![(t3, ToastState::Showing)]);
    assert_eq!(sys.shown_texts.lock().unwrap()[0].0, "after");
    assert_eq!(
        kinds(&drain(&mut rx)),
        vec![
            EventKind::ToastCompleted,
            EventKind::ToastShowing,
            EventKind::DisplayFailed,
            EventKind::ToastCompleted,
            EventKind::ToastShowing,
        ]
    );
    // Window tokens of both removed toasts are released, once each.
    assert_eq!(sys.released.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_show_failure_on_empty_queue_insert() {
    let (gateway, sys) = harness(ToastConfig::default());
    sys.status_bar_fails.store(true, Ordering::SeqCst);

    let res = post_text(&gateway, &app(1, "com.a"), 1).await;
    assert_eq!(res, Ok(Enqueued::Inserted { index: 0 }));
    gateway.settle().await;

    assert!(gateway.is_idle().await);
    assert_eq!(*sys.acquired.lock().unwrap(), *sys.released.lock().unwrap());
    assert_eq!(*sys.unpins.lock().unwrap(), vec![1]);
}

#[tokio::test]
async fn test_cancel_showing_head_hides_and_advances() {
    let (gateway, sys) = harness(ToastConfig::default());
    let a = app(1, "com.a");
    let (t1, t2, t3) = (ToastToken::from_raw(1), ToastToken::from_raw(2), ToastToken::from_raw(3));
    for raw in 1..=3 {
        post_text(&gateway, &a, raw).await.unwrap();
    }

    // Middle of the queue: plain removal.
    assert!(gateway.cancel(&a, t2).await);
    assert_eq!(sys.hidden_texts.load(Ordering::SeqCst), 0);
    assert_eq!(
        states(&gateway).await,
        vec![(t1, ToastState::Showing), (t3, ToastState::Queued)]
    );

    // Showing head: hidden, next one shown.
    assert!(gateway.cancel(&a, t1).await);
    assert_eq!(sys.hidden_texts.load(Ordering::SeqCst), 1);
    assert_eq!(states(&gateway).await, vec![(t3, ToastState::Showing)]);

    assert!(!gateway.cancel(&a, t1).await);
    assert_eq!(sys.released.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_cancel_custom_head_calls_renderer_hide() {
    let (gateway, sys) = harness(ToastConfig::default());
    sys.visible.store(true, Ordering::SeqCst);
    let a = app(1, "com.a");
    let renderer = Arc::new(FakeRenderer::default());

    post_custom(&gateway, &a, 1, renderer.clone()).await.unwrap();
    assert!(gateway.cancel(&a, ToastToken::from_raw(1)).await);

    assert_eq!(renderer.hides.load(Ordering::SeqCst), 1);
    assert!(gateway.is_idle().await);
}

#[tokio::test]
async fn test_compat_probe_failure_fails_open() {
    let (gateway, sys) = harness(ToastConfig::default());
    *sys.compat.lock().unwrap() = Err(ProbeError::RemoteUnavailable {
        error: "transport".into(),
    });
    let mut rx = gateway.subscribe();

    let res = post_custom(&gateway, &app(1, "com.bg"), 1, Arc::new(FakeRenderer::default())).await;
    assert_eq!(res, Ok(Enqueued::Inserted { index: 0 }));

    let events = drain(&mut rx);
    assert_eq!(events[0].kind, EventKind::ProbeFailed);
    assert!(events[0].reason.as_deref().unwrap().contains("transport"));
}

#[tokio::test]
async fn test_background_custom_blocked_by_compat_change() {
    let (gateway, sys) = harness(ToastConfig::default());
    *sys.compat.lock().unwrap() = Ok(true);
    // Importance says foreground; visibility does not. Only visibility counts here.
    sys.foreground.store(true, Ordering::SeqCst);
    let bg = app(1, "com.bg");

    let res = post_custom(&gateway, &bg, 1, Arc::new(FakeRenderer::default())).await;
    assert_eq!(res, Err(ToastError::CustomRenderBlocked));
    assert!(gateway.is_idle().await);
    assert!(sys.acquired.lock().unwrap().is_empty());

    // Text toasts are never subject to the custom block.
    assert!(post_text(&gateway, &bg, 2).await.is_ok());
}

#[tokio::test]
async fn test_policy_blocked_unless_system() {
    let (gateway, sys) = harness(ToastConfig::default());
    let a = app(1, "com.a");
    sys.suspended.store(true, Ordering::SeqCst);

    let res = post_text(&gateway, &a, 1).await;
    assert_eq!(res, Err(ToastError::PolicyBlocked { suspended: true }));

    let system = CallerId::new(99, 1000, "com.android.systemui");
    let res = post_text(&gateway, &system, 1).await;
    assert_eq!(res, Ok(Enqueued::Inserted { index: 0 }));

    sys.suspended.store(false, Ordering::SeqCst);
    sys.notifications_enabled.store(false, Ordering::SeqCst);
    let res = post_text(&gateway, &a, 1).await;
    assert_eq!(res, Err(ToastError::PolicyBlocked { suspended: false }));

    sys.foreground.store(true, Ordering::SeqCst);
    let res = post_text(&gateway, &a, 1).await;
    assert_eq!(res, Ok(Enqueued::Inserted { index: 1 }));
}

#[tokio::test]
async fn test_invalid_request_touches_no_probe() {
    let (gateway, sys) = harness(ToastConfig::default());
    let mut rx = gateway.subscribe();
    let a = app(1, "com.a");

    let both = ToastRequest {
        text: Some("x".into()),
        ..ToastRequest::custom(
            ToastToken::from_raw(1),
            Arc::new(FakeRenderer::default()),
            SHORT,
            DisplayId::DEFAULT,
        )
    };
    let res = gateway.enqueue(&a, both).await;
    assert!(matches!(res, Err(ToastError::InvalidRequest { .. })));

    let res = gateway.enqueue(&a, ToastRequest::default()).await;
    assert!(matches!(res, Err(ToastError::InvalidRequest { .. })));

    assert_eq!(sys.probe_calls.load(Ordering::SeqCst), 0);
    assert_eq!(
        kinds(&drain(&mut rx)),
        vec![EventKind::ToastRejected, EventKind::ToastRejected]
    );
}

#[tokio::test]
async fn test_process_death_evicts_and_advances() {
    let (gateway, sys) = harness(ToastConfig::default());
    let dying = app(1, "com.dying");
    let alive = app(2, "com.alive");

    post_text(&gateway, &dying, 1).await.unwrap();
    post_text(&gateway, &alive, 2).await.unwrap();
    post_text(&gateway, &dying, 3).await.unwrap();

    assert_eq!(gateway.on_process_died(1).await, 2);
    assert_eq!(
        states(&gateway).await,
        vec![(ToastToken::from_raw(2), ToastState::Showing)]
    );
    assert_eq!(sys.hidden_texts.load(Ordering::SeqCst), 1);
    assert_eq!(*sys.unpins.lock().unwrap(), vec![1]);
    assert_eq!(sys.released.lock().unwrap().len(), 2);

    assert_eq!(gateway.on_process_died(1).await, 0);
}

#[tokio::test]
async fn test_every_window_released_exactly_once() {
    let (gateway, sys) = harness(ToastConfig::default());
    let a = app(1, "com.a");
    for raw in 1..=3 {
        post_text(&gateway, &a, raw).await.unwrap();
    }

    // Cancel and completion race for the head; only one wins.
    let t1 = ToastToken::from_raw(1);
    let (cancelled, completed) = tokio::join!(
        gateway.cancel(&a, t1),
        gateway.on_show_completed(&a, t1, ShowOutcome::Hidden),
    );
    assert!(cancelled ^ completed);

    gateway
        .on_show_completed(&a, ToastToken::from_raw(2), ShowOutcome::Hidden)
        .await;
    gateway.cancel(&a, ToastToken::from_raw(3)).await;

    let mut acquired = sys.acquired.lock().unwrap().clone();
    let mut released = sys.released.lock().unwrap().clone();
    acquired.sort_unstable_by_key(|w| w.as_raw());
    released.sort_unstable_by_key(|w| w.as_raw());
    assert_eq!(acquired, released);
}

#[tokio::test]
async fn test_subscribers_observe_lifecycle_in_order() {
    init_tracing();
    let sys = Arc::new(FakeSystem::default());
    let recorder = Arc::new(Recorder::default());
    let gateway = NotificationGateway::builder(ToastConfig::default(), collaborators(&sys))
        .with_subscribers(vec![recorder.clone() as Arc<dyn Subscribe>])
        .build();
    let a = app(1, "com.a");
    let t = ToastToken::from_raw(1);

    post_text(&gateway, &a, 1).await.unwrap();
    gateway.on_show_completed(&a, t, ShowOutcome::Hidden).await;
    gateway.shutdown().await;

    assert_eq!(
        *recorder.kinds.lock().unwrap(),
        vec![
            EventKind::ToastEnqueued,
            EventKind::ToastShowing,
            EventKind::ToastCompleted,
        ]
    );
}

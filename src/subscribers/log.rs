//! # LogWriter - event logger
//!
//! A minimal subscriber that renders incoming [`Event`]s as `tracing` records.
//!
//! ## Example output
//! ```text
//! INFO  toast enqueued package="com.example" token=toast#3 index=0 duration_ms=2000
//! INFO  toast showing package="com.example" token=toast#3
//! WARN  toast rejected package="com.example" reason="toast_quota_exceeded"
//! ERROR display failed package="com.example" token=toast#4 reason="renderer died"
//! INFO  toast completed package="com.example" token=toast#3 outcome="hidden"
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let package = e.package.as_deref().unwrap_or("-");
        let token = e.token.map(|t| t.to_string()).unwrap_or_default();
        let reason = e.reason.as_deref().unwrap_or("");

        match e.kind {
            EventKind::ToastEnqueued => {
                tracing::info!(package, token = %token, index = ?e.index, duration_ms = ?e.duration_ms, "toast enqueued");
            }
            EventKind::ToastUpdated => {
                tracing::info!(package, token = %token, index = ?e.index, duration_ms = ?e.duration_ms, "toast updated");
            }
            EventKind::ToastRejected => {
                tracing::warn!(package, token = %token, reason, "toast rejected");
            }
            EventKind::ProbeFailed => {
                tracing::warn!(package, token = %token, reason, "probe failed, admitting");
            }
            EventKind::ToastShowing => {
                tracing::info!(package, token = %token, duration_ms = ?e.duration_ms, "toast showing");
            }
            EventKind::ToastCompleted => {
                tracing::info!(package, token = %token, outcome = reason, "toast completed");
            }
            EventKind::ToastCancelled => {
                tracing::info!(package, token = %token, index = ?e.index, "toast cancelled");
            }
            EventKind::ToastEvicted => {
                tracing::info!(package, token = %token, "toast evicted");
            }
            EventKind::DisplayFailed => {
                tracing::error!(package, token = %token, reason, "display failed");
            }
            EventKind::SubscriberOverflow => {
                tracing::warn!(reason, "subscriber overflow");
            }
            EventKind::SubscriberPanicked => {
                tracing::error!(reason, "subscriber panicked");
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use tracing_subscriber::fmt::MakeWriter;

    use super::*;
    use crate::toast::ToastToken;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Captured {
        type Writer = Captured;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn toast(kind: EventKind) -> Event {
        Event::new(kind)
            .with_package("com.example")
            .with_token(ToastToken::from_raw(3))
    }

    #[tokio::test]
    async fn test_every_kind_is_written() {
        let out = Captured::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(out.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::TRACE)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let events = [
            toast(EventKind::ToastEnqueued)
                .with_index(0)
                .with_duration(Duration::from_secs(2)),
            toast(EventKind::ToastUpdated).with_index(0),
            toast(EventKind::ToastRejected).with_reason("toast_quota_exceeded"),
            toast(EventKind::ProbeFailed).with_reason("remote unavailable: timeout"),
            toast(EventKind::ToastShowing),
            toast(EventKind::ToastCompleted).with_reason("hidden"),
            toast(EventKind::ToastCancelled).with_index(1),
            toast(EventKind::ToastEvicted).with_reason("process_died"),
            toast(EventKind::DisplayFailed).with_reason("show failed: renderer died"),
            Event::subscriber_overflow("metrics", "full"),
            Event::subscriber_panicked("metrics", "boom".to_string()),
        ];
        let writer = LogWriter::new();
        for ev in &events {
            writer.on_event(ev).await;
        }

        let text = out.text();
        for needle in [
            "toast enqueued",
            "toast updated",
            "toast rejected",
            "probe failed, admitting",
            "toast showing",
            "toast completed",
            "toast cancelled",
            "toast evicted",
            "display failed",
            "subscriber overflow",
            "subscriber panicked",
        ] {
            assert!(text.contains(needle), "missing {needle:?} in:\n{text}");
        }
        assert!(text.contains("com.example"));
        assert!(text.contains("toast#3"));
        assert!(text.contains("toast_quota_exceeded"));
        assert_eq!(text.lines().count(), events.len());
    }

    #[test]
    fn test_name() {
        assert_eq!(LogWriter::new().name(), "LogWriter");
    }
}

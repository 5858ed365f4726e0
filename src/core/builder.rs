use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::collab::Collaborators;
use crate::config::ToastConfig;
use crate::events::Bus;
use crate::subscribers::{Subscribe, SubscriberSet};

use super::gateway::NotificationGateway;

/// Builder for constructing a [`NotificationGateway`].
pub struct GatewayBuilder {
    cfg: ToastConfig,
    collab: Collaborators,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl GatewayBuilder {
    /// Creates a new builder with the given configuration and collaborators.
    pub fn new(cfg: ToastConfig, collab: Collaborators) -> Self {
        Self {
            cfg,
            collab,
            subscribers: Vec::new(),
        }
    }

    /// Sets event subscribers for observability.
    ///
    /// Subscribers receive toast events through dedicated workers with bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Builds the gateway.
    ///
    /// With subscribers configured this spawns the fan-out listener and one worker
    /// per subscriber, so it must be called from within a tokio runtime.
    pub fn build(self) -> Arc<NotificationGateway> {
        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let runtime_token = CancellationToken::new();

        let listener = if self.subscribers.is_empty() {
            None
        } else {
            let subs = SubscriberSet::new(self.subscribers, bus.clone());
            Some(spawn_listener(&bus, subs, runtime_token.clone()))
        };

        Arc::new(NotificationGateway::new_internal(
            self.cfg,
            self.collab,
            bus,
            runtime_token,
            listener,
        ))
    }
}

/// Forwards bus events to the subscriber set until cancelled, then drains the workers.
fn spawn_listener(bus: &Bus, subs: SubscriberSet, token: CancellationToken) -> JoinHandle<()> {
    let mut rx = bus.subscribe();
    tokio::spawn(async move {
        loop {
            // Buffered events are forwarded before cancellation is observed.
            tokio::select! {
                biased;
                msg = rx.recv() => match msg {
                    Ok(ev) => subs.emit(&ev),
                    Err(RecvError::Closed) => break,
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "subscriber listener lagged behind the event bus");
                    }
                },
                _ = token.cancelled() => break,
            }
        }
        subs.shutdown().await;
    })
}

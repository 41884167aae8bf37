//! Global listener setup and teardown for one application session.
//!
//! `Session::start` composes the event bus and the context's stores into the
//! channel subscriptions the application needs while active, then emits the
//! ready signal so the backend starts pushing. Teardown (explicit or on drop)
//! removes every subscription registered at setup: afterwards no backend
//! event mutates any store until a new session starts.

use std::sync::Arc;

use serde_json::Value;

use crate::bus::event_types::{
    ChannelEvent, LaunchEvent, CHANNEL_LAUNCH_ARGS, CHANNEL_LOG_STREAM, CHANNEL_READY,
    CHANNEL_STORE_EVENT,
};
use crate::bus::{BusSubscription, Debouncer};
use crate::BridgeContext;

/// Application-side reactions to session-scoped notifications.
pub struct SessionHooks {
    /// Invoked once per coalesced burst of backend store mutations.
    pub on_change_detected: Arc<dyn Fn() + Send + Sync>,
    /// Invoked when the backend surfaces launch arguments (first start or a
    /// second-instance launch) with a non-empty argument list.
    pub on_launch_args: Arc<dyn Fn(LaunchEvent) + Send + Sync>,
}

impl Default for SessionHooks {
    fn default() -> Self {
        Self {
            on_change_detected: Arc::new(|| {}),
            on_launch_args: Arc::new(|_| {}),
        }
    }
}

/// Live set of global subscriptions. The only component with process-wide
/// lifecycle state.
pub struct Session {
    subscriptions: Vec<BusSubscription>,
    _debouncer: Debouncer,
}

impl Session {
    pub fn start(ctx: &BridgeContext, hooks: SessionHooks) -> Session {
        let SessionHooks {
            on_change_detected,
            on_launch_args,
        } = hooks;

        let debouncer = Debouncer::new(ctx.config.debounce_window, move || on_change_detected());
        let mut subscriptions = Vec::new();

        let logs = ctx.logs.clone();
        subscriptions.push(ctx.bus.subscribe(CHANNEL_LOG_STREAM, move |payload| {
            match ChannelEvent::decode(CHANNEL_LOG_STREAM, payload) {
                ChannelEvent::Log(event) => logs.add(event),
                other => tracing::warn!("dropping undecodable log event: {other:?}"),
            }
        }));

        let reload = debouncer.handle();
        subscriptions.push(ctx.bus.subscribe(CHANNEL_STORE_EVENT, move |payload| {
            match ChannelEvent::decode(CHANNEL_STORE_EVENT, payload) {
                ChannelEvent::StoreMutation(_) => reload.trigger(),
                other => tracing::warn!("dropping undecodable store event: {other:?}"),
            }
        }));

        subscriptions.push(ctx.bus.subscribe(CHANNEL_LAUNCH_ARGS, move |payload| {
            match ChannelEvent::decode(CHANNEL_LAUNCH_ARGS, payload) {
                ChannelEvent::LaunchArgs(event) => {
                    if !event.args.is_empty() {
                        on_launch_args(event);
                    }
                }
                other => tracing::warn!("dropping undecodable launch event: {other:?}"),
            }
        }));

        // Tell the backend the UI is wired up and ready to receive events.
        ctx.bus.emit(CHANNEL_READY, Value::Null);
        tracing::debug!("session listeners ready");

        Session {
            subscriptions,
            _debouncer: debouncer,
        }
    }

    pub fn teardown(self) {
        // Drop does the actual work.
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        for subscription in self.subscriptions.drain(..) {
            subscription.unsubscribe();
        }
    }
}

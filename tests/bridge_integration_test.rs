//! End-to-end bridge flows against a simulated backend process.

mod common;

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use tokio_test::assert_ok;
use uuid::Uuid;

use atelier_bridge::bus::event_types::CHANNEL_LOG_STREAM;
use atelier_bridge::domain::{LogEvent, LogLevel, PackageState};
use atelier_bridge::driver::BackendDriver;
use atelier_bridge::{BridgeConfig, BridgeContext, Session, SessionHooks};
use common::MockBackend;

fn test_context() -> BridgeContext {
    BridgeContext::new(BridgeConfig {
        heartbeat_window: Duration::from_millis(2000),
        log_capacity: 50,
        debounce_window: Duration::from_millis(200),
    })
}

#[tokio::test(start_paused = true)]
async fn long_operation_survives_on_heartbeats() {
    let ctx = test_context();
    // 7s of work against a 2s window, kept alive by a beat every second.
    let backend = Arc::new(MockBackend::new(
        ctx.bus.clone(),
        Duration::from_secs(7),
        Some(Duration::from_secs(1)),
    ));

    let package_id = Uuid::from_u128(42);
    let handle = ctx.install_package(backend.clone(), package_id);
    assert_eq!(ctx.pending.len(), 1);

    let result = handle.wait().await.unwrap();
    assert_eq!(result, json!({ "installed": package_id.to_string() }));
    assert!(ctx.pending.is_empty());
    assert!(backend.cancelled_ids().is_empty());
}

#[tokio::test(start_paused = true)]
async fn stalled_backend_times_out_and_receives_cancel() {
    let ctx = test_context();
    let backend = Arc::new(MockBackend::new(
        ctx.bus.clone(),
        Duration::from_secs(7),
        None,
    ));

    let handle = ctx.render_project(backend.clone(), Uuid::from_u128(7));
    let id = handle.id();

    let err = handle.wait().await.unwrap_err();
    assert!(err.is_timeout());
    assert_eq!(backend.cancelled_ids(), vec![id.to_string()]);
    assert!(ctx.pending.is_empty());
}

#[tokio::test(start_paused = true)]
async fn navigation_away_cancels_everything_in_flight() {
    let ctx = test_context();
    let backend = Arc::new(MockBackend::new(
        ctx.bus.clone(),
        Duration::from_secs(7),
        None,
    ));

    let install = ctx.install_package(backend.clone(), Uuid::from_u128(1));
    let render = ctx.render_project(backend.clone(), Uuid::from_u128(2));
    assert_eq!(ctx.pending.len(), 2);

    assert_eq!(ctx.shutdown(), 2);
    assert!(install.wait().await.unwrap_err().is_cancelled());
    assert!(render.wait().await.unwrap_err().is_cancelled());
    assert!(ctx.pending.is_empty());
    assert_eq!(backend.cancelled_ids().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn session_mirrors_backend_state_into_stores() {
    let ctx = test_context();
    let backend = Arc::new(MockBackend::new(
        ctx.bus.clone(),
        Duration::from_secs(1),
        Some(Duration::from_millis(500)),
    ));
    let _session = Session::start(&ctx, SessionHooks::default());

    // Backend pushes a log line once the UI says it is ready.
    ctx.bus.emit(
        CHANNEL_LOG_STREAM,
        serde_json::to_value(LogEvent::new(LogLevel::Info, "index refreshed")).unwrap(),
    );
    assert_eq!(ctx.logs.len(), 1);

    assert_ok!(ctx.refresh_snapshots(backend.as_ref()).await);
    let packages = ctx.packages.get();
    assert_eq!(packages.len(), 1);
    assert_eq!(packages[0].state, PackageState::Available);
    assert_eq!(ctx.operations.get().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn create_project_round_trip() {
    let ctx = test_context();
    let backend = Arc::new(MockBackend::new(
        ctx.bus.clone(),
        Duration::from_millis(1500),
        Some(Duration::from_millis(700)),
    ));

    let handle = ctx.create_project(backend.clone(), "new sculpt".to_string());
    let project_id = handle.wait().await.unwrap();

    ctx.selection.set(vec![project_id]);
    assert_eq!(ctx.selection.latest(), Some(project_id));
    let dyn_backend: &dyn BackendDriver = backend.as_ref();
    assert_eq!(dyn_backend.list_projects().await.unwrap().len(), 1);
}

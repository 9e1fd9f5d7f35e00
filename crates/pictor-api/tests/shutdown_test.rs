//! Graceful shutdown: in-flight flows finish, stragglers are cut off after the grace period.
//!
//! Run with: `cargo test -p pictor-api --test shutdown_test`

mod helpers;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use helpers::{fixtures, FakeMetadataStore, FakeStorage};
use pictor_api::setup::server::serve_with_drain;
use pictor_api::setup::{routes, services::build_state};
use pictor_api::CompensationPolicy;
use serde_json::{json, Value};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

struct RunningServer {
    addr: SocketAddr,
    storage: FakeStorage,
    metadata: FakeMetadataStore,
    shutdown: CancellationToken,
    signal: oneshot::Sender<()>,
    handle: JoinHandle<std::io::Result<()>>,
}

async fn spawn_server(grace: Duration) -> RunningServer {
    let storage = FakeStorage::new();
    let metadata = FakeMetadataStore::new();
    let shutdown = CancellationToken::new();
    let state = build_state(
        Arc::new(storage.clone()),
        Arc::new(metadata.clone()),
        CompensationPolicy::None,
        Duration::from_secs(30),
        shutdown.clone(),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (signal, received) = oneshot::channel::<()>();
    let handle = tokio::spawn(serve_with_drain(
        listener,
        routes::app_routes(state),
        shutdown.clone(),
        grace,
        async {
            let _ = received.await;
        },
    ));

    RunningServer {
        addr,
        storage,
        metadata,
        shutdown,
        signal,
        handle,
    }
}

/// Persist "old", then start replacing it with an upload that takes 200 ms.
async fn start_slow_update(server: &RunningServer) -> JoinHandle<(u16, Value)> {
    let base = format!("http://{}", server.addr);

    server.storage.queue_remote_id("old");
    let response = reqwest::Client::new()
        .post(format!("{}/persist-image", base))
        .json(&json!({ "title": "cat", "image": fixtures::DATA_URI_PNG }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 201);

    server.storage.queue_remote_id("new");
    server.storage.delay_upload(Duration::from_millis(200));

    let update = tokio::spawn(async move {
        let response = reqwest::Client::new()
            .put(format!("{}/update-image/old", base))
            .json(&json!({ "title": "dog", "image": fixtures::DATA_URI_PNG }))
            .send()
            .await
            .unwrap();
        let status = response.status().as_u16();
        (status, response.json::<Value>().await.unwrap())
    });

    // Let the request reach the upload step.
    tokio::time::sleep(Duration::from_millis(50)).await;
    update
}

#[tokio::test]
async fn test_in_flight_update_completes_after_signal() {
    let server = spawn_server(Duration::from_secs(5)).await;
    let update = start_slow_update(&server).await;

    server.signal.send(()).unwrap();
    assert!(!server.shutdown.is_cancelled());

    let (status, body) = update.await.unwrap();
    assert_eq!(status, 201);
    assert_eq!(body["data"]["message"], "Image Updated Successfully");
    assert!(!server.storage.has_asset("old"));
    assert!(server.storage.has_asset("new"));
    assert!(server.metadata.row("new").is_some());
    assert!(server.metadata.row("old").is_none());

    server.handle.await.unwrap().unwrap();
    assert!(server.shutdown.is_cancelled());
}

#[tokio::test]
async fn test_requests_past_grace_period_are_cancelled() {
    let server = spawn_server(Duration::from_millis(20)).await;
    let update = start_slow_update(&server).await;

    server.signal.send(()).unwrap();

    let (status, body) = update.await.unwrap();
    assert_eq!(status, 500);
    assert_eq!(body["message"], "failed");
    assert_eq!(body["err"]["code"], "CANCELLED");

    server.handle.await.unwrap().unwrap();
    assert!(server.shutdown.is_cancelled());
}

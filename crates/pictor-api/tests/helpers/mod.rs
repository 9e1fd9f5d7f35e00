//! Test helpers: build the lifecycle service and router over in-memory fakes.
//!
//! Run from workspace root: `cargo test -p pictor-api`.

#![allow(dead_code)]

pub mod fakes;
pub mod fixtures;

use std::sync::Arc;
use std::time::Duration;

use axum_test::TestServer;
use pictor_api::setup::{routes, services::build_state};
use pictor_api::{CompensationPolicy, ImageLifecycleService};
use tokio_util::sync::CancellationToken;

pub use fakes::{url_for, FakeMetadataStore, FakeStorage};

pub struct TestApp {
    pub server: TestServer,
    pub storage: FakeStorage,
    pub metadata: FakeMetadataStore,
    pub shutdown: CancellationToken,
}

pub fn lifecycle(policy: CompensationPolicy) -> (ImageLifecycleService, FakeStorage, FakeMetadataStore) {
    let storage = FakeStorage::new();
    let metadata = FakeMetadataStore::new();
    let service =
        ImageLifecycleService::new(Arc::new(storage.clone()), Arc::new(metadata.clone()), policy);
    (service, storage, metadata)
}

pub fn setup_test_app() -> TestApp {
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
    let server = TestServer::new(routes::app_routes(state)).expect("Failed to build test server");

    TestApp {
        server,
        storage,
        metadata,
        shutdown,
    }
}

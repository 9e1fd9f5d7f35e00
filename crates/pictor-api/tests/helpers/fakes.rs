//! In-memory media host and metadata store with failure injection.
//!
//! Both record every call they receive so tests can assert on ordering.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use pictor_core::models::{
    AssetDescriptor, DestroyOutcome, ImageRecord, ImageSource, ImageUpdate, NewImage,
};
use pictor_core::{AppError, Deadline, DeadlineError, MediaBackend};
use pictor_db::ImageMetadataStore;
use pictor_storage::{Storage, StorageError, StorageResult};
use tokio_util::sync::CancellationToken;

#[derive(Default)]
struct StorageState {
    assets: HashMap<String, String>,
    calls: Vec<String>,
    queued_ids: VecDeque<String>,
    next_id: u64,
    fail_upload: bool,
    fail_destroy: bool,
    upload_delay: Option<Duration>,
}

#[derive(Clone, Default)]
pub struct FakeStorage {
    state: Arc<Mutex<StorageState>>,
}

impl FakeStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `remote_id` for the next upload instead of a generated one.
    pub fn queue_remote_id(&self, remote_id: &str) {
        self.state
            .lock()
            .unwrap()
            .queued_ids
            .push_back(remote_id.to_string());
    }

    pub fn insert_asset(&self, remote_id: &str) {
        self.state
            .lock()
            .unwrap()
            .assets
            .insert(remote_id.to_string(), url_for(remote_id));
    }

    pub fn fail_upload(&self) {
        self.state.lock().unwrap().fail_upload = true;
    }

    pub fn fail_destroy(&self) {
        self.state.lock().unwrap().fail_destroy = true;
    }

    pub fn delay_upload(&self, delay: Duration) {
        self.state.lock().unwrap().upload_delay = Some(delay);
    }

    pub fn has_asset(&self, remote_id: &str) -> bool {
        self.state.lock().unwrap().assets.contains_key(remote_id)
    }

    pub fn asset_count(&self) -> usize {
        self.state.lock().unwrap().assets.len()
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }
}

pub fn url_for(remote_id: &str) -> String {
    format!("https://host/{}.jpg", remote_id)
}

#[async_trait]
impl Storage for FakeStorage {
    async fn upload(
        &self,
        source: ImageSource,
        deadline: &Deadline,
    ) -> StorageResult<AssetDescriptor> {
        let delay = {
            let mut state = self.state.lock().unwrap();
            state.calls.push(format!("upload:{}", source.kind()));
            state.upload_delay
        };

        deadline
            .run(async {
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
            })
            .await?;

        let mut state = self.state.lock().unwrap();
        if state.fail_upload {
            return Err(StorageError::Rejected {
                status: 400,
                message: "Invalid image file".to_string(),
            });
        }

        let remote_id = match state.queued_ids.pop_front() {
            Some(id) => id,
            None => {
                state.next_id += 1;
                format!("img_{}", state.next_id)
            }
        };
        let url = url_for(&remote_id);
        state.assets.insert(remote_id.clone(), url.clone());
        Ok(AssetDescriptor::new(remote_id, url))
    }

    async fn destroy(&self, remote_id: &str, deadline: &Deadline) -> StorageResult<DestroyOutcome> {
        self.state
            .lock()
            .unwrap()
            .calls
            .push(format!("destroy:{}", remote_id));
        deadline.run(async {}).await?;

        let mut state = self.state.lock().unwrap();
        if state.fail_destroy {
            return Err(StorageError::DeleteFailed("connection reset".to_string()));
        }
        Ok(match state.assets.remove(remote_id) {
            Some(_) => DestroyOutcome::ok(),
            None => DestroyOutcome::not_found(),
        })
    }

    fn backend_type(&self) -> MediaBackend {
        MediaBackend::Cloudinary
    }
}

#[derive(Default)]
struct MetadataState {
    rows: HashMap<String, ImageRecord>,
    calls: Vec<String>,
    next_id: i64,
    fail_insert: bool,
    fail_find: bool,
    fail_update: bool,
    fail_delete: bool,
    fail_ping: bool,
    cancel_on_insert: Option<CancellationToken>,
}

#[derive(Clone, Default)]
pub struct FakeMetadataStore {
    state: Arc<Mutex<MetadataState>>,
}

impl FakeMetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_insert(&self) {
        self.state.lock().unwrap().fail_insert = true;
    }

    /// Simulate shutdown arriving while the insert is in flight.
    pub fn cancel_on_insert(&self, token: CancellationToken) {
        self.state.lock().unwrap().cancel_on_insert = Some(token);
    }

    pub fn fail_find(&self) {
        self.state.lock().unwrap().fail_find = true;
    }

    pub fn fail_update(&self) {
        self.state.lock().unwrap().fail_update = true;
    }

    pub fn fail_delete(&self) {
        self.state.lock().unwrap().fail_delete = true;
    }

    pub fn fail_ping(&self) {
        self.state.lock().unwrap().fail_ping = true;
    }

    pub fn row(&self, remote_id: &str) -> Option<ImageRecord> {
        self.state.lock().unwrap().rows.get(remote_id).cloned()
    }

    pub fn row_count(&self) -> usize {
        self.state.lock().unwrap().rows.len()
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }
}

fn unavailable() -> AppError {
    AppError::Database(sqlx::Error::PoolTimedOut)
}

#[async_trait]
impl ImageMetadataStore for FakeMetadataStore {
    async fn insert(
        &self,
        image: NewImage<'_>,
        _deadline: &Deadline,
    ) -> Result<ImageRecord, AppError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("insert:{}", image.remote_id));
        if state.fail_insert {
            return Err(unavailable());
        }
        if let Some(token) = &state.cancel_on_insert {
            token.cancel();
            return Err(AppError::Interrupted(DeadlineError::Cancelled));
        }
        state.next_id += 1;
        let now = Utc::now();
        let record = ImageRecord {
            id: state.next_id,
            title: image.title.to_string(),
            remote_id: image.remote_id.to_string(),
            url: image.url.to_string(),
            created_at: now,
            updated_at: now,
        };
        state.rows.insert(record.remote_id.clone(), record.clone());
        Ok(record)
    }

    async fn find_by_remote_id(
        &self,
        remote_id: &str,
        _deadline: &Deadline,
    ) -> Result<Option<ImageRecord>, AppError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("find:{}", remote_id));
        if state.fail_find {
            return Err(unavailable());
        }
        Ok(state.rows.get(remote_id).cloned())
    }

    async fn update(
        &self,
        remote_id: &str,
        update: ImageUpdate<'_>,
        _deadline: &Deadline,
    ) -> Result<u64, AppError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("update:{}", remote_id));
        if state.fail_update {
            return Err(unavailable());
        }
        let Some(mut record) = state.rows.remove(remote_id) else {
            return Ok(0);
        };
        record.title = update.title.to_string();
        record.remote_id = update.remote_id.to_string();
        record.url = update.url.to_string();
        record.updated_at = Utc::now();
        state.rows.insert(record.remote_id.clone(), record);
        Ok(1)
    }

    async fn delete(&self, remote_id: &str, _deadline: &Deadline) -> Result<u64, AppError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("delete:{}", remote_id));
        if state.fail_delete {
            return Err(unavailable());
        }
        Ok(state.rows.remove(remote_id).map_or(0, |_| 1))
    }

    async fn ping(&self, _deadline: &Deadline) -> Result<(), AppError> {
        if self.state.lock().unwrap().fail_ping {
            return Err(unavailable());
        }
        Ok(())
    }
}

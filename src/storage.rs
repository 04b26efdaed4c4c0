use crate::activity::ActivityLog;
use crate::errors::StoreError;
use std::{
    collections::BTreeMap,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, warn};

/// Key under which the whole activity log is stored as one JSON blob.
pub const CALENDAR_KEY: &str = "calendar-workouts";

/// Synchronous string store. The log is always read and written whole.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Keeps every key in a single JSON object file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StoreError> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(err.into()),
        }
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut values = match self.read_all() {
            Ok(values) => values,
            Err(StoreError::Json(err)) => {
                warn!("replacing unreadable store file {}: {err}", self.path.display());
                BTreeMap::new()
            }
            Err(err) => return Err(err),
        };
        values.insert(key.to_string(), value.to_string());

        let payload = serde_json::to_vec_pretty(&values)?;
        replace_file(&self.path, &payload)
    }
}

// Writes a sibling temp file and renames it over `path`. The temp file never
// outlives a failed write.
fn replace_file(path: &Path, payload: &[u8]) -> Result<(), StoreError> {
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, payload)?;
    if let Err(err) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(err.into());
    }
    Ok(())
}

/// In-process store. Can be told to fail writes.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<BTreeMap<String, String>>,
    failing: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(key: &str, value: &str) -> Self {
        let store = Self::new();
        if let Ok(mut values) = store.values.lock() {
            values.insert(key.to_string(), value.to_string());
        }
        store
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let values = self
            .values
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store poisoned".into()))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("quota exceeded".into()));
        }
        let mut values = self
            .values
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store poisoned".into()))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Reads the saved log. Anything missing or unreadable yields an empty log.
pub fn load_log(store: &dyn KeyValueStore) -> ActivityLog {
    match store.get(CALENDAR_KEY) {
        Ok(Some(blob)) => match serde_json::from_str(&blob) {
            Ok(log) => log,
            Err(err) => {
                error!("failed to parse saved activity log: {err}");
                ActivityLog::default()
            }
        },
        Ok(None) => ActivityLog::default(),
        Err(err) => {
            error!("failed to read saved activity log: {err}");
            ActivityLog::default()
        }
    }
}

pub fn encode_log(log: &ActivityLog) -> Result<String, serde_json::Error> {
    serde_json::to_string(log)
}

struct PersistRequest {
    blob: String,
    ack: Option<oneshot::Sender<bool>>,
}

/// Handle to the background writer.
///
/// Requests are written one at a time in the order they were scheduled.
/// Write failures are logged and dropped; the in-memory log stays
/// authoritative.
#[derive(Clone)]
pub struct Persister {
    tx: mpsc::UnboundedSender<PersistRequest>,
}

impl Persister {
    /// Starts the writer task. Must be called inside a tokio runtime.
    pub fn spawn(store: Arc<dyn KeyValueStore>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<PersistRequest>();
        tokio::spawn(async move {
            while let Some(request) = rx.recv().await {
                let saved = write_blob(Arc::clone(&store), request.blob).await;
                if let Some(ack) = request.ack {
                    let _ = ack.send(saved);
                }
            }
            debug!("persistence writer stopped");
        });
        Self { tx }
    }

    /// Queues a write without waiting for it.
    pub fn schedule(&self, log: &ActivityLog) {
        if let Some(blob) = encode(log) {
            if self.tx.send(PersistRequest { blob, ack: None }).is_err() {
                warn!("persistence writer is gone; change kept in memory only");
            }
        }
    }

    /// Queues a write and waits until it and every earlier write finished.
    pub async fn flush(&self, log: &ActivityLog) -> bool {
        let Some(blob) = encode(log) else {
            return false;
        };
        let (ack, done) = oneshot::channel();
        if self.tx.send(PersistRequest { blob, ack: Some(ack) }).is_err() {
            warn!("persistence writer is gone; manual save skipped");
            return false;
        }
        done.await.unwrap_or(false)
    }
}

fn encode(log: &ActivityLog) -> Option<String> {
    match encode_log(log) {
        Ok(blob) => Some(blob),
        Err(err) => {
            error!("failed to encode activity log: {err}");
            None
        }
    }
}

async fn write_blob(store: Arc<dyn KeyValueStore>, blob: String) -> bool {
    match tokio::task::spawn_blocking(move || store.set(CALENDAR_KEY, &blob)).await {
        Ok(Ok(())) => true,
        Ok(Err(err)) => {
            warn!("failed to persist activity log: {err}");
            false
        }
        Err(err) => {
            warn!("persistence task failed: {err}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::{Entry, save_day};

    fn sample_log() -> ActivityLog {
        save_day(
            &ActivityLog::default(),
            "2025-01-15",
            Entry::new("Workout A", "felt strong"),
        )
    }

    #[test]
    fn file_store_missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("store.json"));
        assert_eq!(store.get(CALENDAR_KEY).unwrap(), None);
        assert_eq!(load_log(&store), ActivityLog::default());
    }

    #[test]
    fn file_store_keeps_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("store.json"));
        store.set("other", "value").unwrap();
        store.set(CALENDAR_KEY, "{}").unwrap();
        assert_eq!(store.get("other").unwrap().as_deref(), Some("value"));
        assert_eq!(store.get(CALENDAR_KEY).unwrap().as_deref(), Some("{}"));
        assert!(!dir.path().join("store.json.tmp").exists());
    }

    #[test]
    fn file_store_round_trips_log() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("store.json"));
        let log = sample_log();
        store.set(CALENDAR_KEY, &encode_log(&log).unwrap()).unwrap();

        let reopened = JsonFileStore::new(store.path());
        assert_eq!(load_log(&reopened), log);
    }

    #[test]
    fn file_store_overwrites_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, b"not json").unwrap();
        let store = JsonFileStore::new(&path);

        assert!(matches!(store.get(CALENDAR_KEY), Err(StoreError::Json(_))));
        assert_eq!(load_log(&store), ActivityLog::default());

        store.set(CALENDAR_KEY, "{}").unwrap();
        assert_eq!(store.get(CALENDAR_KEY).unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn failed_rename_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        // A non-empty directory cannot be replaced by a file.
        let target = dir.path().join("store.json");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep"), b"x").unwrap();

        let result = replace_file(&target, b"{}");
        assert!(matches!(result, Err(StoreError::Io(_))));
        assert!(!dir.path().join("store.json.tmp").exists());
        assert!(target.join("keep").exists());
    }

    #[test]
    fn malformed_blob_falls_back_to_empty_log() {
        for blob in ["", "[1, 2]", "{\"2025-01\": 5}", "{broken"] {
            let store = MemoryStore::with_value(CALENDAR_KEY, blob);
            assert_eq!(load_log(&store), ActivityLog::default(), "{blob}");
        }
    }

    #[test]
    fn saved_blob_is_loaded() {
        let store = MemoryStore::with_value(
            CALENDAR_KEY,
            r#"{"2025-01":{"2025-01-15":{"label":"Workout A","note":"felt strong"}}}"#,
        );
        assert_eq!(load_log(&store), sample_log());
    }

    #[tokio::test]
    async fn persister_writes_in_order() {
        let store = Arc::new(MemoryStore::new());
        let persister = Persister::spawn(store.clone());

        let first = sample_log();
        let second = save_day(&first, "2025-01-16", Entry::new("Workout B", ""));
        persister.schedule(&ActivityLog::default());
        persister.schedule(&first);
        assert!(persister.flush(&second).await);

        assert_eq!(load_log(store.as_ref()), second);
    }

    #[tokio::test]
    async fn persister_swallows_write_failures() {
        let store = Arc::new(MemoryStore::new());
        let persister = Persister::spawn(store.clone());

        store.set_failing(true);
        persister.schedule(&sample_log());
        assert!(!persister.flush(&sample_log()).await);
        assert_eq!(store.get(CALENDAR_KEY).unwrap(), None);

        store.set_failing(false);
        assert!(persister.flush(&sample_log()).await);
        assert_eq!(load_log(store.as_ref()), sample_log());
    }
}

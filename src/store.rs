//! Core store type, shared instance, handle, and builder.

use crate::backend::MapBackend;
use crate::document::{Document, DEFAULT_STORAGE_NAME};
use crate::error::{Error, Result};
use crate::persist;
use crate::serializer::JsonSerializer;
use crate::sync::{SyncPolicy, SyncTrigger, SyncWorker};
use crate::value::{Value, ValueKind};
use crate::{DefaultBackend, DEFAULT_FILE_NAME};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use tracing::{debug, error, warn};

static STANDARD: OnceLock<UserDefaults> = OnceLock::new();

/// Preference store: a JSON document on disk with a key-value section that
/// lives in memory between explicit [`synchronize`](Self::synchronize) calls.
///
/// Most programs just use the process-wide [`standard`](Self::standard)
/// instance. [`open`](Self::open) and [`builder`](Self::builder) give you an
/// explicit handle with its own path and sync policy.
///
/// Reads and writes are thread-safe, and writes to the backing file are
/// serialized. Nothing coordinates with other processes using the same file:
/// the last writer wins.
pub struct UserDefaults<M = DefaultBackend> {
    shared: Arc<Shared<M>>,
    policy: SyncPolicy,
    trigger: Mutex<Option<SyncTrigger>>,
}

// Everything the background worker needs to write the document.
struct Shared<M> {
    map: M,
    storage_name: String,
    path: PathBuf,
    serializer: JsonSerializer,
    write_lock: Mutex<()>,
}

impl<M: MapBackend> Shared<M> {
    fn snapshot(&self) -> Document {
        let mut doc = Document::new(self.storage_name.clone());
        doc.key_value_store.extend(self.map.iter_snapshot());
        doc
    }

    fn write(&self) -> Result<()> {
        // Snapshot under the lock so the last write to land is also the newest.
        let _guard = self.write_lock.lock();
        let doc = self.snapshot();
        persist::save(&self.path, &doc, &self.serializer)?;
        debug!(
            path = %self.path.display(),
            entries = doc.key_value_store.len(),
            "wrote user defaults"
        );
        Ok(())
    }
}

impl UserDefaults<DefaultBackend> {
    /// The shared store for this process, backed by `.userDefaultsStore` in
    /// the current working directory.
    ///
    /// The first call loads the file, or starts an empty store and writes it
    /// when the file is missing or unreadable. Later calls return the same
    /// instance without touching the disk. Never fails.
    ///
    /// The file location is fixed at that first call: changing directory
    /// afterwards doesn't move it.
    pub fn standard() -> &'static UserDefaults {
        STANDARD.get_or_init(|| UserDefaultsBuilder::new(DEFAULT_FILE_NAME).open_store())
    }
}

impl<M> UserDefaults<M>
where
    M: MapBackend + 'static,
{
    /// Open (or create) a store at `path` with manual sync and compact JSON.
    pub fn open(path: impl AsRef<Path>) -> Result<UserDefaultsHandle<M>>
    where
        M: Default,
    {
        Self::builder(path).build()
    }

    /// Start configuring a store. Call [`.build()`](UserDefaultsBuilder::build)
    /// when ready.
    pub fn builder(path: impl AsRef<Path>) -> UserDefaultsBuilder<M>
    where
        M: Default,
    {
        UserDefaultsBuilder::new(path)
    }

    // ---- reads ----

    /// The value stored under `key`.
    pub fn get(&self, key: &str) -> Result<Value> {
        self.shared
            .map
            .get(key)
            .ok_or_else(|| Error::KeyNotFound(key.to_owned()))
    }

    /// The string stored under `key`. Other kinds are not stringified.
    pub fn get_string(&self, key: &str) -> Result<String> {
        self.get_as(key, ValueKind::String, |v| match v {
            Value::String(s) => Some(s),
            _ => None,
        })
    }

    /// The boolean stored under `key`.
    pub fn get_bool(&self, key: &str) -> Result<bool> {
        self.get_as(key, ValueKind::Bool, |v| v.as_bool())
    }

    /// The integer stored under `key`. A whole-valued double also qualifies.
    /// Fractional doubles are not truncated and numeric strings are not
    /// parsed: both are a `TypeMismatch`.
    pub fn get_int(&self, key: &str) -> Result<i64> {
        self.get_as(key, ValueKind::Int, |v| v.as_i64())
    }

    /// The number stored under `key` as a double.
    pub fn get_double(&self, key: &str) -> Result<f64> {
        self.get_as(key, ValueKind::Double, |v| v.as_f64())
    }

    /// Copy of the array stored under `key`, in stored order.
    pub fn get_array(&self, key: &str) -> Result<Vec<Value>> {
        self.get_as(key, ValueKind::Array, |v| match v {
            Value::Array(items) => Some(items),
            _ => None,
        })
    }

    /// Copy of the map stored under `key`.
    pub fn get_map(&self, key: &str) -> Result<HashMap<String, Value>> {
        self.get_as(key, ValueKind::Map, |v| match v {
            Value::Map(entries) => Some(entries.into_iter().collect()),
            _ => None,
        })
    }

    /// `true` if something is stored under `key`.
    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.shared.map.contains_key(key)
    }

    /// Number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shared.map.map_len()
    }

    /// `true` when no keys are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of all keys, in no particular order.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.shared.map.iter_snapshot().map(|(k, _)| k).collect()
    }

    /// Snapshot of the whole key space.
    #[must_use]
    pub fn dictionary_representation(&self) -> HashMap<String, Value> {
        self.shared.map.iter_snapshot().collect()
    }

    /// `storageName` recorded in the document.
    #[must_use]
    pub fn storage_name(&self) -> &str {
        &self.shared.storage_name
    }

    /// Path to the backing file. Relative paths were resolved against the
    /// working directory when the store was opened.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.shared.path
    }

    /// Active sync policy.
    #[must_use]
    pub fn policy(&self) -> &SyncPolicy {
        &self.policy
    }

    // ---- writes ----

    /// Store `value` under `key`, returning what was there before.
    ///
    /// Fails only for doubles JSON can't encode (NaN, infinities), in which
    /// case nothing changes.
    pub fn put(&self, key: impl Into<String>, value: impl Into<Value>) -> Result<Option<Value>> {
        let key = key.into();
        let value = value.into();
        if !value.is_representable() {
            return Err(Error::NonFiniteNumber(key));
        }
        let prev = self.shared.map.insert(key, value);
        self.notify_mutation();
        Ok(prev)
    }

    /// Delete `key`, returning its value. Absent keys are a no-op.
    pub fn remove(&self, key: &str) -> Option<Value> {
        let prev = self.shared.map.remove(key);
        if prev.is_some() {
            self.notify_mutation();
        }
        prev
    }

    /// Drop every key.
    ///
    /// Runs under the write lock, so a concurrent `synchronize` sees either
    /// all keys or none.
    pub fn clear(&self) {
        {
            let _guard = self.shared.write_lock.lock();
            self.shared.map.clear();
        }
        self.notify_mutation();
    }

    // ---- persistence ----

    /// Write the whole document to the backing file.
    ///
    /// Failures are logged and swallowed; the in-memory store is unaffected
    /// either way. Returns `true` when the write succeeded.
    pub fn synchronize(&self) -> bool {
        match self.shared.write() {
            Ok(()) => true,
            Err(e) => {
                error!(path = %self.path().display(), error = %e, "synchronize failed");
                false
            }
        }
    }

    /// Like [`synchronize`](Self::synchronize), but hands the error back
    /// instead of logging it.
    pub fn try_synchronize(&self) -> Result<()> {
        self.shared.write()
    }

    // ---- internal ----

    fn get_as<T>(
        &self,
        key: &str,
        expected: ValueKind,
        convert: impl FnOnce(Value) -> Option<T>,
    ) -> Result<T> {
        let value = self.get(key)?;
        let found = value.kind();
        convert(value).ok_or_else(|| Error::TypeMismatch {
            key: key.to_owned(),
            expected,
            found,
        })
    }

    fn notify_mutation(&self) {
        match &self.policy {
            SyncPolicy::Immediate => {
                self.synchronize();
            }
            SyncPolicy::Periodic(_) => {
                if let Some(t) = self.trigger.lock().as_ref() {
                    let _ = t.try_send(());
                }
            }
            SyncPolicy::Manual => {}
        }
    }
}

impl<M> std::fmt::Debug for UserDefaults<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserDefaults")
            .field("path", &self.shared.path)
            .field("storage_name", &self.shared.storage_name)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Configures and opens a [`UserDefaults`] store.
///
/// ```rust,no_run
/// use user_defaults::{SyncPolicy, UserDefaults};
///
/// let prefs = UserDefaults::<user_defaults::DefaultBackend>::builder("prefs.json")
///     .pretty(true)
///     .policy(SyncPolicy::Immediate)
///     .build()
///     .unwrap();
/// prefs.put("theme", "dark").unwrap();
/// ```
pub struct UserDefaultsBuilder<M> {
    path: PathBuf,
    storage_name: String,
    policy: SyncPolicy,
    pretty: bool,
    _marker: PhantomData<M>,
}

impl<M> UserDefaultsBuilder<M>
where
    M: MapBackend + Default + 'static,
{
    fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            storage_name: DEFAULT_STORAGE_NAME.to_owned(),
            policy: SyncPolicy::Manual,
            pretty: false,
            _marker: PhantomData,
        }
    }

    /// `storageName` for a freshly created document (default:
    /// `standardUserDefaults`). An existing file keeps its own.
    pub fn storage_name(mut self, name: impl Into<String>) -> Self {
        self.storage_name = name.into();
        self
    }

    /// Set the sync policy (default: [`SyncPolicy::Manual`]).
    pub fn policy(mut self, policy: SyncPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Write indented JSON (default: compact).
    pub fn pretty(mut self, yes: bool) -> Self {
        self.pretty = yes;
        self
    }

    /// Load (or create) the store and return a handle.
    ///
    /// Only bad configuration fails here. A missing or corrupt backing file
    /// is logged and replaced by an empty store.
    pub fn build(self) -> Result<UserDefaultsHandle<M>> {
        self.validate()?;
        let interval = match self.policy {
            SyncPolicy::Periodic(interval) => Some(interval),
            _ => None,
        };
        let store = self.open_store();

        let worker = interval.map(|interval| {
            let shared = Arc::clone(&store.shared);
            let (worker, trigger) = SyncWorker::spawn(interval, move || {
                if let Err(e) = shared.write() {
                    error!(path = %shared.path.display(), error = %e, "background sync failed");
                }
            });
            *store.trigger.lock() = Some(trigger);
            worker
        });

        Ok(UserDefaultsHandle {
            inner: store,
            worker,
        })
    }

    fn validate(&self) -> Result<()> {
        if self.path.as_os_str().is_empty() {
            return Err(Error::Config("backing file path is empty".into()));
        }
        if self.policy == SyncPolicy::Periodic(std::time::Duration::ZERO) {
            return Err(Error::Config("periodic sync interval must be non-zero".into()));
        }
        Ok(())
    }

    // Never fails: anything wrong with the file means starting over.
    fn open_store(self) -> UserDefaults<M> {
        let path = resolve_path(self.path);
        let serializer = if self.pretty {
            JsonSerializer::pretty()
        } else {
            JsonSerializer::new()
        };

        let loaded = match persist::load(&path, &serializer) {
            Ok(Some(doc)) => {
                debug!(
                    path = %path.display(),
                    entries = doc.key_value_store.len(),
                    "loaded user defaults"
                );
                Some(doc)
            }
            Ok(None) => {
                debug!(path = %path.display(), "no user defaults file, starting empty");
                None
            }
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "discarding unreadable user defaults file"
                );
                None
            }
        };
        let fresh = loaded.is_none();
        let doc = loaded.unwrap_or_else(|| Document::new(self.storage_name));

        let map = M::default();
        for (k, v) in doc.key_value_store {
            map.insert(k, v);
        }

        let store = UserDefaults {
            shared: Arc::new(Shared {
                map,
                storage_name: doc.storage_name,
                path,
                serializer,
                write_lock: Mutex::new(()),
            }),
            policy: self.policy,
            trigger: Mutex::new(None),
        };
        if fresh {
            store.synchronize();
        }
        store
    }
}

// Relative paths are pinned to the working directory at open time, so a later
// chdir doesn't redirect writes. Left relative if the cwd can't be read.
fn resolve_path(path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        return path;
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "can't resolve working directory");
            path
        }
    }
}

impl<M> std::fmt::Debug for UserDefaultsBuilder<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserDefaultsBuilder")
            .field("path", &self.path)
            .field("storage_name", &self.storage_name)
            .field("policy", &self.policy)
            .field("pretty", &self.pretty)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Handle
// ---------------------------------------------------------------------------

/// Owns a store and, for [`SyncPolicy::Periodic`], its background thread.
///
/// Derefs to [`UserDefaults`]. Dropping it stops the thread after one final
/// write.
pub struct UserDefaultsHandle<M> {
    // Dropped first: releasing the trigger is what tells the worker to stop.
    inner: UserDefaults<M>,
    #[allow(dead_code)]
    worker: Option<SyncWorker>,
}

impl<M> std::ops::Deref for UserDefaultsHandle<M> {
    type Target = UserDefaults<M>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<M> std::fmt::Debug for UserDefaultsHandle<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(&self.inner, f)
    }
}

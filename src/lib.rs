//! Preference-style key-value store persisted as a single JSON document.
//!
//! Grab the shared instance, read and write values by key, and call
//! `synchronize()` when you want the changes on disk.
//!
//! ```rust,no_run
//! use user_defaults::UserDefaults;
//!
//! let defaults = UserDefaults::standard();
//! defaults.put("volume", 11).unwrap();
//! defaults.put("recent", vec!["a.txt", "b.txt"]).unwrap();
//! defaults.synchronize();
//!
//! assert_eq!(defaults.get_int("volume").unwrap(), 11);
//! ```
//!
//! The backing file (`.userDefaultsStore` in the working directory for the
//! shared instance) looks like this:
//!
//! ```json
//! {"storageName":"standardUserDefaults","keyValueStore":{"volume":11}}
//! ```
//!
//! A missing or corrupt file never stops the store from opening: the problem
//! is logged through `tracing` and the store starts out empty.
//!
//! **Single-process only.** Two processes sharing a file will overwrite each
//! other's changes.

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod backend;
pub mod document;
pub mod error;
pub mod persist;
pub mod serializer;
pub mod store;
pub mod sync;
pub mod value;

pub use document::{Document, DEFAULT_STORAGE_NAME};
pub use error::{Error, Result};
pub use store::{UserDefaults, UserDefaultsBuilder, UserDefaultsHandle};
pub use sync::SyncPolicy;
pub use value::{Value, ValueKind};

/// Backing file of the shared instance, relative to the working directory.
pub const DEFAULT_FILE_NAME: &str = ".userDefaultsStore";

/// Default backend: ShardMap.
pub type DefaultBackend = shardmap::ShardMap<String, Value>;

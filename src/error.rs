//! Unified error type for store access and persistence.

use crate::value::ValueKind;

/// Things that can go wrong when using the store.
///
/// Access errors (`KeyNotFound`, `TypeMismatch`) always reach the caller.
/// Persistence errors are logged and swallowed by [`synchronize`] and only
/// surface through [`try_synchronize`].
///
/// [`synchronize`]: crate::UserDefaults::synchronize
/// [`try_synchronize`]: crate::UserDefaults::try_synchronize
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// No value is stored under the key.
    KeyNotFound(String),
    /// A value exists but can't be read as the requested kind.
    TypeMismatch {
        /// Key that was looked up.
        key: String,
        /// Kind the caller asked for.
        expected: ValueKind,
        /// Kind actually stored.
        found: ValueKind,
    },
    /// NaN or an infinite double was given to `put`; JSON can't encode it.
    NonFiniteNumber(String),
    /// File system problem (read, write, rename).
    Io(String),
    /// Failed to serialize the document to bytes.
    Serialize(String),
    /// Failed to deserialize bytes back into a document.
    Deserialize(String),
    /// Bad configuration (empty path, zero interval).
    Config(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::KeyNotFound(key) => write!(f, "key not found: {key:?}"),
            Error::TypeMismatch {
                key,
                expected,
                found,
            } => write!(f, "type mismatch for {key:?}: expected {expected}, found {found}"),
            Error::NonFiniteNumber(key) => {
                write!(f, "non-finite number for {key:?} can't be stored as JSON")
            }
            Error::Io(msg) => write!(f, "i/o error: {msg}"),
            Error::Serialize(msg) => write!(f, "serialization error: {msg}"),
            Error::Deserialize(msg) => write!(f, "deserialization error: {msg}"),
            Error::Config(msg) => write!(f, "config error: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            Error::Io(err.to_string())
        } else if err.is_syntax() || err.is_eof() || err.is_data() {
            Error::Deserialize(err.to_string())
        } else {
            Error::Serialize(err.to_string())
        }
    }
}

/// Result alias using our [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;

//! Document codec. JSON via serde_json, compact or pretty.
//!
//! Implement [`Serializer`] to store the document in another text format.

use crate::document::Document;
use crate::error::{Error, Result};

/// Converts whole documents to and from bytes.
pub trait Serializer: Send + Sync {
    /// Encode the document.
    fn serialize(&self, doc: &Document) -> Result<Vec<u8>>;

    /// Decode a document. Anything that isn't a well-formed document is an
    /// error; the caller decides what to do about it.
    fn deserialize(&self, bytes: &[u8]) -> Result<Document>;
}

/// JSON serializer with optional pretty-printing.
#[derive(Debug, Clone, Default)]
pub struct JsonSerializer {
    pretty: bool,
}

impl JsonSerializer {
    /// Compact JSON, one line.
    pub fn new() -> Self {
        Self::default()
    }

    /// Indented JSON, easier to read and diff by hand.
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl Serializer for JsonSerializer {
    fn serialize(&self, doc: &Document) -> Result<Vec<u8>> {
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(doc)
        } else {
            serde_json::to_vec(doc)
        };
        bytes.map_err(|e| Error::Serialize(e.to_string()))
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<Document> {
        serde_json::from_slice(bytes).map_err(Error::from)
    }
}

//! # vantage-storage
//!
//! Document storage for Vantage.
//!
//! This crate provides:
//! - [`DocumentStore`]: the keyed, schemaless document store abstraction
//! - [`FirestoreStore`]: Cloud Firestore over its REST API (or the emulator)
//! - [`MemoryStore`]: in-memory storage (local development and tests)
//! - [`ProfileStore`] / [`ProfileRepository`]: typed access to profile
//!   documents, validated into closed enums on read

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod error;
pub mod firestore;
pub mod memory;
pub mod profile;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use error::{Error, Result};
pub use firestore::FirestoreStore;
pub use memory::MemoryStore;
pub use profile::{ProfileRepository, ProfileStore};

/// A stored document: its id within the collection and its fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Document id.
    pub id: String,

    /// Document fields.
    pub data: Map<String, Value>,
}

impl Document {
    /// The document as a single JSON object with `id` added.
    pub fn into_json(self) -> Value {
        let mut data = self.data;
        data.insert("id".to_string(), Value::String(self.id));
        Value::Object(data)
    }
}

/// Longest document id Firestore accepts, in bytes.
pub const MAX_DOCUMENT_ID_BYTES: usize = 1500;

/// Whether `id` names exactly one document directly inside a collection.
///
/// Rejects empty ids, `.` and `..`, ids containing `/`, reserved
/// `__name__`-style ids and ids over [`MAX_DOCUMENT_ID_BYTES`].
pub fn is_valid_document_id(id: &str) -> bool {
    !id.is_empty()
        && id != "."
        && id != ".."
        && !id.contains('/')
        && !(id.len() > 4 && id.starts_with("__") && id.ends_with("__"))
        && id.len() <= MAX_DOCUMENT_ID_BYTES
}

pub(crate) fn check_document_id(collection: &str, id: &str) -> Result<()> {
    if is_valid_document_id(id) {
        Ok(())
    } else {
        Err(Error::invalid(collection, id, "not a valid document id"))
    }
}

/// A keyed document store organised in collections.
///
/// One attempt per call; no retries. Ids failing [`is_valid_document_id`]
/// never reach the backend: `get` answers `Ok(None)`, writes fail with
/// [`Error::InvalidDocument`].
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Point read by id. `Ok(None)` when the document does not exist.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>>;

    /// Create a document, failing with [`Error::AlreadyExists`] if the id
    /// is taken.
    async fn create(&self, collection: &str, id: &str, data: Map<String, Value>) -> Result<()>;

    /// Create or fully overwrite a document.
    async fn set(&self, collection: &str, id: &str, data: Map<String, Value>) -> Result<()>;

    /// Create a document under a generated id.
    async fn add(&self, collection: &str, data: Map<String, Value>) -> Result<Document>;

    /// Every document in a collection.
    async fn list(&self, collection: &str) -> Result<Vec<Document>>;

    /// Up to `limit` documents whose `field` equals `value`.
    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
        limit: usize,
    ) -> Result<Vec<Document>>;

    /// Backend name, for logging.
    fn name(&self) -> &str;
}

//! # Persistence Gateway
//!
//! The narrow document-store contract the request handlers depend on,
//! the identifier codec, the equality filter type, and an in-process
//! implementation of the contract.
//!
//! Every operation is an `async fn` awaited directly inside the request
//! that issued it, so dropping the request future (client disconnect,
//! request timeout) abandons the store call with it.

pub mod document;
pub mod errors;
pub mod filter;
pub mod memory;
pub mod object_id;

use async_trait::async_trait;
use futures_util::stream::BoxStream;
use serde_json::{Map, Value};

pub use document::Document;
pub use errors::{IdError, StoreError, StoreResult};
pub use filter::{Filter, FilterValue, ID_FIELD};
pub use memory::{MemoryCollection, MemoryStore};
pub use object_id::ObjectId;

/// Stream of documents produced by [`Collection::find`]
pub type DocumentStream = BoxStream<'static, StoreResult<Document>>;

/// One named collection of documents.
///
/// Implementations must be safe for concurrent use by many in-flight
/// requests, and must enforce declared unique indexes themselves.
#[async_trait]
pub trait Collection: Send + Sync {
    /// All documents matching the filter, in identifier order
    async fn find(&self, filter: &Filter) -> StoreResult<DocumentStream>;

    /// First document matching the filter
    async fn find_one(&self, filter: &Filter) -> StoreResult<Option<Document>>;

    /// Insert a document, returning its identifier
    async fn insert_one(&self, doc: Document) -> StoreResult<ObjectId>;

    /// Insert several documents atomically.
    ///
    /// Either every document becomes visible or none does.
    async fn insert_many(&self, docs: Vec<Document>) -> StoreResult<Vec<ObjectId>>;

    /// Overwrite the given fields on the first matching document.
    ///
    /// Returns the number of documents matched (0 or 1).
    async fn update_one(&self, filter: &Filter, set: Map<String, Value>) -> StoreResult<u64>;

    /// Replace every field of the first matching document.
    ///
    /// Fields absent from `fields` are removed; the identifier is kept.
    /// Returns the number of documents matched (0 or 1).
    async fn replace_one(&self, filter: &Filter, fields: Map<String, Value>) -> StoreResult<u64>;

    /// Delete the first matching document, returning the deleted count
    async fn delete_one(&self, filter: &Filter) -> StoreResult<u64>;

    /// Declare a field whose values must be unique across the collection
    async fn create_unique_index(&self, field: &str) -> StoreResult<()>;
}

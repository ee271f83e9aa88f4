//! # In-Process Document Store
//!
//! A [`Collection`] kept in memory behind a `tokio` read/write lock.
//! Unique indexes are checked under the write lock, so two concurrent
//! inserts of the same key cannot both succeed.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures_util::stream::{self, StreamExt};
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use super::document::Document;
use super::errors::{StoreError, StoreResult};
use super::filter::{Filter, ID_FIELD};
use super::object_id::ObjectId;
use super::{Collection, DocumentStream};

/// Named collections grouped by database
#[derive(Debug, Default)]
pub struct MemoryStore {
    target: String,
    collections: Mutex<HashMap<(String, String), Arc<MemoryCollection>>>,
}

impl MemoryStore {
    /// Create a store for the given connection target (used for logging only)
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            collections: Mutex::new(HashMap::new()),
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// Get or create a collection
    pub fn collection(&self, database: &str, name: &str) -> Arc<MemoryCollection> {
        let mut collections = self
            .collections
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        collections
            .entry((database.to_string(), name.to_string()))
            .or_insert_with(|| Arc::new(MemoryCollection::new(name)))
            .clone()
    }
}

#[derive(Debug, Default)]
struct Inner {
    /// Documents keyed by identifier, which keeps creation order
    docs: BTreeMap<ObjectId, Map<String, Value>>,

    /// Fields with a unique index
    unique: Vec<String>,
}

impl Inner {
    fn to_document(id: &ObjectId, fields: &Map<String, Value>) -> Document {
        Document::new(*id, fields.clone())
    }

    fn first_match(&self, filter: &Filter) -> Option<ObjectId> {
        self.docs
            .iter()
            .find(|(id, fields)| filter.matches(&Self::to_document(id, fields)))
            .map(|(id, _)| *id)
    }

    /// Check the unique indexes for `fields` stored under `id`, ignoring the
    /// document currently stored under that same id.
    fn check_unique(&self, id: &ObjectId, fields: &Map<String, Value>) -> StoreResult<()> {
        for field in &self.unique {
            let Some(value) = fields.get(field) else {
                continue;
            };
            let taken = self
                .docs
                .iter()
                .any(|(other, existing)| other != id && existing.get(field) == Some(value));
            if taken {
                return Err(StoreError::DuplicateKey {
                    field: field.clone(),
                });
            }
        }
        Ok(())
    }
}

/// A single in-memory collection
#[derive(Debug)]
pub struct MemoryCollection {
    name: String,
    inner: RwLock<Inner>,
}

impl MemoryCollection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inner: RwLock::new(Inner::default()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of stored documents
    pub async fn len(&self) -> usize {
        self.inner.read().await.docs.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl Collection for MemoryCollection {
    async fn find(&self, filter: &Filter) -> StoreResult<DocumentStream> {
        let inner = self.inner.read().await;
        let matched: Vec<StoreResult<Document>> = inner
            .docs
            .iter()
            .map(|(id, fields)| Inner::to_document(id, fields))
            .filter(|doc| filter.matches(doc))
            .map(Ok)
            .collect();
        Ok(stream::iter(matched).boxed())
    }

    async fn find_one(&self, filter: &Filter) -> StoreResult<Option<Document>> {
        let inner = self.inner.read().await;
        Ok(inner
            .first_match(filter)
            .and_then(|id| inner.docs.get(&id).map(|f| Inner::to_document(&id, f))))
    }

    async fn insert_one(&self, doc: Document) -> StoreResult<ObjectId> {
        let mut inner = self.inner.write().await;
        if inner.docs.contains_key(&doc.id) {
            return Err(StoreError::DuplicateKey {
                field: ID_FIELD.to_string(),
            });
        }
        inner.check_unique(&doc.id, &doc.fields)?;
        inner.docs.insert(doc.id, doc.fields);
        Ok(doc.id)
    }

    async fn insert_many(&self, docs: Vec<Document>) -> StoreResult<Vec<ObjectId>> {
        let mut inner = self.inner.write().await;

        // Check the whole batch, against the store and against itself,
        // before anything is written.
        for (i, doc) in docs.iter().enumerate() {
            let earlier = &docs[..i];
            if inner.docs.contains_key(&doc.id) || earlier.iter().any(|d| d.id == doc.id) {
                return Err(StoreError::DuplicateKey {
                    field: ID_FIELD.to_string(),
                });
            }
            inner.check_unique(&doc.id, &doc.fields)?;
            for field in &inner.unique {
                if let Some(value) = doc.fields.get(field) {
                    if earlier.iter().any(|d| d.fields.get(field) == Some(value)) {
                        return Err(StoreError::DuplicateKey {
                            field: field.clone(),
                        });
                    }
                }
            }
        }

        let ids = docs.iter().map(|d| d.id).collect();
        for doc in docs {
            inner.docs.insert(doc.id, doc.fields);
        }
        Ok(ids)
    }

    async fn update_one(&self, filter: &Filter, set: Map<String, Value>) -> StoreResult<u64> {
        let mut inner = self.inner.write().await;
        let Some(id) = inner.first_match(filter) else {
            return Ok(0);
        };

        let mut updated = inner.docs.get(&id).cloned().unwrap_or_default();
        for (key, value) in set {
            if key != ID_FIELD {
                updated.insert(key, value);
            }
        }
        inner.check_unique(&id, &updated)?;
        inner.docs.insert(id, updated);
        Ok(1)
    }

    async fn replace_one(
        &self,
        filter: &Filter,
        mut fields: Map<String, Value>,
    ) -> StoreResult<u64> {
        let mut inner = self.inner.write().await;
        let Some(id) = inner.first_match(filter) else {
            return Ok(0);
        };

        fields.remove(ID_FIELD);
        inner.check_unique(&id, &fields)?;
        inner.docs.insert(id, fields);
        Ok(1)
    }

    async fn delete_one(&self, filter: &Filter) -> StoreResult<u64> {
        let mut inner = self.inner.write().await;
        match inner.first_match(filter) {
            Some(id) => {
                inner.docs.remove(&id);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn create_unique_index(&self, field: &str) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        if inner.unique.iter().any(|f| f == field) {
            return Ok(());
        }

        let mut seen: Vec<&Value> = Vec::new();
        for fields in inner.docs.values() {
            if let Some(value) = fields.get(field) {
                if seen.contains(&value) {
                    return Err(StoreError::DuplicateKey {
                        field: field.to_string(),
                    });
                }
                seen.push(value);
            }
        }

        inner.unique.push(field.to_string());
        Ok(())
    }
}

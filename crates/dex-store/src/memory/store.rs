use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use arc_swap::ArcSwap;
use bson::oid::ObjectId;
use dex_core::{Bson, Deadline, Document, DocumentStore, Pokemon, StoreError};
use dex_query::{Expression, matches, parse_filter};
use imbl::Vector;
use tracing::debug;

use super::pipeline;
use crate::provision::Provision;

pub(crate) type Collection = Vector<Document>;

/// In-process document store.
///
/// Readers work on a snapshot of a collection, so a concurrent import never
/// shows a half-applied batch. Writers are serialized by `write_lock`.
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Arc<ArcSwap<Collection>>>>,
    write_lock: Mutex<()>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
            write_lock: Mutex::new(()),
        }
    }

    /// Current contents of `name`. A missing collection reads as empty.
    fn snapshot(&self, name: &str) -> Result<Collection, StoreError> {
        let collections = self
            .collections
            .read()
            .map_err(|e| StoreError::Backend(format!("collection map poisoned: {e}")))?;
        Ok(collections
            .get(name)
            .map(|c| (**c.load()).clone())
            .unwrap_or_default())
    }

    fn handle(&self, name: &str) -> Result<(Arc<ArcSwap<Collection>>, bool), StoreError> {
        let mut collections = self
            .collections
            .write()
            .map_err(|e| StoreError::Backend(format!("collection map poisoned: {e}")))?;
        if let Some(existing) = collections.get(name) {
            return Ok((existing.clone(), false));
        }
        let created = Arc::new(ArcSwap::from_pointee(Collection::new()));
        collections.insert(name.to_string(), created.clone());
        Ok((created, true))
    }

    fn matching(
        &self,
        collection: &str,
        filter: &Document,
        deadline: Deadline,
    ) -> Result<Vec<Document>, StoreError> {
        deadline.remaining()?;
        let predicate = compile(filter)?;
        let docs = self.snapshot(collection)?;
        let matched: Vec<Document> = docs
            .iter()
            .filter(|doc| predicate.as_ref().is_none_or(|expr| matches(doc, expr)))
            .cloned()
            .collect();
        deadline.remaining()?;
        Ok(matched)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// An empty filter matches every document.
pub(crate) fn compile(filter: &Document) -> Result<Option<Expression>, StoreError> {
    if filter.is_empty() {
        return Ok(None);
    }
    parse_filter(filter)
        .map(Some)
        .map_err(|e| StoreError::InvalidQuery(e.to_string()))
}

fn decode(doc: Document) -> Result<Pokemon, StoreError> {
    bson::from_document(doc).map_err(|e| StoreError::Decode(e.to_string()))
}

impl DocumentStore for MemoryStore {
    fn find(
        &self,
        collection: &str,
        filter: Document,
        deadline: Deadline,
    ) -> Result<Vec<Pokemon>, StoreError> {
        self.matching(collection, &filter, deadline)?
            .into_iter()
            .map(decode)
            .collect()
    }

    fn find_one(
        &self,
        collection: &str,
        filter: Document,
        deadline: Deadline,
    ) -> Result<Option<Pokemon>, StoreError> {
        deadline.remaining()?;
        let predicate = compile(&filter)?;
        let docs = self.snapshot(collection)?;
        docs.iter()
            .find(|doc| predicate.as_ref().is_none_or(|expr| matches(doc, expr)))
            .cloned()
            .map(decode)
            .transpose()
    }

    fn count(
        &self,
        collection: &str,
        filter: Document,
        deadline: Deadline,
    ) -> Result<u64, StoreError> {
        Ok(self.matching(collection, &filter, deadline)?.len() as u64)
    }

    fn distinct(
        &self,
        collection: &str,
        field: &str,
        filter: Document,
        deadline: Deadline,
    ) -> Result<Vec<Bson>, StoreError> {
        let mut values: Vec<Bson> = Vec::new();
        for doc in self.matching(collection, &filter, deadline)? {
            let candidates = match doc.get(field) {
                Some(Bson::Array(items)) => items.clone(),
                Some(value) => vec![value.clone()],
                None => continue,
            };
            for value in candidates {
                if !values.contains(&value) {
                    values.push(value);
                }
            }
        }
        Ok(values)
    }

    fn aggregate(
        &self,
        collection: &str,
        stages: Vec<Document>,
        deadline: Deadline,
    ) -> Result<Vec<Document>, StoreError> {
        let docs = self.matching(collection, &Document::new(), deadline)?;
        let rows = pipeline::run(docs, &stages)?;
        deadline.remaining()?;
        Ok(rows)
    }
}

impl Provision for MemoryStore {
    fn collection_names(&self) -> Result<Vec<String>, StoreError> {
        let collections = self
            .collections
            .read()
            .map_err(|e| StoreError::Backend(format!("collection map poisoned: {e}")))?;
        let mut names: Vec<String> = collections.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    fn ensure_collection(&self, name: &str) -> Result<bool, StoreError> {
        let (_, created) = self.handle(name)?;
        Ok(created)
    }

    fn insert_many(&self, collection: &str, docs: Vec<Document>) -> Result<usize, StoreError> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|e| StoreError::Backend(format!("write lock poisoned: {e}")))?;
        let (handle, _) = self.handle(collection)?;

        let mut data = (**handle.load()).clone();
        let inserted = docs.len();
        for mut doc in docs {
            if !doc.contains_key("_id") {
                doc.insert("_id", ObjectId::new());
            }
            data.push_back(doc);
        }
        handle.store(Arc::new(data));

        debug!(collection, inserted, "memory insert");
        Ok(inserted)
    }

    fn clear(&self, collection: &str) -> Result<(), StoreError> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|e| StoreError::Backend(format!("write lock poisoned: {e}")))?;
        let (handle, _) = self.handle(collection)?;
        handle.store(Arc::new(Vector::new()));
        debug!(collection, "memory clear");
        Ok(())
    }
}

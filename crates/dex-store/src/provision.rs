use dex_core::{Document, DocumentStore, StoreError};

/// Write-side operations used while setting up a store. Requests never reach
/// these; they run before serving or from the import tool.
pub trait Provision: DocumentStore {
    fn collection_names(&self) -> Result<Vec<String>, StoreError>;

    /// Create `name` if it does not exist. Returns `true` when it was created.
    fn ensure_collection(&self, name: &str) -> Result<bool, StoreError>;

    /// Append documents to `collection`, returning how many were inserted.
    fn insert_many(&self, collection: &str, docs: Vec<Document>) -> Result<usize, StoreError>;

    /// Remove every document from `collection`, keeping the collection.
    fn clear(&self, collection: &str) -> Result<(), StoreError>;
}

use bson::{Bson, Document};

use crate::deadline::Deadline;
use crate::error::StoreError;
use crate::record::Pokemon;

/// Read capability over named collections of [`Pokemon`] documents.
///
/// One handle is built at start-up and shared by every request, so
/// implementations must be safe for concurrent use. Each call is given the
/// request's [`Deadline`] and must fail with [`StoreError::Timeout`] rather
/// than run past it.
pub trait DocumentStore: Send + Sync {
    fn find(
        &self,
        collection: &str,
        filter: Document,
        deadline: Deadline,
    ) -> Result<Vec<Pokemon>, StoreError>;

    fn find_one(
        &self,
        collection: &str,
        filter: Document,
        deadline: Deadline,
    ) -> Result<Option<Pokemon>, StoreError>;

    fn count(&self, collection: &str, filter: Document, deadline: Deadline)
    -> Result<u64, StoreError>;

    /// Raw distinct values of `field` among documents matching `filter`.
    fn distinct(
        &self,
        collection: &str,
        field: &str,
        filter: Document,
        deadline: Deadline,
    ) -> Result<Vec<Bson>, StoreError>;

    /// Run an aggregation pipeline and return its raw output rows.
    fn aggregate(
        &self,
        collection: &str,
        pipeline: Vec<Document>,
        deadline: Deadline,
    ) -> Result<Vec<Document>, StoreError>;
}

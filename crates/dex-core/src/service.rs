use std::sync::Arc;

use bson::Document;
use tracing::debug;

use crate::deadline::Deadline;
use crate::distinct::merge_distinct;
use crate::error::{DexError, Result};
use crate::fields;
use crate::filter::{
    Criteria, build_filter, dex_number_filter, legendary_filter, name_filter,
    secondary_type_present_filter,
};
use crate::identifier::resolve_identifier;
use crate::record::Pokemon;
use crate::stats::{StatsSummary, compute_stats};
use crate::store::DocumentStore;

/// Read operations of the Pokedex API over one collection.
///
/// Cheap to share: holds the process-wide store handle and the name of the
/// collection the endpoints read from.
pub struct PokedexService {
    store: Arc<dyn DocumentStore>,
    collection: String,
}

impl PokedexService {
    pub fn new(store: Arc<dyn DocumentStore>, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn list_all(&self, deadline: Deadline) -> Result<Vec<Pokemon>> {
        Ok(self.store.find(&self.collection, Document::new(), deadline)?)
    }

    /// Look up by numeric id, e.g. `"25"` for `#025`.
    pub fn get_by_id(&self, id: &str, deadline: Deadline) -> Result<Pokemon> {
        let dex_number = resolve_identifier(id)?;
        self.store
            .find_one(&self.collection, dex_number_filter(&dex_number), deadline)?
            .ok_or_else(|| DexError::NotFound(dex_number.into()))
    }

    /// Look up by whole name, ignoring case.
    pub fn get_by_name(&self, name: &str, deadline: Deadline) -> Result<Pokemon> {
        self.store
            .find_one(&self.collection, name_filter(name), deadline)?
            .ok_or_else(|| DexError::NotFound(name.to_string()))
    }

    pub fn search(&self, criteria: &Criteria, deadline: Deadline) -> Result<Vec<Pokemon>> {
        let filter = build_filter(criteria);
        debug!(collection = %self.collection, %filter, "search");
        Ok(self.store.find(&self.collection, filter, deadline)?)
    }

    /// Every type name used in either type slot, primary types first.
    pub fn types(&self, deadline: Deadline) -> Result<Vec<String>> {
        let primary = self.store.distinct(
            &self.collection,
            fields::PRIMARY_TYPE,
            Document::new(),
            deadline,
        )?;
        let secondary = self.store.distinct(
            &self.collection,
            fields::SECONDARY_TYPE,
            secondary_type_present_filter(),
            deadline,
        )?;
        Ok(merge_distinct(primary, secondary))
    }

    pub fn legendary(&self, deadline: Deadline) -> Result<Vec<Pokemon>> {
        Ok(self.store.find(&self.collection, legendary_filter(), deadline)?)
    }

    pub fn stats(&self, deadline: Deadline) -> Result<StatsSummary> {
        Ok(compute_stats(self.store.as_ref(), &self.collection, deadline)?)
    }
}

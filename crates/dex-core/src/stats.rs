use std::collections::HashMap;
use std::panic;
use std::thread::ScopedJoinHandle;

use bson::{Document, doc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::deadline::Deadline;
use crate::error::StoreError;
use crate::fields;
use crate::filter::legendary_filter;
use crate::store::DocumentStore;

/// Collection-wide counts served by the stats endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSummary {
    pub total_pokemon: u64,
    pub legendary_count: u64,
    /// Count per primary type. Secondary types are not counted.
    pub type_distribution: HashMap<String, u64>,
}

/// One output row of [`type_distribution_pipeline`].
#[derive(Debug, Deserialize)]
struct TypeCount {
    #[serde(rename = "_id")]
    type_name: String,
    count: u64,
}

/// `$group` records by primary type, counting each group.
pub fn type_distribution_pipeline() -> Vec<Document> {
    vec![doc! {
        "$group": {
            "_id": format!("${}", fields::PRIMARY_TYPE),
            "count": { "$sum": 1 }
        }
    }]
}

/// Compute the stats summary of `collection`.
///
/// The three store calls are independent and run concurrently; the summary
/// is only built once all of them succeeded. Grouped rows that do not decode
/// are skipped.
pub fn compute_stats<S: DocumentStore + ?Sized>(
    store: &S,
    collection: &str,
    deadline: Deadline,
) -> Result<StatsSummary, StoreError> {
    let (total, legendary, rows) = std::thread::scope(|scope| {
        let total = scope.spawn(|| store.count(collection, Document::new(), deadline));
        let legendary = scope.spawn(|| store.count(collection, legendary_filter(), deadline));
        let rows = store.aggregate(collection, type_distribution_pipeline(), deadline);
        (join(total), join(legendary), rows)
    });

    let total_pokemon = total?;
    let legendary_count = legendary?;
    let rows = rows?;

    let mut type_distribution = HashMap::with_capacity(rows.len());
    for row in rows {
        match bson::from_document::<TypeCount>(row) {
            Ok(TypeCount { type_name, count }) => {
                type_distribution.insert(type_name, count);
            }
            Err(e) => debug!(collection, error = %e, "skipping undecodable type count row"),
        }
    }

    Ok(StatsSummary {
        total_pokemon,
        legendary_count,
        type_distribution,
    })
}

fn join<T>(handle: ScopedJoinHandle<'_, T>) -> T {
    handle
        .join()
        .unwrap_or_else(|payload| panic::resume_unwind(payload))
}

use std::fs;
use std::path::{Path, PathBuf};

use dex_core::{Deadline, Document, StoreError};
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::provision::Provision;

/// Documents per `insert_many` call.
pub const BATCH_SIZE: usize = 1000;

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path} is not a JSON array of objects: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("record {index} cannot be stored: {source}")]
    Bson {
        index: usize,
        #[source]
        source: bson::ser::Error,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportOutcome {
    /// The collection already held `existing` documents; nothing was read.
    Skipped { existing: u64 },
    Imported { inserted: usize },
}

/// Load the JSON array at `path` into `collection` unless it already holds
/// documents.
///
/// Running the import twice is a no-op the second time. The file is fully
/// parsed before the first batch is written, so a malformed file inserts
/// nothing. If a batch fails, the batches already written are removed again.
pub fn import_dataset<S: Provision + ?Sized>(
    store: &S,
    collection: &str,
    path: impl AsRef<Path>,
) -> Result<ImportOutcome, ImportError> {
    let path = path.as_ref();

    if store.ensure_collection(collection)? {
        info!(collection, "collection not found, created");
    } else {
        let existing = store.count(collection, Document::new(), Deadline::NONE)?;
        if existing > 0 {
            info!(collection, existing, "collection already populated, skipping import");
            return Ok(ImportOutcome::Skipped { existing });
        }
    }

    let docs = read_dataset(path)?;
    let mut inserted = 0;
    for batch in docs.chunks(BATCH_SIZE) {
        match store.insert_many(collection, batch.to_vec()) {
            Ok(count) => inserted += count,
            Err(err) => {
                // an empty collection is imported again on the next run
                warn!(collection, inserted, error = %err, "batch failed, clearing partial import");
                if let Err(clear_err) = store.clear(collection) {
                    warn!(collection, error = %clear_err, "failed to clear partial import");
                }
                return Err(err.into());
            }
        }
    }

    info!(collection, inserted, path = %path.display(), "imported dataset");
    Ok(ImportOutcome::Imported { inserted })
}

fn read_dataset(path: &Path) -> Result<Vec<Document>, ImportError> {
    let bytes = fs::read(path).map_err(|source| ImportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let records: Vec<Map<String, Value>> =
        serde_json::from_slice(&bytes).map_err(|source| ImportError::Json {
            path: path.to_path_buf(),
            source,
        })?;

    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            bson::to_document(record).map_err(|source| ImportError::Bson { index, source })
        })
        .collect()
}

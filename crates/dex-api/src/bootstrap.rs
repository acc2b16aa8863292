use std::sync::Arc;

use dex_core::{DocumentStore, StoreError};
use dex_store::{ImportError, ImportOutcome, MemoryStore, Provision, import_dataset};
use tracing::info;

use crate::config::{Config, Dataset, StoreKind};

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),
    #[error("store unavailable: {0}")]
    Store(#[from] StoreError),
    #[error("import failed: {0}")]
    Import(#[from] ImportError),
    #[error("this build has no mongodb support; set `store: memory` or enable the `mongodb` feature")]
    MongoUnavailable,
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
    #[error("start-up task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// One opened store, seen through both of its capabilities.
pub struct Backend {
    pub reader: Arc<dyn DocumentStore>,
    pub provision: Arc<dyn Provision>,
}

impl Backend {
    fn new<S: Provision + 'static>(store: S) -> Self {
        let store = Arc::new(store);
        Self {
            reader: store.clone(),
            provision: store,
        }
    }

    pub fn open(config: &Config) -> Result<Self, StartupError> {
        match config.store {
            StoreKind::Memory => {
                info!("using in-process store");
                Ok(Self::new(MemoryStore::new()))
            }
            StoreKind::Mongodb => open_mongo(config),
        }
    }
}

#[cfg(feature = "mongodb")]
fn open_mongo(config: &Config) -> Result<Backend, StartupError> {
    let mongo = &config.mongodb;
    info!(host = %mongo.host, port = mongo.port, database = %mongo.database, "connecting to mongodb");
    let (user, pass) = mongo.credentials().unwrap_or_default();
    let target = dex_store::MongoTarget {
        host: mongo.host.clone(),
        port: mongo.port,
        user: user.to_owned(),
        pass: pass.to_owned(),
        database: mongo.database.clone(),
        timeout: config.server.request_timeout(),
    };
    let store = dex_store::MongoStore::connect(&target)?;
    Ok(Backend::new(store))
}

#[cfg(not(feature = "mongodb"))]
fn open_mongo(_config: &Config) -> Result<Backend, StartupError> {
    Err(StartupError::MongoUnavailable)
}

/// Make sure the served collection and every dataset collection exist.
pub fn provision(backend: &Backend, config: &Config) -> Result<(), StartupError> {
    let served = std::iter::once(config.mongodb.collection.as_str());
    let datasets = config.datasets.iter().map(|d| d.collection.as_str());

    let mut seen: Vec<&str> = Vec::new();
    for collection in served.chain(datasets) {
        if seen.contains(&collection) {
            continue;
        }
        seen.push(collection);
        if backend.provision.ensure_collection(collection)? {
            info!(collection, "collection created");
        } else {
            info!(collection, "collection exists");
        }
    }
    Ok(())
}

/// Import each dataset in order; already populated collections are skipped.
pub fn import_all(backend: &Backend, datasets: &[Dataset]) -> Result<(), StartupError> {
    for dataset in datasets {
        info!(collection = %dataset.collection, path = %dataset.path.display(), "starting import");
        match import_dataset(backend.provision.as_ref(), &dataset.collection, &dataset.path)? {
            ImportOutcome::Skipped { existing } => {
                info!(collection = %dataset.collection, existing, "import skipped")
            }
            ImportOutcome::Imported { inserted } => {
                info!(collection = %dataset.collection, inserted, "import finished")
            }
        }
    }
    Ok(())
}

/// Install the `fmt` subscriber, filtered by `RUST_LOG` (default `info`).
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

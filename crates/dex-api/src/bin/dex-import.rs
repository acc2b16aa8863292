//! Provision the configured store and import the regional datasets.
//!
//! `--check` only connects, lists the collections and prints the document
//! count of every dataset collection.

use dex_core::{Deadline, Document};
use tracing::{error, info, warn};

use dex_api::bootstrap::{self, Backend, StartupError};
use dex_api::config::Config;

fn main() {
    bootstrap::init_tracing();

    let check_only = std::env::args().any(|a| a == "--check");
    let result = Config::from_env()
        .map_err(StartupError::from)
        .and_then(|config| {
            if check_only {
                check(&config)
            } else {
                import(&config)
            }
        });

    if let Err(e) = result {
        error!("dex-import failed: {e}");
        std::process::exit(1);
    }
}

fn import(config: &Config) -> Result<(), StartupError> {
    let backend = Backend::open(config)?;
    bootstrap::provision(&backend, config)?;
    bootstrap::import_all(&backend, &config.datasets)?;
    info!("import completed");
    Ok(())
}

fn check(config: &Config) -> Result<(), StartupError> {
    let backend = Backend::open(config)?;

    println!("Available collections:");
    for name in backend.provision.collection_names()? {
        println!("- {name}");
    }

    for dataset in &config.datasets {
        match backend
            .reader
            .count(&dataset.collection, Document::new(), Deadline::NONE)
        {
            Ok(count) => println!("Documents in {}: {count}", dataset.collection),
            Err(e) => warn!(collection = %dataset.collection, error = %e, "could not count documents"),
        }
    }
    Ok(())
}

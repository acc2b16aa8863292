//! Document-store backends for the Pokedex API.
//!
//! Each backend implements [`dex_core::DocumentStore`] for the read path and
//! [`Provision`] for start-up work: creating collections and bulk loading the
//! regional datasets through [`import_dataset`].

mod import;
mod provision;

pub use import::{BATCH_SIZE, ImportError, ImportOutcome, import_dataset};
pub use provision::Provision;

#[cfg(feature = "memory")]
mod memory;

#[cfg(feature = "memory")]
pub use memory::MemoryStore;

#[cfg(feature = "mongodb")]
mod mongo;

#[cfg(feature = "mongodb")]
pub use mongo::{MongoStore, MongoTarget};

//! Query layer for the Pokedex API.
//!
//! Turns request parameters into document-store filters, resolves numeric
//! ids into dex numbers, merges distinct type listings and aggregates the
//! stats summary. Persistence is reached only through [`DocumentStore`];
//! nothing here knows about HTTP.

mod deadline;
mod distinct;
mod error;
pub mod fields;
mod filter;
mod identifier;
mod record;
mod service;
mod stats;
mod store;

pub use bson::{Bson, Document};
pub use deadline::Deadline;
pub use distinct::merge_distinct;
pub use error::{DexError, Result, StoreError};
pub use filter::{
    Criteria, build_filter, dex_number_filter, legendary_filter, name_filter,
    secondary_type_present_filter,
};
pub use identifier::{DexNumber, resolve_identifier};
pub use record::Pokemon;
pub use service::PokedexService;
pub use stats::{StatsSummary, compute_stats, type_distribution_pipeline};
pub use store::DocumentStore;

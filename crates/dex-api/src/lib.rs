pub mod bootstrap;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use std::sync::Arc;
use std::time::Duration;

use dex_core::{Deadline, PokedexService};

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<PokedexService>,
    pub request_timeout: Option<Duration>,
}

impl AppState {
    /// Deadline for the store calls of a request that starts now.
    pub fn deadline(&self) -> Deadline {
        Deadline::from_timeout(self.request_timeout)
    }
}

use std::sync::Arc;

use dex_core::PokedexService;
use tracing::{error, info};

use dex_api::bootstrap::{self, Backend, StartupError};
use dex_api::config::{Config, StoreKind};
use dex_api::routes;
use dex_api::state::AppState;

#[tokio::main]
async fn main() {
    bootstrap::init_tracing();

    if let Err(e) = run().await {
        error!("dex-api failed: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), StartupError> {
    let config = Config::from_env()?;

    let (backend, config) = tokio::task::spawn_blocking(move || {
        let backend = Backend::open(&config)?;
        bootstrap::provision(&backend, &config)?;
        // the in-process store starts empty every time
        if config.import_on_startup || config.store == StoreKind::Memory {
            bootstrap::import_all(&backend, &config.datasets)?;
        }
        Ok::<_, StartupError>((backend, config))
    })
    .await??;

    let state = AppState {
        service: Arc::new(PokedexService::new(
            backend.reader,
            config.mongodb.collection.clone(),
        )),
        request_timeout: config.server.request_timeout(),
    };

    let app = routes::router().with_state(state);

    let addr = config.server.addr;
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|source| StartupError::Bind {
            addr: addr.clone(),
            source,
        })?;

    info!(
        addr = %addr,
        collection = %config.mongodb.collection,
        "dex-api listening"
    );
    axum::serve(listener, app).await.map_err(StartupError::Serve)
}

mod health;
mod pokemon;

use axum::Router;
use axum::http::{Method, header};
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/healthz", get(health::healthz))
        .route("/api/pokemon", get(pokemon::list_all))
        .route("/api/pokemon/search", get(pokemon::search))
        .route("/api/pokemon/types", get(pokemon::types))
        .route("/api/pokemon/legendary", get(pokemon::legendary))
        .route("/api/pokemon/stats", get(pokemon::stats))
        .route("/api/pokemon/name/{name}", get(pokemon::get_by_name))
        .route("/api/pokemon/{id}", get(pokemon::get_by_id))
        .layer(cors())
}

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

use axum::Json;
use axum::extract::{Path, Query, State};
use dex_core::{Criteria, Deadline, Pokemon, PokedexService, StatsSummary};
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::AppState;

/// Run a blocking service call off the async runtime. The deadline starts
/// when the request is received.
async fn blocking<T, F>(state: AppState, failure: &'static str, op: F) -> Result<Json<T>, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&PokedexService, Deadline) -> dex_core::Result<T> + Send + 'static,
{
    let deadline = state.deadline();
    tokio::task::spawn_blocking(move || op(&state.service, deadline))
        .await?
        .map(Json)
        .map_err(|e| ApiError::from_dex(e, failure))
}

pub async fn list_all(State(state): State<AppState>) -> Result<Json<Vec<Pokemon>>, ApiError> {
    blocking(state, "Failed to fetch Pokemon", |service, deadline| {
        service.list_all(deadline)
    })
    .await
}

pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Pokemon>, ApiError> {
    blocking(state, "Failed to fetch Pokemon", move |service, deadline| {
        service.get_by_id(&id, deadline)
    })
    .await
}

pub async fn get_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Pokemon>, ApiError> {
    blocking(state, "Failed to fetch Pokemon", move |service, deadline| {
        service.get_by_name(&name, deadline)
    })
    .await
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    q: Option<String>,
    #[serde(rename = "type")]
    type_name: Option<String>,
    legendary: Option<String>,
}

impl From<SearchParams> for Criteria {
    fn from(params: SearchParams) -> Self {
        Criteria::new(params.q, params.type_name, params.legendary)
    }
}

pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Pokemon>>, ApiError> {
    let criteria = Criteria::from(params);
    blocking(state, "Failed to search Pokemon", move |service, deadline| {
        service.search(&criteria, deadline)
    })
    .await
}

pub async fn types(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    blocking(state, "Failed to fetch types", |service, deadline| {
        service.types(deadline)
    })
    .await
}

pub async fn legendary(State(state): State<AppState>) -> Result<Json<Vec<Pokemon>>, ApiError> {
    blocking(state, "Failed to fetch legendary Pokemon", |service, deadline| {
        service.legendary(deadline)
    })
    .await
}

pub async fn stats(State(state): State<AppState>) -> Result<Json<StatsSummary>, ApiError> {
    blocking(state, "Failed to compute stats", |service, deadline| {
        service.stats(deadline)
    })
    .await
}

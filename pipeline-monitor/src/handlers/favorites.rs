//! Favorite object handlers

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;

use crate::{AppResult, AppState};
use crate::handlers::forward;
use crate::handlers::query::JsonBody;
use crate::ingest::{Mutation, Resource};
use crate::models::Credential;

/// Mark an object as favorite
pub async fn add(
    State(state): State<AppState>,
    credential: Credential,
    JsonBody(body): JsonBody<Value>,
) -> AppResult<Json<Value>> {
    forward(&state, &credential, Mutation::create(Resource::Favorites, body)).await
}

pub async fn remove(
    State(state): State<AppState>,
    credential: Credential,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    forward(&state, &credential, Mutation::delete(Resource::Favorites, id)).await
}

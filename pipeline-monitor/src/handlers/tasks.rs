//! Maintenance task handlers. Tasks live upstream; this service only
//! forwards writes.

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

pub async fn create(
    State(state): State<AppState>,
    credential: Credential,
    JsonBody(body): JsonBody<Value>,
) -> AppResult<Json<Value>> {
    forward(&state, &credential, Mutation::create(Resource::Tasks, body)).await
}

pub async fn update(
    State(state): State<AppState>,
    credential: Credential,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<Value>,
) -> AppResult<Json<Value>> {
    forward(&state, &credential, Mutation::update(Resource::Tasks, Some(id), body)).await
}

pub async fn delete(
    State(state): State<AppState>,
    credential: Credential,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    forward(&state, &credential, Mutation::delete(Resource::Tasks, id)).await
}

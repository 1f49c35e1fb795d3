//! Profile and settings handlers

use axum::{extract::State, Json};
use serde_json::Value;

use crate::{AppResult, AppState};
use crate::handlers::forward;
use crate::handlers::query::JsonBody;
use crate::ingest::{Mutation, Resource};
use crate::models::Credential;

/// Update the caller's profile
pub async fn update_profile(
    State(state): State<AppState>,
    credential: Credential,
    JsonBody(body): JsonBody<Value>,
) -> AppResult<Json<Value>> {
    forward(&state, &credential, Mutation::update(Resource::Profile, None, body)).await
}

/// Update the caller's dashboard settings
pub async fn update_settings(
    State(state): State<AppState>,
    credential: Credential,
    JsonBody(body): JsonBody<Value>,
) -> AppResult<Json<Value>> {
    forward(&state, &credential, Mutation::update(Resource::Settings, None, body)).await
}

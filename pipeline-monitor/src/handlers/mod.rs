//! HTTP handlers

pub mod health;
pub mod auth;
pub mod dashboard;
pub mod map;
pub mod notifications;
pub mod objects;
pub mod analytics;
pub mod defects;
pub mod tasks;
pub mod favorites;
pub mod profile;
pub mod query;

use axum::Json;
use serde_json::Value;

use crate::{AppError, AppResult, AppState};
use crate::ingest::{Mutation, MutationKind};
use crate::models::Credential;

/// Forward a write to the data source. Writes fail closed: any upstream
/// failure is returned to the caller as an error.
pub(crate) async fn forward(state: &AppState, credential: &Credential, mutation: Mutation) -> AppResult<Json<Value>> {
    if let Some(id) = &mutation.id {
        if matches!(id.trim(), "" | "." | "..") {
            return Err(AppError::ValidationError(format!("'{}' is not a valid id", id)));
        }
    }
    if let Some(body) = &mutation.body {
        if !body.is_object() {
            return Err(AppError::ValidationError("request body must be a JSON object".to_string()));
        }
    }

    let kind = mutation.kind;
    let path = mutation.path();
    let result = state.source.mutate(mutation, credential).await.map_err(|e| {
        tracing::warn!("{:?} {} failed: {}", kind, path, e);
        AppError::from(e)
    })?;

    tracing::info!("{:?} {} forwarded", kind, path);
    Ok(Json(match (kind, result) {
        (MutationKind::Delete, Value::Null) => serde_json::json!({ "deleted": true }),
        (_, result) => result,
    }))
}

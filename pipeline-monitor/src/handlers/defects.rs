//! Defect handlers

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;

use crate::{AppResult, AppState};
use crate::engine::{fallback, views, ReadPipeline, ViewOutcome};
use crate::handlers::forward;
use crate::handlers::query::{JsonBody, PageQuery, ValidatedQuery};
use crate::ingest::{Mutation, Resource};
use crate::models::{Credential, DefectList};

/// List normalized defects
pub async fn list(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<PageQuery>,
) -> AppResult<ViewOutcome<DefectList>> {
    let (limit, skip) = (query.limit(), query.skip());

    ReadPipeline::new(state.source.clone(), "defect_list")
        .run(
            state
                .fetch_query()
                .segment(query.segment)
                .defect_type(query.defect_type),
            move |records| Ok(views::defect_list(records, limit, skip)),
            fallback::defect_list,
        )
        .await
}

pub async fn create(
    State(state): State<AppState>,
    credential: Credential,
    JsonBody(body): JsonBody<Value>,
) -> AppResult<Json<Value>> {
    forward(&state, &credential, Mutation::create(Resource::Defects, body)).await
}

pub async fn update(
    State(state): State<AppState>,
    credential: Credential,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<Value>,
) -> AppResult<Json<Value>> {
    forward(&state, &credential, Mutation::update(Resource::Defects, Some(id), body)).await
}

pub async fn delete(
    State(state): State<AppState>,
    credential: Credential,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    forward(&state, &credential, Mutation::delete(Resource::Defects, id)).await
}

//! Object (pipeline segment) handlers

use axum::extract::{Path, State};

use crate::{AppError, AppResult, AppState};
use crate::engine::{fallback, views, ReadPipeline, ViewOutcome};
use crate::handlers::query::{parse_segment, CompareQuery, PageQuery, ValidatedQuery};
use crate::models::{CompareView, ObjectDetail, ObjectList};

/// List objects in first-seen order
pub async fn list(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<PageQuery>,
) -> AppResult<ViewOutcome<ObjectList>> {
    let (limit, skip) = (query.limit(), query.skip());

    ReadPipeline::new(state.source.clone(), "object_list")
        .run(
            state.fetch_query().segment(query.segment),
            move |records| Ok(views::object_list(records, limit, skip)),
            fallback::object_list,
        )
        .await
}

/// Get single object
pub async fn get(
    State(state): State<AppState>,
    Path(segment): Path<String>,
) -> AppResult<ViewOutcome<ObjectDetail>> {
    let segment = parse_segment(&segment)?;

    ReadPipeline::new(state.source.clone(), "object_detail")
        .run(
            state.fetch_query().segment(Some(segment)),
            move |records| {
                views::object_detail(records, segment)
                    .ok_or_else(|| AppError::NotFound(format!("Object {} not found", segment)))
            },
            move || fallback::object_detail(segment),
        )
        .await
}

/// Side-by-side comparison of a few objects
pub async fn compare(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<CompareQuery>,
) -> AppResult<ViewOutcome<CompareView>> {
    let max_objects = state.config.compare_max_objects;
    let segments = query.segments(max_objects)?;

    ReadPipeline::new(state.source.clone(), "compare")
        .run(
            state.fetch_query(),
            move |records| Ok(views::compare(records, &segments, max_objects)),
            move || fallback::compare(max_objects),
        )
        .await
}

//! Map handlers

use axum::extract::State;

use crate::{AppState, AppResult};
use crate::engine::views::MapFilter;
use crate::engine::{fallback, views, ReadPipeline, ViewOutcome};
use crate::handlers::query::{MapQuery, ValidatedQuery};
use crate::models::MapPointList;

/// Geolocated defects for the map widget
pub async fn points(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<MapQuery>,
) -> AppResult<ViewOutcome<MapPointList>> {
    let filter = MapFilter {
        criticality: query.criticality()?,
        method: query.method()?,
        limit: query.limit.map(|l| l as usize),
    };

    ReadPipeline::new(state.source.clone(), "map_points")
        .run(
            state.fetch_query().segment(query.segment),
            move |records| Ok(views::map_points(records, &filter)),
            fallback::map_points,
        )
        .await
}

//! Analytics handlers

use axum::extract::State;
use chrono::{Datelike, Utc};

use crate::{AppResult, AppState};
use crate::engine::{fallback, views, ReadPipeline, ViewOutcome};
use crate::models::{RecommendationList, TrendSeries};

/// Yearly defect trend. The series is synthetic until inspection history
/// is available upstream.
pub async fn trends(State(state): State<AppState>) -> AppResult<ViewOutcome<TrendSeries>> {
    let year = Utc::now().year();

    ReadPipeline::new(state.source.clone(), "trend_series")
        .run(
            state.fetch_query(),
            move |records| Ok(views::trend_series(records, year)),
            move || fallback::trend_series(year),
        )
        .await
}

pub async fn recommendations(State(state): State<AppState>) -> AppResult<ViewOutcome<RecommendationList>> {
    ReadPipeline::new(state.source.clone(), "recommendations")
        .run(
            state.fetch_query(),
            |records| Ok(views::recommendations(records)),
            fallback::recommendations,
        )
        .await
}

//! Dashboard handlers

use axum::{
    extract::State,
    http::HeaderValue,
    response::{IntoResponse, Response},
    Json,
};

use crate::{AppState, AppResult};
use crate::engine::{fallback, views, DataOrigin, ReadPipeline, ViewOutcome, ORIGIN_HEADER};
use crate::models::{DashboardOverview, DashboardStats, DistributionView, SummaryView};

/// Headline counters
pub async fn stats(State(state): State<AppState>) -> AppResult<ViewOutcome<DashboardStats>> {
    ReadPipeline::new(state.source.clone(), "dashboard_stats")
        .run(state.fetch_query(), |records| Ok(views::dashboard_stats(records)), fallback::dashboard_stats)
        .await
}

/// Severity distribution
pub async fn criticality(State(state): State<AppState>) -> AppResult<ViewOutcome<DistributionView>> {
    ReadPipeline::new(state.source.clone(), "criticality_distribution")
        .run(
            state.fetch_query(),
            |records| Ok(views::criticality_distribution(records)),
            fallback::criticality_distribution,
        )
        .await
}

/// Inspection method distribution
pub async fn methods(State(state): State<AppState>) -> AppResult<ViewOutcome<DistributionView>> {
    ReadPipeline::new(state.source.clone(), "method_distribution")
        .run(
            state.fetch_query(),
            |records| Ok(views::method_distribution(records)),
            fallback::method_distribution,
        )
        .await
}

/// Upstream summary counters
pub async fn summary(State(state): State<AppState>) -> AppResult<ViewOutcome<SummaryView>> {
    ReadPipeline::new(state.source.clone(), "summary")
        .run_summary(|counters| Ok(views::summary_view(counters)), fallback::summary)
        .await
}

/// All dashboard widgets in one response. Each widget runs its own
/// pipeline, so one failing widget does not blank the others.
pub async fn overview(State(state): State<AppState>) -> AppResult<Response> {
    let (stats, criticality, methods) = tokio::join!(
        self::stats(State(state.clone())),
        self::criticality(State(state.clone())),
        self::methods(State(state.clone())),
    );
    let (stats, criticality, methods) = (stats?, criticality?, methods?);

    let origins = [stats.origin, criticality.origin, methods.origin];
    let origin = if origins.iter().all(|o| *o == DataOrigin::Live) {
        "live"
    } else if origins.iter().all(|o| *o == DataOrigin::Fallback) {
        "fallback"
    } else {
        "partial"
    };

    let mut response = Json(DashboardOverview {
        stats: stats.data,
        criticality: criticality.data,
        methods: methods.data,
    })
    .into_response();
    response
        .headers_mut()
        .insert(ORIGIN_HEADER, HeaderValue::from_static(origin));

    Ok(response)
}

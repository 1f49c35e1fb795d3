//! Notification handlers

use axum::extract::State;
use chrono::Utc;

use crate::{AppState, AppResult};
use crate::engine::{fallback, views, ReadPipeline, ViewOutcome};
use crate::models::NotificationList;

/// Latest critical defects
pub async fn list(State(state): State<AppState>) -> AppResult<ViewOutcome<NotificationList>> {
    let today = Utc::now().format("%Y-%m-%d").to_string();

    ReadPipeline::new(state.source.clone(), "notifications")
        .run(
            state.fetch_query(),
            move |records| Ok(views::notifications(records, &today)),
            fallback::notifications,
        )
        .await
}

//! Authentication handlers
//!
//! Credentials are checked by the data source. Login only relays the
//! principal/secret pair and hands back the issued token.

use axum::{extract::State, Json};
use validator::Validate;

use crate::{AppError, AppResult, AppState};
use crate::handlers::query::JsonBody;
use crate::ingest::SourceError;
use crate::models::{LoginRequest, TokenResponse};

/// Login endpoint
pub async fn login(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    req.validate()?;

    let token = state.source.issue_token(&req).await.map_err(|e| match e {
        SourceError::Unauthorized | SourceError::Rejected { status: 400 | 401 | 403, .. } => {
            AppError::InvalidCredentials
        }
        other => AppError::from(other),
    })?;

    tracing::info!("Token issued for '{}'", req.username);
    Ok(Json(token))
}

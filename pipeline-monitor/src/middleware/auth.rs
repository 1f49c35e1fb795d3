//! Authentication middleware
//!
//! The service never validates credentials itself. Write routes only
//! require that a bearer token is present; it is handed to the data source
//! unchanged, which accepts or rejects it.

use axum::{
    extract::Request,
    middleware::Next,
    response::Response,
    http::header::AUTHORIZATION,
};
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;

use crate::AppError;
use crate::models::Credential;

/// Middleware: Require a bearer credential on state-changing routes
pub async fn require_credential(
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_bearer_token(req.headers())?;

    // Insert into request extensions
    req.extensions_mut().insert(Credential::new(token));

    Ok(next.run(req).await)
}

/// Extract bearer token from Authorization header
fn extract_bearer_token(headers: &HeaderMap) -> Result<String, AppError> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .ok_or(AppError::Unauthorized)?
        .to_str()
        .map_err(|_| AppError::Unauthorized)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .ok_or(AppError::Unauthorized)?;

    if token.is_empty() {
        return Err(AppError::Unauthorized);
    }

    Ok(token.to_string())
}

// Implement FromRequestParts for Credential
#[axum::async_trait]
impl<S> FromRequestParts<S> for Credential
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions
            .get::<Credential>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}

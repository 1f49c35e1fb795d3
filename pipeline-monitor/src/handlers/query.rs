//! Request parameter and body extraction

use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::Json;
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use validator::Validate;

use crate::models::{Method, RiskClass};
use crate::{AppError, AppResult};

/// Query string that is deserialized and validated, with failures
/// reported as `ValidationError`
#[derive(Debug)]
pub struct ValidatedQuery<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::ValidationError(e.body_text()))?;
        value.validate()?;
        Ok(ValidatedQuery(value))
    }
}

/// JSON request body with decode failures reported as `ValidationError`
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::ValidationError(e.body_text()))?;
        Ok(JsonBody(value))
    }
}

/// Pagination shared by list views
#[derive(Debug, Default, Deserialize, Validate)]
pub struct PageQuery {
    #[validate(range(min = 1, max = 1000, message = "limit must be between 1 and 1000"))]
    pub limit: Option<u32>,
    pub skip: Option<u32>,
    pub segment: Option<i64>,
    /// Raw upstream defect type, passed through unnormalized
    pub defect_type: Option<String>,
}

impl PageQuery {
    pub fn limit(&self) -> Option<usize> {
        self.limit.map(|l| l as usize)
    }

    pub fn skip(&self) -> usize {
        self.skip.unwrap_or(0) as usize
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct MapQuery {
    pub criticality: Option<String>,
    pub method: Option<String>,
    pub segment: Option<i64>,
    #[validate(range(min = 1, max = 5000, message = "limit must be between 1 and 5000"))]
    pub limit: Option<u32>,
}

impl MapQuery {
    pub fn criticality(&self) -> AppResult<Option<RiskClass>> {
        self.criticality.as_deref().map(str::parse).transpose()
    }

    pub fn method(&self) -> AppResult<Option<Method>> {
        self.method.as_deref().map(str::parse).transpose()
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct CompareQuery {
    #[validate(length(min = 1, message = "segments must list at least one segment"))]
    pub segments: String,
}

impl CompareQuery {
    /// Comma-separated segment numbers, at most `max` of them
    pub fn segments(&self, max: usize) -> AppResult<Vec<i64>> {
        let segments = self
            .segments
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(parse_segment)
            .collect::<AppResult<Vec<i64>>>()?;

        if segments.is_empty() {
            return Err(AppError::ValidationError("segments must list at least one segment".to_string()));
        }
        if segments.len() > max {
            return Err(AppError::ValidationError(format!(
                "at most {} objects can be compared",
                max
            )));
        }
        Ok(segments)
    }
}

pub fn parse_segment(raw: &str) -> AppResult<i64> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::ValidationError(format!("segment id '{}' is not an integer", raw)))
}

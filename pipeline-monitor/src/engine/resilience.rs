//! Resilience layer
//!
//! Every read view runs through a [`ReadPipeline`]:
//!
//! ```text
//!   Fetching ──► Normalizing ──► Aggregating ──► Building ──► Responding
//!      │              │               │              │
//!      └──────────────┴───────┬───────┴──────────────┘
//!                             ▼
//!                          Fallback  (static payload, HTTP 200)
//! ```
//!
//! Reads fail open. Client errors (bad parameters, unknown object) are the
//! only errors a read returns. Writes never pass through here.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::Instrument;
use uuid::Uuid;

use super::aggregate::compute_critical_count;
use super::normalize::normalize_batch;
use crate::ingest::{InspectionSource, SourceError};
use crate::models::{CanonicalDefect, DefectPage, DefectQuery, InspectionSummary};
use crate::{AppError, AppResult};

/// Response header naming where the body came from
pub const ORIGIN_HEADER: &str = "x-data-origin";

/// Upper bound on upstream pages pulled by one pipeline run
pub const MAX_PAGES: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetching,
    Normalizing,
    Aggregating,
    Building,
    Responding,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataOrigin {
    Live,
    Fallback,
}

impl DataOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataOrigin::Live => "live",
            DataOrigin::Fallback => "fallback",
        }
    }
}

/// Why a pipeline left for the fallback
#[derive(Debug)]
enum Failure {
    Upstream(SourceError),
    AllRecordsMalformed(usize),
    Builder(AppError),
    Panicked,
}

impl std::fmt::Display for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Failure::Upstream(e) => write!(f, "upstream: {}", e),
            Failure::AllRecordsMalformed(n) => write!(f, "all {} records malformed", n),
            Failure::Builder(e) => write!(f, "builder: {}", e),
            Failure::Panicked => write!(f, "builder panicked"),
        }
    }
}

/// A view payload and where it came from
#[derive(Debug)]
pub struct ViewOutcome<V> {
    pub data: V,
    pub origin: DataOrigin,
}

impl<V> ViewOutcome<V> {
    pub fn live(data: V) -> Self {
        Self { data, origin: DataOrigin::Live }
    }

    pub fn fallback(data: V) -> Self {
        Self { data, origin: DataOrigin::Fallback }
    }

    pub fn is_fallback(&self) -> bool {
        self.origin == DataOrigin::Fallback
    }
}

impl<V: Serialize> IntoResponse for ViewOutcome<V> {
    fn into_response(self) -> Response {
        let mut response = (StatusCode::OK, Json(self.data)).into_response();
        response
            .headers_mut()
            .insert(ORIGIN_HEADER, HeaderValue::from_static(self.origin.as_str()));
        response
    }
}

/// One read-view invocation. Holds no state beyond the request.
pub struct ReadPipeline {
    source: Arc<dyn InspectionSource>,
    view: &'static str,
    run_id: Uuid,
    stage: Stage,
}

impl ReadPipeline {
    pub fn new(source: Arc<dyn InspectionSource>, view: &'static str) -> Self {
        Self {
            source,
            view,
            run_id: Uuid::new_v4(),
            stage: Stage::Fetching,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Fetch, normalize and build a view from defect records.
    /// `fallback` supplies the payload used when any stage fails.
    pub async fn run<V, B, F>(self, query: DefectQuery, build: B, fallback: F) -> AppResult<ViewOutcome<V>>
    where
        B: FnOnce(&[CanonicalDefect]) -> AppResult<V>,
        F: FnOnce() -> V,
    {
        let span = tracing::info_span!("read_pipeline", view = self.view, run = %self.run_id);
        self.run_defects(query, build, fallback).instrument(span).await
    }

    /// Build a view from the upstream summary counters
    pub async fn run_summary<V, B, F>(self, build: B, fallback: F) -> AppResult<ViewOutcome<V>>
    where
        B: FnOnce(&InspectionSummary) -> AppResult<V>,
        F: FnOnce() -> V,
    {
        let span = tracing::info_span!("read_pipeline", view = self.view, run = %self.run_id);
        self.run_counters(build, fallback).instrument(span).await
    }

    async fn run_defects<V, B, F>(mut self, query: DefectQuery, build: B, fallback: F) -> AppResult<ViewOutcome<V>>
    where
        B: FnOnce(&[CanonicalDefect]) -> AppResult<V>,
        F: FnOnce() -> V,
    {
        self.enter(Stage::Fetching);
        let page = match self.fetch_pages(query).await {
            Ok(page) => page,
            Err(e) => return Ok(self.fall_back(Failure::Upstream(e), fallback)),
        };

        self.enter(Stage::Normalizing);
        let batch = normalize_batch(page.defects);
        if batch.is_unusable() {
            return Ok(self.fall_back(Failure::AllRecordsMalformed(batch.dropped), fallback));
        }

        self.enter(Stage::Aggregating);
        tracing::debug!(
            records = batch.defects.len(),
            dropped = batch.dropped,
            critical = compute_critical_count(&batch.defects),
            upstream_total = ?page.total,
            "Batch normalized"
        );

        self.enter(Stage::Building);
        self.finish(|| build(&batch.defects), fallback)
    }

    /// Page through the upstream with `skip` until its `total` is reached,
    /// at most [`MAX_PAGES`] pages. Without a `total` one page is all we get.
    async fn fetch_pages(&self, mut query: DefectQuery) -> Result<DefectPage, SourceError> {
        let start = query.skip.unwrap_or(0);
        let mut defects = Vec::new();
        let mut total = None;

        for _ in 0..MAX_PAGES {
            let page = self.source.fetch_defects(&query).await?;
            let received = page.defects.len();
            total = page.total.or(total);
            defects.extend(page.defects);

            let remaining = match total {
                Some(total) => total.saturating_sub(start as u64) > defects.len() as u64,
                None => false,
            };
            if received == 0 || !remaining {
                return Ok(DefectPage { total, defects });
            }
            query.skip = Some(start.saturating_add(defects.len() as u32));
        }

        tracing::warn!(
            "View '{}' truncated at {} records of {:?} after {} pages",
            self.view,
            defects.len(),
            total,
            MAX_PAGES
        );
        Ok(DefectPage { total, defects })
    }

    async fn run_counters<V, B, F>(mut self, build: B, fallback: F) -> AppResult<ViewOutcome<V>>
    where
        B: FnOnce(&InspectionSummary) -> AppResult<V>,
        F: FnOnce() -> V,
    {
        self.enter(Stage::Fetching);
        let summary = match self.source.fetch_summary().await {
            Ok(summary) => summary,
            Err(e) => return Ok(self.fall_back(Failure::Upstream(e), fallback)),
        };

        // counters are re-keyed through the taxonomy by the builder itself
        self.enter(Stage::Building);
        self.finish(|| build(&summary), fallback)
    }

    fn finish<V, B, F>(mut self, build: B, fallback: F) -> AppResult<ViewOutcome<V>>
    where
        B: FnOnce() -> AppResult<V>,
        F: FnOnce() -> V,
    {
        match catch_unwind(AssertUnwindSafe(build)) {
            Ok(Ok(data)) => {
                self.enter(Stage::Responding);
                Ok(ViewOutcome::live(data))
            }
            Ok(Err(e)) if e.is_client_error() => Err(e),
            Ok(Err(e)) => Ok(self.fall_back(Failure::Builder(e), fallback)),
            Err(_) => Ok(self.fall_back(Failure::Panicked, fallback)),
        }
    }

    fn enter(&mut self, stage: Stage) {
        tracing::debug!("{:?} -> {:?}", self.stage, stage);
        self.stage = stage;
    }

    fn fall_back<V, F>(&mut self, failure: Failure, fallback: F) -> ViewOutcome<V>
    where
        F: FnOnce() -> V,
    {
        tracing::warn!(
            "View '{}' falling back during {:?}: {}",
            self.view,
            self.stage,
            failure
        );
        self.stage = Stage::Fallback;
        ViewOutcome::fallback(fallback())
    }
}

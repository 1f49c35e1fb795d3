//! Dashboard view payloads
//!
//! Field names and enumerations here are the contract consumer surfaces
//! depend on. Each payload has a live builder in `engine::views` and a
//! shape-identical fallback in `engine::fallback`.

use serde::Serialize;

use super::defect::{CanonicalDefect, Method, RiskClass};

/// One group of a distribution
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregateBucket {
    pub key: String,
    pub count: usize,
    pub percentage: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub total_defects: usize,
    pub high_risk_count: usize,
    pub medium_risk_count: usize,
    pub normal_count: usize,
    pub total_objects: usize,
    pub total_pipelines: usize,
    pub average_depth_percent: Option<f64>,
}

/// Criticality or method distribution
#[derive(Debug, Clone, Serialize)]
pub struct DistributionView {
    pub total: usize,
    pub buckets: Vec<AggregateBucket>,
}

/// Page of normalized defects
#[derive(Debug, Clone, Serialize)]
pub struct DefectList {
    pub total: usize,
    pub defects: Vec<CanonicalDefect>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MapPoint {
    pub id: String,
    pub lat: f64,
    pub lng: f64,
    pub risk_class: RiskClass,
    pub method: Method,
    pub segment: Option<i64>,
    pub pipeline: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MapPointList {
    pub total: usize,
    pub points: Vec<MapPoint>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub message: String,
    pub risk_class: RiskClass,
    pub date: String,
    pub segment: Option<i64>,
    pub pipeline: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NotificationList {
    pub total_critical: usize,
    pub notifications: Vec<Notification>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ObjectSummary {
    pub segment: Option<i64>,
    pub name: String,
    pub pipeline: Option<String>,
    pub defect_count: usize,
    pub critical_count: usize,
    pub criticality: RiskClass,
}

#[derive(Debug, Clone, Serialize)]
pub struct ObjectList {
    pub total: usize,
    pub objects: Vec<ObjectSummary>,
}

/// Synthetic object reconstructed from the defects of one segment
#[derive(Debug, Clone, Serialize)]
pub struct ObjectDetail {
    pub segment: i64,
    pub name: String,
    pub pipeline: Option<String>,
    pub criticality: RiskClass,
    pub vintage: i64,
    pub material: String,
    pub defect_count: usize,
    pub critical_count: usize,
    /// Fields derived from the segment number rather than measured
    pub placeholder_fields: Vec<String>,
    pub defects: Vec<CanonicalDefect>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    ImmediateRepair,
    PlannedRepair,
    EnhancedMonitoring,
}

#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub priority: RiskClass,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecommendationList {
    pub recommendations: Vec<Recommendation>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrendPoint {
    pub year: i32,
    pub defects: u64,
}

/// Placeholder trend. `synthetic` is always true until real history exists.
#[derive(Debug, Clone, Serialize)]
pub struct TrendSeries {
    pub synthetic: bool,
    pub anchor_total: usize,
    pub points: Vec<TrendPoint>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompareRow {
    pub segment: i64,
    pub pipeline: Option<String>,
    pub vintage: i64,
    pub material: String,
    pub inspection_count: usize,
    pub defect_count: usize,
    pub criticality: RiskClass,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompareView {
    pub max_objects: usize,
    pub rows: Vec<CompareRow>,
}

/// Upstream summary counters re-keyed through the taxonomy
#[derive(Debug, Clone, Serialize)]
pub struct SummaryView {
    pub total_defects: u64,
    pub total_segments: u64,
    pub average_depth_percent: Option<f64>,
    pub by_severity: Vec<AggregateBucket>,
    pub by_method: Vec<AggregateBucket>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardOverview {
    pub stats: DashboardStats,
    pub criticality: DistributionView,
    pub methods: DistributionView,
}

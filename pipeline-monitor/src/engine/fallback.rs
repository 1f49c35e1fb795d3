//! Static fallback payloads
//!
//! One provider per read view. Each returns the same shape its live builder
//! produces, with empty or zero content, so a dashboard widget can always
//! render.

use super::views::{object_name, placeholder_material, placeholder_vintage, TREND_YEARS};
use crate::models::{
    AggregateBucket, CompareView, DashboardStats, DefectList, DistributionView, MapPointList, NotificationList,
    ObjectDetail, ObjectList, RecommendationList, RiskClass, SummaryView, TrendPoint, TrendSeries,
};

pub fn dashboard_stats() -> DashboardStats {
    DashboardStats {
        total_defects: 0,
        high_risk_count: 0,
        medium_risk_count: 0,
        normal_count: 0,
        total_objects: 0,
        total_pipelines: 0,
        average_depth_percent: None,
    }
}

pub fn criticality_distribution() -> DistributionView {
    DistributionView {
        total: 0,
        buckets: zero_severity_buckets(),
    }
}

pub fn method_distribution() -> DistributionView {
    DistributionView {
        total: 0,
        buckets: Vec::new(),
    }
}

pub fn defect_list() -> DefectList {
    DefectList {
        total: 0,
        defects: Vec::new(),
    }
}

pub fn map_points() -> MapPointList {
    MapPointList {
        total: 0,
        points: Vec::new(),
    }
}

pub fn notifications() -> NotificationList {
    NotificationList {
        total_critical: 0,
        notifications: Vec::new(),
    }
}

pub fn object_list() -> ObjectList {
    ObjectList {
        total: 0,
        objects: Vec::new(),
    }
}

/// Placeholder object for the requested segment
pub fn object_detail(segment: i64) -> ObjectDetail {
    ObjectDetail {
        segment,
        name: object_name(Some(segment)),
        pipeline: None,
        criticality: RiskClass::Normal,
        vintage: placeholder_vintage(segment),
        material: placeholder_material(segment).to_string(),
        defect_count: 0,
        critical_count: 0,
        placeholder_fields: vec!["vintage".to_string(), "material".to_string()],
        defects: Vec::new(),
    }
}

pub fn recommendations() -> RecommendationList {
    RecommendationList {
        recommendations: Vec::new(),
    }
}

pub fn trend_series(current_year: i32) -> TrendSeries {
    let first_year = current_year - (TREND_YEARS as i32 - 1);
    TrendSeries {
        synthetic: true,
        anchor_total: 0,
        points: (0..TREND_YEARS as i32)
            .map(|i| TrendPoint {
                year: first_year + i,
                defects: 0,
            })
            .collect(),
    }
}

pub fn compare(max_objects: usize) -> CompareView {
    CompareView {
        max_objects,
        rows: Vec::new(),
    }
}

pub fn summary() -> SummaryView {
    SummaryView {
        total_defects: 0,
        total_segments: 0,
        average_depth_percent: None,
        by_severity: zero_severity_buckets(),
        by_method: Vec::new(),
    }
}

fn zero_severity_buckets() -> Vec<AggregateBucket> {
    RiskClass::ORDER
        .iter()
        .map(|class| AggregateBucket {
            key: class.as_str().to_string(),
            count: 0,
            percentage: 0,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::normalize::normalize_batch;
    use crate::engine::views::{self, MapFilter};
    use crate::models::{CanonicalDefect, InspectionSummary};
    use serde::Serialize;
    use serde_json::{json, Value};
    use std::collections::BTreeMap;

    /// Object key sets match at every level; array elements are compared
    /// wherever both sides have one.
    fn assert_same_shape(live: &Value, fallback: &Value, path: &str) {
        match (live, fallback) {
            (Value::Object(a), Value::Object(b)) => {
                let keys_a: Vec<_> = a.keys().collect();
                let keys_b: Vec<_> = b.keys().collect();
                assert_eq!(keys_a, keys_b, "key mismatch at {}", path);
                for key in a.keys() {
                    assert_same_shape(&a[key], &b[key], &format!("{}.{}", path, key));
                }
            }
            (Value::Array(a), Value::Array(b)) => {
                if let (Some(x), Some(y)) = (a.first(), b.first()) {
                    assert_same_shape(x, y, &format!("{}[0]", path));
                }
            }
            _ => {}
        }
    }

    fn check<T: Serialize, U: Serialize>(live: T, fallback: U, name: &str) {
        let live = serde_json::to_value(live).unwrap();
        let fallback = serde_json::to_value(fallback).unwrap();
        assert!(live.is_object() && fallback.is_object(), "{} is not an object", name);
        assert_same_shape(&live, &fallback, name);
    }

    fn sample() -> Vec<CanonicalDefect> {
        normalize_batch(vec![
            json!({
                "defect_id": "a", "segment_number": 3, "pipeline_id": "P1", "severity": "critical",
                "details": { "type": "коррозия", "parameters": { "depth_percent": 30 },
                             "location": { "latitude": 55.1, "longitude": 37.2, "timestamp": "2024-02-02" } }
            }),
            json!({ "defect_id": "b", "segment_number": 3, "severity": "low", "details": { "type": "dent" } }),
        ])
        .defects
    }

    #[test]
    fn test_every_fallback_matches_live_shape() {
        let records = sample();

        check(views::dashboard_stats(&records), dashboard_stats(), "stats");
        check(views::criticality_distribution(&records), criticality_distribution(), "criticality");
        check(views::method_distribution(&records), method_distribution(), "methods");
        check(views::defect_list(&records, None, 0), defect_list(), "defects");
        check(views::map_points(&records, &MapFilter::default()), map_points(), "map");
        check(views::notifications(&records, "2024-03-01"), notifications(), "notifications");
        check(views::object_list(&records, None, 0), object_list(), "objects");
        check(views::object_detail(&records, 3).unwrap(), object_detail(3), "object");
        check(views::recommendations(&records), recommendations(), "recommendations");
        check(views::trend_series(&records, 2026), trend_series(2026), "trends");
        check(views::compare(&records, &[3], 4), compare(4), "compare");

        let counters = InspectionSummary {
            total_defects: 2,
            defects_by_type: BTreeMap::from([("dent".to_string(), 2)]),
            defects_by_severity: BTreeMap::from([("low".to_string(), 2)]),
            total_segments: 1,
            average_depth_percent: Some(30.0),
        };
        check(views::summary_view(&counters), summary(), "summary");
    }

    #[test]
    fn test_fallback_distribution_has_all_severity_buckets() {
        let keys: Vec<_> = criticality_distribution().buckets.into_iter().map(|b| b.key).collect();
        assert_eq!(keys, ["normal", "medium", "high"]);
    }

    #[test]
    fn test_fallback_trend_still_marked_synthetic() {
        let series = trend_series(2026);
        assert!(series.synthetic);
        assert_eq!(series.points.len(), TREND_YEARS);
        assert_eq!(series.points.last().unwrap().year, 2026);
    }
}

//! Derived view builders
//!
//! Pure projections from normalized defects (plus request parameters) to
//! the payloads in `models::views`. Nothing here performs I/O.

use super::aggregate::{
    average_depth_percent, compute_critical_count, count_risk, distinct_pipelines, distribution_by,
    find_segment, group_by_segment, Dimension, SegmentGroup, Tally,
};
use super::taxonomy::{normalize_method, normalize_severity};
use crate::models::{
    CanonicalDefect, CompareRow, CompareView, DashboardStats, DefectList, DistributionView, InspectionSummary,
    MapPoint, MapPointList, Method, Notification, NotificationList, ObjectDetail, ObjectList,
    ObjectSummary, Recommendation, RecommendationKind, RecommendationList, RiskClass, SummaryView,
    TrendPoint, TrendSeries,
};

pub const NOTIFICATION_LIMIT: usize = 10;
pub const TREND_YEARS: usize = 5;

/// Base year of the placeholder vintage
const VINTAGE_BASE_YEAR: i64 = 1985;
const VINTAGE_SPAN: i64 = 30;
const PLACEHOLDER_MATERIALS: [&str; 3] = ["steel 17G1S", "steel 09G2S", "steel 13G1S-U"];

/// Multipliers applied to the current total, oldest year first
const TREND_FACTORS: [f64; TREND_YEARS] = [1.32, 1.24, 1.15, 1.06, 1.0];

pub fn dashboard_stats(records: &[CanonicalDefect]) -> DashboardStats {
    DashboardStats {
        total_defects: records.len(),
        high_risk_count: compute_critical_count(records),
        medium_risk_count: count_risk(records, RiskClass::Medium),
        normal_count: count_risk(records, RiskClass::Normal),
        total_objects: group_by_segment(records)
            .iter()
            .filter(|g| g.segment.is_some())
            .count(),
        total_pipelines: distinct_pipelines(records),
        average_depth_percent: average_depth_percent(records),
    }
}

pub fn criticality_distribution(records: &[CanonicalDefect]) -> DistributionView {
    DistributionView {
        total: records.len(),
        buckets: distribution_by(records, Dimension::Severity),
    }
}

pub fn method_distribution(records: &[CanonicalDefect]) -> DistributionView {
    DistributionView {
        total: records.len(),
        buckets: distribution_by(records, Dimension::Method),
    }
}

pub fn defect_list(records: &[CanonicalDefect], limit: Option<usize>, skip: usize) -> DefectList {
    DefectList {
        total: records.len(),
        defects: records
            .iter()
            .skip(skip)
            .take(limit.unwrap_or(usize::MAX))
            .cloned()
            .collect(),
    }
}

/// Filters accepted by the map view
#[derive(Debug, Clone, Default)]
pub struct MapFilter {
    pub criticality: Option<RiskClass>,
    pub method: Option<Method>,
    pub limit: Option<usize>,
}

pub fn map_points(records: &[CanonicalDefect], filter: &MapFilter) -> MapPointList {
    let points: Vec<MapPoint> = records
        .iter()
        .filter(|r| filter.criticality.map_or(true, |c| r.risk_class == c))
        .filter(|r| filter.method.map_or(true, |m| r.method == m))
        .filter_map(|r| {
            let (lat, lng) = r.coordinates()?;
            Some(MapPoint {
                id: r.defect_id.clone(),
                lat,
                lng,
                risk_class: r.risk_class,
                method: r.method,
                segment: r.segment_number,
                pipeline: r.pipeline_id.clone(),
            })
        })
        .take(filter.limit.unwrap_or(usize::MAX))
        .collect();

    MapPointList {
        total: points.len(),
        points,
    }
}

/// High-risk records, newest first by date, at most [`NOTIFICATION_LIMIT`].
/// `today` (`YYYY-MM-DD`) stands in for records without a timestamp.
pub fn notifications(records: &[CanonicalDefect], today: &str) -> NotificationList {
    let mut critical: Vec<(&str, &CanonicalDefect)> = records
        .iter()
        .filter(|r| r.is_high_risk())
        .map(|r| (r.date().unwrap_or(today), r))
        .collect();
    let total_critical = critical.len();

    critical.sort_by(|a, b| b.0.cmp(a.0));

    let notifications = critical
        .into_iter()
        .take(NOTIFICATION_LIMIT)
        .map(|(date, r)| Notification {
            id: r.defect_id.clone(),
            title: "Critical defect detected".to_string(),
            message: notification_message(r),
            risk_class: r.risk_class,
            date: date.to_string(),
            segment: r.segment_number,
            pipeline: r.pipeline_id.clone(),
        })
        .collect();

    NotificationList {
        total_critical,
        notifications,
    }
}

fn notification_message(defect: &CanonicalDefect) -> String {
    let kind = defect.defect_type.as_deref().unwrap_or("defect");
    let mut message = match defect.segment_number {
        Some(segment) => format!("{} on segment {}", kind, segment),
        None => kind.to_string(),
    };
    if let Some(pipeline) = &defect.pipeline_id {
        message.push_str(&format!(", pipeline {}", pipeline));
    }
    if let Some(depth) = defect.parameters.depth_percent {
        message.push_str(&format!(", depth {}%", depth));
    }
    message
}

pub fn object_list(records: &[CanonicalDefect], limit: Option<usize>, skip: usize) -> ObjectList {
    let groups = group_by_segment(records);
    let total = groups.len();

    let objects = groups
        .iter()
        .skip(skip)
        .take(limit.unwrap_or(usize::MAX))
        .map(|g| ObjectSummary {
            segment: g.segment,
            name: object_name(g.segment),
            pipeline: g.pipeline(),
            defect_count: g.total,
            critical_count: g.critical_count,
            criticality: g.criticality(),
        })
        .collect();

    ObjectList { total, objects }
}

/// `None` when no record carries the segment
pub fn object_detail(records: &[CanonicalDefect], segment: i64) -> Option<ObjectDetail> {
    let group = find_segment(records, segment)?;

    Some(ObjectDetail {
        segment,
        name: object_name(Some(segment)),
        pipeline: group.pipeline(),
        criticality: group.criticality(),
        vintage: placeholder_vintage(segment),
        material: placeholder_material(segment).to_string(),
        defect_count: group.total,
        critical_count: group.critical_count,
        placeholder_fields: vec!["vintage".to_string(), "material".to_string()],
        defects: group.defects(),
    })
}

pub fn recommendations(records: &[CanonicalDefect]) -> RecommendationList {
    let total = records.len();
    let critical = compute_critical_count(records);
    let mut recommendations = Vec::new();

    if critical > 0 {
        recommendations.push(Recommendation {
            kind: RecommendationKind::ImmediateRepair,
            priority: RiskClass::High,
            title: "Immediate repair required".to_string(),
            description: format!("{} critical defect(s) require repair without delay", critical),
        });
    }
    if total > 10 {
        recommendations.push(Recommendation {
            kind: RecommendationKind::PlannedRepair,
            priority: RiskClass::Medium,
            title: "Planned repair".to_string(),
            description: format!("{} defects recorded; schedule a repair campaign", total),
        });
    }
    if total > 0 {
        recommendations.push(Recommendation {
            kind: RecommendationKind::EnhancedMonitoring,
            priority: RiskClass::Normal,
            title: "Enhanced monitoring".to_string(),
            description: "Increase inspection frequency on affected segments".to_string(),
        });
    }

    RecommendationList { recommendations }
}

/// Placeholder series ending at `current_year` with the current total.
/// Not measured history.
pub fn trend_series(records: &[CanonicalDefect], current_year: i32) -> TrendSeries {
    let anchor_total = records.len();
    let first_year = current_year - (TREND_YEARS as i32 - 1);

    let points = TREND_FACTORS
        .iter()
        .enumerate()
        .map(|(i, factor)| TrendPoint {
            year: first_year + i as i32,
            defects: (anchor_total as f64 * factor).round() as u64,
        })
        .collect();

    TrendSeries {
        synthetic: true,
        anchor_total,
        points,
    }
}

/// Rows for the requested segments in request order. Unknown segments are
/// skipped; callers bound `segments` by `max_objects`.
pub fn compare(records: &[CanonicalDefect], segments: &[i64], max_objects: usize) -> CompareView {
    let groups = group_by_segment(records);

    let rows = segments
        .iter()
        .take(max_objects)
        .filter_map(|segment| groups.iter().find(|g| g.segment == Some(*segment)))
        .map(compare_row)
        .collect();

    CompareView { max_objects, rows }
}

fn compare_row(group: &SegmentGroup<'_>) -> CompareRow {
    let segment = group.segment.unwrap_or_default();
    CompareRow {
        segment,
        pipeline: group.pipeline(),
        vintage: placeholder_vintage(segment),
        material: placeholder_material(segment).to_string(),
        inspection_count: group.inspection_count(),
        defect_count: group.total,
        criticality: group.criticality(),
    }
}

/// Upstream counters re-keyed through the shared taxonomy
pub fn summary_view(summary: &InspectionSummary) -> SummaryView {
    let order: Vec<String> = RiskClass::ORDER.iter().map(|r| r.as_str().to_string()).collect();
    let mut by_severity = Tally::with_fixed_order(&order);
    for (label, count) in &summary.defects_by_severity {
        by_severity.add(normalize_severity(Some(label)).as_str(), *count as usize);
    }

    let mut by_method = Tally::default();
    for (label, count) in &summary.defects_by_type {
        by_method.add(normalize_method(Some(label)).as_str(), *count as usize);
    }

    SummaryView {
        total_defects: summary.total_defects,
        total_segments: summary.total_segments,
        average_depth_percent: summary.average_depth_percent,
        by_severity: by_severity.into_buckets(),
        by_method: by_method.into_buckets(),
    }
}

pub fn placeholder_vintage(segment: i64) -> i64 {
    VINTAGE_BASE_YEAR + segment.rem_euclid(VINTAGE_SPAN)
}

pub fn placeholder_material(segment: i64) -> &'static str {
    PLACEHOLDER_MATERIALS[segment.rem_euclid(PLACEHOLDER_MATERIALS.len() as i64) as usize]
}

pub fn object_name(segment: Option<i64>) -> String {
    match segment {
        Some(segment) => format!("Segment {}", segment),
        None => "Unsegmented defects".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::normalize::normalize_batch;
    use serde_json::{json, Value};
    use std::collections::BTreeMap;

    fn defects(values: Vec<Value>) -> Vec<CanonicalDefect> {
        normalize_batch(values).defects
    }

    fn located(id: &str, severity: &str, kind: &str, ts: Option<&str>) -> Value {
        json!({
            "defect_id": id,
            "segment_number": 1,
            "severity": severity,
            "details": {
                "type": kind,
                "location": { "latitude": 55.0, "longitude": 37.0, "timestamp": ts }
            }
        })
    }

    #[test]
    fn test_defect_list_pagination() {
        let records = defects((0..5).map(|i| json!({ "defect_id": format!("d{}", i) })).collect());
        let page = defect_list(&records, Some(2), 3);
        assert_eq!(page.total, 5);
        let ids: Vec<_> = page.defects.iter().map(|d| d.defect_id.as_str()).collect();
        assert_eq!(ids, ["d3", "d4"]);
    }

    #[test]
    fn test_record_without_location_counted_but_not_mapped() {
        let records = defects(vec![
            located("a", "high", "коррозия", None),
            json!({ "defect_id": "b", "severity": "high", "segment_number": 2 }),
        ]);

        let stats = dashboard_stats(&records);
        assert_eq!(stats.total_defects, 2);
        assert_eq!(stats.high_risk_count, 2);
        assert_eq!(stats.total_objects, 2);

        let map = map_points(&records, &MapFilter::default());
        assert_eq!(map.total, 1);
        assert_eq!(map.points[0].id, "a");
    }

    #[test]
    fn test_map_requires_both_coordinates() {
        let records = defects(vec![json!({
            "details": { "location": { "latitude": 55.0, "timestamp": "2024-01-01" } }
        })]);
        assert!(map_points(&records, &MapFilter::default()).points.is_empty());
    }

    #[test]
    fn test_map_filters() {
        let records = defects(vec![
            located("a", "high", "коррозия", None),
            located("b", "high", "вмятина", None),
            located("c", "low", "вмятина", None),
        ]);

        let filter = MapFilter {
            criticality: Some(RiskClass::High),
            method: Some(Method::Vik),
            limit: None,
        };
        let ids: Vec<_> = map_points(&records, &filter).points.into_iter().map(|p| p.id).collect();
        assert_eq!(ids, ["b"]);

        let limited = map_points(&records, &MapFilter { limit: Some(2), ..Default::default() });
        assert_eq!(limited.total, 2);
    }

    #[test]
    fn test_notifications_newest_first_and_capped() {
        let mut values: Vec<Value> = (1..=12)
            .map(|day| located(&format!("d{}", day), "critical", "crack", Some(format!("2024-05-{:02}T12:00:00", day).as_str())))
            .collect();
        values.push(located("undated", "high", "crack", None));
        values.push(located("quiet", "low", "crack", Some("2030-01-01")));

        let records = defects(values);
        let list = notifications(&records, "2024-06-01");

        assert_eq!(list.total_critical, 13);
        assert_eq!(list.notifications.len(), NOTIFICATION_LIMIT);
        assert_eq!(list.notifications[0].id, "undated");
        assert_eq!(list.notifications[0].date, "2024-06-01");
        assert_eq!(list.notifications[1].id, "d12");
        assert_eq!(list.notifications[9].id, "d4");
        assert!(list.notifications.iter().all(|n| n.risk_class == RiskClass::High));
    }

    #[test]
    fn test_object_list_limit_returns_first_encountered() {
        let records = defects(vec![
            json!({ "segment_number": 5 }),
            json!({ "segment_number": 7 }),
            json!({ "segment_number": 5 }),
            json!({ "segment_number": 7 }),
            json!({ "segment_number": 7 }),
        ]);

        let all = object_list(&records, None, 0);
        assert_eq!(all.total, 2);
        assert_eq!(all.objects[0].defect_count, 2);
        assert_eq!(all.objects[1].defect_count, 3);

        let first = object_list(&records, Some(1), 0);
        assert_eq!(first.objects.len(), 1);
        assert_eq!(first.objects[0].segment, Some(5));

        let second = object_list(&records, Some(1), 1);
        assert_eq!(second.objects[0].segment, Some(7));
    }

    #[test]
    fn test_object_detail_criticality_iff_high_constituent() {
        let records = defects(vec![
            json!({ "segment_number": 4, "severity": "low" }),
            json!({ "segment_number": 4, "details": { "severity": "высокий" } }),
            json!({ "segment_number": 6, "severity": "medium" }),
        ]);

        let hot = object_detail(&records, 4).unwrap();
        assert_eq!(hot.criticality, RiskClass::High);
        assert_eq!(hot.critical_count, 1);
        assert_eq!(hot.defects.len(), 2);

        let calm = object_detail(&records, 6).unwrap();
        assert_eq!(calm.criticality, RiskClass::Normal);
        assert!(object_detail(&records, 99).is_none());
    }

    #[test]
    fn test_object_placeholders_are_deterministic() {
        let records = defects(vec![json!({ "segment_number": 47 })]);
        let detail = object_detail(&records, 47).unwrap();
        assert_eq!(detail.vintage, 1985 + 17);
        assert_eq!(detail.material, placeholder_material(47));
        assert_eq!(detail.placeholder_fields, ["vintage", "material"]);
        assert_eq!(placeholder_vintage(-1), 1985 + 29);
    }

    #[test]
    fn test_recommendation_rules_fire_independently() {
        let none = recommendations(&[]);
        assert!(none.recommendations.is_empty());

        let few = recommendations(&defects(vec![json!({ "severity": "low" })]));
        let kinds: Vec<_> = few.recommendations.iter().map(|r| r.kind).collect();
        assert_eq!(kinds, [RecommendationKind::EnhancedMonitoring]);

        let mut values: Vec<Value> = (0..11).map(|_| json!({ "severity": "low" })).collect();
        values.push(json!({ "severity": "critical" }));
        let many = recommendations(&defects(values));
        let kinds: Vec<_> = many.recommendations.iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            [
                RecommendationKind::ImmediateRepair,
                RecommendationKind::PlannedRepair,
                RecommendationKind::EnhancedMonitoring
            ]
        );
    }

    #[test]
    fn test_trend_series_is_flagged_and_anchored() {
        let records = defects((0..20).map(|_| json!({})).collect());
        let series = trend_series(&records, 2026);

        assert!(series.synthetic);
        assert_eq!(series.points.len(), TREND_YEARS);
        assert_eq!(series.points[0].year, 2022);
        let last = series.points.last().unwrap();
        assert_eq!(last.year, 2026);
        assert_eq!(last.defects, 20);
    }

    #[test]
    fn test_compare_rows_bounded_and_ordered() {
        let records = defects(vec![
            json!({ "segment_number": 1, "pipeline_id": "P1", "source_file": "a" }),
            json!({ "segment_number": 2, "severity": "critical" }),
            json!({ "segment_number": 3 }),
        ]);

        let view = compare(&records, &[3, 1, 42, 2], 3);
        let segments: Vec<_> = view.rows.iter().map(|r| r.segment).collect();
        assert_eq!(segments, [3, 1]);
        assert_eq!(view.rows[1].pipeline.as_deref(), Some("P1"));
        assert_eq!(view.rows[1].inspection_count, 1);

        let view = compare(&records, &[2], 4);
        assert_eq!(view.rows[0].criticality, RiskClass::High);
    }

    #[test]
    fn test_summary_rekeys_through_taxonomy() {
        let summary = InspectionSummary {
            total_defects: 9,
            defects_by_type: BTreeMap::from([
                ("коррозия".to_string(), 4),
                ("трещина".to_string(), 2),
                ("metal loss".to_string(), 1),
            ]),
            defects_by_severity: BTreeMap::from([
                ("высокий".to_string(), 2),
                ("critical".to_string(), 1),
                ("низкий".to_string(), 6),
            ]),
            total_segments: 3,
            average_depth_percent: Some(12.0),
        };

        let view = summary_view(&summary);
        let severity: Vec<_> = view.by_severity.iter().map(|b| (b.key.as_str(), b.count)).collect();
        assert_eq!(severity, [("normal", 6), ("medium", 0), ("high", 3)]);
        assert_eq!(view.by_method[0].key, "MFL");
        assert_eq!(view.by_method[0].count, 5);
    }
}

//! Aggregation engine
//!
//! Grouped counts, percentages and per-segment rollups over normalized
//! defects. All functions preserve input order where order is observable.

use std::collections::{HashMap, HashSet};

use crate::models::{AggregateBucket, CanonicalDefect, RiskClass};

/// Object criticality escalates to medium above this many defects
pub const MEDIUM_OBJECT_DEFECT_COUNT: usize = 5;

const UNKNOWN_KEY: &str = "unknown";

/// Dimension a distribution groups by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Severity,
    Method,
    Pipeline,
    Segment,
}

impl Dimension {
    pub fn key(&self, defect: &CanonicalDefect) -> String {
        match self {
            Dimension::Severity => defect.risk_class.as_str().to_string(),
            Dimension::Method => defect.method.as_str().to_string(),
            Dimension::Pipeline => defect
                .pipeline_id
                .clone()
                .unwrap_or_else(|| UNKNOWN_KEY.to_string()),
            Dimension::Segment => defect
                .segment_number
                .map(|s| s.to_string())
                .unwrap_or_else(|| UNKNOWN_KEY.to_string()),
        }
    }

    /// Buckets that always appear, in display order
    pub fn fixed_order(&self) -> Option<Vec<String>> {
        match self {
            Dimension::Severity => Some(RiskClass::ORDER.iter().map(|r| r.as_str().to_string()).collect()),
            _ => None,
        }
    }
}

/// Ordered counter keyed by bucket name
#[derive(Debug, Default)]
pub struct Tally {
    keys: Vec<String>,
    counts: Vec<usize>,
    index: HashMap<String, usize>,
    fixed: bool,
}

impl Tally {
    /// Counter whose listed keys appear even with a zero count and keep
    /// their listed order
    pub fn with_fixed_order(order: &[String]) -> Self {
        let mut tally = Self {
            fixed: true,
            ..Default::default()
        };
        for key in order {
            tally.slot(key);
        }
        tally
    }

    pub fn add(&mut self, key: &str, n: usize) {
        let slot = self.slot(key);
        self.counts[slot] += n;
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    fn slot(&mut self, key: &str) -> usize {
        if let Some(&slot) = self.index.get(key) {
            return slot;
        }
        let slot = self.keys.len();
        self.keys.push(key.to_string());
        self.counts.push(0);
        self.index.insert(key.to_string(), slot);
        slot
    }

    /// Fixed-order tallies keep their order; others sort by descending
    /// count with ties in first-seen order.
    pub fn into_buckets(self) -> Vec<AggregateBucket> {
        let total = self.total();
        let mut buckets: Vec<AggregateBucket> = self
            .keys
            .into_iter()
            .zip(self.counts)
            .map(|(key, count)| AggregateBucket {
                key,
                count,
                percentage: percentage(count, total),
            })
            .collect();

        if !self.fixed {
            // stable sort
            buckets.sort_by(|a, b| b.count.cmp(&a.count));
        }
        buckets
    }
}

pub fn percentage(count: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (count as f64 / total as f64 * 100.0).round() as u32
}

pub fn compute_distribution<F>(
    records: &[CanonicalDefect],
    group: F,
    fixed_order: Option<&[String]>,
) -> Vec<AggregateBucket>
where
    F: Fn(&CanonicalDefect) -> String,
{
    let mut tally = match fixed_order {
        Some(order) => Tally::with_fixed_order(order),
        None => Tally::default(),
    };
    for record in records {
        tally.add(&group(record), 1);
    }
    tally.into_buckets()
}

pub fn distribution_by(records: &[CanonicalDefect], dimension: Dimension) -> Vec<AggregateBucket> {
    let order = dimension.fixed_order();
    compute_distribution(records, |r| dimension.key(r), order.as_deref())
}

pub fn compute_critical_count(records: &[CanonicalDefect]) -> usize {
    count_risk(records, RiskClass::High)
}

pub fn count_risk(records: &[CanonicalDefect], class: RiskClass) -> usize {
    records.iter().filter(|r| r.risk_class == class).count()
}

pub fn distinct_pipelines(records: &[CanonicalDefect]) -> usize {
    records
        .iter()
        .filter_map(|r| r.pipeline_id.as_deref())
        .collect::<HashSet<_>>()
        .len()
}

/// Mean depth over records that report one, rounded to two decimals
pub fn average_depth_percent(records: &[CanonicalDefect]) -> Option<f64> {
    let depths: Vec<f64> = records.iter().filter_map(|r| r.parameters.depth_percent).collect();
    if depths.is_empty() {
        return None;
    }
    let mean = depths.iter().sum::<f64>() / depths.len() as f64;
    Some((mean * 100.0).round() / 100.0)
}

/// All defects sharing one segment number
#[derive(Debug, Clone)]
pub struct SegmentGroup<'a> {
    /// `None` collects records without a segment number
    pub segment: Option<i64>,
    pub total: usize,
    pub critical_count: usize,
    pub first: &'a CanonicalDefect,
    pub records: Vec<&'a CanonicalDefect>,
}

impl<'a> SegmentGroup<'a> {
    fn new(first: &'a CanonicalDefect) -> Self {
        Self {
            segment: first.segment_number,
            total: 0,
            critical_count: 0,
            first,
            records: Vec::new(),
        }
    }

    fn push(&mut self, record: &'a CanonicalDefect) {
        self.total += 1;
        if record.is_high_risk() {
            self.critical_count += 1;
        }
        self.records.push(record);
    }

    pub fn criticality(&self) -> RiskClass {
        if self.critical_count > 0 {
            RiskClass::High
        } else if self.total > MEDIUM_OBJECT_DEFECT_COUNT {
            RiskClass::Medium
        } else {
            RiskClass::Normal
        }
    }

    /// Pipeline of the first record, or of the first record that has one
    pub fn pipeline(&self) -> Option<String> {
        self.first
            .pipeline_id
            .clone()
            .or_else(|| self.records.iter().find_map(|r| r.pipeline_id.clone()))
    }

    /// Distinct source files; an object with defects counts at least one
    pub fn inspection_count(&self) -> usize {
        let files = self
            .records
            .iter()
            .filter_map(|r| r.source_file.as_deref())
            .collect::<HashSet<_>>()
            .len();
        if self.total > 0 {
            files.max(1)
        } else {
            0
        }
    }

    pub fn defects(&self) -> Vec<CanonicalDefect> {
        self.records.iter().map(|r| (*r).clone()).collect()
    }
}

/// Groups in order of first appearance
pub fn group_by_segment(records: &[CanonicalDefect]) -> Vec<SegmentGroup<'_>> {
    let mut groups: Vec<SegmentGroup<'_>> = Vec::new();
    let mut index: HashMap<Option<i64>, usize> = HashMap::new();

    for record in records {
        let slot = *index.entry(record.segment_number).or_insert_with(|| {
            groups.push(SegmentGroup::new(record));
            groups.len() - 1
        });
        groups[slot].push(record);
    }

    groups
}

pub fn find_segment(records: &[CanonicalDefect], segment: i64) -> Option<SegmentGroup<'_>> {
    group_by_segment(records)
        .into_iter()
        .find(|g| g.segment == Some(segment))
}

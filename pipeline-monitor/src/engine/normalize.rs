//! Record normalization
//!
//! Raw JSON records are decoded one at a time. Unusable field values are
//! read as missing. A record that is not an object, or whose sections are
//! not objects, is dropped and counted; the rest of the batch carries on.

use serde_json::Value;

use super::taxonomy::{normalize_method, normalize_severity};
use crate::models::{
    CanonicalDefect, DefectLocation, DefectParameters, RawDefectRecord, RawLocation, RawParameters,
};

/// Outcome of normalizing one upstream page
#[derive(Debug, Default)]
pub struct NormalizedBatch {
    pub defects: Vec<CanonicalDefect>,
    /// Records dropped as malformed
    pub dropped: usize,
}

impl NormalizedBatch {
    /// Every record of a non-empty batch was malformed
    pub fn is_unusable(&self) -> bool {
        self.defects.is_empty() && self.dropped > 0
    }
}

pub fn normalize_batch(records: Vec<Value>) -> NormalizedBatch {
    let mut batch = NormalizedBatch {
        defects: Vec::with_capacity(records.len()),
        dropped: 0,
    };

    for (index, value) in records.into_iter().enumerate() {
        if !value.is_object() {
            tracing::warn!("Dropping malformed record at position {}: not a JSON object", index);
            batch.dropped += 1;
            continue;
        }
        match serde_json::from_value::<RawDefectRecord>(value) {
            Ok(raw) => batch.defects.push(normalize_record(raw, index)),
            Err(e) => {
                tracing::warn!("Dropping malformed record at position {}: {}", index, e);
                batch.dropped += 1;
            }
        }
    }

    batch
}

/// Project one decoded record. `position` is its 0-based place in the batch
/// and names records that carry no id of their own.
pub fn normalize_record(raw: RawDefectRecord, position: usize) -> CanonicalDefect {
    let details = raw.details.unwrap_or_default();

    let severity = raw.severity.as_deref().or(details.severity.as_deref());

    CanonicalDefect {
        defect_id: raw
            .defect_id
            .unwrap_or_else(|| format!("defect-{}", position + 1)),
        segment_number: raw.segment_number,
        pipeline_id: raw.pipeline_id,
        risk_class: normalize_severity(severity),
        method: normalize_method(details.defect_type.as_deref()),
        defect_type: details.defect_type,
        parameters: details.parameters.map(project_parameters).unwrap_or_default(),
        location: details.location.and_then(project_location),
        source_file: raw.source_file,
    }
}

fn project_parameters(raw: RawParameters) -> DefectParameters {
    let extra = raw
        .extra
        .into_iter()
        .filter_map(|(key, value)| value.as_f64().map(|v| (key, v)))
        .collect();

    DefectParameters {
        depth_percent: raw.depth_percent,
        length_mm: raw.length_mm,
        width_mm: raw.width_mm,
        wall_thickness_mm: raw.wall_thickness_mm,
        extra,
    }
}

fn project_location(raw: RawLocation) -> Option<DefectLocation> {
    if raw.latitude.is_none() && raw.longitude.is_none() && raw.timestamp.is_none() {
        return None;
    }

    Some(DefectLocation {
        latitude: raw.latitude,
        longitude: raw.longitude,
        timestamp: raw.timestamp,
    })
}

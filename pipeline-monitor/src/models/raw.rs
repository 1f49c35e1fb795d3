//! Upstream inspection record model
//!
//! Records arrive loosely shaped: every field is optional, numbers may be
//! encoded as strings and identifiers may be either strings or numbers.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One defect record as delivered by the inspection-data source
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDefectRecord {
    #[serde(default, deserialize_with = "opt_label")]
    pub defect_id: Option<String>,
    #[serde(default, deserialize_with = "opt_i64")]
    pub segment_number: Option<i64>,
    #[serde(default, deserialize_with = "opt_label")]
    pub pipeline_id: Option<String>,
    #[serde(default, deserialize_with = "opt_label")]
    pub severity: Option<String>,
    #[serde(default)]
    pub details: Option<RawDetails>,
    #[serde(default, deserialize_with = "opt_label")]
    pub source_file: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDetails {
    #[serde(default, rename = "type", deserialize_with = "opt_label")]
    pub defect_type: Option<String>,
    #[serde(default, deserialize_with = "opt_label")]
    pub severity: Option<String>,
    #[serde(default)]
    pub parameters: Option<RawParameters>,
    #[serde(default)]
    pub location: Option<RawLocation>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawParameters {
    #[serde(default, deserialize_with = "opt_f64")]
    pub depth_percent: Option<f64>,
    #[serde(default, deserialize_with = "opt_f64")]
    pub length_mm: Option<f64>,
    #[serde(default, deserialize_with = "opt_f64")]
    pub width_mm: Option<f64>,
    #[serde(default, deserialize_with = "opt_f64")]
    pub wall_thickness_mm: Option<f64>,
    /// Any further measurements the source attaches
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawLocation {
    #[serde(default, deserialize_with = "opt_f64")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "opt_f64")]
    pub longitude: Option<f64>,
    #[serde(default, deserialize_with = "opt_label")]
    pub timestamp: Option<String>,
}

/// Response of `GET /defects`. Records stay as raw JSON until the
/// normalizing stage so a single bad record cannot fail the whole page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefectPage {
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub defects: Vec<Value>,
}

/// Response of `GET /summary`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InspectionSummary {
    #[serde(default)]
    pub total_defects: u64,
    #[serde(default)]
    pub defects_by_type: BTreeMap<String, u64>,
    #[serde(default)]
    pub defects_by_severity: BTreeMap<String, u64>,
    #[serde(default)]
    pub total_segments: u64,
    #[serde(default)]
    pub average_depth_percent: Option<f64>,
}

/// Filters accepted by the upstream defect query
#[derive(Debug, Clone, Default, Serialize)]
pub struct DefectQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segment: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defect_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<u32>,
}

impl DefectQuery {
    pub fn with_limit(limit: u32) -> Self {
        Self {
            limit: Some(limit),
            ..Default::default()
        }
    }

    pub fn segment(mut self, segment: Option<i64>) -> Self {
        self.segment = segment;
        self
    }

    pub fn defect_type(mut self, defect_type: Option<String>) -> Self {
        self.defect_type = defect_type;
        self
    }
}

// Lenient field decoders. A scalar that cannot be coerced becomes `None`
// so one bad field does not cost the rest of the record.

fn opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::Number(n)) => n.as_f64().filter(|v| v.is_finite()),
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(Value::String(s)) => match s.trim().replace(',', ".").parse::<f64>() {
            Ok(v) if v.is_finite() => Some(v),
            _ => ignored("number", &Value::String(s)),
        },
        Some(other) => ignored("number", &other),
    })
}

fn opt_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::Number(n)) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => Some(i),
            (None, Some(f)) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Some(f as i64),
            _ => ignored("integer", &Value::Number(n)),
        },
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(Value::String(s)) => match s.trim().parse::<i64>() {
            Ok(i) => Some(i),
            Err(_) => ignored("integer", &Value::String(s)),
        },
        Some(other) => ignored("integer", &other),
    })
}

fn opt_label<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(other) => ignored("text", &other),
    })
}

fn ignored<T>(expected: &str, found: &Value) -> Option<T> {
    tracing::warn!("Ignoring field value {}: expected {}", found, expected);
    None
}

//! Canonical defect model

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::AppError;

/// Canonical severity bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskClass {
    Normal,
    Medium,
    High,
}

impl RiskClass {
    /// Display order used by every severity distribution
    pub const ORDER: [RiskClass; 3] = [RiskClass::Normal, RiskClass::Medium, RiskClass::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskClass::Normal => "normal",
            RiskClass::Medium => "medium",
            RiskClass::High => "high",
        }
    }
}

impl fmt::Display for RiskClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RiskClass {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(RiskClass::Normal),
            "medium" => Ok(RiskClass::Medium),
            "high" => Ok(RiskClass::High),
            other => Err(AppError::ValidationError(format!(
                "unknown criticality '{}', expected normal|medium|high",
                other
            ))),
        }
    }
}

/// Canonical inspection-technique code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    /// Magnetic flux leakage
    Mfl,
    /// Ultrasonic testing
    Ut,
    /// Visual and measurement control
    Vik,
    /// Radiographic testing
    Rt,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Mfl => "MFL",
            Method::Ut => "UT",
            Method::Vik => "VIK",
            Method::Rt => "RT",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Method {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MFL" => Ok(Method::Mfl),
            "UT" => Ok(Method::Ut),
            "VIK" => Ok(Method::Vik),
            "RT" => Ok(Method::Rt),
            other => Err(AppError::ValidationError(format!(
                "unknown method '{}', expected MFL|UT|VIK|RT",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DefectParameters {
    pub depth_percent: Option<f64>,
    pub length_mm: Option<f64>,
    pub width_mm: Option<f64>,
    pub wall_thickness_mm: Option<f64>,
    /// Additional numeric measurements, keyed by upstream name
    pub extra: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DefectLocation {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub timestamp: Option<String>,
}

impl DefectLocation {
    /// Both coordinates, when present
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }

    /// `YYYY-MM-DD` prefix of the timestamp
    pub fn date(&self) -> Option<&str> {
        let ts = self.timestamp.as_deref()?;
        ts.get(..10).or(Some(ts))
    }
}

/// Normalized projection of one upstream record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalDefect {
    pub defect_id: String,
    pub segment_number: Option<i64>,
    pub pipeline_id: Option<String>,
    pub risk_class: RiskClass,
    pub method: Method,
    /// Upstream defect-type label, kept for display
    pub defect_type: Option<String>,
    pub parameters: DefectParameters,
    pub location: Option<DefectLocation>,
    pub source_file: Option<String>,
}

impl CanonicalDefect {
    pub fn is_high_risk(&self) -> bool {
        self.risk_class == RiskClass::High
    }

    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.location.as_ref().and_then(DefectLocation::coordinates)
    }

    pub fn date(&self) -> Option<&str> {
        self.location.as_ref().and_then(DefectLocation::date)
    }
}

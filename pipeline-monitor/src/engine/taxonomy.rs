//! Taxonomy normalizer
//!
//! The only place severity and defect-type vocabulary is mapped to
//! canonical classes. Lookups are exact and case-sensitive; anything not in
//! a table resolves to the documented default.

use crate::models::{Method, RiskClass};

/// Bilingual severity synonyms
pub const SEVERITY_SYNONYMS: &[(&str, RiskClass)] = &[
    ("critical", RiskClass::High),
    ("критичный", RiskClass::High),
    ("критический", RiskClass::High),
    ("высокий", RiskClass::High),
    ("high", RiskClass::High),
    ("средний", RiskClass::Medium),
    ("medium", RiskClass::Medium),
    ("низкий", RiskClass::Normal),
    ("low", RiskClass::Normal),
];

/// Defect-type phrases and the technique that detects them
pub const METHOD_SYNONYMS: &[(&str, Method)] = &[
    ("коррозия", Method::Mfl),
    ("corrosion", Method::Mfl),
    ("потеря металла", Method::Mfl),
    ("metal loss", Method::Mfl),
    ("металлический объект", Method::Mfl),
    ("metallic object", Method::Mfl),
    ("трещина", Method::Ut),
    ("crack", Method::Ut),
    ("расслоение", Method::Ut),
    ("delamination", Method::Ut),
    ("сварной шов", Method::Rt),
    ("weld seam", Method::Rt),
    ("вмятина", Method::Vik),
    ("dent", Method::Vik),
    ("деформация", Method::Vik),
    ("deformation", Method::Vik),
    ("царапина", Method::Vik),
    ("scratch", Method::Vik),
    ("износ", Method::Vik),
    ("wear", Method::Vik),
];

pub const DEFAULT_RISK_CLASS: RiskClass = RiskClass::Normal;
pub const DEFAULT_METHOD: Method = Method::Mfl;

pub fn normalize_severity(raw: Option<&str>) -> RiskClass {
    raw.and_then(|label| lookup(SEVERITY_SYNONYMS, label))
        .unwrap_or(DEFAULT_RISK_CLASS)
}

pub fn normalize_method(raw_type: Option<&str>) -> Method {
    raw_type
        .and_then(|label| lookup(METHOD_SYNONYMS, label))
        .unwrap_or(DEFAULT_METHOD)
}

fn lookup<T: Copy>(table: &[(&str, T)], label: &str) -> Option<T> {
    table
        .iter()
        .find(|(key, _)| *key == label)
        .map(|(_, value)| *value)
}

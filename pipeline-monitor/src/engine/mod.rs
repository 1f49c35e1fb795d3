//! Normalization and aggregation engine
//!
//! ```text
//!   ingest ──► taxonomy/normalize ──► aggregate ──► views ──► response
//!   └──────────────────── resilience (fallback) ─────────────────────┘
//! ```

pub mod taxonomy;
pub mod normalize;
pub mod aggregate;
pub mod views;
pub mod fallback;
pub mod resilience;

pub use resilience::{DataOrigin, ReadPipeline, ViewOutcome, ORIGIN_HEADER};

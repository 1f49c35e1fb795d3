//! Data models

pub mod raw;
pub mod defect;
pub mod views;
pub mod auth;

pub use raw::*;
pub use defect::*;
pub use views::*;
pub use auth::*;

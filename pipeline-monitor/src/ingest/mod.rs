//! Ingestion adapter
//!
//! Everything the service knows about the inspection-data source goes
//! through [`InspectionSource`]. Failures come back as [`SourceError`]
//! values; the read pipeline turns them into fallbacks, write handlers turn
//! them into error responses.

pub mod http;

use async_trait::async_trait;
use serde_json::Value;

use crate::models::{Credential, DefectPage, DefectQuery, InspectionSummary, LoginRequest, TokenResponse};

pub use http::HttpInspectionSource;

#[derive(Debug, Clone, thiserror::Error)]
pub enum SourceError {
    #[error("network error: {0}")]
    Network(String),
    #[error("source unavailable: {0}")]
    Unavailable(String),
    #[error("unauthorized")]
    Unauthorized,
    #[error("rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },
    #[error("parse error: {0}")]
    Parse(String),
}

/// Upstream resources that accept forwarded writes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Defects,
    Tasks,
    Favorites,
    Profile,
    Settings,
}

impl Resource {
    pub fn path(&self) -> &'static str {
        match self {
            Resource::Defects => "defects",
            Resource::Tasks => "tasks",
            Resource::Favorites => "favorites",
            Resource::Profile => "users/me/profile",
            Resource::Settings => "users/me/settings",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Create,
    Update,
    Delete,
}

/// A state-changing request forwarded to the data source
#[derive(Debug, Clone)]
pub struct Mutation {
    pub kind: MutationKind,
    pub resource: Resource,
    pub id: Option<String>,
    pub body: Option<Value>,
}

impl Mutation {
    pub fn create(resource: Resource, body: Value) -> Self {
        Self { kind: MutationKind::Create, resource, id: None, body: Some(body) }
    }

    pub fn update(resource: Resource, id: Option<String>, body: Value) -> Self {
        Self { kind: MutationKind::Update, resource, id, body: Some(body) }
    }

    pub fn delete(resource: Resource, id: String) -> Self {
        Self { kind: MutationKind::Delete, resource, id: Some(id), body: None }
    }

    /// Path relative to the source base URL
    pub fn path(&self) -> String {
        match &self.id {
            Some(id) => format!("{}/{}", self.resource.path(), id),
            None => self.resource.path().to_string(),
        }
    }
}

#[async_trait]
pub trait InspectionSource: Send + Sync {
    /// Raw defect records matching the query
    async fn fetch_defects(&self, query: &DefectQuery) -> Result<DefectPage, SourceError>;

    /// Summary counters
    async fn fetch_summary(&self) -> Result<InspectionSummary, SourceError>;

    /// Exchange a principal/secret pair for a bearer credential
    async fn issue_token(&self, login: &LoginRequest) -> Result<TokenResponse, SourceError>;

    /// Forward a write with the caller's credential
    async fn mutate(&self, mutation: Mutation, credential: &Credential) -> Result<Value, SourceError>;
}

//! HTTP client for the inspection-data API

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method as HttpMethod, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{InspectionSource, Mutation, MutationKind, SourceError};
use crate::config::Config;
use crate::models::{Credential, DefectPage, DefectQuery, InspectionSummary, LoginRequest, TokenResponse};

/// Inspection-data source backed by its REST API
pub struct HttpInspectionSource {
    base_url: String,
    http_client: reqwest::Client,
}

impl HttpInspectionSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, SourceError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SourceError::Network(e.to_string()))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http_client,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, SourceError> {
        Self::new(
            config.inspection_api_url.clone(),
            Duration::from_secs(config.inspection_api_timeout_seconds),
        )
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Target of a forwarded write. The id is pushed as one escaped path
    /// segment, so it can neither climb out of the resource nor add a query.
    fn mutation_url(&self, mutation: &Mutation) -> Result<Url, SourceError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| SourceError::Network(format!("invalid base url: {}", e)))?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| SourceError::Network("base url cannot carry a path".to_string()))?;
            segments.pop_if_empty().extend(mutation.resource.path().split('/'));
            if let Some(id) = &mutation.id {
                segments.push(id);
            }
        }
        Ok(url)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Response, SourceError> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() || e.is_connect() {
                SourceError::Unavailable(e.to_string())
            } else {
                SourceError::Network(e.to_string())
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response.text().await.unwrap_or_default();
        tracing::debug!("Inspection source returned {}: {}", status, message);

        Err(match status {
            StatusCode::UNAUTHORIZED => SourceError::Unauthorized,
            s if s.is_server_error() => SourceError::Unavailable(format!("status {}", s.as_u16())),
            s => SourceError::Rejected {
                status: s.as_u16(),
                message,
            },
        })
    }

    async fn json<T: DeserializeOwned>(response: Response) -> Result<T, SourceError> {
        response
            .json()
            .await
            .map_err(|e| SourceError::Parse(e.to_string()))
    }
}

#[async_trait]
impl InspectionSource for HttpInspectionSource {
    async fn fetch_defects(&self, query: &DefectQuery) -> Result<DefectPage, SourceError> {
        let request = self.http_client.get(self.url("defects")).query(query);
        let response = self.send(request).await?;
        Self::json(response).await
    }

    async fn fetch_summary(&self) -> Result<InspectionSummary, SourceError> {
        let response = self.send(self.http_client.get(self.url("summary"))).await?;
        Self::json(response).await
    }

    async fn issue_token(&self, login: &LoginRequest) -> Result<TokenResponse, SourceError> {
        let request = self.http_client.post(self.url("auth/token")).json(login);
        let response = self.send(request).await?;
        Self::json(response).await
    }

    async fn mutate(&self, mutation: Mutation, credential: &Credential) -> Result<Value, SourceError> {
        let method = match mutation.kind {
            MutationKind::Create => HttpMethod::POST,
            MutationKind::Update => HttpMethod::PUT,
            MutationKind::Delete => HttpMethod::DELETE,
        };

        let mut request = self
            .http_client
            .request(method, self.mutation_url(&mutation)?)
            .bearer_auth(credential.bearer());
        if let Some(body) = &mutation.body {
            request = request.json(body);
        }

        let response = self.send(request).await?;
        if response.status() == StatusCode::NO_CONTENT {
            return Ok(Value::Null);
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;
        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes).map_err(|e| SourceError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::Resource;

    #[test]
    fn test_url_joining() {
        let source = HttpInspectionSource::new("http://inspection.local/api/", Duration::from_secs(1)).unwrap();
        assert_eq!(source.url("defects"), "http://inspection.local/api/defects");
        assert_eq!(source.url("/summary"), "http://inspection.local/api/summary");
    }

    #[test]
    fn test_mutation_ids_stay_in_one_segment() {
        let source = HttpInspectionSource::new("http://up/api", Duration::from_secs(1)).unwrap();

        let url = source
            .mutation_url(&Mutation::delete(Resource::Defects, "../users/me/profile".into()))
            .unwrap();
        assert_eq!(url.as_str(), "http://up/api/defects/..%2Fusers%2Fme%2Fprofile");

        let url = source
            .mutation_url(&Mutation::delete(Resource::Tasks, "1?force=true#x".into()))
            .unwrap();
        assert_eq!(url.path(), "/api/tasks/1%3Fforce=true%23x");
        assert!(url.query().is_none());

        let url = source
            .mutation_url(&Mutation::update(Resource::Settings, None, serde_json::json!({})))
            .unwrap();
        assert_eq!(url.as_str(), "http://up/api/users/me/settings");
    }

    #[tokio::test]
    async fn test_unreachable_source_is_unavailable() {
        // Port 9 (discard) on localhost is expected to refuse connections
        let source = HttpInspectionSource::new("http://127.0.0.1:9", Duration::from_millis(500)).unwrap();
        let err = source.fetch_summary().await.unwrap_err();
        assert!(matches!(err, SourceError::Unavailable(_) | SourceError::Network(_)));
    }
}

//! I/O seam between the controllers and the dashboard backend.

use std::{future::Future, time::Duration};

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared::{
    error::{ErrorDetail, FetchError},
    protocol::{AskRequest, AskResponse, SalesRepPage},
};
use url::Url;

use crate::query::ListQuery;

#[async_trait]
pub trait SearchApi: Send + Sync {
    async fn search(&self, query: &ListQuery) -> Result<SalesRepPage, FetchError>;
}

#[async_trait]
pub trait AnswerApi: Send + Sync {
    async fn ask(&self, question: &str) -> Result<String, FetchError>;
}

/// Bounds `request` by `limit`, reporting expiry as [`FetchError::Timeout`].
pub async fn with_timeout<T, F>(limit: Duration, request: F) -> Result<T, FetchError>
where
    F: Future<Output = Result<T, FetchError>>,
{
    match tokio::time::timeout(limit, request).await {
        Ok(result) => result,
        Err(_) => Err(FetchError::Timeout(limit)),
    }
}

pub struct HttpDashboardApi {
    http: Client,
    base_url: String,
}

impl HttpDashboardApi {
    /// `base_url` is the API root, e.g. `http://localhost:8000/api`.
    pub fn new(base_url: &str) -> Result<Self> {
        let parsed = Url::parse(base_url.trim())
            .with_context(|| format!("invalid dashboard api url '{base_url}'"))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            anyhow::bail!("dashboard api url must be http(s), got '{}'", parsed.scheme());
        }
        Ok(Self {
            http: Client::new(),
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }
}

#[async_trait]
impl SearchApi for HttpDashboardApi {
    async fn search(&self, query: &ListQuery) -> Result<SalesRepPage, FetchError> {
        let response = self
            .http
            .get(self.endpoint("sales-reps"))
            .query(&query.pairs())
            .send()
            .await
            .map_err(network_error)?;
        decode_json(ensure_success(response).await?).await
    }
}

#[async_trait]
impl AnswerApi for HttpDashboardApi {
    async fn ask(&self, question: &str) -> Result<String, FetchError> {
        let response = self
            .http
            .post(self.endpoint("ai"))
            .json(&AskRequest {
                question: question.to_string(),
            })
            .send()
            .await
            .map_err(network_error)?;
        let body: AskResponse = decode_json(ensure_success(response).await?).await?;
        Ok(body.answer)
    }
}

fn network_error(err: reqwest::Error) -> FetchError {
    FetchError::Network(err.to_string())
}

async fn ensure_success(response: Response) -> Result<Response, FetchError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let detail = response
        .json::<ErrorDetail>()
        .await
        .ok()
        .and_then(|body| body.detail);
    Err(FetchError::Server {
        status: status.as_u16(),
        detail,
    })
}

async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T, FetchError> {
    let bytes = response.bytes().await.map_err(network_error)?;
    serde_json::from_slice(&bytes).map_err(|e| FetchError::MalformedResponse(e.to_string()))
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;

// HTTP repository implementation against the echogram backend
use crate::application::acoustic_repository::{AcousticRepository, EchogramContent, FetchError};
use crate::domain::query::EchogramQuery;
use crate::domain::trajectory::AcousticPayload;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpAcousticRepository {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct BackendError {
    error: String,
}

impl HttpAcousticRepository {
    pub fn new(base_url: String, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn acoustic_data_url(&self) -> String {
        format!("{}/api/acoustic-data", self.base_url)
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, FetchError> {
        tracing::debug!("GET {}", url);
        let response = self.client.get(url).send().await.map_err(|e| FetchError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            // the backend wraps failures as {"error": "..."}
            let message = serde_json::from_str::<BackendError>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl AcousticRepository for HttpAcousticRepository {
    async fn fetch_acoustic_data(&self) -> Result<AcousticPayload, FetchError> {
        let url = self.acoustic_data_url();
        let response = self.get(&url).await?;
        let text = response.text().await.map_err(|e| FetchError::Transport {
            url: url.clone(),
            message: e.to_string(),
        })?;

        serde_json::from_str(&text).map_err(|e| {
            let preview: String = text.chars().take(500).collect();
            tracing::error!("Unparseable acoustic data, response starts with: {}", preview);
            FetchError::Decode {
                url,
                message: e.to_string(),
            }
        })
    }

    async fn fetch_echogram(&self, query: &EchogramQuery) -> Result<EchogramContent, FetchError> {
        let url = query.to_url(&self.base_url);
        let response = self.get(&url).await?;
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await.map_err(|e| FetchError::Transport {
            url: url.clone(),
            message: e.to_string(),
        })?;

        tracing::debug!("Received {} bytes of echogram content from {}", body.len(), url);
        Ok(EchogramContent::new(content_type, body))
    }
}

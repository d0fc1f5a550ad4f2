// Repository trait for the acoustic backend
use crate::domain::query::EchogramQuery;
use crate::domain::trajectory::AcousticPayload;
use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },
    #[error("{url} responded with status {status}: {message}")]
    Status { url: String, status: u16, message: String },
    #[error("could not decode response from {url}: {message}")]
    Decode { url: String, message: String },
}

/// Rendered echogram as returned by the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct EchogramContent {
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl EchogramContent {
    pub fn new(content_type: Option<String>, body: Bytes) -> Self {
        Self { content_type, body }
    }

    /// File extension matching the content type, `html` when the backend does not say.
    pub fn extension(&self) -> &'static str {
        let Some(content_type) = self.content_type.as_deref() else {
            return "html";
        };
        let mime = content_type.split(';').next().unwrap_or_default().trim();
        match mime {
            "text/html" => "html",
            "image/png" => "png",
            "image/jpeg" => "jpg",
            "image/svg+xml" => "svg",
            "application/json" => "json",
            _ => "bin",
        }
    }
}

#[async_trait]
pub trait AcousticRepository: Send + Sync {
    /// Fetch the raw trajectory payload
    async fn fetch_acoustic_data(&self) -> Result<AcousticPayload, FetchError>;

    /// Fetch the rendered echogram for a query
    async fn fetch_echogram(&self, query: &EchogramQuery) -> Result<EchogramContent, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_from_content_type() {
        let html = EchogramContent::new(Some("text/html; charset=utf-8".into()), Bytes::new());
        assert_eq!(html.extension(), "html");
        let png = EchogramContent::new(Some("image/png".into()), Bytes::new());
        assert_eq!(png.extension(), "png");
        let unknown = EchogramContent::new(Some("application/octet-stream".into()), Bytes::new());
        assert_eq!(unknown.extension(), "bin");
        assert_eq!(EchogramContent::new(None, Bytes::new()).extension(), "html");
    }
}

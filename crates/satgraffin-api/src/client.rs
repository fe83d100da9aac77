//! HTTP client for the SatGraffin query endpoint

use async_trait::async_trait;

use crate::{
    error::Result,
    types::{QueryRequest, QueryResponse},
};

/// Fixed path of the query endpoint, appended to the configured base URL
const QUERY_PATH: &str = "/api/query";

/// Seam between the conversation driver and the backend.
///
/// The production implementation is [`QueryClient`]; tests substitute an
/// in-process fake so request cycles can run without a network.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Perform exactly one request/response cycle. No retries.
    async fn query(&self, query: &str, user_id: &str) -> Result<QueryResponse>;
}

/// reqwest-backed backend client
pub struct QueryClient {
    client: reqwest::Client,
    base_url: String,
}

impl QueryClient {
    /// Create a client targeting the given base URL (trailing slashes stripped)
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    /// The configured base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, QUERY_PATH)
    }
}

#[async_trait]
impl Backend for QueryClient {
    async fn query(&self, query: &str, user_id: &str) -> Result<QueryResponse> {
        let url = self.endpoint();
        let request = QueryRequest::new(query, user_id);

        tracing::debug!("SatGraffin query URL: {}", url);

        let response = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(crate::Error::Status(status.as_u16()));
        }

        // Read the body as text first so a malformed payload surfaces as a
        // JSON fault rather than a generic decode error.
        let text = response.text().await?;
        let body: QueryResponse = serde_json::from_str(&text)?;
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_fixed_path() {
        let client = QueryClient::new("http://localhost:8000");
        assert_eq!(client.endpoint(), "http://localhost:8000/api/query");
    }

    #[test]
    fn test_trailing_slash_stripped() {
        let client = QueryClient::new("http://localhost:8000///");
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(client.endpoint(), "http://localhost:8000/api/query");
    }
}

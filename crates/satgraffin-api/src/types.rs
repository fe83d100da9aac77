//! Request and response shapes for the SatGraffin query endpoint

use serde::{Deserialize, Deserializer, Serialize};

/// Body of a POST to `/api/query`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    /// The user's question, already trimmed
    pub query: String,
    /// Opaque caller identity, generated client-side
    pub user_id: String,
}

impl QueryRequest {
    /// Create a new request body
    pub fn new(query: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            user_id: user_id.into(),
        }
    }
}

/// Successful response body from `/api/query`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryResponse {
    /// Generated answer text
    pub response: String,
    /// URLs backing the answer; absent or null collapses to empty
    #[serde(default, deserialize_with = "links_or_empty")]
    pub source_links: Vec<String>,
}

fn links_or_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let links = Option::<Vec<String>>::deserialize(deserializer)?;
    Ok(links.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_shape() {
        let req = QueryRequest::new("List MOSDAC missions", "web-123");
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"query": "List MOSDAC missions", "user_id": "web-123"})
        );
    }

    #[test]
    fn test_response_with_links() {
        let body = r#"{"response": "Mission A, Mission B", "source_links": ["https://mosdac.gov.in/a"]}"#;
        let resp: QueryResponse = serde_json::from_str(body).unwrap();
        assert_eq!(resp.response, "Mission A, Mission B");
        assert_eq!(resp.source_links, vec!["https://mosdac.gov.in/a"]);
    }

    #[test]
    fn test_response_missing_links_defaults_empty() {
        let resp: QueryResponse = serde_json::from_str(r#"{"response": "ok"}"#).unwrap();
        assert!(resp.source_links.is_empty());
    }

    #[test]
    fn test_response_null_links_defaults_empty() {
        let resp: QueryResponse =
            serde_json::from_str(r#"{"response": "ok", "source_links": null}"#).unwrap();
        assert!(resp.source_links.is_empty());
    }

    #[test]
    fn test_response_without_response_field_is_error() {
        assert!(serde_json::from_str::<QueryResponse>(r#"{"source_links": []}"#).is_err());
    }
}

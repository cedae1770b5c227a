//! Web search via the Tavily API
//!
//! This is the one concrete tool the bundled MCP server exposes. Argument
//! clamping happens here, at the tool boundary, not in the bridge.

use crate::types::{AppError, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, error};

pub const DEFAULT_BASE_URL: &str = "https://api.tavily.com";
pub const DEFAULT_MAX_RESULTS: u32 = 5;
pub const MAX_RESULTS_LIMIT: u32 = 20;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// How hard the provider should look
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum SearchDepth {
    #[default]
    Basic,
    Advanced,
}

impl SearchDepth {
    /// Unknown depths fall back to `basic`
    pub fn parse_lenient(value: Option<&str>) -> Self {
        match value {
            Some("advanced") => SearchDepth::Advanced,
            _ => SearchDepth::Basic,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchDepth::Basic => "basic",
            SearchDepth::Advanced => "advanced",
        }
    }
}

/// Arguments of the `tavily_search` tool as the model sends them
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct SearchParams {
    /// The search query string
    pub query: String,
    /// Maximum number of results to return (1-20, default: 5)
    #[serde(default, deserialize_with = "lenient_count")]
    #[schemars(with = "Option<i64>")]
    pub max_results: Option<i64>,
    /// "basic" for quick results or "advanced" for a more comprehensive search (default: "basic")
    #[serde(default)]
    pub search_depth: Option<String>,
}

/// Accept integers, floats (truncated) and integer strings; models send all three
fn lenient_count<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;

    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("max_results out of range: {}", n))),
        Some(Value::String(s)) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("max_results must be an integer, got \"{}\"", s))),
        Some(other) => Err(D::Error::custom(format!(
            "max_results must be an integer, got {}",
            other
        ))),
    }
}

/// A search request after clamping and defaulting
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub query: String,
    pub max_results: u32,
    pub search_depth: SearchDepth,
}

impl SearchParams {
    /// Validate the query, clamp `max_results` to [1, 20] and default the depth
    pub fn normalized(&self) -> Result<SearchRequest> {
        let query = self.query.trim();
        if query.is_empty() {
            return Err(AppError::InvalidInput(
                "Query parameter is required and must be a non-empty string".to_string(),
            ));
        }

        let max_results = self
            .max_results
            .unwrap_or(DEFAULT_MAX_RESULTS as i64)
            .clamp(1, MAX_RESULTS_LIMIT as i64) as u32;

        Ok(SearchRequest {
            query: query.to_string(),
            max_results,
            search_depth: SearchDepth::parse_lenient(self.search_depth.as_deref()),
        })
    }
}

/// One hit returned by the provider
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct SearchHit {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub score: f64,
}

/// Provider response body
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct SearchResponse {
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub results: Vec<SearchHit>,
}

#[derive(Serialize)]
struct SearchPayload<'a> {
    api_key: &'a str,
    query: &'a str,
    max_results: u32,
    search_depth: &'static str,
    include_answer: bool,
    include_images: bool,
    include_raw_content: bool,
}

/// HTTP client for the Tavily search endpoint
pub struct TavilyClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl TavilyClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL, DEFAULT_TIMEOUT)
    }

    pub fn with_base_url(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Search(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Run one search
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        if request.query.trim().is_empty() {
            return Err(AppError::Search("Search query cannot be empty".to_string()));
        }

        let payload = SearchPayload {
            api_key: &self.api_key,
            query: request.query.trim(),
            max_results: request.max_results,
            search_depth: request.search_depth.as_str(),
            include_answer: true,
            include_images: false,
            include_raw_content: false,
        };

        debug!(query = %request.query, max_results = request.max_results, depth = request.search_depth.as_str(), "Tavily search");

        let response = self
            .http
            .post(format!("{}/search", self.base_url))
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Tavily request error");
                AppError::Search(format!("Network error: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), "Tavily API error");
            return Err(AppError::Search(format!(
                "Search request failed: HTTP {}: {}",
                status.as_u16(),
                body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Search(format!("Invalid response from search provider: {}", e)))
    }
}

/// Shape a provider response into the list the tool returns: the AI answer
/// first (when present), then one entry per hit.
pub fn format_results(query: &str, response: &SearchResponse) -> Vec<Value> {
    let mut formatted = Vec::with_capacity(response.results.len() + 1);

    if let Some(answer) = response.answer.as_deref().filter(|a| !a.is_empty()) {
        formatted.push(json!({
            "type": "answer",
            "content": answer,
            "query": query,
        }));
    }

    formatted.extend(response.results.iter().map(|hit| {
        json!({
            "type": "result",
            "title": hit.title,
            "url": hit.url,
            "content": hit.content,
            "score": hit.score,
        })
    }));

    formatted
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn params(max_results: Option<i64>, depth: Option<&str>) -> SearchParams {
        SearchParams {
            query: "rust async".to_string(),
            max_results,
            search_depth: depth.map(String::from),
        }
    }

    #[rstest]
    #[case(None, 5)]
    #[case(Some(0), 1)]
    #[case(Some(-3), 1)]
    #[case(Some(7), 7)]
    #[case(Some(20), 20)]
    #[case(Some(99), 20)]
    fn test_max_results_clamped(#[case] requested: Option<i64>, #[case] expected: u32) {
        let request = params(requested, None).normalized().unwrap();
        assert_eq!(request.max_results, expected);
    }

    #[rstest]
    #[case(None, SearchDepth::Basic)]
    #[case(Some("basic"), SearchDepth::Basic)]
    #[case(Some("advanced"), SearchDepth::Advanced)]
    #[case(Some("deep"), SearchDepth::Basic)]
    fn test_search_depth_defaults_to_basic(
        #[case] requested: Option<&str>,
        #[case] expected: SearchDepth,
    ) {
        let request = params(None, requested).normalized().unwrap();
        assert_eq!(request.search_depth, expected);
    }

    #[rstest]
    #[case(json!(7), 7)]
    #[case(json!("5"), 5)]
    #[case(json!(" 12 "), 12)]
    #[case(json!(5.0), 5)]
    #[case(json!(3.9), 3)]
    #[case(json!("50"), 20)]
    #[case(json!(null), 5)]
    fn test_max_results_accepts_loose_numbers(#[case] raw: Value, #[case] expected: u32) {
        let params: SearchParams =
            serde_json::from_value(json!({"query": "rust", "max_results": raw})).unwrap();
        assert_eq!(params.normalized().unwrap().max_results, expected);
    }

    #[rstest]
    #[case(json!("five"))]
    #[case(json!(true))]
    #[case(json!([5]))]
    fn test_max_results_rejects_non_numbers(#[case] raw: Value) {
        let parsed =
            serde_json::from_value::<SearchParams>(json!({"query": "rust", "max_results": raw}));
        assert!(parsed.is_err());
    }

    #[test]
    fn test_missing_max_results_defaults() {
        let params: SearchParams = serde_json::from_value(json!({"query": "rust"})).unwrap();
        assert_eq!(params.max_results, None);
    }

    #[test]
    fn test_schema_advertises_integer_max_results() {
        let schema = serde_json::to_value(schemars::schema_for!(SearchParams)).unwrap();
        let max_results = schema["properties"]["max_results"].to_string();
        assert!(max_results.contains("integer"));
        assert!(!max_results.contains("string"));
    }

    #[test]
    fn test_blank_query_rejected() {
        let blank = SearchParams {
            query: "   ".to_string(),
            max_results: None,
            search_depth: None,
        };
        assert!(blank.normalized().is_err());
    }

    #[test]
    fn test_format_results_answer_first() {
        let response = SearchResponse {
            answer: Some("Paris".to_string()),
            results: vec![SearchHit {
                title: "France".to_string(),
                url: "https://example.com/france".to_string(),
                content: "Capital: Paris".to_string(),
                score: 0.9,
            }],
        };

        let formatted = format_results("capital of France", &response);
        assert_eq!(formatted.len(), 2);
        assert_eq!(formatted[0]["type"], "answer");
        assert_eq!(formatted[0]["query"], "capital of France");
        assert_eq!(formatted[1]["type"], "result");
        assert_eq!(formatted[1]["url"], "https://example.com/france");
    }

    #[test]
    fn test_format_results_without_answer() {
        let response = SearchResponse {
            answer: None,
            results: vec![],
        };
        assert!(format_results("q", &response).is_empty());
    }
}

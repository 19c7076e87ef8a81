//! Web Search Tool
//!
//! Queries the Brave Search API and formats the top results. Needs an API
//! key, so it is registered as an instance, not through the catalog.

use async_trait::async_trait;
use serde_json::{json, Value};

use agentry_core::error::{AgentError, Result};
use agentry_core::tool::{ParameterSchema, Tool, ToolCall, ToolResult, ToolSchema};

const DEFAULT_ENDPOINT: &str = "https://api.search.brave.com/res/v1/web/search";

/// Web search tool backed by the Brave Search API
pub struct WebSearchTool {
    api_key: String,
    max_results: usize,
    endpoint: String,
    client: reqwest::Client,
}

impl WebSearchTool {
    pub fn new(api_key: impl Into<String>, max_results: usize) -> Self {
        Self {
            api_key: api_key.into(),
            max_results: max_results.clamp(1, 10),
            endpoint: DEFAULT_ENDPOINT.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Point at a different endpoint (test servers, proxies).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn format_results(query: &str, body: &Value) -> Result<String> {
        let results = body["web"]["results"]
            .as_array()
            .ok_or_else(|| AgentError::ToolExecution("No results found".into()))?;

        let mut output = format!("Results for: {}\n", query);
        for (i, res) in results.iter().enumerate() {
            output.push_str(&format!(
                "{}. {}\n   {}\n   {}\n",
                i + 1,
                res["title"].as_str().unwrap_or(""),
                res["url"].as_str().unwrap_or(""),
                res["description"].as_str().unwrap_or("")
            ));
        }
        Ok(output)
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "web_search".into(),
            description: "Search the web and return titles, URLs and snippets".into(),
            parameters: vec![
                ParameterSchema {
                    name: "query".into(),
                    param_type: "string".into(),
                    description: "Search query".into(),
                    required: true,
                    default: None,
                    enum_values: None,
                },
                ParameterSchema {
                    name: "count".into(),
                    param_type: "integer".into(),
                    description: "Number of results (1-10)".into(),
                    required: false,
                    default: None,
                    enum_values: None,
                },
            ],
            category: Some("web".into()),
            has_side_effects: false,
        }
    }

    async fn execute(&self, call: &ToolCall) -> Result<ToolResult> {
        if self.api_key.is_empty() {
            return Ok(ToolResult::failure(
                "web_search",
                "Search API key not configured",
            ));
        }

        let query = call
            .arguments
            .get("query")
            .and_then(|v| v.as_str())
            .ok_or_else(|| AgentError::ToolValidation("Missing query".into()))?;
        let count = call
            .arguments
            .get("count")
            .and_then(Value::as_u64)
            .map_or(self.max_results, |c| c as usize)
            .clamp(1, 10);

        tracing::debug!(query, count, "Issuing search request");
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("q", query), ("count", &count.to_string())])
            .header("X-Subscription-Token", &self.api_key)
            .send()
            .await
            .map_err(|e| AgentError::ProviderUnavailable(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(AgentError::Auth(format!("search API rejected key ({status})")));
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(AgentError::RateLimited("search API".into()));
        }
        if !status.is_success() {
            return Err(AgentError::ToolExecution(format!(
                "search API returned {status}"
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| AgentError::ToolExecution(e.to_string()))?;

        let output = Self::format_results(query, &body)?;
        Ok(ToolResult::success("web_search", output).with_data(json!({ "query": query })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentry_core::tool::{ToolCollection, ToolOutcome};

    #[tokio::test]
    async fn missing_key_is_a_domain_failure() {
        let mut collection = ToolCollection::new();
        collection.register_tool(WebSearchTool::new("", 5));

        let outcome = collection
            .execute_tool(&ToolCall::new(
                "web_search",
                [("query".to_string(), json!("rust"))],
            ))
            .await;
        match outcome {
            ToolOutcome::Error { error } => assert_eq!(
                error,
                "Error executing tool web_search: Search API key not configured"
            ),
            ToolOutcome::Success { .. } => panic!("expected error"),
        }
    }

    #[tokio::test]
    async fn missing_query_never_reaches_the_network() {
        let mut collection = ToolCollection::new();
        collection.register_tool(WebSearchTool::new("key", 5));

        let outcome = collection
            .execute_tool(&ToolCall::new("web_search", Vec::new()))
            .await;
        match outcome {
            ToolOutcome::Error { error } => {
                assert_eq!(error, "Invalid input for tool web_search");
            }
            ToolOutcome::Success { .. } => panic!("expected error"),
        }
    }

    #[test]
    fn result_formatting_numbers_entries() {
        let body = json!({
            "web": { "results": [
                { "title": "Rust", "url": "https://rust-lang.org", "description": "A language" },
                { "title": "Crates", "url": "https://crates.io", "description": "The registry" },
            ]}
        });
        let output = WebSearchTool::format_results("rust", &body).unwrap();
        assert!(output.starts_with("Results for: rust"));
        assert!(output.contains("1. Rust"));
        assert!(output.contains("2. Crates"));
    }

    #[test]
    fn empty_body_reports_no_results() {
        assert!(WebSearchTool::format_results("rust", &json!({})).is_err());
    }
}

//! Catalog tools exposed to the model, plus the registry that dispatches them.

mod fact_sheets;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::catalog::{CatalogClient, CatalogError};

pub use fact_sheets::{GetFactSheetById, GetFactSheets, SearchFactSheets};

/// A tool the agent can call.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name (used by the LLM to call it).
    fn name(&self) -> &str;

    /// Description shown to the LLM.
    fn description(&self) -> &str;

    /// JSON schema for the tool's parameters.
    fn parameters_schema(&self) -> Value;

    /// Execute the tool with the given arguments.
    async fn execute(&self, args: Value) -> Result<Value, CatalogError>;
}

/// Registry of all available tools.
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new(catalog: Arc<CatalogClient>) -> Self {
        Self {
            tools: vec![
                Arc::new(GetFactSheets::new(catalog.clone())),
                Arc::new(GetFactSheetById::new(catalog.clone())),
                Arc::new(SearchFactSheets::new(catalog)),
            ],
        }
    }

    pub fn list_tools(&self) -> &[Arc<dyn Tool>] {
        &self.tools
    }

    /// Tool declarations in chat-completions function format.
    pub fn schemas(&self) -> Vec<Value> {
        self.tools
            .iter()
            .map(|t| {
                json!({
                    "type": "function",
                    "function": {
                        "name": t.name(),
                        "description": t.description(),
                        "parameters": t.parameters_schema(),
                    }
                })
            })
            .collect()
    }

    /// Execute a named tool and return its result payload.
    ///
    /// Never fails across this boundary: an unknown name or a catalog error
    /// becomes a structured error payload, so one malformed call cannot
    /// abort the agent loop.
    pub async fn execute(&self, name: &str, args: Value) -> Value {
        let Some(tool) = self.tools.iter().find(|t| t.name() == name) else {
            tracing::warn!(name, "model requested an unknown tool");
            return json!({ "error": format!("Unknown tool: {}", name) });
        };

        match tool.execute(args).await {
            Ok(result) => result,
            Err(e) => json!({ "error": e.to_string(), "kind": e.kind() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ToolRegistry {
        // No request is issued by these tests, so a placeholder host is fine.
        let catalog =
            CatalogClient::new("example.invalid".to_string(), "secret".to_string()).unwrap();
        ToolRegistry::new(Arc::new(catalog))
    }

    #[test]
    fn registry_exposes_three_catalog_tools() {
        let registry = registry();
        let names: Vec<_> = registry.list_tools().iter().map(|t| t.name().to_string()).collect();
        assert_eq!(
            names,
            vec![
                "leanix_get_fact_sheets",
                "leanix_get_fact_sheet_by_id",
                "leanix_search_fact_sheets",
            ]
        );
    }

    #[test]
    fn schemas_are_function_declarations() {
        let registry = registry();
        for schema in registry.schemas() {
            assert_eq!(schema["type"], "function");
            assert!(schema["function"]["name"].is_string());
            assert_eq!(schema["function"]["parameters"]["type"], "object");
        }
    }

    #[tokio::test]
    async fn unknown_tool_yields_an_error_marker() {
        let registry = registry();
        let result = registry.execute("bogus_tool", json!({})).await;
        assert_eq!(result["error"], "Unknown tool: bogus_tool");
    }

    #[tokio::test]
    async fn missing_required_argument_yields_a_validation_payload() {
        let registry = registry();
        let result = registry
            .execute("leanix_get_fact_sheet_by_id", json!({}))
            .await;
        assert_eq!(result["kind"], "validation");
        assert!(result["error"].as_str().unwrap().contains("id"));
    }

    #[tokio::test]
    async fn non_numeric_limit_yields_a_validation_payload() {
        let registry = registry();
        let result = registry
            .execute("leanix_get_fact_sheets", json!({"limit": "lots"}))
            .await;
        assert_eq!(result["kind"], "validation");
        assert!(result["error"].as_str().unwrap().contains("limit"));
    }

    #[tokio::test]
    async fn missing_query_yields_a_validation_payload() {
        let registry = registry();
        let result = registry
            .execute("leanix_search_fact_sheets", json!({}))
            .await;
        assert_eq!(result["kind"], "validation");
    }
}

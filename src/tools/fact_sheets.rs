//! Fact sheet tools: list, lookup by id, and search.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::Tool;
use crate::catalog::{CatalogClient, CatalogError};

const DEFAULT_FIELDS: &str = "id,displayName,type";
const DEFAULT_LIST_LIMIT: usize = 5;
const DEFAULT_SEARCH_LIMIT: usize = 20;

/// Extract the `limit` argument. Models sometimes send string-encoded
/// integers, so `"10"` coerces; anything else non-numeric is a validation
/// error rather than a silent default.
fn limit_arg(args: &Value, default: usize) -> Result<usize, CatalogError> {
    let value = match args.get("limit") {
        None | Some(Value::Null) => return Ok(default),
        Some(value) => value,
    };

    if let Some(n) = value.as_u64() {
        return Ok(n as usize);
    }
    if let Some(n) = value.as_str().and_then(|s| s.trim().parse::<u64>().ok()) {
        return Ok(n as usize);
    }

    Err(CatalogError::Validation(format!(
        "Invalid 'limit' argument: {}",
        value
    )))
}

/// List fact sheets via the Pathfinder REST endpoint.
pub struct GetFactSheets {
    catalog: Arc<CatalogClient>,
}

impl GetFactSheets {
    pub fn new(catalog: Arc<CatalogClient>) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl Tool for GetFactSheets {
    fn name(&self) -> &str {
        "leanix_get_fact_sheets"
    }

    fn description(&self) -> &str {
        "List FactSheets via LeanIX Pathfinder REST."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "limit": {
                    "type": "integer",
                    "minimum": 1,
                    "maximum": 200,
                    "default": 5,
                    "description": "Maximum number of fact sheets to return"
                },
                "fields": {
                    "type": "string",
                    "default": DEFAULT_FIELDS,
                    "description": "Comma-separated list of fields to fetch"
                }
            }
        })
    }

    async fn execute(&self, args: Value) -> Result<Value, CatalogError> {
        let limit = limit_arg(&args, DEFAULT_LIST_LIMIT)?;
        let fields = args["fields"].as_str().unwrap_or(DEFAULT_FIELDS);

        let records = self.catalog.list_fact_sheets(limit, fields).await?;
        Ok(Value::Array(records))
    }
}

/// Fetch a single fact sheet by id.
pub struct GetFactSheetById {
    catalog: Arc<CatalogClient>,
}

impl GetFactSheetById {
    pub fn new(catalog: Arc<CatalogClient>) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl Tool for GetFactSheetById {
    fn name(&self) -> &str {
        "leanix_get_fact_sheet_by_id"
    }

    fn description(&self) -> &str {
        "Fetch a single FactSheet by ID via Pathfinder REST."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "id": {
                    "type": "string",
                    "description": "The fact sheet id"
                },
                "fields": {
                    "type": "string",
                    "default": DEFAULT_FIELDS,
                    "description": "Comma-separated list of fields to fetch"
                }
            },
            "required": ["id"]
        })
    }

    async fn execute(&self, args: Value) -> Result<Value, CatalogError> {
        let id = args["id"]
            .as_str()
            .ok_or_else(|| CatalogError::Validation("Missing 'id' argument".to_string()))?;
        let fields = args["fields"].as_str().unwrap_or(DEFAULT_FIELDS);

        self.catalog.get_fact_sheet_by_id(id, fields).await
    }
}

/// Search fact sheets (GraphQL when available; otherwise REST fallback).
pub struct SearchFactSheets {
    catalog: Arc<CatalogClient>,
}

impl SearchFactSheets {
    pub fn new(catalog: Arc<CatalogClient>) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl Tool for SearchFactSheets {
    fn name(&self) -> &str {
        "leanix_search_fact_sheets"
    }

    fn description(&self) -> &str {
        "Search FactSheets (GraphQL when available; otherwise REST fallback)."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Substring to match against display names"
                },
                "limit": {
                    "type": "integer",
                    "minimum": 1,
                    "maximum": 200,
                    "default": 20,
                    "description": "Maximum number of results to return"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, args: Value) -> Result<Value, CatalogError> {
        let query = args["query"]
            .as_str()
            .ok_or_else(|| CatalogError::Validation("Missing 'query' argument".to_string()))?;
        let limit = limit_arg(&args, DEFAULT_SEARCH_LIMIT)?;

        let envelope = self.catalog.search_fact_sheets(query, limit).await?;
        serde_json::to_value(envelope)
            .map_err(|e| CatalogError::Upstream(format!("failed to serialize envelope: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_accepts_numbers_and_numeric_strings() {
        assert_eq!(limit_arg(&json!({"limit": 10}), 5).unwrap(), 10);
        assert_eq!(limit_arg(&json!({"limit": "10"}), 5).unwrap(), 10);
        assert_eq!(limit_arg(&json!({"limit": " 7 "}), 5).unwrap(), 7);
    }

    #[test]
    fn limit_defaults_when_absent_or_null() {
        assert_eq!(limit_arg(&json!({}), 5).unwrap(), 5);
        assert_eq!(limit_arg(&json!({"limit": null}), 20).unwrap(), 20);
    }

    #[test]
    fn limit_rejects_non_numeric_values() {
        assert!(matches!(
            limit_arg(&json!({"limit": "lots"}), 5),
            Err(CatalogError::Validation(_))
        ));
        assert!(matches!(
            limit_arg(&json!({"limit": true}), 5),
            Err(CatalogError::Validation(_))
        ));
        assert!(matches!(
            limit_arg(&json!({"limit": -3}), 5),
            Err(CatalogError::Validation(_))
        ));
    }
}

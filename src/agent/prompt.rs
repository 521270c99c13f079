//! System prompt template for the agent.

use crate::tools::ToolRegistry;

/// Build the system prompt with tool definitions.
pub fn build_system_prompt(tools: &ToolRegistry) -> String {
    let tool_descriptions = tools
        .list_tools()
        .iter()
        .map(|t| format!("- **{}**: {}", t.name(), t.description()))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are an enterprise assistant for LeanIX.

When you need data from LeanIX, call the provided tools:
{tool_descriptions}

Prefer 'leanix_search_fact_sheets' for search, 'leanix_get_fact_sheet_by_id' for details, and 'leanix_get_fact_sheets' for listing.

If a tool result contains an "error" field, read it and either adjust your call or report the problem to the user. Do not retry the same failing call.

Always produce a concise, structured final answer (bullets or JSON) and include an audit trail of which tools you called with which parameters."#,
        tool_descriptions = tool_descriptions
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogClient;
    use std::sync::Arc;

    #[test]
    fn prompt_names_every_tool() {
        let catalog =
            CatalogClient::new("example.invalid".to_string(), "secret".to_string()).unwrap();
        let registry = ToolRegistry::new(Arc::new(catalog));

        let prompt = build_system_prompt(&registry);
        for tool in registry.list_tools() {
            assert!(prompt.contains(tool.name()));
        }
    }
}

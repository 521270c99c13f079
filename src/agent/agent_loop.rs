//! Core agent loop implementation.

use std::sync::Arc;

use serde_json::Value;

use crate::catalog::CatalogClient;
use crate::config::Config;
use crate::llm::{ChatMessage, LlmClient, OpenAiCompatClient, Role, ToolCall};
use crate::tools::ToolRegistry;

use super::prompt::build_system_prompt;
use super::transcript::{truncate_for_log, LogEntryType, RunLogEntry};

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The model produced a final answer and stopped requesting tools.
    Answered(String),
    /// The iteration bound was reached while the model was still
    /// requesting tools. Not an error; the last surfaced text stands.
    Exhausted { last_text: Option<String> },
}

impl RunOutcome {
    /// The user-visible text of this outcome, if any.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Answered(text) => Some(text),
            Self::Exhausted { last_text } => last_text.as_deref(),
        }
    }
}

/// The catalog agent.
pub struct Agent {
    llm: Arc<dyn LlmClient>,
    tools: ToolRegistry,
    model: String,
    max_iterations: usize,
}

impl Agent {
    /// Create a new agent with the given configuration.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let catalog = Arc::new(CatalogClient::new(
            config.lx_host.clone(),
            config.lx_api_token.clone(),
        )?);
        let llm = Arc::new(OpenAiCompatClient::new(
            config.agent_base_url.clone(),
            config.agent_api_key.clone(),
        )?);

        Ok(Self {
            llm,
            tools: ToolRegistry::new(catalog),
            model: config.model.clone(),
            max_iterations: config.max_iterations,
        })
    }

    /// Create an agent from pre-built parts (useful for testing).
    pub fn with_parts(
        llm: Arc<dyn LlmClient>,
        tools: ToolRegistry,
        model: String,
        max_iterations: usize,
    ) -> Self {
        Self {
            llm,
            tools,
            model,
            max_iterations,
        }
    }

    /// Run a task and return the outcome and execution transcript.
    pub async fn run_task(&self, task: &str) -> anyhow::Result<(RunOutcome, Vec<RunLogEntry>)> {
        let mut log = Vec::new();
        let mut last_text: Option<String> = None;

        let mut messages = vec![
            ChatMessage {
                role: Role::System,
                content: Some(build_system_prompt(&self.tools)),
                tool_calls: None,
                tool_call_id: None,
            },
            ChatMessage {
                role: Role::User,
                content: Some(task.to_string()),
                tool_calls: None,
                tool_call_id: None,
            },
        ];

        let tool_schemas = self.tools.schemas();

        for iteration in 0..self.max_iterations {
            tracing::debug!("Agent iteration {}", iteration + 1);

            let response = self
                .llm
                .chat_completion(&self.model, &messages, Some(&tool_schemas))
                .await?;

            // Surface model text as soon as it appears, tool calls or not.
            if let Some(content) = response.content.as_deref().filter(|c| !c.is_empty()) {
                tracing::info!("{}", content);
                log.push(RunLogEntry::new(
                    LogEntryType::Response,
                    truncate_for_log(content, 2000),
                ));
                last_text = Some(content.to_string());
            }

            let tool_calls = response.tool_calls.unwrap_or_default();
            if tool_calls.is_empty() {
                // No tool calls - the conversation is complete.
                return Ok((RunOutcome::Answered(last_text.unwrap_or_default()), log));
            }

            messages.push(ChatMessage {
                role: Role::Assistant,
                content: response.content,
                tool_calls: Some(tool_calls.clone()),
                tool_call_id: None,
            });

            for tool_call in &tool_calls {
                log.push(RunLogEntry::new(
                    LogEntryType::ToolCall,
                    format!(
                        "Calling tool: {} with args: {}",
                        tool_call.function.name, tool_call.function.arguments
                    ),
                ));

                let result = self.execute_tool_call(tool_call).await;
                let result_str = result.to_string();

                log.push(RunLogEntry::new(
                    LogEntryType::ToolResult,
                    truncate_for_log(&result_str, 1000),
                ));

                // The result message must echo the originating call id.
                messages.push(ChatMessage {
                    role: Role::Tool,
                    content: Some(result_str),
                    tool_calls: None,
                    tool_call_id: Some(tool_call.id.clone()),
                });
            }
        }

        tracing::debug!(
            "iteration bound ({}) reached with tool calls still pending",
            self.max_iterations
        );
        Ok((RunOutcome::Exhausted { last_text }, log))
    }

    /// Execute a single tool call.
    async fn execute_tool_call(&self, tool_call: &ToolCall) -> Value {
        let args: Value =
            serde_json::from_str(&tool_call.function.arguments).unwrap_or(Value::Null);

        self.tools.execute(&tool_call.function.name, args).await
    }
}

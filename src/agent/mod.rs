//! Agent module - the tool-calling orchestration loop.
//!
//! The agent follows a "tools in a loop" pattern:
//! 1. Build context with system prompt and user task
//! 2. Call LLM with the catalog tools
//! 3. If the LLM requests tool calls, execute them and feed results back
//! 4. Repeat until the LLM produces a final response or the iteration
//!    bound is reached

mod agent_loop;
mod prompt;
mod transcript;

pub use agent_loop::{Agent, RunOutcome};
pub use prompt::build_system_prompt;
pub use transcript::{LogEntryType, RunLogEntry};

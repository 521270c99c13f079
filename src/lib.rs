//! # LeanIX Agent
//!
//! A bridge between an LLM-driven agent and the LeanIX enterprise-architecture
//! catalog.
//!
//! This library provides:
//! - A LeanIX Pathfinder client with OAuth2 client-credentials token caching
//! - A two-tier fact sheet search (GraphQL with a REST fallback)
//! - A tool-based agent loop for querying the catalog with an LLM
//!
//! ## Architecture
//!
//! The agent follows the "tools in a loop" pattern:
//! 1. Receive a task on the command line
//! 2. Build context with system prompt and the catalog tools
//! 3. Call LLM, parse response, execute any tool calls
//! 4. Feed results back to LLM, repeat until the model answers or the
//!    iteration bound is reached
//!
//! ## Example
//!
//! ```rust,ignore
//! use leanix_agent::{agent::Agent, config::Config};
//!
//! let config = Config::from_env()?;
//! let agent = Agent::new(&config);
//! let outcome = agent.run_task("Search for FactSheets named 'SAP'").await?;
//! ```

pub mod agent;
pub mod catalog;
pub mod config;
pub mod llm;
pub mod tools;

pub use config::Config;

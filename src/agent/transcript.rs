//! Execution transcript for a single agent run.

use serde::Serialize;

/// A single entry in the run transcript.
#[derive(Debug, Clone, Serialize)]
pub struct RunLogEntry {
    /// Timestamp (unix seconds)
    pub timestamp: String,

    /// Entry type
    pub entry_type: LogEntryType,

    /// Content of the entry
    pub content: String,
}

/// Types of transcript entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogEntryType {
    /// Tool is being called
    ToolCall,
    /// Tool returned a result
    ToolResult,
    /// Model produced user-visible text
    Response,
}

impl RunLogEntry {
    pub(crate) fn new(entry_type: LogEntryType, content: String) -> Self {
        Self {
            timestamp: unix_now(),
            entry_type,
            content,
        }
    }
}

/// Get current timestamp as unix seconds.
fn unix_now() -> String {
    use std::time::SystemTime;
    let secs = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format!("{}", secs)
}

/// Truncate a string for transcript purposes.
pub(crate) fn truncate_for_log(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        let mut end = max_len;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... [truncated]", &s[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_strings_pass_through() {
        assert_eq!(truncate_for_log("hello", 10), "hello");
    }

    #[test]
    fn long_strings_are_truncated_on_char_boundaries() {
        let s = "aaaaé";
        let truncated = truncate_for_log(s, 5);
        assert!(truncated.ends_with("[truncated]"));
        assert!(truncated.starts_with("aaaa"));
    }
}

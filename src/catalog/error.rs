//! Error taxonomy for catalog operations.

use thiserror::Error;

/// Errors surfaced by [`super::CatalogClient`] operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Token exchange failed or the token response was missing a field.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Non-2xx status, network failure, or timeout on a catalog call.
    #[error("upstream request failed: {0}")]
    Upstream(String),

    /// A required argument was missing or malformed.
    #[error("invalid argument: {0}")]
    Validation(String),

    /// An item lookup returned no record.
    #[error("fact sheet not found: {0}")]
    NotFound(String),
}

impl CatalogError {
    /// Short machine-readable category, embedded in tool result payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Auth(_) => "auth",
            Self::Upstream(_) => "upstream",
            Self::Validation(_) => "validation",
            Self::NotFound(_) => "not_found",
        }
    }
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        Self::Upstream(err.to_string())
    }
}

/// Why a structured (GraphQL) search attempt failed.
///
/// Never propagated to callers: each variant is pattern-matched into the
/// REST fallback, and its name ends up in the fallback envelope's note.
#[derive(Debug)]
pub enum SearchFailure {
    /// Network failure or timeout before a response arrived.
    Transport(String),
    /// The endpoint answered with a non-2xx status.
    Status(u16),
    /// The response body did not match the expected GraphQL shape.
    MalformedResponse,
    /// Token acquisition failed for the attempt.
    Auth,
}

impl std::fmt::Display for SearchFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(_) => write!(f, "transport_error"),
            Self::Status(code) => write!(f, "http_status_{}", code),
            Self::MalformedResponse => write!(f, "malformed_response"),
            Self::Auth => write!(f, "auth_error"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_are_stable() {
        assert_eq!(CatalogError::Auth("x".into()).kind(), "auth");
        assert_eq!(CatalogError::Upstream("x".into()).kind(), "upstream");
        assert_eq!(CatalogError::Validation("x".into()).kind(), "validation");
        assert_eq!(CatalogError::NotFound("x".into()).kind(), "not_found");
    }

    #[test]
    fn search_failure_names_the_category() {
        assert_eq!(SearchFailure::Status(502).to_string(), "http_status_502");
        assert_eq!(
            SearchFailure::MalformedResponse.to_string(),
            "malformed_response"
        );
    }
}

//! LeanIX catalog access: OAuth2 token lifecycle and Pathfinder queries.
//!
//! The client speaks two upstream surfaces:
//! - the MTM token endpoint (client-credentials exchange, cached in-process)
//! - the Pathfinder REST and GraphQL endpoints for fact sheet queries
//!
//! Search degrades gracefully: the GraphQL schema differs across LeanIX
//! tenants, so a failed structured search falls back to the universally
//! supported REST listing with client-side filtering.

mod client;
mod error;
mod token;

pub use client::{CatalogClient, FactSheetRecord, SearchEnvelope};
pub use error::{CatalogError, SearchFailure};
pub use token::{HttpTokenExchange, TokenCache, TokenExchange, TokenResponse};

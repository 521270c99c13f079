//! LeanIX Pathfinder client: listing, item lookup, and two-tier search.

use std::time::Duration;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::sync::Mutex;

use super::error::{CatalogError, SearchFailure};
use super::token::{HttpTokenExchange, TokenCache};

/// Per-request timeout for all catalog calls.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Maximum `limit` the listing endpoint accepts.
const MAX_LISTING_LIMIT: usize = 200;

/// Envelope mode for the REST fallback tier.
const FALLBACK_MODE: &str = "fallback_rest_client_filter";

/// Envelope mode for a successful GraphQL search.
const GRAPHQL_MODE: &str = "graphql";

/// GraphQL search over `allFactSheets`. Tenant schemas vary; a mismatch is
/// treated as a search failure and routed to the REST fallback.
const SEARCH_QUERY: &str = r#"
query ($filter: String!, $first: Int!) {
  allFactSheets(filter: $filter, first: $first) {
    edges {
      node { id displayName type }
    }
  }
}
"#;

/// A fact sheet as returned by search: the `id,displayName,type` projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactSheetRecord {
    pub id: Option<String>,
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
    #[serde(rename = "type")]
    pub fact_sheet_type: Option<String>,
}

/// Search result envelope, one shape for both tiers.
#[derive(Debug, Serialize)]
pub struct SearchEnvelope {
    pub mode: &'static str,
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub results: Vec<FactSheetRecord>,
}

/// The listing endpoint returns either a bare array or a `{"data": [...]}`
/// wrapper depending on deployment. Decoded explicitly, not shape-sniffed.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListingResponse {
    Wrapped { data: Vec<Value> },
    Bare(Vec<Value>),
}

impl ListingResponse {
    fn into_records(self) -> Vec<Value> {
        match self {
            Self::Wrapped { data } => data,
            Self::Bare(records) => records,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    data: Option<SearchData>,
}

#[derive(Debug, Deserialize)]
struct SearchData {
    #[serde(rename = "allFactSheets")]
    all_fact_sheets: Option<SearchConnection>,
}

#[derive(Debug, Deserialize)]
struct SearchConnection {
    edges: Vec<SearchEdge>,
}

#[derive(Debug, Deserialize)]
struct SearchEdge {
    node: FactSheetRecord,
}

/// Authorized client for one LeanIX host/credential pair.
///
/// Tokens are acquired transparently through the embedded [`TokenCache`];
/// the mutex keeps the single token slot safe should tool calls ever be
/// dispatched concurrently.
pub struct CatalogClient {
    http: reqwest::Client,
    base: String,
    token: Mutex<TokenCache>,
}

impl CatalogClient {
    pub fn new(host: String, api_token: String) -> Result<Self, CatalogError> {
        Self::from_base_url(format!("https://{}", host), api_token)
    }

    /// Build a client against an explicit base URL (scheme included).
    pub fn from_base_url(base_url: String, api_token: String) -> Result<Self, CatalogError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| CatalogError::Upstream(format!("failed to build HTTP client: {}", e)))?;

        let base = base_url.trim_end_matches('/').to_string();
        let exchange = HttpTokenExchange::new(http.clone(), base.clone(), api_token);

        Ok(Self {
            http,
            base,
            token: Mutex::new(TokenCache::new(Box::new(exchange))),
        })
    }

    async fn bearer(&self) -> Result<String, CatalogError> {
        let mut cache = self.token.lock().await;
        cache.token().await
    }

    /// List fact sheets via the Pathfinder REST endpoint.
    pub async fn list_fact_sheets(
        &self,
        limit: usize,
        fields: &str,
    ) -> Result<Vec<Value>, CatalogError> {
        if limit == 0 || limit > MAX_LISTING_LIMIT {
            return Err(CatalogError::Validation(format!(
                "limit must be between 1 and {}",
                MAX_LISTING_LIMIT
            )));
        }

        let token = self.bearer().await?;
        let url = listing_url(&self.base, limit, fields);

        tracing::debug!(limit, fields, "listing fact sheets");
        let response = self.http.get(&url).bearer_auth(&token).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Upstream(format!(
                "factSheets listing returned {}",
                status
            )));
        }

        let listing: ListingResponse = response
            .json()
            .await
            .map_err(|e| CatalogError::Upstream(format!("invalid listing response: {}", e)))?;

        Ok(listing.into_records())
    }

    /// Fetch a single fact sheet by id.
    pub async fn get_fact_sheet_by_id(
        &self,
        id: &str,
        fields: &str,
    ) -> Result<Value, CatalogError> {
        if id.trim().is_empty() {
            return Err(CatalogError::Validation(
                "id must not be empty".to_string(),
            ));
        }

        let token = self.bearer().await?;
        let url = item_url(&self.base, id, fields);

        tracing::debug!(id, "fetching fact sheet");
        let response = self.http.get(&url).bearer_auth(&token).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(id.to_string()));
        }
        if !status.is_success() {
            return Err(CatalogError::Upstream(format!(
                "factSheets item returned {}",
                status
            )));
        }

        response
            .json()
            .await
            .map_err(|e| CatalogError::Upstream(format!("invalid item response: {}", e)))
    }

    /// Search fact sheets: GraphQL first, REST listing with client-side
    /// filtering when the structured attempt fails for any reason.
    pub async fn search_fact_sheets(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<SearchEnvelope, CatalogError> {
        if limit == 0 {
            return Err(CatalogError::Validation(
                "limit must be a positive integer".to_string(),
            ));
        }

        match self.structured_search(query, limit).await {
            Ok(envelope) => Ok(envelope),
            Err(failure) => {
                tracing::debug!(%failure, "structured search failed, using REST fallback");
                self.fallback_search(query, limit, failure).await
            }
        }
    }

    async fn structured_search(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<SearchEnvelope, SearchFailure> {
        let token = self.bearer().await.map_err(|_| SearchFailure::Auth)?;
        let url = format!("{}/services/pathfinder/v1/graphql", self.base);
        let body = json!({
            "query": SEARCH_QUERY,
            "variables": { "filter": query, "first": limit },
        });

        let response = self
            .http
            .post(&url)
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await
            .map_err(|e| SearchFailure::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchFailure::Status(status.as_u16()));
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|_| SearchFailure::MalformedResponse)?;

        let results = decode_search_nodes(parsed)?;

        Ok(SearchEnvelope {
            mode: GRAPHQL_MODE,
            query: query.to_string(),
            note: None,
            results,
        })
    }

    async fn fallback_search(
        &self,
        query: &str,
        limit: usize,
        failure: SearchFailure,
    ) -> Result<SearchEnvelope, CatalogError> {
        let raw = self
            .list_fact_sheets(fallback_listing_limit(limit), "id,displayName,type")
            .await?;

        Ok(SearchEnvelope {
            mode: FALLBACK_MODE,
            query: query.to_string(),
            note: Some(format!("GraphQL search failed, fallback used: {}", failure)),
            results: filter_by_display_name(&raw, query, limit),
        })
    }
}

fn listing_url(base: &str, limit: usize, fields: &str) -> String {
    format!(
        "{}/services/pathfinder/v1/factSheets?limit={}&fields={}",
        base,
        limit,
        urlencoding::encode(fields)
    )
}

fn item_url(base: &str, id: &str, fields: &str) -> String {
    format!(
        "{}/services/pathfinder/v1/factSheets/{}?fields={}",
        base,
        urlencoding::encode(id),
        urlencoding::encode(fields)
    )
}

/// Listing bound for the fallback tier: generous enough to filter from,
/// capped at the catalog's comfort zone.
fn fallback_listing_limit(limit: usize) -> usize {
    50.min(limit.max(10))
}

fn decode_search_nodes(response: SearchResponse) -> Result<Vec<FactSheetRecord>, SearchFailure> {
    let connection = response
        .data
        .and_then(|d| d.all_fact_sheets)
        .ok_or(SearchFailure::MalformedResponse)?;

    Ok(connection.edges.into_iter().map(|e| e.node).collect())
}

/// Case-insensitive substring match on `displayName`, truncated at `limit`.
fn filter_by_display_name(records: &[Value], query: &str, limit: usize) -> Vec<FactSheetRecord> {
    let needle = query.to_lowercase();
    let mut results = Vec::new();

    for record in records {
        let Some(name) = record.get("displayName").and_then(Value::as_str) else {
            continue;
        };
        if !name.to_lowercase().contains(&needle) {
            continue;
        }

        results.push(FactSheetRecord {
            id: record
                .get("id")
                .and_then(Value::as_str)
                .map(str::to_string),
            display_name: Some(name.to_string()),
            fact_sheet_type: record
                .get("type")
                .and_then(Value::as_str)
                .map(str::to_string),
        });

        if results.len() >= limit {
            break;
        }
    }

    results
}

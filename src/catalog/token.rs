//! OAuth2 client-credentials token acquisition and caching.
//!
//! LeanIX technical user tokens are exchanged for short-lived bearer tokens
//! via the MTM token endpoint. The cache holds a single token slot and
//! renews lazily, on the calling path; there is no background refresh.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::Deserialize;

use super::error::CatalogError;

/// Reuse margin applied when reading the cached token.
const REUSE_MARGIN: Duration = Duration::from_secs(30);

/// Seconds subtracted from the reported lifetime when caching.
const RENEWAL_BUFFER: u64 = 20;

/// Floor for pathologically short reported lifetimes.
const MIN_LIFETIME_SECS: u64 = 60;

/// Assumed lifetime when the token response omits `expires_in`.
const DEFAULT_EXPIRES_IN: u64 = 300;

/// Token endpoint response body.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: Option<String>,
    pub expires_in: Option<u64>,
}

/// The client-credentials exchange itself, behind a trait so the cache
/// logic can be exercised without a network.
#[async_trait]
pub trait TokenExchange: Send + Sync {
    async fn exchange(&self) -> Result<TokenResponse, CatalogError>;
}

/// Production exchange against `{base}/services/mtm/v1/oauth2/token`.
pub struct HttpTokenExchange {
    http: reqwest::Client,
    base: String,
    api_token: String,
}

impl HttpTokenExchange {
    pub fn new(http: reqwest::Client, base: String, api_token: String) -> Self {
        Self {
            http,
            base,
            api_token,
        }
    }
}

#[async_trait]
impl TokenExchange for HttpTokenExchange {
    async fn exchange(&self) -> Result<TokenResponse, CatalogError> {
        let url = format!("{}/services/mtm/v1/oauth2/token", self.base);

        // Basic base64("apitoken:<API_TOKEN>"), form-encoded grant.
        let response = self
            .http
            .post(&url)
            .basic_auth("apitoken", Some(&self.api_token))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| CatalogError::Auth(format!("token endpoint unreachable: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Auth(format!(
                "token endpoint returned {}",
                status
            )));
        }

        response
            .json()
            .await
            .map_err(|e| CatalogError::Auth(format!("invalid token response: {}", e)))
    }
}

#[derive(Debug)]
struct CachedToken {
    value: String,
    expires_at: Instant,
}

/// Single-slot token cache. One instance per host/credential pair.
pub struct TokenCache {
    exchange: Box<dyn TokenExchange>,
    cached: Option<CachedToken>,
}

impl TokenCache {
    pub fn new(exchange: Box<dyn TokenExchange>) -> Self {
        Self {
            exchange,
            cached: None,
        }
    }

    /// Return a bearer token, reusing the cached one while it is still
    /// comfortably inside its validity window.
    pub async fn token(&mut self) -> Result<String, CatalogError> {
        self.token_at(Instant::now()).await
    }

    pub(crate) async fn token_at(&mut self, now: Instant) -> Result<String, CatalogError> {
        // Reuse while now < expiry - 30s.
        if let Some(cached) = &self.cached {
            if now + REUSE_MARGIN < cached.expires_at {
                return Ok(cached.value.clone());
            }
        }

        let response = self.exchange.exchange().await?;
        let value = response
            .access_token
            .ok_or_else(|| CatalogError::Auth("token response missing access_token".to_string()))?;

        self.cached = Some(CachedToken {
            value: value.clone(),
            expires_at: now + cached_lifetime(response.expires_in),
        });

        Ok(value)
    }
}

/// Cached lifetime: `max(60, expires_in - 20)` seconds.
fn cached_lifetime(expires_in: Option<u64>) -> Duration {
    let expires_in = expires_in.unwrap_or(DEFAULT_EXPIRES_IN);
    Duration::from_secs(MIN_LIFETIME_SECS.max(expires_in.saturating_sub(RENEWAL_BUFFER)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingExchange {
        calls: Arc<AtomicUsize>,
        expires_in: Option<u64>,
    }

    #[async_trait]
    impl TokenExchange for CountingExchange {
        async fn exchange(&self) -> Result<TokenResponse, CatalogError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(TokenResponse {
                access_token: Some(format!("tok-{}", n)),
                expires_in: self.expires_in,
            })
        }
    }

    fn cache_with(calls: Arc<AtomicUsize>, expires_in: Option<u64>) -> TokenCache {
        TokenCache::new(Box::new(CountingExchange { calls, expires_in }))
    }

    #[test]
    fn lifetime_floor_applies_to_short_tokens() {
        assert_eq!(cached_lifetime(Some(10)), Duration::from_secs(60));
    }

    #[test]
    fn lifetime_keeps_renewal_buffer() {
        assert_eq!(cached_lifetime(Some(300)), Duration::from_secs(280));
    }

    #[test]
    fn lifetime_defaults_when_expires_in_absent() {
        assert_eq!(cached_lifetime(None), Duration::from_secs(280));
    }

    #[tokio::test]
    async fn token_is_reused_within_validity_window() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut cache = cache_with(calls.clone(), Some(300));
        let now = Instant::now();

        let first = cache.token_at(now).await.unwrap();
        let second = cache
            .token_at(now + Duration::from_secs(100))
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn token_is_renewed_after_expiry() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut cache = cache_with(calls.clone(), Some(300));
        let now = Instant::now();

        let first = cache.token_at(now).await.unwrap();
        // Cached expiry is now + 280s; the 30s read margin trips at 250s.
        let second = cache
            .token_at(now + Duration::from_secs(260))
            .await
            .unwrap();

        assert_ne!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn missing_access_token_is_an_auth_error() {
        struct EmptyExchange;

        #[async_trait]
        impl TokenExchange for EmptyExchange {
            async fn exchange(&self) -> Result<TokenResponse, CatalogError> {
                Ok(TokenResponse {
                    access_token: None,
                    expires_in: Some(300),
                })
            }
        }

        let mut cache = TokenCache::new(Box::new(EmptyExchange));
        let err = cache.token_at(Instant::now()).await.unwrap_err();
        assert!(matches!(err, CatalogError::Auth(_)));
    }
}

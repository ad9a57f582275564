//! Authentication gate: resolves a presented token to an identity.

use std::sync::Arc;

use tracing::{debug, info, warn};

use nicelab_core::error::{AppError, ErrorKind};
use nicelab_core::result::AppResult;
use nicelab_database::TokenStore;
use nicelab_entity::User;

use super::cache::TokenCache;

/// Resolves opaque tokens through the [`TokenCache`], falling back to the
/// [`TokenStore`] on a miss.
///
/// The gate only establishes identity. Role and ownership checks belong to
/// the call sites.
#[derive(Debug, Clone)]
pub struct AuthGate {
    cache: Arc<TokenCache>,
    store: Arc<dyn TokenStore>,
}

impl AuthGate {
    pub fn new(cache: Arc<TokenCache>, store: Arc<dyn TokenStore>) -> Self {
        Self { cache, store }
    }

    /// Shared handle to the underlying cache.
    pub fn cache(&self) -> &Arc<TokenCache> {
        &self.cache
    }

    /// Pre-load every live token from the store.
    ///
    /// Failure here is fatal to startup and is propagated unchanged.
    pub async fn warm(&self) -> AppResult<usize> {
        let owners = self.store.list_token_owners().await?;
        let loaded = self.cache.extend(owners);
        info!(tokens = loaded, "Token cache pre-loaded");
        Ok(loaded)
    }

    /// Resolve `token` to the identity that owns it.
    ///
    /// A cache hit is trusted without consulting the store. On a miss the
    /// store is queried once; only a successful lookup is cached, and only
    /// if the owner was not evicted while the lookup was in flight. Every
    /// failure, including store errors, yields an authentication error.
    pub async fn resolve(&self, token: &str) -> AppResult<User> {
        if token.is_empty() {
            return Err(AppError::authentication("Missing session token"));
        }

        if let Some(user) = self.cache.get(token) {
            return Ok(user);
        }

        let epoch = self.cache.epoch();

        match self.store.owner_of(token).await {
            Ok(Some(user)) => {
                if self.cache.insert_if_current(token.to_string(), user.clone(), epoch) {
                    debug!(user_id = user.id, "Token resolved from store");
                    return Ok(user);
                }
                // Some user was evicted mid-lookup. Evictions follow a
                // committed reissue, so a second read is authoritative; it
                // stays out of the cache.
                debug!(user_id = user.id, "Eviction during lookup, re-checking token");
                self.lookup_uncached(token).await
            }
            Ok(None) => Err(rejected()),
            Err(e) => Err(lookup_failed(e)),
        }
    }

    async fn lookup_uncached(&self, token: &str) -> AppResult<User> {
        match self.store.owner_of(token).await {
            Ok(Some(user)) => Ok(user),
            Ok(None) => Err(rejected()),
            Err(e) => Err(lookup_failed(e)),
        }
    }
}

fn rejected() -> AppError {
    AppError::authentication("Invalid or expired session token")
}

fn lookup_failed(e: AppError) -> AppError {
    warn!(error = %e, "Token lookup failed");
    AppError::with_source(ErrorKind::Authentication, "Invalid or expired session token", e)
}

//! Read-through caching of enumeration results.
//!
//! Keys are `"{operation}:{json-encoded arguments}"`, so two calls with the
//! same arguments share an entry and nothing else does.

use std::future::Future;

use serde::Serialize;
use serde::de::DeserializeOwned;
use studio_common::Inventory;

use crate::application::ports::ResultCache;

pub const DOMAINS_OP: &str = "domains";
pub const USER_PROFILES_OP: &str = "user_profiles";
pub const SPACES_OP: &str = "spaces";
pub const APPS_OP: &str = "apps";

/// Results that may be stored. Partial results are never cached.
pub trait Cacheable {
    fn is_cacheable(&self) -> bool;
}

impl<T> Cacheable for Inventory<T> {
    fn is_cacheable(&self) -> bool {
        self.is_complete()
    }
}

/// Builds the cache key for `operation` called with `args`.
#[must_use]
pub fn cache_key(operation: &str, args: &impl Serialize) -> String {
    let encoded = serde_json::to_string(args).unwrap_or_default();
    format!("{operation}:{encoded}")
}

/// Key prefix shared by every app listing of `region`.
#[must_use]
pub fn apps_prefix(region: &str) -> String {
    let encoded = serde_json::to_string(region).unwrap_or_default();
    format!("{APPS_OP}:[{encoded},")
}

/// Returns the cached value for `key`, or runs `fetch` and stores its result.
///
/// Cache faults (unreadable entry, schema drift, write failure) are logged
/// and treated as a miss; they never fail the caller.
pub async fn read_through<T, F, Fut>(cache: &impl ResultCache, key: &str, fetch: F) -> T
where
    T: Serialize + DeserializeOwned + Cacheable,
    F: FnOnce() -> Fut,
    Fut: Future<Output = T>,
{
    match cache.get(key) {
        Ok(Some(value)) => match serde_json::from_value::<T>(value) {
            Ok(hit) => {
                tracing::debug!(key, "cache hit");
                return hit;
            }
            Err(e) => tracing::warn!(key, error = %e, "discarding unreadable cache entry"),
        },
        Ok(None) => tracing::debug!(key, "cache miss"),
        Err(e) => tracing::warn!(key, error = %e, "cache lookup failed"),
    }

    let fresh = fetch().await;
    if fresh.is_cacheable() {
        match serde_json::to_value(&fresh) {
            Ok(value) => {
                if let Err(e) = cache.put(key, &value) {
                    tracing::warn!(key, error = %e, "cache write failed");
                }
            }
            Err(e) => tracing::warn!(key, error = %e, "cannot encode result for cache"),
        }
    }
    fresh
}

/// Drops cached app listings for each region (after deletes).
pub fn invalidate_apps<'a>(cache: &impl ResultCache, regions: impl IntoIterator<Item = &'a str>) {
    for region in regions {
        match cache.invalidate_prefix(&apps_prefix(region)) {
            Ok(n) => tracing::debug!(region, entries = n, "invalidated app cache"),
            Err(e) => tracing::warn!(region, error = %e, "cannot invalidate app cache"),
        }
    }
}

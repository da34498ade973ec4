//! App Store version lookup over HTTP, with a per-bundle cache.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info, warn};

use crate::core::config::DEFAULT_LOOKUP_URL;
use crate::core::error::CommonError;
use crate::core::version::SemanticVersion;
use crate::store::types::{AppStoreLookup, LookupResponse};

#[async_trait]
pub trait StoreLookup: Send + Sync {
    async fn lookup(&self, bundle_id: &str) -> Result<AppStoreLookup, CommonError>;
}

pub struct AppStoreClient {
    base_url: String,
    cache_ttl: Duration,
    client: reqwest::Client,
    cache: Mutex<HashMap<String, AppStoreLookup>>,
}

impl AppStoreClient {
    pub fn new(base_url: Option<String>, cache_ttl: Duration) -> Self {
        Self {
            base_url: base_url.unwrap_or_else(|| DEFAULT_LOOKUP_URL.to_string()),
            cache_ttl,
            client: reqwest::Client::new(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    fn cached(&self, bundle_id: &str) -> Option<AppStoreLookup> {
        let cache = self.cache.lock().ok()?;
        let entry = cache.get(bundle_id)?;
        let age = Utc::now().signed_duration_since(entry.lookup_date);
        // Negative age (clock went backwards) counts as expired.
        let fresh = age
            .to_std()
            .map(|age| age < self.cache_ttl)
            .unwrap_or(false);
        fresh.then(|| entry.clone())
    }

    fn remember(&self, bundle_id: &str, lookup: &AppStoreLookup) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(bundle_id.to_string(), lookup.clone());
        }
    }
}

#[async_trait]
impl StoreLookup for AppStoreClient {
    async fn lookup(&self, bundle_id: &str) -> Result<AppStoreLookup, CommonError> {
        if let Some(hit) = self.cached(bundle_id) {
            debug!("App Store lookup cache hit: {}", hit);
            return Ok(hit);
        }

        info!("App Store lookup: {} bundleId={}", self.base_url, bundle_id);

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("bundleId", bundle_id)])
            .send()
            .await
            .map_err(|e| CommonError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let err_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("App Store API error: {} - {}", status, err_body);
            return Err(CommonError::Api {
                status,
                message: err_body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| CommonError::Network(e.to_string()))?;
        let parsed: LookupResponse =
            serde_json::from_str(&body).map_err(|e| CommonError::Parse(e.to_string()))?;

        let entry = parsed
            .results
            .into_iter()
            .next()
            .ok_or_else(|| CommonError::custom("App Store data not found"))?;

        let lookup = AppStoreLookup::from_entry(entry, Utc::now());
        debug!("App Store lookup result: {}", lookup);
        self.remember(bundle_id, &lookup);
        Ok(lookup)
    }
}

/// Returns the store listing if it is newer than `current`.
pub async fn check_for_update(
    store: &dyn StoreLookup,
    bundle_id: &str,
    current: &SemanticVersion,
) -> Result<Option<AppStoreLookup>, CommonError> {
    let lookup = store.lookup(bundle_id).await?;
    if lookup.is_newer_than(current) {
        info!("Update available: {} (running {})", lookup.app_version, current);
        Ok(Some(lookup))
    } else {
        debug!("Up to date: store {} vs running {}", lookup.app_version, current);
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::types::StoreEntry;

    struct FixedLookup(SemanticVersion);

    #[async_trait]
    impl StoreLookup for FixedLookup {
        async fn lookup(&self, _bundle_id: &str) -> Result<AppStoreLookup, CommonError> {
            let entry = StoreEntry {
                track_name: "Field Notes".to_string(),
                version: self.0,
                track_id: 1,
                track_view_url: "https://apps.apple.com/app/id1".to_string(),
                current_version_release_date: Utc::now(),
            };
            Ok(AppStoreLookup::from_entry(entry, Utc::now()))
        }
    }

    #[tokio::test]
    async fn test_check_for_update_only_when_newer() {
        let store = FixedLookup(SemanticVersion::new(1, 3, 0));
        let newer = check_for_update(&store, "x", &SemanticVersion::new(1, 2, 9)).await;
        assert!(matches!(newer, Ok(Some(_))));

        let same = check_for_update(&store, "x", &SemanticVersion::new(1, 3, 0)).await;
        assert!(matches!(same, Ok(None)));
    }

    #[test]
    fn test_cache_expires_after_ttl() {
        let client = AppStoreClient::new(None, Duration::from_secs(60));
        let entry = StoreEntry {
            track_name: "Old".to_string(),
            version: SemanticVersion::new(1, 0, 0),
            track_id: 7,
            track_view_url: "https://apps.apple.com/app/id7".to_string(),
            current_version_release_date: Utc::now(),
        };
        let stale = AppStoreLookup::from_entry(entry, Utc::now() - chrono::Duration::minutes(5));
        client.remember("com.example", &stale);
        assert!(client.cached("com.example").is_none());

        let fresh = AppStoreLookup {
            lookup_date: Utc::now(),
            ..stale
        };
        client.remember("com.example", &fresh);
        assert_eq!(client.cached("com.example"), Some(fresh));
        assert!(client.cached("com.other").is_none());
    }
}

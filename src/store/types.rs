//! iTunes lookup API types.
//!
//! `GET https://itunes.apple.com/lookup?bundleId=<id>` returns
//! `{ "resultCount": n, "results": [ { ... } ] }`. Only the fields needed
//! for the update check are decoded.

use std::fmt;

use chrono::{DateTime, Utc};
use futures::FutureExt;
use serde::Deserialize;

use crate::core::notice::{Notice, NoticeKind};
use crate::core::version::SemanticVersion;

#[derive(Deserialize, Debug)]
pub(crate) struct LookupResponse {
    #[serde(default)]
    pub results: Vec<StoreEntry>,
}

/// One entry of `results`, as the API sends it.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StoreEntry {
    pub track_name: String,
    pub version: SemanticVersion,
    pub track_id: u64,
    pub track_view_url: String,
    pub current_version_release_date: DateTime<Utc>,
}

/// What the App Store knows about the current release of an app.
#[derive(Debug, Clone, PartialEq)]
pub struct AppStoreLookup {
    pub app_name: String,
    pub app_version: SemanticVersion,
    pub store_url: String,
    pub app_store_id: String,
    pub release_date: DateTime<Utc>,
    /// When this data was fetched; drives the client cache.
    pub lookup_date: DateTime<Utc>,
}

impl AppStoreLookup {
    pub(crate) fn from_entry(entry: StoreEntry, lookup_date: DateTime<Utc>) -> Self {
        Self {
            app_name: entry.track_name,
            app_version: entry.version,
            store_url: entry.track_view_url,
            app_store_id: entry.track_id.to_string(),
            release_date: entry.current_version_release_date,
            lookup_date,
        }
    }

    pub fn is_newer_than(&self, current: &SemanticVersion) -> bool {
        self.app_version > *current
    }

    /// Builds the "new version available" callout for the priority lane.
    /// Tapping it hands the store URL to `open_url`.
    pub fn notification_notice<F>(&self, open_url: F) -> Notice
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        let url = self.store_url.clone();
        let open_url = std::sync::Arc::new(open_url);
        Notice::new(
            format!("{} {} Available", self.app_name, self.app_version),
            format!("Since {}", self.release_date.format("%Y-%m-%d")),
            NoticeKind::PersistentInfo,
        )
        .with_action(move || {
            let url = url.clone();
            let open_url = open_url.clone();
            async move { open_url(url) }.boxed()
        })
    }
}

impl fmt::Display for AppStoreLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} released {}, last checked at {}",
            self.app_name,
            self.app_version,
            self.release_date.format("%Y-%m-%d"),
            self.lookup_date.format("%H:%M:%S")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::lookup_json;
    use std::sync::{Arc, Mutex};

    fn parse(json: &str) -> AppStoreLookup {
        let response: LookupResponse = serde_json::from_str(json).unwrap();
        let entry = response.results.into_iter().next().unwrap();
        AppStoreLookup::from_entry(entry, Utc::now())
    }

    #[test]
    fn test_decodes_lookup_entry() {
        let lookup = parse(&lookup_json("2.4.1"));
        assert_eq!(lookup.app_name, "Field Notes");
        assert_eq!(lookup.app_version, SemanticVersion::new(2, 4, 1));
        assert_eq!(lookup.app_store_id, "1234567890");
        assert_eq!(lookup.release_date.format("%Y-%m-%d").to_string(), "2024-05-01");
    }

    #[test]
    fn test_invalid_version_fails_decode() {
        let result: Result<LookupResponse, _> = serde_json::from_str(&lookup_json("2.4"));
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_results_decode_as_empty() {
        let response: LookupResponse = serde_json::from_str(r#"{"resultCount":0}"#).unwrap();
        assert!(response.results.is_empty());
    }

    #[test]
    fn test_is_newer_than() {
        let lookup = parse(&lookup_json("2.4.1"));
        assert!(lookup.is_newer_than(&SemanticVersion::new(2, 4, 0)));
        assert!(!lookup.is_newer_than(&SemanticVersion::new(2, 4, 1)));
        assert!(!lookup.is_newer_than(&SemanticVersion::new(3, 0, 0)));
    }

    #[tokio::test]
    async fn test_notice_opens_store_url() {
        let lookup = parse(&lookup_json("2.4.1"));
        let opened = Arc::new(Mutex::new(Vec::new()));
        let sink = opened.clone();
        let notice = lookup.notification_notice(move |url| sink.lock().unwrap().push(url));

        assert_eq!(notice.kind, NoticeKind::PersistentInfo);
        assert_eq!(notice.title, "Field Notes 2.4.1 Available");
        assert_eq!(notice.message, "Since 2024-05-01");

        let action = notice.action.expect("notice has an action");
        action().await;
        assert_eq!(
            opened.lock().unwrap().as_slice(),
            ["https://apps.apple.com/app/id1234567890".to_string()]
        );
    }
}

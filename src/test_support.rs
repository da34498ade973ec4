//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::{Arc, Mutex};

use crate::core::notice::{DisplayConfig, LaneId, Notice};
use crate::core::presenter::Presenter;

#[derive(Debug, Clone, PartialEq)]
pub enum PresenterCall {
    Show(LaneId, String),
    Hide(LaneId, String),
}

/// A presenter that records every call. Clones share the same log, so a
/// test can keep one handle after boxing another into the queue.
#[derive(Clone, Default)]
pub struct RecordingPresenter {
    calls: Arc<Mutex<Vec<PresenterCall>>>,
    configs: Arc<Mutex<Vec<DisplayConfig>>>,
}

impl RecordingPresenter {
    pub fn calls(&self) -> Vec<PresenterCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn shown_ids(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                PresenterCall::Show(_, id) => Some(id),
                PresenterCall::Hide(..) => None,
            })
            .collect()
    }

    pub fn last_config(&self) -> Option<DisplayConfig> {
        self.configs.lock().unwrap().last().copied()
    }
}

impl Presenter for RecordingPresenter {
    fn show(&mut self, lane: LaneId, notice: &Notice, config: &DisplayConfig) {
        self.calls
            .lock()
            .unwrap()
            .push(PresenterCall::Show(lane, notice.id.clone()));
        self.configs.lock().unwrap().push(*config);
    }

    fn hide(&mut self, lane: LaneId, id: &str) {
        self.calls
            .lock()
            .unwrap()
            .push(PresenterCall::Hide(lane, id.to_string()));
    }
}

/// A single-result iTunes lookup response body.
pub fn lookup_json(version: &str) -> String {
    format!(
        r#"{{
  "resultCount": 1,
  "results": [
    {{
      "trackName": "Field Notes",
      "version": "{version}",
      "trackId": 1234567890,
      "trackViewUrl": "https://apps.apple.com/app/id1234567890",
      "currentVersionReleaseDate": "2024-05-01T07:00:00Z",
      "bundleId": "com.example.fieldnotes"
    }}
  ]
}}"#
    )
}

//! # Core Logic
//!
//! Everything here is UI-agnostic. The view layer supplies items and raw
//! search text, renders whatever the queue tells it to, and reports back
//! when a notice leaves the screen.
//!
//! ```text
//!   search field ──► FilterSession ──► filter() ──► ranked items ──► list view
//!
//!   errors / events ──► NotificationQueue ──► Presenter ──► banner view
//!                              ▲                               │
//!                              └──────── notice_hidden ────────┘
//! ```
//!
//! ## Modules
//!
//! - [`queue`]: two-lane notice queue with one display slot per lane
//! - [`notice`]: `Notice` and the per-kind display rules
//! - [`presenter`]: the seam to whatever draws notices
//! - [`filter`] / [`fuzzy`]: search term normalization and fuzzy ranking
//! - [`form`]: field validation and the submit gate
//! - [`version`]: semantic versions for update checks
//! - [`config`]: `~/.herald/config.toml` loading and resolution
//! - [`error`]: the user-facing error type

pub mod config;
pub mod error;
pub mod filter;
pub mod form;
pub mod fuzzy;
pub mod notice;
pub mod presenter;
pub mod queue;
pub mod version;

pub use error::{ClientError, CommonError};
pub use filter::{FilterSession, Filterable, SearchTerm, filter};
pub use notice::{LaneId, Notice, NoticeKind};
pub use presenter::Presenter;
pub use queue::NotificationQueue;
pub use version::SemanticVersion;

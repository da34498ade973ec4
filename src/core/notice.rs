//! # Notices
//!
//! A `Notice` is one user-facing message: a title, a body, a kind and an
//! optional async action run when the user taps it.
//!
//! The kind decides everything else:
//!
//! ```text
//! kind             lane      dim                duration   interactive hide
//! ───────────────  ────────  ─────────────────  ─────────  ────────────────
//! Error, Warning   default   gray (tap-through) forever    yes
//! PersistentError  default   gray (blocking)    forever    no
//! Info, Success    default   none               N seconds  yes
//! PersistentInfo   priority  none               forever    yes
//! ```

use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;

/// Default on-screen time for transient (info/success) notices.
pub const DEFAULT_TRANSIENT_SECONDS: u64 = 5;

/// Async callback invoked when a displayed notice is tapped.
pub type NoticeAction = Arc<dyn Fn() -> BoxFuture<'static, ()> + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoticeKind {
    Info,
    Success,
    Warning,
    Error,
    /// Supersedes everything in the default lane and cannot be swiped away.
    PersistentError,
    /// One-at-a-time callout shown in the priority lane.
    PersistentInfo,
}

impl NoticeKind {
    pub fn lane(self) -> LaneId {
        match self {
            NoticeKind::PersistentInfo => LaneId::Priority,
            _ => LaneId::Default,
        }
    }

    /// Title used when a notice is built from an error. None = use the error's own title.
    pub fn default_title(self) -> Option<&'static str> {
        match self {
            NoticeKind::Info => Some("Notice"),
            _ => None,
        }
    }

    pub fn haptic(self) -> Option<Haptic> {
        match self {
            NoticeKind::Success => Some(Haptic::Success),
            NoticeKind::Warning => Some(Haptic::Warning),
            NoticeKind::Error | NoticeKind::PersistentError => Some(Haptic::Error),
            _ => None,
        }
    }

    pub fn display_config(self, transient_seconds: u64) -> DisplayConfig {
        match self {
            NoticeKind::Error | NoticeKind::Warning => DisplayConfig {
                dim: DimMode::Gray { interactive: true },
                duration: DisplayDuration::Forever,
                interactive_hide: true,
            },
            NoticeKind::PersistentError => DisplayConfig {
                dim: DimMode::Gray { interactive: false },
                duration: DisplayDuration::Forever,
                interactive_hide: false,
            },
            NoticeKind::Info | NoticeKind::Success => DisplayConfig {
                dim: DimMode::None,
                duration: DisplayDuration::Seconds(transient_seconds),
                interactive_hide: true,
            },
            NoticeKind::PersistentInfo => DisplayConfig {
                dim: DimMode::None,
                duration: DisplayDuration::Forever,
                interactive_hide: true,
            },
        }
    }
}

/// The two independent display lanes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LaneId {
    Default,
    Priority,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Haptic {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimMode {
    None,
    /// `interactive`: a tap on the dimmed background dismisses the notice.
    Gray { interactive: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayDuration {
    Forever,
    Seconds(u64),
}

/// How the presentation layer should show a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayConfig {
    pub dim: DimMode,
    pub duration: DisplayDuration,
    pub interactive_hide: bool,
}

#[derive(Clone)]
pub struct Notice {
    pub id: String,
    pub title: String,
    pub message: String,
    pub kind: NoticeKind,
    pub action: Option<NoticeAction>,
}

impl Notice {
    /// Creates a notice with a fresh UUID v4 id.
    pub fn new(title: impl Into<String>, message: impl Into<String>, kind: NoticeKind) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            message: message.into(),
            kind,
            action: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_action<F>(mut self, action: F) -> Self
    where
        F: Fn() -> BoxFuture<'static, ()> + Send + Sync + 'static,
    {
        self.action = Some(Arc::new(action));
        self
    }

    pub fn lane(&self) -> LaneId {
        self.kind.lane()
    }
}

impl fmt::Debug for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notice")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("message", &self.message)
            .field("kind", &self.kind)
            .field("action", &self.action.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_persistent_info_uses_priority_lane() {
        assert_eq!(NoticeKind::PersistentInfo.lane(), LaneId::Priority);
        for kind in [
            NoticeKind::Info,
            NoticeKind::Success,
            NoticeKind::Warning,
            NoticeKind::Error,
            NoticeKind::PersistentError,
        ] {
            assert_eq!(kind.lane(), LaneId::Default);
        }
    }

    #[test]
    fn test_display_config_by_kind() {
        let info = NoticeKind::Info.display_config(DEFAULT_TRANSIENT_SECONDS);
        assert_eq!(info.duration, DisplayDuration::Seconds(5));
        assert_eq!(info.dim, DimMode::None);

        let blocking = NoticeKind::PersistentError.display_config(5);
        assert!(!blocking.interactive_hide);
        assert_eq!(blocking.dim, DimMode::Gray { interactive: false });
        assert_eq!(blocking.duration, DisplayDuration::Forever);

        let error = NoticeKind::Error.display_config(5);
        assert!(error.interactive_hide);
        assert_eq!(error.duration, DisplayDuration::Forever);

        assert_eq!(
            NoticeKind::PersistentInfo.display_config(5).duration,
            DisplayDuration::Forever
        );
    }

    #[test]
    fn test_new_notice_gets_unique_id() {
        let a = Notice::new("t", "m", NoticeKind::Info);
        let b = Notice::new("t", "m", NoticeKind::Info);
        assert_ne!(a.id, b.id);
        assert!(a.action.is_none());
    }

    #[test]
    fn test_default_title_and_haptic() {
        assert_eq!(NoticeKind::Info.default_title(), Some("Notice"));
        assert_eq!(NoticeKind::Error.default_title(), None);
        assert_eq!(NoticeKind::PersistentError.haptic(), Some(Haptic::Error));
        assert_eq!(NoticeKind::PersistentInfo.haptic(), None);
    }
}

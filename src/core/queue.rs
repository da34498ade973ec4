//! # Notification Queue
//!
//! Holds pending notices and decides which one is on screen.
//!
//! ```text
//!              enqueue(PersistentInfo)          enqueue(anything else)
//!                      │                                 │
//!                      ▼                                 ▼ (dedup by id)
//!          ┌──────────────────────┐          ┌──────────────────────┐
//!          │    priority lane     │          │     default lane     │
//!          │  [queue] → displayed │          │  [queue] → displayed │
//!          └──────────────────────┘          └──────────────────────┘
//! ```
//!
//! Each lane is a FIFO with one display slot. A lane is Idle when the slot
//! is empty; every mutation ends with `advance`, which moves the queue head
//! into an Idle slot. The lanes never block each other.
//!
//! The queue is an owned service, not a global. It is mutated from one
//! logical context, so there is no locking here.

use std::collections::VecDeque;

use log::{debug, warn};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::core::error::CommonError;
use crate::core::notice::{DEFAULT_TRANSIENT_SECONDS, LaneId, Notice, NoticeKind};
use crate::core::presenter::Presenter;

struct Lane {
    id: LaneId,
    queue: VecDeque<Notice>,
    displayed: Option<Notice>,
}

impl Lane {
    fn new(id: LaneId) -> Self {
        Self {
            id,
            queue: VecDeque::new(),
            displayed: None,
        }
    }

    fn contains(&self, id: &str) -> bool {
        self.displayed.as_ref().is_some_and(|n| n.id == id)
            || self.queue.iter().any(|n| n.id == id)
    }

    fn displayed_id_is(&self, id: &str) -> bool {
        self.displayed.as_ref().is_some_and(|n| n.id == id)
    }
}

pub struct NotificationQueue {
    default_lane: Lane,
    priority_lane: Lane,
    presenter: Box<dyn Presenter>,
    transient_seconds: u64,
}

impl NotificationQueue {
    pub fn new(presenter: Box<dyn Presenter>) -> Self {
        Self {
            default_lane: Lane::new(LaneId::Default),
            priority_lane: Lane::new(LaneId::Priority),
            presenter,
            transient_seconds: DEFAULT_TRANSIENT_SECONDS,
        }
    }

    /// Overrides how long info/success notices stay up.
    pub fn with_transient_seconds(mut self, seconds: u64) -> Self {
        self.transient_seconds = seconds;
        self
    }

    /// Adds a notice to its lane. Returns false if it was dropped as a duplicate.
    ///
    /// Default-lane notices are deduplicated by id against both queued and
    /// displayed notices. An empty id is never deduplicated.
    pub fn enqueue(&mut self, notice: Notice) -> bool {
        let lane_id = notice.lane();
        let lane = self.lane_mut(lane_id);

        if lane_id == LaneId::Default && !notice.id.is_empty() && lane.contains(&notice.id) {
            debug!("notice {} already in default lane, skipping", notice.id);
            return false;
        }

        debug!("enqueue [{:?}] {} ({:?})", lane_id, notice.id, notice.kind);
        lane.queue.push_back(notice);
        self.advance(lane_id);
        true
    }

    /// Wraps an error into a notice and enqueues it.
    ///
    /// A `PersistentError` clears the default lane first and gets an empty id,
    /// so it always shows. Other kinds use the error reason as id, which keeps
    /// repeated failures from stacking identical banners.
    pub fn enqueue_error(&mut self, error: &CommonError, kind: NoticeKind) -> bool {
        let reason = error.reason();
        let id = if kind == NoticeKind::PersistentError {
            self.dismiss_all();
            String::new()
        } else {
            reason.clone()
        };
        let title = kind.default_title().unwrap_or_else(|| error.title());
        self.enqueue(Notice::new(title, reason, kind).with_id(id))
    }

    /// Removes queued default-lane notices with this id and hides a
    /// displayed notice with this id in either lane. An empty id dismisses
    /// everything.
    pub fn dismiss(&mut self, id: &str) {
        if id.is_empty() {
            self.dismiss_all();
            return;
        }

        self.default_lane.queue.retain(|n| n.id != id);
        for lane in [LaneId::Default, LaneId::Priority] {
            let slot = self.lane_mut(lane);
            if slot.displayed_id_is(id) {
                slot.displayed = None;
                self.presenter.hide(lane, id);
                debug!("dismissed displayed notice [{:?}] {}", lane, id);
            }
            self.advance(lane);
        }
    }

    /// Clears the default lane, queued and displayed. The priority lane is untouched.
    pub fn dismiss_all(&mut self) {
        let dropped = self.default_lane.queue.len();
        self.default_lane.queue.clear();
        if let Some(notice) = self.default_lane.displayed.take() {
            self.presenter.hide(LaneId::Default, &notice.id);
        }
        debug!("default lane cleared ({} queued dropped)", dropped);
    }

    /// Called by the presentation layer when a notice left the screen.
    /// Unknown ids are ignored, so reporting the same hide twice is harmless.
    pub fn notice_hidden(&mut self, lane: LaneId, id: &str) {
        let slot = self.lane_mut(lane);
        if !slot.displayed_id_is(id) {
            return;
        }
        slot.displayed = None;
        debug!("hidden [{:?}] {}", lane, id);
        self.advance(lane);
    }

    /// User interaction with a displayed notice.
    ///
    /// Spawns the notice's action without waiting for it, then hides the
    /// notice unless it is a `PersistentError`. Without a tokio runtime the
    /// action is skipped with a warning; the notice is still hidden.
    pub fn tap(&mut self, lane: LaneId, id: &str) -> Option<JoinHandle<()>> {
        let notice = self.lane(lane).displayed.as_ref().filter(|n| n.id == id)?;
        let kind = notice.kind;
        let handle = notice.action.clone().and_then(|action| match Handle::try_current() {
            Ok(runtime) => Some(runtime.spawn(action())),
            Err(_) => {
                warn!("no tokio runtime, skipping action for notice {}", id);
                None
            }
        });

        if kind != NoticeKind::PersistentError {
            self.presenter.hide(lane, id);
            self.notice_hidden(lane, id);
        }
        handle
    }

    pub fn displayed(&self, lane: LaneId) -> Option<&Notice> {
        self.lane(lane).displayed.as_ref()
    }

    /// Ids of queued (not yet displayed) notices, head first.
    pub fn pending(&self, lane: LaneId) -> Vec<&str> {
        self.lane(lane).queue.iter().map(|n| n.id.as_str()).collect()
    }

    pub fn is_idle(&self, lane: LaneId) -> bool {
        self.lane(lane).displayed.is_none()
    }

    fn lane(&self, lane: LaneId) -> &Lane {
        match lane {
            LaneId::Default => &self.default_lane,
            LaneId::Priority => &self.priority_lane,
        }
    }

    fn lane_mut(&mut self, lane: LaneId) -> &mut Lane {
        match lane {
            LaneId::Default => &mut self.default_lane,
            LaneId::Priority => &mut self.priority_lane,
        }
    }

    /// Idle + non-empty → pop the head and show it.
    fn advance(&mut self, lane: LaneId) {
        let transient_seconds = self.transient_seconds;
        let slot = match lane {
            LaneId::Default => &mut self.default_lane,
            LaneId::Priority => &mut self.priority_lane,
        };
        if slot.displayed.is_some() {
            return;
        }
        let Some(next) = slot.queue.pop_front() else {
            return;
        };

        let config = next.kind.display_config(transient_seconds);
        debug!("show [{:?}] {}", slot.id, next.id);
        self.presenter.show(slot.id, &next, &config);
        slot.displayed = Some(next);
    }
}

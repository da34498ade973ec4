//! Presentation seam for the notification queue.
//!
//! The queue decides *what* is on screen; a `Presenter` puts it there.
//! Whatever renders notices must report back through
//! `NotificationQueue::notice_hidden` when one leaves the screen
//! (timeout, swipe) so the lane can advance.

use log::info;
use tokio::sync::mpsc::UnboundedSender;

use crate::core::notice::{DisplayConfig, LaneId, Notice};

pub trait Presenter {
    fn show(&mut self, lane: LaneId, notice: &Notice, config: &DisplayConfig);
    fn hide(&mut self, lane: LaneId, id: &str);
}

/// Event emitted by `ChannelPresenter`.
#[derive(Debug, Clone)]
pub enum PresentationEvent {
    Show {
        lane: LaneId,
        notice: Notice,
        config: DisplayConfig,
    },
    Hide {
        lane: LaneId,
        id: String,
    },
}

/// Forwards presentation requests to a UI task over an mpsc channel.
pub struct ChannelPresenter {
    sender: UnboundedSender<PresentationEvent>,
}

impl ChannelPresenter {
    pub fn new(sender: UnboundedSender<PresentationEvent>) -> Self {
        Self { sender }
    }
}

impl Presenter for ChannelPresenter {
    fn show(&mut self, lane: LaneId, notice: &Notice, config: &DisplayConfig) {
        // Receiver gone means the UI is shutting down; nothing left to show on.
        let _ = self.sender.send(PresentationEvent::Show {
            lane,
            notice: notice.clone(),
            config: *config,
        });
    }

    fn hide(&mut self, lane: LaneId, id: &str) {
        let _ = self.sender.send(PresentationEvent::Hide {
            lane,
            id: id.to_string(),
        });
    }
}

/// Prints notices to stdout. Used by the CLI.
#[derive(Default)]
pub struct LogPresenter;

impl Presenter for LogPresenter {
    fn show(&mut self, lane: LaneId, notice: &Notice, config: &DisplayConfig) {
        info!("show [{:?}] {} ({:?})", lane, notice.id, config.duration);
        println!("[{:?}] {}: {}", notice.kind, notice.title, notice.message);
    }

    fn hide(&mut self, lane: LaneId, id: &str) {
        info!("hide [{:?}] {}", lane, id);
    }
}

//! Messages delivered to the engine's owning task.
//!
//! Every cross-task hand-off goes through one unbounded channel: fetch
//! completions, background height measurements and presentation commands.
//! The engine applies them one at a time on its own task, so nothing else
//! ever writes to its state.

use crate::model::{FetchError, ItemId, Page, Revision};
use crate::state::pagination::Generation;
use crate::state::prefetch::ScrollMetrics;
use crate::view_state::{Height, Width};
use tokio::sync::mpsc;

/// Requests from the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedCommand {
    /// Load the next page if the engine is idle.
    RequestNextPage,
    /// Pull-to-refresh: restart from offset 0.
    Refresh,
    /// "Show more" was tapped on a review.
    ExpandItem(ItemId),
    /// A scroll gesture is decelerating towards a known offset.
    ScrollSettled(ScrollMetrics),
}

/// A height computed off the owning task, awaiting commit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightMeasurement {
    /// Measured item.
    pub item: ItemId,
    /// Revision of the item when it was measured.
    pub revision: Revision,
    /// Feed generation when measured.
    pub generation: Generation,
    /// Width the height applies to.
    pub width: Width,
    /// Measured height.
    pub height: Height,
}

/// Everything the engine can receive.
#[derive(Debug)]
pub enum FeedMessage {
    /// A fetch issued under `generation` at `offset` completed.
    PageFetched {
        /// Generation the fetch was issued under.
        generation: Generation,
        /// Offset the fetch was issued at.
        offset: usize,
        /// What the fetcher returned.
        result: Result<Page, FetchError>,
    },
    /// A background measurement finished.
    HeightMeasured(HeightMeasurement),
    /// A presentation command.
    Command(FeedCommand),
}

/// Cloneable sender of [`FeedCommand`]s for the presentation layer.
#[derive(Debug, Clone)]
pub struct FeedHandle {
    tx: mpsc::UnboundedSender<FeedMessage>,
}

impl FeedHandle {
    pub(crate) fn new(tx: mpsc::UnboundedSender<FeedMessage>) -> Self {
        Self { tx }
    }

    /// Post a command. Returns `false` once the engine has been dropped.
    pub fn send(&self, command: FeedCommand) -> bool {
        self.tx.send(FeedMessage::Command(command)).is_ok()
    }

    /// Ask for the next page.
    pub fn request_next_page(&self) -> bool {
        self.send(FeedCommand::RequestNextPage)
    }

    /// Ask for a refresh.
    pub fn refresh(&self) -> bool {
        self.send(FeedCommand::Refresh)
    }

    /// Ask to expand a review.
    pub fn expand_item(&self, id: ItemId) -> bool {
        self.send(FeedCommand::ExpandItem(id))
    }

    /// Report a settling scroll gesture.
    pub fn scroll_settled(&self, metrics: ScrollMetrics) -> bool {
        self.send(FeedCommand::ScrollSettled(metrics))
    }
}

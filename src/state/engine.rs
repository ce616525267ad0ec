//! Pagination engine.
//!
//! Owns the feed state and the height cache, issues fetches through a
//! [`PageFetcher`], and applies every asynchronous result on the task that
//! owns it. Fetches run on spawned tokio tasks and background measurements on
//! the blocking pool; both report back through the engine's message channel.
//!
//! ```text
//! presentation ──FeedCommand──▶ channel ──▶ apply() ──▶ PaginationState
//!                                  ▲                          │
//!        spawned fetch ────────────┤                          ▼
//!        spawn_blocking measure ───┘                on_state_changed(snapshot)
//! ```

use crate::model::{
    FetchError, ItemId, ListItem, MutationError, RawReview, ReviewItem, Revision,
    DEFAULT_TRUNCATION_LINES,
};
use crate::source::PageFetcher;
use crate::state::message::{FeedCommand, FeedHandle, FeedMessage, HeightMeasurement};
use crate::state::pagination::{
    FeedSnapshot, FetchTicket, MergeOutcome, PaginationState, RequestPhase,
};
use crate::state::prefetch::{PrefetchPolicy, ScrollMetrics};
use crate::view_state::cell_layout::item_height;
use crate::view_state::{Height, HeightCache, HeightCacheConfig, HeightKey, TextMeasurer, Width};
use std::num::NonZeroUsize;
use std::ops::Range;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Default number of reviews per page.
pub const DEFAULT_PAGE_SIZE: NonZeroUsize = match NonZeroUsize::new(20) {
    Some(size) => size,
    None => NonZeroUsize::MIN,
};

/// Engine tuning, usually derived from the resolved configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Reviews requested per fetch.
    pub page_size: NonZeroUsize,
    /// Initial line limit for review text (0 = unlimited).
    pub truncation_lines: usize,
    /// When scrolling triggers the next page.
    pub prefetch: PrefetchPolicy,
    /// Height cache sizing.
    pub height_cache: HeightCacheConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            truncation_lines: DEFAULT_TRUNCATION_LINES,
            prefetch: PrefetchPolicy::default(),
            height_cache: HeightCacheConfig::default(),
        }
    }
}

type StateObserver = Box<dyn FnMut(&FeedSnapshot) + Send>;

/// The feed synchronization engine.
///
/// Exactly one task owns the engine; every mutation goes through `&mut self`.
/// Methods that issue fetches or measurements spawn onto the current tokio
/// runtime and must be called from within one.
pub struct PaginationEngine {
    state: PaginationState,
    heights: HeightCache,
    fetcher: Arc<dyn PageFetcher>,
    config: EngineConfig,
    tx: mpsc::UnboundedSender<FeedMessage>,
    rx: mpsc::UnboundedReceiver<FeedMessage>,
    observers: Vec<StateObserver>,
}

impl PaginationEngine {
    /// Create an idle engine with an empty feed.
    pub fn new(fetcher: Arc<dyn PageFetcher>, config: EngineConfig) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            state: PaginationState::new(config.page_size),
            heights: HeightCache::from_config(&config.height_cache),
            fetcher,
            config,
            tx,
            rx,
            observers: Vec::new(),
        }
    }

    /// Register a callback fired after every observable state change: request
    /// start, page merge, fetch failure, refresh start and expansion.
    pub fn on_state_changed<F>(&mut self, observer: F)
    where
        F: FnMut(&FeedSnapshot) + Send + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    /// Issue the initial page request.
    pub fn start(&mut self) -> bool {
        self.request_next_page()
    }

    /// Request the next page.
    ///
    /// No-op unless the phase is `Idle` or `Errored`. Returns whether a fetch
    /// was issued.
    pub fn request_next_page(&mut self) -> bool {
        let Some(ticket) = self.state.begin_request() else {
            debug!(phase = %self.state.phase(), "Page request dropped");
            return false;
        };

        debug!(
            offset = ticket.offset,
            generation = %ticket.generation,
            "Requesting page"
        );
        self.spawn_fetch(ticket);
        self.notify();
        true
    }

    /// Restart the feed from the first page under a new generation.
    ///
    /// Allowed in any phase. Results of fetches issued before the refresh are
    /// discarded when they arrive.
    pub fn refresh(&mut self) {
        let ticket = self.state.begin_refresh();
        self.heights.clear();

        info!(generation = %ticket.generation, "Feed refresh");
        self.spawn_fetch(ticket);
        self.notify();
    }

    /// Lift the line limit of a review.
    ///
    /// Clears the height cache, since the item's height changes and cached
    /// offsets below it are no longer valid.
    ///
    /// # Errors
    ///
    /// `MutationError::NotFound` for unknown ids, `MutationError::NotExpandable`
    /// for the summary row.
    pub fn expand_item(&mut self, id: ItemId) -> Result<Revision, MutationError> {
        let revision = self.state.review_mut(id).map(ReviewItem::expand)?;
        self.heights.clear();

        debug!(item = %id, revision = revision.get(), "Item expanded");
        self.notify();
        Ok(revision)
    }

    /// Evaluate the prefetch heuristic for a decelerating scroll.
    ///
    /// Returns whether a fetch was issued.
    pub fn on_scroll_settled(&mut self, metrics: &ScrollMetrics) -> bool {
        if !self.config.prefetch.should_prefetch(metrics) {
            return false;
        }
        self.request_next_page()
    }

    /// Cached height of an item at `width`. Never measures.
    pub fn height_for(&mut self, id: ItemId, width: Width) -> Option<Height> {
        self.heights.get(&HeightKey::new(id, width))
    }

    /// Store a height computed elsewhere.
    pub fn record_height(&mut self, id: ItemId, width: Width, height: Height) {
        self.heights.set(HeightKey::new(id, width), height);
    }

    /// Height of an item at `width`, measuring and caching on a miss.
    ///
    /// Returns `None` only for unknown ids.
    pub fn measure_height(
        &mut self,
        id: ItemId,
        width: Width,
        measurer: &dyn TextMeasurer,
    ) -> Option<Height> {
        let key = HeightKey::new(id, width);
        if let Some(height) = self.heights.get(&key) {
            return Some(height);
        }

        let height = item_height(self.state.get(id)?, width, measurer);
        self.heights.set(key, height);
        Some(height)
    }

    /// Measure uncached items in `range` on the blocking pool.
    ///
    /// Results are committed when their [`FeedMessage::HeightMeasured`] is
    /// applied, and only if the item is still at the measured revision and
    /// generation. Returns the number of measurements spawned.
    pub fn precompute_heights(
        &mut self,
        range: Range<usize>,
        width: Width,
        measurer: Arc<dyn TextMeasurer>,
    ) -> usize {
        let end = range.end.min(self.state.len());
        let start = range.start.min(end);
        let generation = self.state.generation();
        let snapshot = self.state.snapshot();

        let mut spawned = 0;
        for item in &snapshot.items()[start..end] {
            if self.heights.get(&HeightKey::new(item.id(), width)).is_some() {
                continue;
            }

            let item = item.clone();
            let measurer = Arc::clone(&measurer);
            let tx = self.tx.clone();
            tokio::task::spawn_blocking(move || {
                let height = item_height(&item, width, measurer.as_ref());
                let measurement = HeightMeasurement {
                    item: item.id(),
                    revision: item.revision(),
                    generation,
                    width,
                    height,
                };
                // Engine dropped: nothing left to commit to.
                let _ = tx.send(FeedMessage::HeightMeasured(measurement));
            });
            spawned += 1;
        }

        debug!(start, end, spawned, "Height precompute scheduled");
        spawned
    }

    /// Total height of every loaded row at `width`, measuring misses.
    pub fn content_height(&mut self, width: Width, measurer: &dyn TextMeasurer) -> Height {
        let snapshot = self.state.snapshot();
        snapshot
            .items()
            .iter()
            .map(|item| {
                let key = HeightKey::new(item.id(), width);
                match self.heights.get(&key) {
                    Some(height) => height,
                    None => {
                        let height = item_height(item, width, measurer);
                        self.heights.set(key, height);
                        height
                    }
                }
            })
            .sum()
    }

    /// Apply one message on the owning task.
    pub fn apply(&mut self, message: FeedMessage) {
        match message {
            FeedMessage::PageFetched {
                generation,
                offset,
                result,
            } => {
                let ticket = FetchTicket { generation, offset };
                if !self.state.is_current(ticket) {
                    debug!(
                        offset,
                        generation = %generation,
                        current = %self.state.generation(),
                        "Stale page result discarded"
                    );
                    return;
                }

                match result {
                    Ok(page) => self.merge(page.items, page.total_count),
                    Err(e) => self.fail(&e),
                }
            }
            FeedMessage::HeightMeasured(measurement) => self.commit_measurement(measurement),
            FeedMessage::Command(command) => self.handle_command(command),
        }
    }

    /// Wait for the next message. Never `None` while the engine is alive,
    /// since it holds a sender itself.
    pub async fn next_message(&mut self) -> Option<FeedMessage> {
        self.rx.recv().await
    }

    /// Wait for one message and apply it.
    pub async fn process_next(&mut self) -> bool {
        match self.next_message().await {
            Some(message) => {
                self.apply(message);
                true
            }
            None => false,
        }
    }

    /// Apply every message already queued without waiting.
    pub fn drain(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(message) = self.rx.try_recv() {
            self.apply(message);
            applied += 1;
        }
        applied
    }

    /// Immutable view of the current feed.
    pub fn snapshot(&self) -> FeedSnapshot {
        self.state.snapshot()
    }

    /// Borrow the feed state.
    pub fn state(&self) -> &PaginationState {
        &self.state
    }

    /// Current request phase.
    pub fn phase(&self) -> RequestPhase {
        self.state.phase()
    }

    /// Configuration the engine was built with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Borrow the height cache.
    pub fn height_cache(&self) -> &HeightCache {
        &self.heights
    }

    /// Sender for presentation commands.
    pub fn handle(&self) -> FeedHandle {
        FeedHandle::new(self.tx.clone())
    }

    fn spawn_fetch(&self, ticket: FetchTicket) {
        let fetcher = Arc::clone(&self.fetcher);
        let tx = self.tx.clone();
        let limit = self.state.page_size().get();

        tokio::spawn(async move {
            // The fetch runs in its own task so a panicking fetcher still
            // reports back and the phase leaves `Loading`.
            let fetch = tokio::spawn(async move { fetcher.fetch(ticket.offset, limit).await });
            let result = match fetch.await {
                Ok(result) => result,
                Err(e) => {
                    warn!(error = %e, offset = ticket.offset, "Fetch task did not complete");
                    Err(FetchError::Transport(format!("fetch task failed: {e}")))
                }
            };
            let _ = tx.send(FeedMessage::PageFetched {
                generation: ticket.generation,
                offset: ticket.offset,
                result,
            });
        });
    }

    fn merge(&mut self, raw: Vec<RawReview>, total_count: usize) {
        let limit = self.config.truncation_lines;
        let decoded: Result<Vec<ListItem>, _> = raw
            .into_iter()
            .map(|review| ReviewItem::from_raw(review, limit).map(ListItem::Review))
            .collect();

        let items = match decoded {
            Ok(items) => items,
            Err(e) => {
                warn!(error = %e, offset = self.state.offset(), "Page rejected");
                self.state.mark_failed();
                self.notify();
                return;
            }
        };

        let received = items.len();
        match self.state.merge_page(items, total_count) {
            MergeOutcome::MorePages => {
                debug!(
                    received,
                    offset = self.state.offset(),
                    total_count,
                    "Page merged"
                );
            }
            MergeOutcome::Exhausted => {
                info!(total_count, items = self.state.len(), "Feed exhausted");
            }
        }
        self.notify();
    }

    fn fail(&mut self, error: &FetchError) {
        warn!(error = %error, offset = self.state.offset(), "Page fetch failed");
        self.state.mark_failed();
        self.notify();
    }

    fn commit_measurement(&mut self, measurement: HeightMeasurement) {
        let current = measurement.generation == self.state.generation()
            && self
                .state
                .get(measurement.item)
                .is_some_and(|item| item.revision() == measurement.revision);

        if !current {
            debug!(item = %measurement.item, "Stale height measurement discarded");
            return;
        }
        self.record_height(measurement.item, measurement.width, measurement.height);
    }

    fn handle_command(&mut self, command: FeedCommand) {
        match command {
            FeedCommand::RequestNextPage => {
                self.request_next_page();
            }
            FeedCommand::Refresh => self.refresh(),
            FeedCommand::ExpandItem(id) => {
                if let Err(e) = self.expand_item(id) {
                    debug!(error = %e, "Expand ignored");
                }
            }
            FeedCommand::ScrollSettled(metrics) => {
                self.on_scroll_settled(&metrics);
            }
        }
    }

    fn notify(&mut self) {
        if self.observers.is_empty() {
            return;
        }
        let snapshot = self.state.snapshot();
        for observer in &mut self.observers {
            observer(&snapshot);
        }
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;

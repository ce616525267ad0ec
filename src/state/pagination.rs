//! Pagination state owned by the engine.
//!
//! [`PaginationState`] is the single source of truth for the feed: the ordered
//! item list, the paging cursor and the request phase. Only the engine mutates
//! it (all mutators are crate-private); observers receive immutable
//! [`FeedSnapshot`]s that share the item list copy-on-write.

use crate::model::{ItemId, ListItem, MutationError, ReviewItem, SummaryItem};
use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Arc;

/// Phase of the page request state machine.
///
/// ```text
///            request_next_page()              success, more pages
///   Idle ─────────────────────────▶ Loading ─────────────────────▶ Idle
///    ▲                               │   │
///    │ (retryable)         failure   │   │ success, offset >= total
///  Errored ◀─────────────────────────┘   └────────────────────────▶ Exhausted
///
///   refresh(): any phase ──▶ Loading (new generation)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RequestPhase {
    /// Ready to load the next page.
    #[default]
    Idle,
    /// A fetch is in flight.
    Loading,
    /// No more pages. Terminal until `refresh()`.
    Exhausted,
    /// The last fetch failed. Behaves like `Idle` for the next request.
    Errored,
}

impl RequestPhase {
    /// Whether a new page request may start in this phase.
    pub fn accepts_request(&self) -> bool {
        matches!(self, RequestPhase::Idle | RequestPhase::Errored)
    }
}

impl fmt::Display for RequestPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RequestPhase::Idle => "idle",
            RequestPhase::Loading => "loading",
            RequestPhase::Exhausted => "exhausted",
            RequestPhase::Errored => "errored",
        };
        f.write_str(name)
    }
}

/// Refresh counter. Fetch results tagged with an older generation are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Generation(u64);

impl Generation {
    /// Get the raw counter value.
    pub fn get(&self) -> u64 {
        self.0
    }

    /// The generation following this one.
    pub fn next(&self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ticket for one issued fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FetchTicket {
    /// Generation the fetch belongs to.
    pub generation: Generation,
    /// Offset the fetch starts at.
    pub offset: usize,
}

/// Result of merging a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MergeOutcome {
    /// More pages remain; phase is back to `Idle`.
    MorePages,
    /// The summary row was appended; phase is `Exhausted`.
    Exhausted,
}

/// Immutable view of the feed handed to observers.
#[derive(Debug, Clone)]
pub struct FeedSnapshot {
    items: Arc<Vec<ListItem>>,
    /// Offset of the next page to request.
    pub offset: usize,
    /// Request phase at snapshot time.
    pub phase: RequestPhase,
    /// Server-side total, once the first page arrived.
    pub total_count: Option<usize>,
    /// Generation at snapshot time.
    pub generation: Generation,
}

impl FeedSnapshot {
    /// Rows in display order.
    pub fn items(&self) -> &[ListItem] {
        &self.items
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the feed has no rows.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// The engine-owned feed state.
#[derive(Debug, Clone)]
pub struct PaginationState {
    items: Arc<Vec<ListItem>>,
    offset: usize,
    page_size: NonZeroUsize,
    phase: RequestPhase,
    total_count: Option<usize>,
    generation: Generation,
}

impl PaginationState {
    /// Empty idle feed at generation zero.
    pub fn new(page_size: NonZeroUsize) -> Self {
        Self {
            items: Arc::new(Vec::new()),
            offset: 0,
            page_size,
            phase: RequestPhase::Idle,
            total_count: None,
            generation: Generation::default(),
        }
    }

    /// Rows in display order.
    pub fn items(&self) -> &[ListItem] {
        &self.items
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the feed has no rows.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Offset of the next page to request.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Reviews per page.
    pub fn page_size(&self) -> NonZeroUsize {
        self.page_size
    }

    /// Current request phase.
    pub fn phase(&self) -> RequestPhase {
        self.phase
    }

    /// Server-side total, once the first page arrived.
    pub fn total_count(&self) -> Option<usize> {
        self.total_count
    }

    /// Current refresh generation.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Index of the item with this id.
    pub fn position(&self, id: ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    /// Row with this id.
    pub fn get(&self, id: ItemId) -> Option<&ListItem> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Cheap copy-on-write view of the feed.
    pub fn snapshot(&self) -> FeedSnapshot {
        FeedSnapshot {
            items: Arc::clone(&self.items),
            offset: self.offset,
            phase: self.phase,
            total_count: self.total_count,
            generation: self.generation,
        }
    }

    /// Enter `Loading` if the phase allows a request.
    pub(crate) fn begin_request(&mut self) -> Option<FetchTicket> {
        if !self.phase.accepts_request() {
            return None;
        }
        self.phase = RequestPhase::Loading;
        Some(FetchTicket {
            generation: self.generation,
            offset: self.offset,
        })
    }

    /// Start a new generation from offset 0 with an empty list, in `Loading`.
    pub(crate) fn begin_refresh(&mut self) -> FetchTicket {
        self.generation = self.generation.next();
        self.offset = 0;
        self.items = Arc::new(Vec::new());
        self.total_count = None;
        self.phase = RequestPhase::Loading;
        FetchTicket {
            generation: self.generation,
            offset: 0,
        }
    }

    /// Whether a completion for `ticket` still applies to this state.
    pub(crate) fn is_current(&self, ticket: FetchTicket) -> bool {
        ticket.generation == self.generation
            && ticket.offset == self.offset
            && self.phase == RequestPhase::Loading
    }

    /// Append a decoded page and advance the cursor.
    pub(crate) fn merge_page(&mut self, page_items: Vec<ListItem>, total_count: usize) -> MergeOutcome {
        debug_assert!(
            !self.items.iter().any(ListItem::is_summary),
            "summary row must be the final append"
        );

        let items = Arc::make_mut(&mut self.items);
        items.extend(page_items);
        self.offset = self.offset.saturating_add(self.page_size.get());
        self.total_count = Some(total_count);

        if self.offset >= total_count {
            items.push(ListItem::Summary(SummaryItem::new(total_count)));
            self.phase = RequestPhase::Exhausted;
            MergeOutcome::Exhausted
        } else {
            self.phase = RequestPhase::Idle;
            MergeOutcome::MorePages
        }
    }

    /// Record a failed fetch. Items and offset are untouched.
    pub(crate) fn mark_failed(&mut self) {
        self.phase = RequestPhase::Errored;
    }

    /// Mutable access to a review by id.
    ///
    /// Copies the item list first if a snapshot still shares it.
    pub(crate) fn review_mut(&mut self, id: ItemId) -> Result<&mut ReviewItem, MutationError> {
        let index = self.position(id).ok_or(MutationError::NotFound(id))?;
        match &mut Arc::make_mut(&mut self.items)[index] {
            ListItem::Review(review) => Ok(review),
            ListItem::Summary(_) => Err(MutationError::NotExpandable(id)),
        }
    }
}

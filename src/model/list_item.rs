//! Feed list items.
//!
//! A feed row is either a review or the trailing summary row. Every consumer
//! matches on [`ListItem`] exhaustively; there is no runtime downcasting.

use crate::model::identifiers::{InvalidRating, ItemId, Rating, Revision};
use crate::model::page::RawReview;

/// Number of text lines shown for a collapsed review.
pub const DEFAULT_TRUNCATION_LINES: usize = 3;

/// A single review row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewItem {
    id: ItemId,
    /// Display name, `"{first} {last}"`.
    pub author: String,
    /// Star rating.
    pub rating: Rating,
    /// Full review text.
    pub body_text: String,
    /// Creation date, as delivered.
    pub created_at: String,
    /// Maximum number of body text lines; `0` means unlimited.
    truncation_limit: usize,
    /// Photo references; `None` for missing photos.
    pub photo_refs: Vec<Option<String>>,
    revision: Revision,
}

impl ReviewItem {
    /// Build a review row from its wire representation.
    ///
    /// Assigns a fresh [`ItemId`].
    ///
    /// # Errors
    ///
    /// Returns [`InvalidRating`] if the raw rating is outside `1..=5`.
    pub fn from_raw(raw: RawReview, truncation_limit: usize) -> Result<Self, InvalidRating> {
        let rating = Rating::new(raw.rating)?;
        Ok(Self {
            id: ItemId::generate(),
            author: format!("{} {}", raw.first_name, raw.last_name),
            rating,
            body_text: raw.text,
            created_at: raw.created_at,
            truncation_limit,
            photo_refs: raw.photo_urls,
            revision: Revision::INITIAL,
        })
    }

    /// Stable identity of this row.
    pub fn id(&self) -> ItemId {
        self.id
    }

    /// Current mutation counter.
    pub fn revision(&self) -> Revision {
        self.revision
    }

    /// Current line limit (0 = unlimited).
    pub fn truncation_limit(&self) -> usize {
        self.truncation_limit
    }

    /// Whether a line limit is currently applied to the body text.
    pub fn is_limited(&self) -> bool {
        self.truncation_limit > 0
    }

    /// Lift the line limit and bump the revision.
    ///
    /// Always bumps, even if the item was already expanded: every call is an
    /// in-place mutation from the presentation layer's point of view.
    pub fn expand(&mut self) -> Revision {
        self.truncation_limit = 0;
        self.revision = self.revision.next();
        self.revision
    }
}

/// Trailing row showing the total number of reviews.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryItem {
    id: ItemId,
    /// Total number of reviews in the feed.
    pub total_count: usize,
}

impl SummaryItem {
    /// Create a summary row with a fresh id.
    pub fn new(total_count: usize) -> Self {
        Self {
            id: ItemId::generate(),
            total_count,
        }
    }

    /// Stable identity of this row.
    pub fn id(&self) -> ItemId {
        self.id
    }
}

/// A feed row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListItem {
    /// A review row.
    Review(ReviewItem),
    /// The trailing summary row.
    Summary(SummaryItem),
}

impl ListItem {
    /// Stable identity of this row.
    pub fn id(&self) -> ItemId {
        match self {
            ListItem::Review(review) => review.id(),
            ListItem::Summary(summary) => summary.id(),
        }
    }

    /// Summary rows are immutable and always report the initial revision.
    pub fn revision(&self) -> Revision {
        match self {
            ListItem::Review(review) => review.revision(),
            ListItem::Summary(_) => Revision::INITIAL,
        }
    }

    /// The review, if this is a review row.
    pub fn as_review(&self) -> Option<&ReviewItem> {
        match self {
            ListItem::Review(review) => Some(review),
            ListItem::Summary(_) => None,
        }
    }

    /// Whether this is the summary row.
    pub fn is_summary(&self) -> bool {
        matches!(self, ListItem::Summary(_))
    }
}

impl From<ReviewItem> for ListItem {
    fn from(review: ReviewItem) -> Self {
        ListItem::Review(review)
    }
}

impl From<SummaryItem> for ListItem {
    fn from(summary: SummaryItem) -> Self {
        ListItem::Summary(summary)
    }
}

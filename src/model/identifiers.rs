//! Core identifier newtypes with smart constructors.
//!
//! Identity of a list item is its [`ItemId`]; a [`Revision`] tracks in-place
//! mutations of the same logical item. Raw constructors for bounded values are
//! never exported - use smart constructors only.

use std::fmt;
use uuid::Uuid;

/// Stable identity of a list item.
///
/// Assigned once when the item is created and never changes afterwards.
/// Two items with the same id are the same logical item, even if their
/// presentation fields differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(Uuid);

impl ItemId {
    /// Generate a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Borrow the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Star rating of a review, always within `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rating(u8);

impl Rating {
    /// Lowest accepted rating.
    pub const MIN: u8 = 1;
    /// Highest accepted rating.
    pub const MAX: u8 = 5;

    /// Smart constructor: validates the rating is within bounds.
    pub fn new(raw: i64) -> Result<Self, InvalidRating> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&raw) {
            Ok(Self(raw as u8))
        } else {
            Err(InvalidRating(raw))
        }
    }

    /// Get the raw star count.
    pub fn get(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.0, Self::MAX)
    }
}

/// Per-item mutation counter.
///
/// Starts at zero and increases by one on every in-place mutation. The
/// presentation layer compares `(ItemId, Revision)` pairs to decide whether
/// a previously bound cell is stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Revision(u64);

impl Revision {
    /// Revision of a freshly created item.
    pub const INITIAL: Self = Self(0);

    /// Get the raw counter value.
    pub fn get(&self) -> u64 {
        self.0
    }

    /// The revision following this one.
    pub fn next(&self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

// ===== Error Types =====

/// Error returned when a rating is outside `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("rating must be within 1..=5 (got {0})")]
pub struct InvalidRating(pub i64);

// ===== Tests =====

//! Domain model types (pure).
//!
//! All types in this module are plain data with smart constructors.

pub mod error;
pub mod identifiers;
pub mod list_item;
pub mod page;

// Re-export for convenience
pub use error::{DecodeError, FetchError, MutationError, SourceError};
pub use identifiers::{InvalidRating, ItemId, Rating, Revision};
pub use list_item::{ListItem, ReviewItem, SummaryItem, DEFAULT_TRUNCATION_LINES};
pub use page::{decode_page, Page, RawReview};

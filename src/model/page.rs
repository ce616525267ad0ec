//! Page contract between a page fetcher and the engine.
//!
//! Field names follow the wire payload of the reviews endpoint
//! (`first_name`, `created`, `count`, ...). Decoding is done at the boundary:
//! the engine only ever sees a validated [`Page`].

use crate::model::error::DecodeError;
use crate::model::identifiers::Rating;
use serde::Deserialize;

/// One review as delivered by the server, before it becomes a list item.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawReview {
    /// Reviewer first name.
    pub first_name: String,
    /// Reviewer last name.
    pub last_name: String,
    /// Raw rating; validated to `1..=5` by [`decode_page`].
    pub rating: i64,
    /// Review text.
    pub text: String,
    /// Creation date as a display string.
    #[serde(rename = "created")]
    pub created_at: String,
    /// Photo references; `null` entries are kept so positions stay stable.
    #[serde(default)]
    pub photo_urls: Vec<Option<String>>,
}

/// One batch of reviews returned for a single offset.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Page {
    /// Reviews in this page, possibly fewer than requested.
    pub items: Vec<RawReview>,
    /// Total number of reviews available server-side.
    #[serde(rename = "count")]
    pub total_count: usize,
}

impl Page {
    /// Build a page from decoded reviews.
    pub fn new(items: Vec<RawReview>, total_count: usize) -> Self {
        Self { items, total_count }
    }
}

/// Decode a JSON page payload.
///
/// # Errors
///
/// - [`DecodeError::InvalidJson`] if the payload is not JSON or misses fields
/// - [`DecodeError::RatingOutOfRange`] if any rating is outside `1..=5`
///
/// # Examples
///
/// ```
/// use review_feed::model::page::decode_page;
///
/// let json = br#"{"items": [], "count": 0}"#;
/// let page = decode_page(json).unwrap();
/// assert_eq!(page.total_count, 0);
/// ```
pub fn decode_page(bytes: &[u8]) -> Result<Page, DecodeError> {
    let page: Page = serde_json::from_slice(bytes).map_err(|e| DecodeError::InvalidJson {
        message: e.to_string(),
    })?;
    validate_ratings(&page.items)?;
    Ok(page)
}

/// Check every review carries an in-range rating.
pub(crate) fn validate_ratings(items: &[RawReview]) -> Result<(), DecodeError> {
    for (index, review) in items.iter().enumerate() {
        if Rating::new(review.rating).is_err() {
            return Err(DecodeError::RatingOutOfRange {
                index,
                rating: review.rating,
            });
        }
    }
    Ok(())
}

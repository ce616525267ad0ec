//! Cell height computation for feed rows.
//!
//! Geometry of a review cell, top to bottom:
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │ [avatar]  Username                       │
//! │           ★★★★☆                          │
//! │           [photo] [photo] ...  (optional)│
//! │           Review text, possibly limited  │
//! │           Show more...         (optional)│
//! │           created date                   │
//! └──────────────────────────────────────────┘
//! ```
//!
//! Only the review text needs a [`TextMeasurer`]; every other row has a
//! fixed height. Summary rows are a single centered line.

use crate::model::{ListItem, ReviewItem};
use crate::view_state::measure::{FontSpec, TextMeasurer};
use crate::view_state::types::{Height, Width};

/// Top padding of a review cell.
pub const INSET_TOP: f64 = 9.0;
/// Bottom padding of a review cell.
pub const INSET_BOTTOM: f64 = 9.0;
/// Left padding of a review cell.
pub const INSET_LEFT: f64 = 12.0;
/// Right padding of a review cell.
pub const INSET_RIGHT: f64 = 12.0;

/// Avatar side length.
pub const AVATAR_SIZE: f64 = 36.0;
/// Gap between avatar and text column.
pub const AVATAR_TO_USERNAME_SPACING: f64 = 10.0;
/// Gap between username and rating.
pub const USERNAME_TO_RATING_SPACING: f64 = 6.0;
/// Height of the star row.
pub const RATING_HEIGHT: f64 = 16.0;
/// Gap between rating and text without photos.
pub const RATING_TO_TEXT_SPACING: f64 = 6.0;
/// Gap between rating and photos.
pub const RATING_TO_PHOTOS_SPACING: f64 = 10.0;
/// Height of the photo row.
pub const PHOTO_HEIGHT: f64 = 66.0;
/// Gap between photos and text.
pub const PHOTOS_TO_TEXT_SPACING: f64 = 10.0;
/// Gap between text and the next element.
pub const TEXT_TO_CREATED_SPACING: f64 = 6.0;
/// Gap between the show-more button and the date.
pub const SHOW_MORE_TO_CREATED_SPACING: f64 = 6.0;
/// Vertical padding of the summary row.
pub const SUMMARY_SPACING: f64 = 16.0;

/// Reviewer name font.
pub const USERNAME_FONT: FontSpec = FontSpec::new(17.0, 21.0);
/// Review text font.
pub const TEXT_FONT: FontSpec = FontSpec::new(16.0, 20.0);
/// Show-more button font.
pub const SHOW_MORE_FONT: FontSpec = FontSpec::new(16.0, 20.0);
/// Creation date font.
pub const CREATED_FONT: FontSpec = FontSpec::new(14.0, 17.0);
/// Summary row font.
pub const SUMMARY_FONT: FontSpec = FontSpec::new(14.0, 17.0);

/// Width available to the text column at a given cell width.
pub fn text_column_width(width: Width) -> f64 {
    (width.as_f64() - INSET_LEFT - INSET_RIGHT - AVATAR_SIZE - AVATAR_TO_USERNAME_SPACING).max(0.0)
}

/// Whether the review's text is actually cut by its line limit at `width`.
///
/// A limit that the text never reaches does not truncate, and no
/// "show more" button is laid out for it.
pub fn is_truncated(review: &ReviewItem, width: Width, measurer: &dyn TextMeasurer) -> bool {
    if !review.is_limited() {
        return false;
    }
    let column = text_column_width(width);
    let limited = measurer.measure(&review.body_text, &TEXT_FONT, column, review.truncation_limit());
    let full = measurer.measure(&review.body_text, &TEXT_FONT, column, 0);
    full > limited
}

/// Height of a review cell.
pub fn review_height(review: &ReviewItem, width: Width, measurer: &dyn TextMeasurer) -> Height {
    let column = text_column_width(width);

    let header = (USERNAME_FONT.line_height + USERNAME_TO_RATING_SPACING + RATING_HEIGHT).max(AVATAR_SIZE);

    let photos = if review.photo_refs.is_empty() {
        0.0
    } else {
        RATING_TO_PHOTOS_SPACING + PHOTO_HEIGHT
    };

    let text_spacing = if review.photo_refs.is_empty() {
        RATING_TO_TEXT_SPACING
    } else {
        PHOTOS_TO_TEXT_SPACING
    };
    let text = measurer.measure(&review.body_text, &TEXT_FONT, column, review.truncation_limit());

    // Button sits below the text gap, followed by its own gap to the date.
    let show_more = if is_truncated(review, width, measurer) {
        SHOW_MORE_FONT.line_height + SHOW_MORE_TO_CREATED_SPACING
    } else {
        0.0
    };

    let created = TEXT_TO_CREATED_SPACING + CREATED_FONT.line_height;

    Height::saturating(
        INSET_TOP + header + photos + text_spacing + text + show_more + created + INSET_BOTTOM,
    )
}

/// Height of the summary row. Independent of width.
pub fn summary_height() -> Height {
    Height::saturating(SUMMARY_SPACING * 2.0 + SUMMARY_FONT.line_height)
}

/// Height of any feed row.
pub fn item_height(item: &ListItem, width: Width, measurer: &dyn TextMeasurer) -> Height {
    match item {
        ListItem::Review(review) => review_height(review, width, measurer),
        ListItem::Summary(_) => summary_height(),
    }
}

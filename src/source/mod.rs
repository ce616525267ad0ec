//! Page sources.
//!
//! The engine consumes pages through the [`PageFetcher`] trait; the transport
//! behind it (HTTP client, JSON parsing, local file) is not the engine's
//! concern. [`FilePageFetcher`] serves a local JSON dataset and backs the
//! driver binary.

use crate::model::{FetchError, Page};
use async_trait::async_trait;

pub mod file;

pub use file::FilePageFetcher;

/// Asynchronous source of review pages.
///
/// `fetch` is the only suspension point of the feed core. Implementations
/// must be safe to call from spawned tasks. At most one fetch for the
/// current generation is in flight; a refresh may start a new fetch while a
/// superseded one is still running, and the superseded result is dropped.
///
/// # Example
///
/// ```ignore
/// use review_feed::source::PageFetcher;
///
/// async fn first_page<F: PageFetcher>(fetcher: &F) -> usize {
///     fetcher.fetch(0, 20).await.map(|page| page.items.len()).unwrap_or(0)
/// }
/// ```
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch up to `limit` reviews starting at `offset`.
    ///
    /// # Errors
    ///
    /// Any [`FetchError`]; the engine treats all of them as retryable.
    async fn fetch(&self, offset: usize, limit: usize) -> Result<Page, FetchError>;
}


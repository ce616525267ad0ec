//! File-backed page source.
//!
//! Loads a JSON dataset (`{"items": [...]}`) once and serves it in pages,
//! optionally with a simulated network latency.

use crate::model::error::SourceError;
use crate::model::page::validate_ratings;
use crate::model::{DecodeError, FetchError, Page, RawReview};
use crate::source::PageFetcher;
use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Dataset file layout.
#[derive(Debug, Deserialize)]
struct Dataset {
    items: Vec<RawReview>,
}

/// Page source serving a local JSON dataset.
#[derive(Debug, Clone)]
pub struct FilePageFetcher {
    path: PathBuf,
    reviews: Vec<RawReview>,
    latency: Duration,
}

impl FilePageFetcher {
    /// Load the dataset at `path`.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::FileNotFound` if the file does not exist.
    /// Returns `SourceError::Invalid` if the contents are not a valid dataset.
    /// Returns `SourceError::Io` for other I/O errors.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(SourceError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let bytes = std::fs::read(path)?;
        let reviews = parse_dataset(&bytes).map_err(|source| SourceError::Invalid {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::debug!(path = %path.display(), reviews = reviews.len(), "Dataset loaded");

        Ok(Self {
            path: path.to_path_buf(),
            reviews,
            latency: Duration::ZERO,
        })
    }

    /// Build a fetcher over in-memory reviews.
    pub fn from_reviews(reviews: Vec<RawReview>) -> Self {
        Self {
            path: PathBuf::new(),
            reviews,
            latency: Duration::ZERO,
        }
    }

    /// Delay every fetch by `latency` to mimic a network round trip.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Path the dataset was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Total number of reviews in the dataset.
    pub fn len(&self) -> usize {
        self.reviews.len()
    }

    /// Whether the dataset holds no reviews.
    pub fn is_empty(&self) -> bool {
        self.reviews.is_empty()
    }
}

fn parse_dataset(bytes: &[u8]) -> Result<Vec<RawReview>, DecodeError> {
    let dataset: Dataset = serde_json::from_slice(bytes).map_err(|e| DecodeError::InvalidJson {
        message: e.to_string(),
    })?;
    validate_ratings(&dataset.items)?;
    Ok(dataset.items)
}

#[async_trait]
impl PageFetcher for FilePageFetcher {
    async fn fetch(&self, offset: usize, limit: usize) -> Result<Page, FetchError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let start = offset.min(self.reviews.len());
        let end = offset.saturating_add(limit).min(self.reviews.len());
        Ok(Page::new(self.reviews[start..end].to_vec(), self.reviews.len()))
    }
}

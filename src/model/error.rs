//! Error types for the review feed.
//!
//! This module defines the error taxonomy of the feed core using `thiserror`.
//! Errors compose via `?` and `From` conversions.
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - Top-level error of the driver binary
//!   - [`crate::config::ConfigError`] - Config file read/parse/validation failures
//!   - [`crate::logging::LoggingError`] - Tracing subscriber setup failures
//!   - [`SourceError`] - Local dataset loading failures
//! - [`FetchError`] - A page could not be obtained (transport, server, decode)
//!   - [`DecodeError`] - The page payload was malformed
//! - [`MutationError`] - A mutation referenced an item that cannot take it
//!
//! # Error Recovery Strategy
//!
//! Nothing in the feed core is fatal. Fetch-path errors collapse the request
//! phase to `Errored`, which is retryable on the next trigger; the error detail
//! only goes to the log. Mutation errors are no-ops: the item list is left
//! untouched and the caller may ignore them. Only the driver binary has fatal
//! errors (bad config, unreadable dataset), surfaced through [`AppError`].

use crate::model::identifiers::ItemId;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level error of the driver binary.
///
/// Library code never returns this type; it exists so `main` can use `?`
/// across config loading, logging setup and dataset loading.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded or is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Tracing subscriber could not be installed.
    #[error("Logging error: {0}")]
    Logging(#[from] crate::logging::LoggingError),

    /// The local dataset could not be loaded.
    #[error("Dataset error: {0}")]
    Source(#[from] SourceError),

    /// The async runtime could not be started.
    #[error("Runtime error: {0}")]
    Runtime(#[from] std::io::Error),
}

/// Failure to obtain a page from a [`crate::source::PageFetcher`].
///
/// All variants are treated identically by the engine: the request phase
/// becomes `Errored`, the item list and offset are left as they were, and the
/// next `request_next_page()` retries immediately.
///
/// `Clone` is derived so fetch results can be fanned out to test observers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The request never produced a response (connection refused, timeout,
    /// dropped connection).
    ///
    /// # Examples
    ///
    /// ```
    /// use review_feed::model::error::FetchError;
    ///
    /// let err = FetchError::Transport("connection reset".to_string());
    /// assert!(err.to_string().contains("connection reset"));
    /// ```
    #[error("Transport failure: {0}")]
    Transport(String),

    /// The server answered with a non-success status.
    #[error("Server returned status {status}: {message}")]
    Server {
        /// HTTP-like status code reported by the transport.
        status: u16,
        /// Server-provided description, possibly empty.
        message: String,
    },

    /// The response arrived but its payload could not be decoded.
    #[error("Malformed page: {0}")]
    Decode(#[from] DecodeError),
}

/// Malformed page payload.
///
/// Produced by [`crate::model::page::decode_page`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The payload is not valid JSON or does not match the page schema.
    ///
    /// **Why `message` is `String`**: the `serde_json` error is flattened to its
    /// message so the error stays `Clone` and carries no parser state.
    #[error("Invalid page JSON: {message}")]
    InvalidJson {
        /// Parser error message.
        message: String,
    },

    /// A review in the page carries a rating outside `1..=5`.
    #[error("Review #{index} has rating {rating} outside 1..=5")]
    RatingOutOfRange {
        /// Zero-based position of the review within the page.
        index: usize,
        /// The offending raw rating.
        rating: i64,
    },
}

/// A mutation referenced an item it cannot apply to.
///
/// Callers are expected to treat this as a no-op; the engine leaves the item
/// list unchanged and emits no state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MutationError {
    /// No item with this id is currently in the list.
    #[error("No item with id {0}")]
    NotFound(ItemId),

    /// The item exists but is not a review (summary items cannot expand).
    #[error("Item {0} cannot be expanded")]
    NotExpandable(ItemId),
}

/// Failure to load the local JSON dataset served by the file fetcher.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The dataset file does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::PathBuf;
    /// use review_feed::model::error::SourceError;
    ///
    /// let err = SourceError::FileNotFound {
    ///     path: PathBuf::from("/tmp/reviews.json"),
    /// };
    /// assert!(err.to_string().contains("/tmp/reviews.json"));
    /// ```
    #[error("Dataset not found: {path}")]
    FileNotFound {
        /// Path that was attempted.
        path: PathBuf,
    },

    /// The dataset file exists but its contents are not a valid review list.
    #[error("Invalid dataset at {path}: {source}")]
    Invalid {
        /// Path of the malformed dataset.
        path: PathBuf,
        /// Decoding failure.
        #[source]
        source: DecodeError,
    },

    /// Any other I/O failure while reading the dataset.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_error_transport_display() {
        let err = FetchError::Transport("timed out".to_string());
        assert_eq!(err.to_string(), "Transport failure: timed out");
    }

    #[test]
    fn fetch_error_server_display_includes_status() {
        let err = FetchError::Server {
            status: 503,
            message: "unavailable".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("503"), "Should include status, got: {msg}");
        assert!(msg.contains("unavailable"));
    }

    #[test]
    fn fetch_error_from_decode_error() {
        let decode = DecodeError::InvalidJson {
            message: "expected value".to_string(),
        };
        let err: FetchError = decode.clone().into();
        assert_eq!(err, FetchError::Decode(decode));
    }

    #[test]
    fn decode_error_rating_display() {
        let err = DecodeError::RatingOutOfRange {
            index: 3,
            rating: 9,
        };
        let msg = err.to_string();
        assert!(msg.contains("#3"));
        assert!(msg.contains('9'));
    }

    #[test]
    fn mutation_error_includes_item_id() {
        let id = ItemId::generate();
        let err = MutationError::NotFound(id);
        assert!(err.to_string().contains(&id.to_string()));
    }

    #[test]
    fn source_error_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: SourceError = io.into();
        assert!(matches!(err, SourceError::Io(_)));
    }

    #[test]
    fn app_error_from_source_error() {
        let err: AppError = SourceError::FileNotFound {
            path: PathBuf::from("missing.json"),
        }
        .into();
        assert!(err.to_string().contains("missing.json"));
    }
}

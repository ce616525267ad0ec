//! Feed state machine.
//!
//! [`PaginationEngine`] owns the pagination state and applies every
//! asynchronous result on its own task. The pure parts (phase transitions,
//! prefetch arithmetic) live in their own modules and are testable without a
//! runtime.

pub mod engine;
pub mod message;
pub mod pagination;
pub mod prefetch;

pub use engine::{EngineConfig, PaginationEngine, DEFAULT_PAGE_SIZE};
pub use message::{FeedCommand, FeedHandle, FeedMessage, HeightMeasurement};
pub use pagination::{FeedSnapshot, Generation, PaginationState, RequestPhase};
pub use prefetch::{PrefetchPolicy, ScrollMetrics, DEFAULT_PREFETCH_SCREENS};

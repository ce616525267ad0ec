//! Review feed synchronization engine.
//!
//! Drives an infinitely scrolling review list: pages are fetched
//! asynchronously through a [`source::PageFetcher`], merged on the task that
//! owns the [`state::PaginationEngine`], and measured row heights are cached
//! per width until the content changes.
//!
//! Pure core (`model`, `view_state`, `state::pagination`, `state::prefetch`)
//! and impure shell (`source`, `logging`, the engine's spawned tasks).

pub mod config;
pub mod logging;
pub mod model;
pub mod source;
pub mod state;
pub mod view_state;

#[cfg(test)]
mod test_harness;

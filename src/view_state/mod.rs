//! View-state layer - measurement, height caching and bind tracking
//!
//! Everything the presentation layer needs to lay out feed rows without
//! repeating expensive text measurement.
//!
//! # Module Structure
//!
//! - `types`: Core newtypes (Width, Height)
//! - `height_cache`: HeightCache - `(ItemId, Width) -> Height`, optional LRU bound
//! - `measure`: TextMeasurer trait and the monospace fallback measurer
//! - `cell_layout`: review and summary cell geometry
//! - `bind_guard`: BindGuard - skip re-binding unchanged `(id, revision)` pairs

pub mod bind_guard;
pub mod cell_layout;
pub mod height_cache;
pub mod measure;
pub mod types;

pub use bind_guard::{BindGuard, SlotId};
pub use height_cache::{HeightCache, HeightCacheConfig, HeightKey};
pub use measure::{FontSpec, MonospaceMeasurer, TextMeasurer};
pub use types::{Height, InvalidHeight, Width};

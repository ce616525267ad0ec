//! Scroll-distance prefetch heuristic.
//!
//! Evaluated once per scroll deceleration (when the gesture's target offset
//! is known), never per frame. Repeated triggers are harmless: the engine only
//! issues a request from `Idle`/`Errored`.

/// Default number of viewport heights of remaining content that triggers a
/// prefetch.
pub const DEFAULT_PREFETCH_SCREENS: f64 = 2.5;

/// Scroll geometry at the end of a gesture, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    /// Height of the visible viewport (`V`).
    pub viewport_height: f64,
    /// Total scrollable content height (`C`).
    pub content_height: f64,
    /// Offset the viewport will settle at once momentum runs out (`y`).
    pub projected_offset: f64,
}

impl ScrollMetrics {
    /// Bundle the scroll geometry.
    pub fn new(viewport_height: f64, content_height: f64, projected_offset: f64) -> Self {
        Self {
            viewport_height,
            content_height,
            projected_offset,
        }
    }

    /// Content left below the viewport after the gesture settles.
    pub fn remaining_distance(&self) -> f64 {
        self.content_height - self.viewport_height - self.projected_offset
    }
}

/// Prefetch trigger: `C - V - y <= V * K`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrefetchPolicy {
    screens: f64,
}

impl PrefetchPolicy {
    /// Create a policy triggering when fewer than `screens` viewport heights
    /// remain. Negative or non-finite values fall back to the default.
    pub fn new(screens: f64) -> Self {
        if screens.is_finite() && screens >= 0.0 {
            Self { screens }
        } else {
            Self::default()
        }
    }

    /// The threshold `K`, in viewport heights.
    pub fn screens(&self) -> f64 {
        self.screens
    }

    /// Whether the settled offset is close enough to the end to load more.
    pub fn should_prefetch(&self, metrics: &ScrollMetrics) -> bool {
        metrics.remaining_distance() <= metrics.viewport_height * self.screens
    }
}

impl Default for PrefetchPolicy {
    fn default() -> Self {
        Self {
            screens: DEFAULT_PREFETCH_SCREENS,
        }
    }
}

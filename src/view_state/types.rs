//! Core view-state newtypes

/// Available layout width in whole points.
///
/// Widths are rounded to the nearest point so that sub-pixel jitter in the
/// presentation layer does not fragment the height cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Width(u32);

impl Width {
    /// Create a width from whole points.
    pub const fn new(points: u32) -> Self {
        Self(points)
    }

    /// Round a fractional width to whole points, clamping negatives and NaN to 0.
    pub fn from_points(points: f64) -> Self {
        if points.is_finite() && points > 0.0 {
            Self(points.round().min(f64::from(u32::MAX)) as u32)
        } else {
            Self(0)
        }
    }

    /// Get the raw point value.
    pub fn get(&self) -> u32 {
        self.0
    }

    /// Points as a float for layout math.
    pub fn as_f64(&self) -> f64 {
        f64::from(self.0)
    }
}

/// Measured layout height in points. Always finite and non-negative.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Height(f64);

/// Error returned when a height is negative or not finite.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("Height must be finite and >= 0 (got {0})")]
pub struct InvalidHeight(pub f64);

impl Height {
    /// Zero height.
    pub const ZERO: Self = Self(0.0);

    /// Smart constructor that validates the height.
    pub fn new(points: f64) -> Result<Self, InvalidHeight> {
        if points.is_finite() && points >= 0.0 {
            Ok(Self(points))
        } else {
            Err(InvalidHeight(points))
        }
    }

    /// Build a height from a measured value, flooring invalid input to zero.
    ///
    /// Measurers are external; a misbehaving one must not poison the cache
    /// with NaN.
    pub fn saturating(points: f64) -> Self {
        Self::new(points).unwrap_or(Self::ZERO)
    }

    /// Get the raw point value.
    pub fn get(&self) -> f64 {
        self.0
    }
}

impl std::ops::Add for Height {
    type Output = Height;

    fn add(self, rhs: Height) -> Height {
        Height(self.0 + rhs.0)
    }
}

impl std::iter::Sum for Height {
    fn sum<I: Iterator<Item = Height>>(iter: I) -> Height {
        iter.fold(Height::ZERO, |acc, h| acc + h)
    }
}

use crate::foundation::error::{BadgeError, BadgeResult};

pub use kurbo::{Affine, Circle, Point, Rect, Vec2};

/// Logical render width shared by every template.
pub const LOGICAL_WIDTH: u32 = 768;
/// Logical render height shared by every template.
pub const LOGICAL_HEIGHT: u32 = 960;

/// Logical (pre-DPR) render resolution in canvas units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in logical pixels.
    pub width: u32,
    /// Height in logical pixels.
    pub height: u32,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: LOGICAL_WIDTH,
            height: LOGICAL_HEIGHT,
        }
    }
}

impl Canvas {
    /// Width divided by height.
    pub fn aspect(self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }

    /// Physical surface size for a device pixel ratio, truncated to whole pixels (at least 1x1).
    pub fn physical(self, dpr: DevicePixelRatio) -> (u32, u32) {
        let w = (f64::from(self.width) * dpr.get()).floor().max(1.0) as u32;
        let h = (f64::from(self.height) * dpr.get()).floor().max(1.0) as u32;
        (w, h)
    }
}

/// CSS-level display box. Independent from [`Canvas`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DisplaySize {
    /// Display width in viewport units.
    pub width: f64,
    /// Display height in viewport units.
    pub height: f64,
}

/// Device pixel ratio, always finite and > 0.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct DevicePixelRatio(f64);

impl DevicePixelRatio {
    /// Ratio of 1.0.
    pub const ONE: Self = Self(1.0);

    /// Create a validated ratio.
    pub fn new(v: f64) -> BadgeResult<Self> {
        if !v.is_finite() || v <= 0.0 {
            return Err(BadgeError::validation(
                "device pixel ratio must be finite and > 0",
            ));
        }
        Ok(Self(v))
    }

    /// Raw ratio.
    pub fn get(self) -> f64 {
        self.0
    }
}

impl Default for DevicePixelRatio {
    fn default() -> Self {
        Self::ONE
    }
}

impl TryFrom<f64> for DevicePixelRatio {
    type Error = BadgeError;

    fn try_from(v: f64) -> BadgeResult<Self> {
        Self::new(v)
    }
}

impl From<DevicePixelRatio> for f64 {
    fn from(v: DevicePixelRatio) -> Self {
        v.0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;

//! Responsive display box.
//!
//! The display box is what a host would use for styling the surface on screen. It never changes
//! the render resolution, which stays at [`Canvas`] times the device pixel ratio.

use crate::foundation::core::{Canvas, DisplaySize, Vec2};
use crate::foundation::error::{BadgeError, BadgeResult};

/// Breakpoint and margin controlling [`DisplayLayout::for_viewport`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    /// Viewport width below which the display box shrinks with the viewport.
    pub breakpoint: f64,
    /// Horizontal margin subtracted from narrow viewports.
    pub margin: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            breakpoint: 768.0,
            margin: 20.0,
        }
    }
}

impl LayoutConfig {
    /// Validate breakpoint and margin.
    pub fn validate(&self) -> BadgeResult<()> {
        if !self.breakpoint.is_finite() || self.breakpoint <= 0.0 {
            return Err(BadgeError::validation(
                "layout breakpoint must be finite and > 0",
            ));
        }
        if !self.margin.is_finite() || self.margin < 0.0 || self.margin >= self.breakpoint {
            return Err(BadgeError::validation(
                "layout margin must be finite, >= 0 and smaller than the breakpoint",
            ));
        }
        Ok(())
    }
}

/// Display box computed for a given viewport, plus the logical canvas it stretches.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplayLayout {
    canvas: Canvas,
    display: DisplaySize,
}

impl DisplayLayout {
    /// Compute the display box for `viewport_width`.
    ///
    /// Narrow viewports get `viewport_width - margin` at the canvas aspect ratio. Wider ones are
    /// capped at the breakpoint width.
    pub fn for_viewport(viewport_width: f64, canvas: Canvas, cfg: &LayoutConfig) -> Self {
        let aspect = canvas.aspect();
        let width = if viewport_width < cfg.breakpoint {
            // Tiny or bogus viewports still produce a non-degenerate box.
            (viewport_width - cfg.margin).max(1.0)
        } else {
            cfg.breakpoint
        };
        Self {
            canvas,
            display: DisplaySize {
                width,
                height: width / aspect,
            },
        }
    }

    /// Display box before the first viewport measurement.
    pub fn unmeasured(canvas: Canvas) -> Self {
        Self {
            canvas,
            display: DisplaySize {
                width: f64::from(canvas.width),
                height: f64::from(canvas.height),
            },
        }
    }

    /// Current display box.
    pub fn display(&self) -> DisplaySize {
        self.display
    }

    /// Logical canvas the display box stretches.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Map a delta measured in display units into logical canvas units.
    pub fn display_to_logical(&self, delta: Vec2) -> Vec2 {
        let sx = f64::from(self.canvas.width) / self.display.width;
        let sy = f64::from(self.canvas.height) / self.display.height;
        Vec2::new(delta.x * sx, delta.y * sy)
    }
}

#[cfg(test)]
#[path = "../tests/unit/layout.rs"]
mod tests;

//! Template description.
//!
//! The mask geometry belongs to the template artwork: it is measured against the template's
//! pixel layout and must be re-measured whenever the artwork changes.

use crate::foundation::core::{Canvas, Circle, Point};
use crate::foundation::error::{BadgeError, BadgeResult};

/// Circular window in logical canvas coordinates.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CircleMask {
    /// Circle center.
    pub center: Point,
    /// Circle radius.
    pub radius: f64,
}

impl Default for CircleMask {
    fn default() -> Self {
        Self {
            center: Point::new(500.0, 595.0),
            radius: 240.0,
        }
    }
}

impl CircleMask {
    /// Mask as a `kurbo` circle.
    pub fn circle(&self) -> Circle {
        Circle::new(self.center, self.radius)
    }

    /// Side length of the square the avatar is fitted into.
    pub fn box_size(&self) -> f64 {
        self.radius * 2.0
    }
}

/// Background artwork plus its mask.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TemplateSpec {
    /// Template file, relative to the assets root.
    pub source: String,
    /// Logical render resolution.
    pub canvas: Canvas,
    /// Avatar window.
    pub mask: CircleMask,
}

impl Default for TemplateSpec {
    fn default() -> Self {
        Self {
            source: "Template Post_empty.png".to_string(),
            canvas: Canvas::default(),
            mask: CircleMask::default(),
        }
    }
}

impl TemplateSpec {
    /// Validate canvas and mask geometry.
    pub fn validate(&self) -> BadgeResult<()> {
        crate::assets::store::normalize_rel_path(&self.source)?;
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(BadgeError::validation(
                "template canvas must be non-empty",
            ));
        }
        if self.canvas.width > 8192 || self.canvas.height > 8192 {
            return Err(BadgeError::validation(
                "template canvas must be at most 8192x8192",
            ));
        }
        let m = &self.mask;
        if !m.radius.is_finite() || m.radius <= 0.0 {
            return Err(BadgeError::validation(
                "template mask radius must be finite and > 0",
            ));
        }
        if !m.center.is_finite() {
            return Err(BadgeError::validation(
                "template mask center must be finite",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/template.rs"]
mod tests;

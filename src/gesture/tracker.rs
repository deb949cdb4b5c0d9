use smallvec::SmallVec;

use crate::foundation::core::{Point, Vec2};
use crate::foundation::error::{BadgeError, BadgeResult};
use crate::layout::DisplayLayout;

/// Active touch points for one touch event, in gesture (client) space.
pub type Touches = SmallVec<[Point; 2]>;

/// One raw input event delivered to the drawing surface.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GestureEvent {
    /// Mouse/pen button pressed over the surface.
    PointerDown {
        /// Pointer position.
        pos: Point,
    },
    /// Pointer moved over the surface.
    PointerMove {
        /// Pointer position.
        pos: Point,
    },
    /// Pointer button released.
    PointerUp,
    /// Pointer left the surface.
    PointerLeave,
    /// Touch contact started; `touches` lists every active contact.
    TouchStart {
        /// Active touch points.
        touches: Touches,
    },
    /// Touch contacts moved; `touches` lists every active contact.
    TouchMove {
        /// Active touch points.
        touches: Touches,
    },
    /// Touch contact ended; `touches` lists the contacts still down.
    TouchEnd {
        /// Remaining touch points.
        #[serde(default)]
        touches: Touches,
    },
    /// Wheel scroll; negative `delta_y` scrolls up/away.
    Wheel {
        /// Vertical scroll delta.
        delta_y: f64,
    },
}

/// Tunables for how gestures map onto the transform.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GestureConfig {
    /// Scale change per unit of inter-touch distance change.
    pub pinch_sensitivity: f64,
    /// Scale change per wheel event.
    pub wheel_step: f64,
    /// Lower bound on the zoom factor.
    pub min_scale: f64,
    /// Convert display-space deltas to canvas units before applying them.
    pub map_to_logical: bool,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            pinch_sensitivity: 0.005,
            wheel_step: 0.05,
            min_scale: 0.1,
            map_to_logical: false,
        }
    }
}

impl GestureConfig {
    /// Validate sensitivities and the scale floor.
    pub fn validate(&self) -> BadgeResult<()> {
        if !self.min_scale.is_finite() || self.min_scale <= 0.0 {
            return Err(BadgeError::validation(
                "gestures.min_scale must be finite and > 0",
            ));
        }
        if !self.pinch_sensitivity.is_finite() || self.pinch_sensitivity < 0.0 {
            return Err(BadgeError::validation(
                "gestures.pinch_sensitivity must be finite and >= 0",
            ));
        }
        if !self.wheel_step.is_finite() || self.wheel_step < 0.0 {
            return Err(BadgeError::validation(
                "gestures.wheel_step must be finite and >= 0",
            ));
        }
        Ok(())
    }
}

/// Observable avatar placement: pan offset in canvas units and zoom factor.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TransformState {
    /// Accumulated pan offset.
    pub offset: Vec2,
    /// Zoom factor applied to the fitted avatar size.
    pub scale: f64,
}

impl Default for TransformState {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            scale: 1.0,
        }
    }
}

impl TransformState {
    /// Add a scale delta, flooring the result at `min_scale`.
    pub fn zoom_by(&mut self, delta: f64, min_scale: f64) {
        let next = self.scale + delta;
        // NaN deltas must not poison the state.
        self.scale = if next.is_nan() {
            self.scale
        } else {
            next.max(min_scale)
        };
    }

    /// Add a pan delta.
    pub fn pan_by(&mut self, delta: Vec2) {
        if delta.is_finite() {
            self.offset += delta;
        }
    }
}

/// Gesture-in-progress bookkeeping. Not observable outside the tracker.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct GestureSession {
    dragging: bool,
    last_position: Point,
    last_distance: Option<f64>,
}

impl GestureSession {
    fn press(&mut self, pos: Point, distance: Option<f64>) {
        self.dragging = true;
        self.last_position = pos;
        self.last_distance = distance;
    }

    fn release(&mut self) {
        self.dragging = false;
        self.last_distance = None;
    }

    fn step_pan(&mut self, pos: Point) -> Vec2 {
        let delta = pos - self.last_position;
        self.last_position = pos;
        delta
    }
}

/// Turns raw input into pan/zoom updates on a [`TransformState`].
#[derive(Clone, Debug, Default)]
pub struct GestureTracker {
    cfg: GestureConfig,
    session: GestureSession,
    transform: TransformState,
}

impl GestureTracker {
    /// Create a tracker with the identity transform.
    pub fn new(cfg: GestureConfig) -> Self {
        Self {
            cfg,
            session: GestureSession::default(),
            transform: TransformState::default(),
        }
    }

    /// Current transform.
    pub fn transform(&self) -> TransformState {
        self.transform
    }

    /// Replace the transform (scale is clamped to the configured floor).
    pub fn set_transform(&mut self, t: TransformState) {
        self.transform.offset = Vec2::ZERO;
        self.transform.pan_by(t.offset);
        self.transform.scale = if t.scale.is_nan() {
            1.0
        } else {
            t.scale.max(self.cfg.min_scale)
        };
    }

    /// `true` while a press is held.
    pub fn is_dragging(&self) -> bool {
        self.session.dragging
    }

    /// Distance baseline of the current pinch, if any.
    pub fn pinch_baseline(&self) -> Option<f64> {
        self.session.last_distance
    }

    /// Feed one event. Returns `true` when the observable transform changed.
    ///
    /// `layout` is only consulted when [`GestureConfig::map_to_logical`] is set.
    pub fn handle(&mut self, event: &GestureEvent, layout: Option<&DisplayLayout>) -> bool {
        let before = self.transform;
        match event {
            GestureEvent::PointerDown { pos } => self.session.press(*pos, None),
            GestureEvent::PointerMove { pos } => {
                if self.session.dragging {
                    let delta = self.session.step_pan(*pos);
                    self.apply_pan(delta, layout);
                }
            }
            GestureEvent::PointerUp | GestureEvent::PointerLeave => self.session.release(),
            GestureEvent::TouchStart { touches } => {
                if let Some(first) = touches.first() {
                    self.session.press(*first, touch_distance(touches));
                }
            }
            GestureEvent::TouchMove { touches } => self.touch_move(touches, layout),
            GestureEvent::TouchEnd { touches } => match touches.first() {
                None => self.session.release(),
                Some(first) => {
                    // Lifting one finger of a pinch hands control back to a fresh pan.
                    if self.session.dragging {
                        self.session.press(*first, touch_distance(touches));
                    }
                }
            },
            GestureEvent::Wheel { delta_y } => {
                // Anything but an upward scroll zooms out, including a zero delta.
                let step = if *delta_y < 0.0 {
                    self.cfg.wheel_step
                } else {
                    -self.cfg.wheel_step
                };
                self.transform.zoom_by(step, self.cfg.min_scale);
            }
        }

        let changed = self.transform != before;
        if changed {
            tracing::debug!(
                offset_x = self.transform.offset.x,
                offset_y = self.transform.offset.y,
                scale = self.transform.scale,
                "transform updated"
            );
        }
        changed
    }

    fn touch_move(&mut self, touches: &Touches, layout: Option<&DisplayLayout>) {
        if !self.session.dragging {
            return;
        }
        if touches.len() == 2 {
            let current = touch_distance(touches);
            if let (Some(last), Some(cur)) = (self.session.last_distance, current) {
                self.transform
                    .zoom_by((cur - last) * self.cfg.pinch_sensitivity, self.cfg.min_scale);
            }
            self.session.last_distance = current;
            return;
        }
        let Some(point) = touches.first().copied() else {
            return;
        };
        if self.session.last_distance.take().is_some() {
            // Back from a pinch: re-baseline instead of jumping to the stale pan anchor.
            self.session.last_position = point;
            return;
        }
        let delta = self.session.step_pan(point);
        self.apply_pan(delta, layout);
    }

    fn apply_pan(&mut self, delta: Vec2, layout: Option<&DisplayLayout>) {
        let delta = match (self.cfg.map_to_logical, layout) {
            (true, Some(l)) => l.display_to_logical(delta),
            _ => delta,
        };
        self.transform.pan_by(delta);
    }
}

/// Distance between the first two touches, if there are at least two.
pub fn touch_distance(touches: &[Point]) -> Option<f64> {
    match touches {
        [a, b, ..] => Some(a.distance(*b)),
        _ => None,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/gesture/tracker.rs"]
mod tests;

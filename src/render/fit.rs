use crate::foundation::core::{Rect, Vec2};
use crate::gesture::tracker::TransformState;
use crate::template::CircleMask;

/// "Cover" fit of an image into a square of side `box_size`.
///
/// The shorter image axis becomes `box_size`; the other keeps the aspect ratio, so the square is
/// always fully covered.
pub fn cover_fit(img_w: u32, img_h: u32, box_size: f64) -> Vec2 {
    let ratio = f64::from(img_w) / f64::from(img_h);
    if ratio > 1.0 {
        Vec2::new(box_size * ratio, box_size)
    } else {
        Vec2::new(box_size, box_size / ratio)
    }
}

/// Destination rectangle of the avatar in logical canvas coordinates.
///
/// The fitted box is centered on the mask, shifted by the pan offset, then its size (not its
/// origin) is multiplied by the zoom factor.
pub fn avatar_rect(img_w: u32, img_h: u32, mask: &CircleMask, t: &TransformState) -> Rect {
    let fitted = cover_fit(img_w, img_h, mask.box_size());
    let x0 = mask.center.x - fitted.x / 2.0 + t.offset.x;
    let y0 = mask.center.y - fitted.y / 2.0 + t.offset.y;
    Rect::new(x0, y0, x0 + fitted.x * t.scale, y0 + fitted.y * t.scale)
}

#[cfg(test)]
#[path = "../../tests/unit/render/fit.rs"]
mod tests;

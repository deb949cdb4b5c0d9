use super::*;
use crate::foundation::core::Point;

fn covers(outer: Rect, inner: Rect) -> bool {
    outer.x0 <= inner.x0 && outer.y0 <= inner.y0 && outer.x1 >= inner.x1 && outer.y1 >= inner.y1
}

fn mask_square(m: &CircleMask) -> Rect {
    Rect::new(
        m.center.x - m.radius,
        m.center.y - m.radius,
        m.center.x + m.radius,
        m.center.y + m.radius,
    )
}

#[test]
fn landscape_keeps_height_and_widens() {
    let s = cover_fit(1600, 800, 480.0);
    assert_eq!(s, Vec2::new(960.0, 480.0));
}

#[test]
fn portrait_keeps_width_and_grows_taller() {
    let s = cover_fit(600, 900, 480.0);
    assert_eq!(s, Vec2::new(480.0, 720.0));
}

#[test]
fn square_is_exact_box() {
    assert_eq!(cover_fit(77, 77, 480.0), Vec2::new(480.0, 480.0));
}

#[test]
fn landscape_avatar_covers_mask_at_identity() {
    let mask = CircleMask::default();
    let r = avatar_rect(1920, 1080, &mask, &TransformState::default());
    assert!(covers(r, mask_square(&mask)));
    assert!((r.center().y - mask.center.y).abs() < 1e-9);
    assert!((r.center().x - mask.center.x).abs() < 1e-9);
}

#[test]
fn portrait_avatar_covers_mask_at_identity() {
    let mask = CircleMask::default();
    let r = avatar_rect(3, 7, &mask, &TransformState::default());
    assert!(covers(r, mask_square(&mask)));
}

#[test]
fn offset_moves_origin_and_scale_grows_size_only() {
    let mask = CircleMask {
        center: Point::new(100.0, 100.0),
        radius: 50.0,
    };
    let t = TransformState {
        offset: Vec2::new(10.0, -20.0),
        scale: 2.0,
    };
    let r = avatar_rect(200, 100, &mask, &t);
    // fitted 200x100 centered on (100,100) -> origin (0,50); shifted by offset.
    assert_eq!(r.origin(), Point::new(10.0, 30.0));
    assert_eq!(r.width(), 400.0);
    assert_eq!(r.height(), 200.0);
}

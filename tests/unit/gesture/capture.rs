use smallvec::smallvec;

use super::*;
use crate::foundation::core::Point;

fn two_touches() -> crate::gesture::tracker::Touches {
    smallvec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)]
}

#[test]
fn idle_capture_suppresses_nothing() {
    let cap = GestureCapture::new();
    assert!(!cap.is_active());
    assert!(!cap.suppresses_default(&GestureEvent::Wheel { delta_y: 1.0 }, InputSite::Surface));
    assert!(!cap.suppresses_default(
        &GestureEvent::TouchMove {
            touches: two_touches()
        },
        InputSite::Document
    ));
    assert!(!cap.suppresses_native(NativeGesture::Start));
}

#[test]
fn active_capture_owns_wheel_and_multi_touch() {
    let cap = GestureCapture::new();
    let _guard = cap.acquire();
    assert!(cap.is_active());

    assert!(cap.suppresses_default(&GestureEvent::Wheel { delta_y: -3.0 }, InputSite::Surface));
    assert!(cap.suppresses_default(
        &GestureEvent::TouchStart {
            touches: two_touches()
        },
        InputSite::Surface
    ));
    assert!(cap.suppresses_default(
        &GestureEvent::TouchMove {
            touches: two_touches()
        },
        InputSite::Document
    ));
    assert!(cap.suppresses_native(NativeGesture::Change));

    let one = GestureEvent::TouchMove {
        touches: smallvec![Point::new(1.0, 1.0)],
    };
    assert!(!cap.suppresses_default(&one, InputSite::Surface));
    assert!(!cap.suppresses_default(&one, InputSite::Document));
    assert!(!cap.suppresses_default(&GestureEvent::Wheel { delta_y: 1.0 }, InputSite::Document));
    assert!(!cap.suppresses_default(&GestureEvent::PointerUp, InputSite::Surface));
}

#[test]
fn dropping_guard_releases() {
    let cap = GestureCapture::new();
    {
        let _guard = cap.acquire();
        assert!(cap.is_active());
    }
    assert!(!cap.is_active());
}

#[test]
fn nested_guards_release_independently() {
    let cap = GestureCapture::new();
    let shared = cap.clone();
    let a = cap.acquire();
    let b = shared.acquire();
    drop(a);
    assert!(cap.is_active());
    drop(b);
    assert!(!shared.is_active());
}

#[test]
fn guard_released_on_unwind() {
    let cap = GestureCapture::new();
    let inner = cap.clone();
    let res = std::panic::catch_unwind(move || {
        let _guard = inner.acquire();
        panic!("teardown by panic");
    });
    assert!(res.is_err());
    assert!(!cap.is_active());
}

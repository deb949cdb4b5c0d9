use std::io::Cursor;

use smallvec::smallvec;

use super::*;
use crate::export::sink::{EXPORT_FILE_NAME, InMemorySink};
use crate::foundation::core::{Canvas, Point, Vec2};
use crate::template::{CircleMask, TemplateSpec};

const RED: [u8; 4] = [255, 0, 0, 255];
const GREEN: [u8; 4] = [0, 255, 0, 255];
const BLUE: [u8; 4] = [0, 0, 255, 255];

fn png_bytes(w: u32, h: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba(rgba));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("unit_session").join(name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn small_config(placeholder: Option<&str>) -> BadgeConfig {
    BadgeConfig {
        template: TemplateSpec {
            source: "t.png".into(),
            canvas: Canvas {
                width: 40,
                height: 50,
            },
            mask: CircleMask {
                center: Point::new(20.0, 25.0),
                radius: 10.0,
            },
        },
        placeholder: placeholder.map(str::to_string),
        ..BadgeConfig::default()
    }
}

fn editor_in(name: &str, placeholder: Option<&str>) -> (BadgeEditor, PathBuf) {
    let dir = scratch_dir(name);
    std::fs::write(dir.join("t.png"), png_bytes(4, 5, RED)).unwrap();
    if let Some(p) = placeholder {
        std::fs::write(dir.join(p), png_bytes(2, 2, GREEN)).unwrap();
    }
    let ed = BadgeEditor::new(small_config(placeholder), &dir).unwrap();
    (ed, dir)
}

fn near(px: [u8; 4], want: [u8; 4]) -> bool {
    px.iter()
        .zip(want.iter())
        .all(|(a, b)| (i16::from(*a) - i16::from(*b)).abs() <= 2)
}

#[test]
fn invalid_config_is_rejected() {
    let mut cfg = small_config(None);
    cfg.template.mask.radius = -1.0;
    assert!(BadgeEditor::new(cfg, "target").is_err());
}

#[test]
fn placeholder_is_drawn_until_upload() {
    let (mut ed, _dir) = editor_in("placeholder", Some("p.png"));
    let f = ed.render().unwrap();
    assert!(near(f.pixel(20, 25).unwrap(), GREEN));
    assert!(near(f.pixel(1, 1).unwrap(), RED));

    ed.upload("me.png", png_bytes(3, 3, BLUE));
    assert_eq!(ed.file_name(), Some("me.png"));
    let f = ed.render().unwrap();
    assert!(near(f.pixel(20, 25).unwrap(), BLUE));
    assert!(near(f.pixel(1, 1).unwrap(), RED));
}

#[test]
fn missing_placeholder_still_renders_template() {
    let (mut ed, _dir) = editor_in("no_placeholder", None);
    let f = ed.render().unwrap();
    assert!(near(f.pixel(20, 25).unwrap(), RED));
}

#[test]
fn undecodable_upload_keeps_template_visible() {
    let (mut ed, _dir) = editor_in("bad_upload", None);
    ed.upload("notes.txt", b"definitely not an image".to_vec());
    let f = ed.render().unwrap();
    assert!(near(f.pixel(20, 25).unwrap(), RED));
    assert_eq!(ed.file_name_label(), "notes.txt");
}

#[test]
fn render_is_skipped_when_nothing_changed() {
    let (mut ed, _dir) = editor_in("skip", None);
    assert!(ed.needs_redraw());
    ed.render().unwrap();
    ed.render().unwrap();
    assert_eq!(ed.frames_rendered(), 1);
    assert!(!ed.needs_redraw());

    let out = ed.handle_gesture(&GestureEvent::PointerMove {
        pos: Point::new(3.0, 3.0),
    });
    assert!(!out.changed);
    assert!(!ed.needs_redraw());

    ed.handle_gesture(&GestureEvent::Wheel { delta_y: -1.0 });
    assert!(ed.needs_redraw());
    ed.render().unwrap();
    assert_eq!(ed.frames_rendered(), 2);
}

#[test]
fn drag_moves_avatar_by_raw_delta() {
    let (mut ed, _dir) = editor_in("drag", None);
    ed.mount(1024.0);
    ed.handle_gesture(&GestureEvent::PointerDown {
        pos: Point::new(10.0, 10.0),
    });
    let out = ed.handle_gesture(&GestureEvent::PointerMove {
        pos: Point::new(15.0, 7.0),
    });
    assert!(out.changed);
    assert_eq!(ed.transform().offset, Vec2::new(5.0, -3.0));
    ed.handle_gesture(&GestureEvent::PointerUp);
    ed.handle_gesture(&GestureEvent::PointerMove {
        pos: Point::new(50.0, 50.0),
    });
    assert_eq!(ed.transform().offset, Vec2::new(5.0, -3.0));
}

#[test]
fn upload_keeps_pan_and_zoom() {
    let (mut ed, _dir) = editor_in("keep_transform", None);
    ed.set_transform(TransformState {
        offset: Vec2::new(4.0, -2.0),
        scale: 1.5,
    });
    ed.upload("a.png", png_bytes(2, 2, BLUE));
    let t = ed.transform();
    assert_eq!(t.offset, Vec2::new(4.0, -2.0));
    assert_eq!(t.scale, 1.5);
}

#[test]
fn set_transform_clamps_scale() {
    let (mut ed, _dir) = editor_in("clamp", None);
    ed.set_transform(TransformState {
        offset: Vec2::ZERO,
        scale: 0.01,
    });
    assert_eq!(ed.transform().scale, 0.1);
}

#[test]
fn file_name_label_defaults_to_placeholder_text() {
    let (ed, _dir) = editor_in("label", None);
    assert_eq!(ed.file_name(), None);
    assert_eq!(ed.file_name_label(), NO_FILE_SELECTED);
}

#[test]
fn upload_file_none_is_noop() {
    let (mut ed, _dir) = editor_in("upload_none", None);
    ed.render().unwrap();
    ed.upload_file(None).unwrap();
    assert_eq!(ed.file_name(), None);
    assert!(!ed.needs_redraw());
}

#[test]
fn upload_file_reads_disk_and_names_by_file() {
    let (mut ed, dir) = editor_in("upload_disk", None);
    let path = dir.join("portrait.png");
    std::fs::write(&path, png_bytes(2, 2, BLUE)).unwrap();
    ed.upload_file(Some(&path)).unwrap();
    assert_eq!(ed.file_name_label(), "portrait.png");
    assert!(near(ed.render().unwrap().pixel(20, 25).unwrap(), BLUE));

    assert!(ed.upload_file(Some(&dir.join("missing.png"))).is_err());
    assert_eq!(ed.file_name_label(), "portrait.png");
}

#[test]
fn mount_holds_capture_until_unmount() {
    let (mut ed, _dir) = editor_in("mount", None);
    let wheel = GestureEvent::Wheel { delta_y: 1.0 };
    assert!(!ed.handle_gesture(&wheel).suppress_default);

    ed.mount(400.0);
    assert!(ed.is_mounted());
    assert!(ed.capture().is_active());
    assert!(ed.handle_gesture(&wheel).suppress_default);
    assert!(ed.suppresses_native(NativeGesture::Start));

    ed.unmount();
    assert!(!ed.capture().is_active());
    assert!(!ed.suppresses_native(NativeGesture::Change));
}

#[test]
fn document_pinch_is_suppressed_only_while_mounted() {
    let (mut ed, _dir) = editor_in("document", None);
    let pinch = GestureEvent::TouchMove {
        touches: smallvec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)],
    };
    let one = GestureEvent::TouchMove {
        touches: smallvec![Point::new(0.0, 0.0)],
    };
    assert!(!ed.suppresses_document_default(&pinch));
    ed.mount(400.0);
    assert!(ed.suppresses_document_default(&pinch));
    assert!(!ed.suppresses_document_default(&one));
}

#[test]
fn shared_capture_is_released_on_drop() {
    let shared = GestureCapture::new();
    let (ed, _dir) = editor_in("drop", None);
    let mut ed = ed.with_capture(shared.clone());
    ed.mount(900.0);
    assert!(shared.is_active());
    drop(ed);
    assert!(!shared.is_active());
}

#[test]
fn resize_follows_breakpoint() {
    let (mut ed, _dir) = editor_in("resize", None);
    ed.mount(1200.0);
    assert_eq!(ed.display().width, 768.0);
    ed.render().unwrap();

    ed.resize(1300.0);
    assert!(!ed.needs_redraw());

    ed.resize(400.0);
    assert_eq!(ed.display().width, 380.0);
    assert!(ed.needs_redraw());
}

#[test]
fn download_writes_badge_png() {
    let (mut ed, _dir) = editor_in("download", None);
    let mut sink = InMemorySink::new();
    ed.download(&mut sink).unwrap();
    let (name, bytes) = sink.last().unwrap();
    assert_eq!(name, EXPORT_FILE_NAME);
    let img = image::load_from_memory(bytes).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (40, 50));
    assert_eq!(img.get_pixel(1, 1).0, RED);
}

fn square_svg_top_band() -> Vec<u8> {
    br##"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="100" viewBox="0 0 100 100">
  <rect x="0" y="0" width="100" height="100" fill="#00ff00"/>
  <rect x="0" y="0" width="100" height="25" fill="#0000ff"/>
</svg>"##
        .to_vec()
}

#[test]
fn square_svg_avatar_keeps_its_aspect() {
    let (mut ed, _dir) = editor_in("svg_avatar", None);
    let bytes = square_svg_top_band();

    let size = ed.avatar_svg_size();
    assert_eq!(size, SvgSize::MinSide(20));
    let decoded = ed
        .store
        .load(
            &AssetSource::Bytes {
                name: "me.svg".into(),
                bytes: bytes.clone().into(),
            },
            size,
        )
        .unwrap();
    assert_eq!((decoded.width, decoded.height), (20, 20));

    // Square cover fit puts the avatar at (10,15)-(30,35); the blue band covers rows 15..20.
    ed.upload("me.svg", bytes);
    let f = ed.render().unwrap();
    assert!(near(f.pixel(20, 19).unwrap(), BLUE));
    assert!(near(f.pixel(20, 22).unwrap(), GREEN));
}

#[test]
fn repeated_uploads_keep_cache_bounded() {
    let (mut ed, _dir) = editor_in("upload_cache", None);
    for i in 0..5u8 {
        ed.upload(format!("me{i}.png"), png_bytes(8, 8, [i, 0, 255, 255]));
        ed.render().unwrap();
        assert_eq!(ed.store.cached_len(), 2);
    }
}

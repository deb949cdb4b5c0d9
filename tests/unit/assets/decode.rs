use std::io::Cursor;

use super::*;

fn png_bytes(w: u32, h: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba(rgba));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_image_png_dimensions_and_premul() {
    let prepared = decode_image(&png_bytes(1, 1, [100, 50, 200, 128])).unwrap();
    assert_eq!(prepared.width, 1);
    assert_eq!(prepared.height, 1);
    assert_eq!(
        prepared.rgba8_premul.as_slice(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn decode_image_rejects_garbage() {
    let err = decode_image(b"definitely not an image").unwrap_err();
    assert!(err.to_string().contains("decode error:"));
}

#[test]
fn decode_svg_parse_ok_and_err() {
    let ok = br#"<svg xmlns="http://www.w3.org/2000/svg" width="1" height="1"></svg>"#;
    parse_svg(ok).unwrap();

    let bad = br#"<svg"#;
    assert!(parse_svg(bad).is_err());
}

#[test]
fn decode_layer_dispatches_raster_and_svg() {
    let raster =
        decode_layer(&png_bytes(3, 2, [0, 0, 0, 255]), SvgSize::Exact(50, 50)).unwrap();
    assert_eq!((raster.width, raster.height), (3, 2));

    let svg = br##"<?xml version="1.0"?>
<svg xmlns="http://www.w3.org/2000/svg" width="10" height="20">
  <rect width="10" height="20" fill="#ff0000"/>
</svg>"##;
    let img = decode_layer(svg, SvgSize::Exact(40, 80)).unwrap();
    assert_eq!((img.width, img.height), (40, 80));
    assert_eq!(img.rgba8_premul.len(), 40 * 80 * 4);
    let center = ((40 * 40 + 20) * 4) as usize;
    assert_eq!(&img.rgba8_premul[center..center + 4], &[255, 0, 0, 255]);
}

#[test]
fn svg_raster_rejects_degenerate_size() {
    let svg = br#"<svg xmlns="http://www.w3.org/2000/svg" width="1" height="1"></svg>"#;
    assert!(decode_layer(svg, SvgSize::Exact(0, 10)).is_err());
}

#[test]
fn svg_min_side_rasterizes_at_document_aspect() {
    let svg = br##"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="50">
  <rect width="100" height="50" fill="#0000ff"/>
</svg>"##;
    let img = decode_layer(svg, SvgSize::MinSide(20)).unwrap();
    assert_eq!((img.width, img.height), (40, 20));
    assert!((img.aspect() - 2.0).abs() < 1e-12);
}

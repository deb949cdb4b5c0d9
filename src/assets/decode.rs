use std::sync::Arc;

use anyhow::Context;

use crate::assets::store::{PreparedImage, PreparedSvg, SvgSize};
use crate::foundation::error::{BadgeError, BadgeResult};
use crate::foundation::math::premultiply_rgba8_in_place;

/// Decode encoded image bytes and convert to premultiplied RGBA8.
pub fn decode_image(bytes: &[u8]) -> BadgeResult<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes)
        .context("decode image from memory")
        .map_err(|e| BadgeError::decode(format!("{e:#}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(BadgeError::decode("image has zero width or height"));
    }

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

/// Parse SVG bytes into a prepared `usvg` tree.
pub fn parse_svg(bytes: &[u8]) -> BadgeResult<PreparedSvg> {
    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_data(bytes, &opts)
        .context("parse svg tree")
        .map_err(|e| BadgeError::decode(format!("{e:#}")))?;
    Ok(PreparedSvg {
        tree: Arc::new(tree),
    })
}

/// Decode either a raster image or an SVG document.
///
/// SVG input is rasterized at `svg_size`, resolved against the document's own size, so vector
/// layers stay sharp at any pixel ratio.
pub fn decode_layer(bytes: &[u8], svg_size: SvgSize) -> BadgeResult<PreparedImage> {
    if !looks_like_svg(bytes) {
        return decode_image(bytes);
    }
    let svg = parse_svg(bytes)?;
    let doc = svg.tree.size();
    let (w, h) = svg_size.resolve(f64::from(doc.width()), f64::from(doc.height()));
    let rgba8_premul = crate::assets::svg_raster::rasterize_svg_to_premul_rgba8(&svg.tree, w, h)?;
    Ok(PreparedImage {
        width: w,
        height: h,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(512)];
    let text = String::from_utf8_lossy(head);
    let text = text.trim_start_matches('\u{feff}').trim_start();
    text.starts_with("<svg") || (text.starts_with("<?xml") && text.contains("<svg"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;

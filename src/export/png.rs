use std::io::Cursor;

use anyhow::Context;

use crate::foundation::error::{BadgeError, BadgeResult};
use crate::render::backend::FrameRGBA;

/// Encode a rendered surface as PNG at its full physical resolution.
///
/// PNG stores straight alpha, so premultiplied frames are converted first.
pub fn encode_png(frame: &FrameRGBA) -> BadgeResult<Vec<u8>> {
    let expected = (frame.width as usize)
        .checked_mul(frame.height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| BadgeError::export("frame size overflow"))?;
    if frame.data.len() != expected {
        return Err(BadgeError::export(
            "frame data length does not match width*height*4",
        ));
    }

    let img = image::RgbaImage::from_raw(frame.width, frame.height, frame.to_straight_rgba())
        .ok_or_else(|| BadgeError::export("frame buffer rejected by encoder"))?;
    let mut out = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
        .context("encode png")?;
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/export/png.rs"]
mod tests;

//! PNG export.
//!
//! The rendered surface is encoded as PNG and handed to an [`sink::ExportSink`] under
//! [`sink::EXPORT_FILE_NAME`].

/// PNG encoding of rendered frames.
pub mod png;
/// Export destinations.
pub mod sink;

use crate::foundation::error::BadgeResult;
use crate::render::backend::FrameRGBA;

/// Encode `frame` and deliver it as `badge.png`.
pub fn export_frame(frame: &FrameRGBA, sink: &mut dyn sink::ExportSink) -> BadgeResult<()> {
    let bytes = png::encode_png(frame)?;
    sink.deliver(sink::EXPORT_FILE_NAME, &bytes)
}

//! Badgeforge composes a user portrait into a circular window on a fixed template and exports
//! the result as a PNG.
//!
//! The public API is editor-oriented:
//!
//! - Load and validate a [`BadgeConfig`]
//! - Create a [`BadgeEditor`] and feed it [`GestureEvent`]s and uploads
//! - Render the current [`FrameRGBA`] or deliver `badge.png` to an [`ExportSink`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod foundation;

/// Editor configuration.
pub mod config;
/// PNG export and delivery sinks.
pub mod export;
/// Pan/zoom gesture tracking and input capture.
pub mod gesture;
/// Responsive display sizing.
pub mod layout;
/// Scene rasterization.
pub mod render;
/// Interactive editor session.
pub mod session;
/// Template artwork and circular mask.
pub mod template;

pub use crate::foundation::core::{
    Canvas, DevicePixelRatio, DisplaySize, LOGICAL_HEIGHT, LOGICAL_WIDTH, Point, Rect, Vec2,
};
pub use crate::foundation::error::{BadgeError, BadgeResult};

pub use crate::assets::store::{AssetSource, AssetStore, PreparedImage, SceneAssets, SvgSize};
pub use crate::config::BadgeConfig;
pub use crate::export::png::encode_png;
pub use crate::export::sink::{DirectorySink, EXPORT_FILE_NAME, ExportSink, InMemorySink};
pub use crate::gesture::capture::{CaptureGuard, GestureCapture, InputSite, NativeGesture};
pub use crate::gesture::tracker::{
    GestureConfig, GestureEvent, GestureTracker, Touches, TransformState,
};
pub use crate::layout::{DisplayLayout, LayoutConfig};
pub use crate::render::backend::FrameRGBA;
pub use crate::render::cpu::{Compositor, CompositorOpts, Scene};
pub use crate::render::fit::{avatar_rect, cover_fit};
pub use crate::session::editor::{BadgeEditor, GestureOutcome, NO_FILE_SELECTED};
pub use crate::template::{CircleMask, TemplateSpec};

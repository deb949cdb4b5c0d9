use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;

use crate::assets::store::{AssetSource, AssetStore, SvgSize};
use crate::config::BadgeConfig;
use crate::export::sink::ExportSink;
use crate::foundation::core::DisplaySize;
use crate::foundation::error::{BadgeError, BadgeResult};
use crate::gesture::capture::{CaptureGuard, GestureCapture, InputSite, NativeGesture};
use crate::gesture::tracker::{GestureEvent, GestureTracker, TransformState};
use crate::layout::DisplayLayout;
use crate::render::backend::FrameRGBA;
use crate::render::cpu::{Compositor, CompositorOpts, Scene};

/// Label shown next to the upload button before any file is chosen.
pub const NO_FILE_SELECTED: &str = "No file selected";

/// Result of feeding one surface event to the editor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GestureOutcome {
    /// The avatar transform changed and a redraw is pending.
    pub changed: bool,
    /// The host must prevent the platform default for this event.
    pub suppress_default: bool,
}

/// The badge editor: one template, one avatar, one transform.
///
/// Control flow is `gesture -> transform update -> redraw requested -> full re-render`. Rendering
/// is pull-based: [`BadgeEditor::render`] redraws only when something the picture depends on
/// changed since the last frame.
#[derive(Debug)]
pub struct BadgeEditor {
    cfg: BadgeConfig,
    store: AssetStore,
    compositor: Compositor,
    tracker: GestureTracker,
    capture: GestureCapture,
    guard: Option<CaptureGuard>,
    layout: DisplayLayout,
    avatar: Option<AssetSource>,
    file_name: Option<String>,
    needs_redraw: bool,
    last_frame: Option<FrameRGBA>,
    frames_rendered: u64,
}

impl BadgeEditor {
    /// Create an editor resolving template and placeholder paths against `assets_root`.
    pub fn new(cfg: BadgeConfig, assets_root: impl Into<PathBuf>) -> BadgeResult<Self> {
        cfg.validate()?;
        Ok(Self {
            store: AssetStore::new(assets_root),
            compositor: Compositor::new(CompositorOpts {
                clear_rgba: cfg.clear_rgba,
            }),
            tracker: GestureTracker::new(cfg.gestures),
            capture: GestureCapture::new(),
            guard: None,
            layout: DisplayLayout::unmeasured(cfg.template.canvas),
            avatar: None,
            file_name: None,
            needs_redraw: true,
            last_frame: None,
            frames_rendered: 0,
            cfg,
        })
    }

    /// Share a capture registry with the host event loop.
    pub fn with_capture(mut self, capture: GestureCapture) -> Self {
        let remount = self.guard.take().is_some();
        self.capture = capture;
        if remount {
            self.guard = Some(self.capture.acquire());
        }
        self
    }

    /// Active configuration.
    pub fn config(&self) -> &BadgeConfig {
        &self.cfg
    }

    /// Attach to a viewport: take gesture capture and size the display box.
    pub fn mount(&mut self, viewport_width: f64) {
        if self.guard.is_none() {
            self.guard = Some(self.capture.acquire());
        }
        self.resize(viewport_width);
    }

    /// Detach from the viewport and release gesture capture.
    pub fn unmount(&mut self) {
        self.guard = None;
    }

    /// `true` between [`BadgeEditor::mount`] and [`BadgeEditor::unmount`].
    pub fn is_mounted(&self) -> bool {
        self.guard.is_some()
    }

    /// Capture registry consulted for default-action suppression.
    pub fn capture(&self) -> &GestureCapture {
        &self.capture
    }

    /// Recompute the display box for a new viewport width.
    pub fn resize(&mut self, viewport_width: f64) {
        let next = DisplayLayout::for_viewport(
            viewport_width,
            self.cfg.template.canvas,
            &self.cfg.layout,
        );
        if next != self.layout {
            tracing::debug!(
                viewport_width,
                width = next.display().width,
                height = next.display().height,
                "display resized"
            );
            self.layout = next;
            self.needs_redraw = true;
        }
    }

    /// Current display box.
    pub fn display(&self) -> DisplaySize {
        self.layout.display()
    }

    /// Replace the avatar with uploaded bytes. Pan and zoom are kept.
    pub fn upload(&mut self, name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) {
        let name = name.into();
        let bytes = bytes.into();
        tracing::info!(file = %name, bytes = bytes.len(), "avatar uploaded");
        self.file_name = Some(name.clone());
        self.avatar = Some(AssetSource::Bytes { name, bytes });
        self.needs_redraw = true;
    }

    /// Upload from a file picker result. `None` (nothing picked) is a no-op.
    pub fn upload_file(&mut self, path: Option<&Path>) -> BadgeResult<()> {
        let Some(path) = path else {
            return Ok(());
        };
        let bytes = std::fs::read(path)
            .with_context(|| format!("read avatar '{}'", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.upload(name, bytes);
        Ok(())
    }

    /// Name of the uploaded file, if any.
    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// Text for the read-only file name field.
    pub fn file_name_label(&self) -> &str {
        self.file_name().unwrap_or(NO_FILE_SELECTED)
    }

    /// Feed one event observed on the drawing surface.
    pub fn handle_gesture(&mut self, event: &GestureEvent) -> GestureOutcome {
        let suppress_default = self.capture.suppresses_default(event, InputSite::Surface);
        let changed = self.tracker.handle(event, Some(&self.layout));
        if changed {
            self.needs_redraw = true;
        }
        GestureOutcome {
            changed,
            suppress_default,
        }
    }

    /// Whether an event seen elsewhere in the document must have its default prevented.
    pub fn suppresses_document_default(&self, event: &GestureEvent) -> bool {
        self.capture.suppresses_default(event, InputSite::Document)
    }

    /// Whether a native gesture-recognizer event must be prevented.
    pub fn suppresses_native(&self, gesture: NativeGesture) -> bool {
        self.capture.suppresses_native(gesture)
    }

    /// Current avatar transform.
    pub fn transform(&self) -> TransformState {
        self.tracker.transform()
    }

    /// Place the avatar directly (scale is clamped to the configured floor).
    pub fn set_transform(&mut self, t: TransformState) {
        let before = self.tracker.transform();
        self.tracker.set_transform(t);
        if self.tracker.transform() != before {
            self.needs_redraw = true;
        }
    }

    /// `true` when the next [`BadgeEditor::render`] will redraw.
    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw || self.last_frame.is_none()
    }

    /// Number of full redraws performed so far.
    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// Render the scene if anything changed, and return the current surface.
    #[tracing::instrument(skip(self), fields(redraw = self.needs_redraw()))]
    pub fn render(&mut self) -> BadgeResult<&FrameRGBA> {
        if self.needs_redraw() {
            let (w, h) = self.cfg.template.canvas.physical(self.cfg.dpr);
            let template = AssetSource::Path(self.cfg.template.source.clone());
            let avatar = self.avatar_source();
            let assets = self.store.load_scene(
                &template,
                SvgSize::Exact(w, h),
                avatar.as_ref(),
                self.avatar_svg_size(),
            );

            let frame = self.compositor.render(&Scene {
                template: &self.cfg.template,
                assets: &assets,
                transform: self.tracker.transform(),
                dpr: self.cfg.dpr,
            })?;
            self.last_frame = Some(frame);
            self.needs_redraw = false;
            self.frames_rendered += 1;
        }
        self.last_frame
            .as_ref()
            .ok_or_else(|| BadgeError::render("no frame rendered"))
    }

    /// Export the current surface as `badge.png`.
    pub fn download(&mut self, sink: &mut dyn ExportSink) -> BadgeResult<()> {
        let frame = self.render()?;
        crate::export::export_frame(frame, sink)
    }

    /// Vector avatars keep their aspect ratio and cover the mask square at full resolution.
    fn avatar_svg_size(&self) -> SvgSize {
        let side = self.cfg.template.mask.box_size() * self.cfg.dpr.get();
        SvgSize::MinSide(side.ceil().max(1.0) as u32)
    }

    fn avatar_source(&self) -> Option<AssetSource> {
        self.avatar.clone().or_else(|| {
            self.cfg
                .placeholder
                .as_ref()
                .map(|p| AssetSource::Path(p.clone()))
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/editor.rs"]
mod tests;

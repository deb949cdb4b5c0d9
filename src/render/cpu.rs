use std::sync::Arc;

use kurbo::Shape;

use crate::assets::store::{PreparedImage, SceneAssets};
use crate::foundation::core::{Affine, DevicePixelRatio, Rect};
use crate::foundation::error::{BadgeError, BadgeResult};
use crate::gesture::tracker::TransformState;
use crate::render::backend::FrameRGBA;
use crate::render::fit::avatar_rect;
use crate::template::TemplateSpec;

// Flattening tolerance for the mask circle, in logical pixels.
const CLIP_TOLERANCE: f64 = 0.1;

/// Options for the CPU compositor.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompositorOpts {
    /// If set, the surface is filled with this straight-alpha color before any layer is drawn.
    pub clear_rgba: Option<[u8; 4]>,
}

/// Everything one full redraw depends on.
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    /// Template layout (canvas size and mask).
    pub template: &'a TemplateSpec,
    /// Decoded layers.
    pub assets: &'a SceneAssets,
    /// Avatar pan/zoom.
    pub transform: TransformState,
    /// Device pixel ratio of the target surface.
    pub dpr: DevicePixelRatio,
}

/// CPU compositor powered by `vello_cpu`.
///
/// Every call to [`Compositor::render`] redraws the whole scene; there is no partial update.
#[derive(Default)]
pub struct Compositor {
    opts: CompositorOpts,
    ctx: Option<vello_cpu::RenderContext>,
}

impl std::fmt::Debug for Compositor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compositor")
            .field("opts", &self.opts)
            .field("has_ctx", &self.ctx.is_some())
            .finish()
    }
}

impl Compositor {
    /// Create a compositor.
    pub fn new(opts: CompositorOpts) -> Self {
        Self { opts, ctx: None }
    }

    /// Render template and clipped avatar at `canvas * dpr` physical pixels.
    #[tracing::instrument(skip_all, fields(dpr = scene.dpr.get(), scale = scene.transform.scale))]
    pub fn render(&mut self, scene: &Scene<'_>) -> BadgeResult<FrameRGBA> {
        let canvas = scene.template.canvas;
        let (width, height) = canvas.physical(scene.dpr);
        let w16: u16 = width
            .try_into()
            .map_err(|_| BadgeError::render("surface width exceeds u16"))?;
        let h16: u16 = height
            .try_into()
            .map_err(|_| BadgeError::render("surface height exceeds u16"))?;

        let base = Affine::scale(scene.dpr.get());
        let logical = Rect::new(0.0, 0.0, f64::from(canvas.width), f64::from(canvas.height));
        let clear = self.opts.clear_rgba;

        let mut pixmap = vello_cpu::Pixmap::new(w16, h16);
        self.with_ctx_mut(w16, h16, |ctx| {
            ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

            if let Some([r, g, b, a]) = clear {
                ctx.set_transform(affine_to_cpu(base));
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
                ctx.fill_rect(&rect_to_cpu(logical));
            }

            if let Some(template) = scene.assets.template.as_deref() {
                draw_image_into(ctx, template, base, logical)?;
            }

            if let Some(avatar) = scene.assets.avatar.as_deref() {
                let mask = &scene.template.mask;
                let dest = avatar_rect(avatar.width, avatar.height, mask, &scene.transform);
                if dest.width() > 0.0 && dest.height() > 0.0 {
                    let clip = bezpath_to_cpu(&mask.circle().to_path(CLIP_TOLERANCE));
                    ctx.set_transform(affine_to_cpu(base));
                    ctx.push_clip_layer(&clip);
                    draw_image_into(ctx, avatar, base, dest)?;
                    ctx.pop_layer();
                }
            }

            ctx.flush();
            ctx.render_to_pixmap(&mut pixmap);
            Ok(())
        })?;

        tracing::debug!(width, height, "scene rendered");
        Ok(FrameRGBA {
            width,
            height,
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }

    fn with_ctx_mut<R>(
        &mut self,
        width: u16,
        height: u16,
        f: impl FnOnce(&mut vello_cpu::RenderContext) -> BadgeResult<R>,
    ) -> BadgeResult<R> {
        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            _ => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        let out = f(&mut ctx)?;
        self.ctx = Some(ctx);
        Ok(out)
    }
}

/// Draw `img` stretched over `dest` (logical coordinates) under `base`.
fn draw_image_into(
    ctx: &mut vello_cpu::RenderContext,
    img: &PreparedImage,
    base: Affine,
    dest: Rect,
) -> BadgeResult<()> {
    let paint = image_paint(img)?;
    let iw = f64::from(img.width);
    let ih = f64::from(img.height);
    let place = Affine::translate(dest.origin().to_vec2())
        * Affine::scale_non_uniform(dest.width() / iw, dest.height() / ih);
    ctx.set_transform(affine_to_cpu(base * place));
    ctx.set_paint(paint);
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, iw, ih));
    Ok(())
}

fn image_paint(img: &PreparedImage) -> BadgeResult<vello_cpu::Image> {
    let pixmap = pixmap_from_premul_bytes(&img.rgba8_premul, img.width, img.height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn bezpath_to_cpu(path: &kurbo::BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let pt = |p: kurbo::Point| vello_cpu::kurbo::Point::new(p.x, p.y);
    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(pt(p)),
            PathEl::LineTo(p) => out.line_to(pt(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(pt(p1), pt(p2)),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(pt(p1), pt(p2), pt(p3)),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> BadgeResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| BadgeError::render("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| BadgeError::render("image height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(BadgeError::render("image byte len mismatch"));
    }
    // Pixmap stores PremulRgba8; our bytes are already premultiplied.
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| {
            vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]])
        })
        .collect::<Vec<_>>();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels, w, h, true,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;

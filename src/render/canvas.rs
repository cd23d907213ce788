use std::sync::Arc;

use image::RgbaImage;

use crate::foundation::core::{Affine, BezPath, IRect, Point, Rgba8, Vec2, unpremul_u8};
use crate::foundation::error::{LoomError, LoomResult};

/// Immediate-mode drawing surface used by widgets.
///
/// Geometry is recorded into a `vello_cpu` context under the current transform and rasterized
/// once by [`Canvas::into_image`]. The transform stack is owned by the canvas: widgets `push`
/// before mutating it and `pop` when done.
pub struct Canvas {
    width: u32,
    height: u32,
    ctx: Option<vello_cpu::RenderContext>,
    transform: Affine,
    stack: Vec<Affine>,
    draw_ops: usize,
}

impl std::fmt::Debug for Canvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Canvas")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("transform", &self.transform)
            .field("depth", &self.stack.len())
            .field("draw_ops", &self.draw_ops)
            .finish()
    }
}

impl Canvas {
    /// A transparent canvas. Zero-area canvases are allowed and ignore all drawing.
    pub fn new(width: u32, height: u32) -> LoomResult<Self> {
        let w: u16 = width
            .try_into()
            .map_err(|_| LoomError::paint(format!("canvas width {width} exceeds u16")))?;
        let h: u16 = height
            .try_into()
            .map_err(|_| LoomError::paint(format!("canvas height {height} exceeds u16")))?;
        let ctx = (w > 0 && h > 0).then(|| vello_cpu::RenderContext::new(w, h));
        Ok(Self {
            width,
            height,
            ctx,
            transform: Affine::IDENTITY,
            stack: Vec::new(),
            draw_ops: 0,
        })
    }

    pub fn for_bounds(bounds: IRect) -> LoomResult<Self> {
        Self::new(bounds.width() as u32, bounds.height() as u32)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn transform(&self) -> Affine {
        self.transform
    }

    /// Number of draw calls issued so far.
    pub fn draw_ops(&self) -> usize {
        self.draw_ops
    }

    pub fn push(&mut self) {
        self.stack.push(self.transform);
    }

    pub fn pop(&mut self) {
        if let Some(t) = self.stack.pop() {
            self.transform = t;
        }
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.transform = self.transform * Affine::translate(Vec2::new(dx, dy));
    }

    pub fn rotate(&mut self, radians: f64) {
        self.transform = self.transform * Affine::rotate(radians);
    }

    pub fn rotate_about(&mut self, radians: f64, pivot: Point) {
        self.transform = self.transform * Affine::rotate_about(radians, pivot);
    }

    pub fn scale_about(&mut self, sx: f64, sy: f64, pivot: Point) {
        self.about(pivot, Affine::scale_non_uniform(sx, sy));
    }

    /// Shear by factors `sx` (x += sx * y) and `sy` (y += sy * x) about `pivot`.
    pub fn shear_about(&mut self, sx: f64, sy: f64, pivot: Point) {
        self.about(pivot, Affine::skew(sx, sy));
    }

    pub fn shear(&mut self, sx: f64, sy: f64) {
        self.transform = self.transform * Affine::skew(sx, sy);
    }

    fn about(&mut self, pivot: Point, a: Affine) {
        let p = pivot.to_vec2();
        self.transform = self.transform * Affine::translate(p) * a * Affine::translate(-p);
    }

    /// Fill the whole surface, ignoring the current transform.
    pub fn clear(&mut self, color: Rgba8) {
        let saved = self.transform;
        self.transform = Affine::IDENTITY;
        let (w, h) = (f64::from(self.width), f64::from(self.height));
        self.fill_rect(kurbo::Rect::new(0.0, 0.0, w, h), color);
        self.transform = saved;
    }

    pub fn fill_rect(&mut self, rect: kurbo::Rect, color: Rgba8) {
        let Some(ctx) = self.begin_draw(self.transform) else {
            return;
        };
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            color.r, color.g, color.b, color.a,
        ));
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(rect.x0, rect.y0, rect.x1, rect.y1));
    }

    pub fn fill_path(&mut self, path: &BezPath, color: Rgba8) {
        let Some(ctx) = self.begin_draw(self.transform) else {
            return;
        };
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            color.r, color.g, color.b, color.a,
        ));
        ctx.fill_path(&bezpath_to_cpu(path));
    }

    pub fn stroke_path(&mut self, path: &BezPath, color: Rgba8, width: f64) {
        let Some(ctx) = self.begin_draw(self.transform) else {
            return;
        };
        ctx.set_stroke(vello_cpu::kurbo::Stroke::new(width));
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            color.r, color.g, color.b, color.a,
        ));
        ctx.stroke_path(&bezpath_to_cpu(path));
    }

    /// Composite a straight-alpha image with its top-left corner at (`x`, `y`) in local space.
    pub fn draw_image(&mut self, img: &RgbaImage, x: f64, y: f64) -> LoomResult<()> {
        if img.width() == 0 || img.height() == 0 {
            return Ok(());
        }
        let pixmap = pixmap_from_straight(img)?;
        let tr = self.transform * Affine::translate(Vec2::new(x, y));
        let Some(ctx) = self.begin_draw(tr) else {
            return Ok(());
        };
        ctx.set_paint(vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        });
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(img.width()),
            f64::from(img.height()),
        ));
        Ok(())
    }

    fn begin_draw(&mut self, tr: Affine) -> Option<&mut vello_cpu::RenderContext> {
        self.draw_ops += 1;
        let ctx = self.ctx.as_mut()?;
        ctx.set_transform(affine_to_cpu(tr));
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_blend_mode(vello_cpu::peniko::BlendMode::default());
        Some(ctx)
    }

    /// Rasterize everything drawn so far into a straight-alpha image.
    pub fn into_image(self) -> LoomResult<RgbaImage> {
        let Some(mut ctx) = self.ctx else {
            return Ok(RgbaImage::new(self.width, self.height));
        };
        let mut pixmap = vello_cpu::Pixmap::new(self.width as u16, self.height as u16);
        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);

        let mut out = pixmap.data_as_u8_slice().to_vec();
        for px in out.chunks_exact_mut(4) {
            let a = px[3];
            px[0] = unpremul_u8(px[0], a);
            px[1] = unpremul_u8(px[1], a);
            px[2] = unpremul_u8(px[2], a);
        }
        RgbaImage::from_raw(self.width, self.height, out)
            .ok_or_else(|| LoomError::paint("rendered pixmap size mismatch"))
    }
}

fn pixmap_from_straight(img: &RgbaImage) -> LoomResult<vello_cpu::Pixmap> {
    let w: u16 = img
        .width()
        .try_into()
        .map_err(|_| LoomError::paint("image width exceeds u16"))?;
    let h: u16 = img
        .height()
        .try_into()
        .map_err(|_| LoomError::paint("image height exceeds u16"))?;
    let pixels = img
        .pixels()
        .map(|p| {
            let c = Rgba8::from(*p).premultiplied();
            vello_cpu::peniko::color::PremulRgba8::from_u8_array([c.r, c.g, c.b, c.a])
        })
        .collect::<Vec<_>>();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, true))
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/canvas.rs"]
mod tests;

use image::RgbaImage;

use crate::foundation::core::{CanvasMeta, Point, Rgba8};
use crate::foundation::error::LoomResult;
use crate::foundation::math::CanonicalHasher;
use crate::render::canvas::Canvas;
use crate::widget::{BoxedWidget, Widget};

pub const DEFAULT_DELAY_MS: u32 = 50;
pub const MAX_FRAME_COUNT: usize = 2000;

/// Top-level widget plus the hints a host attaches to it.
pub struct Root {
    pub child: BoxedWidget,
    /// Per-frame delay in milliseconds; 0 means the default of 50.
    pub delay_ms: u32,
    /// Maximum content age in seconds; 0 means unlimited.
    pub max_age_s: u32,
    pub show_full_animation: bool,
}

impl std::fmt::Debug for Root {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Root")
            .field("delay_ms", &self.delay_ms)
            .field("max_age_s", &self.max_age_s)
            .field("show_full_animation", &self.show_full_animation)
            .finish_non_exhaustive()
    }
}

impl Root {
    pub fn new(child: impl Widget + 'static) -> Self {
        Self {
            child: Box::new(child),
            delay_ms: 0,
            max_age_s: 0,
            show_full_animation: false,
        }
    }

    pub fn with_delay_ms(mut self, delay_ms: u32) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    pub fn with_max_age_s(mut self, max_age_s: u32) -> Self {
        self.max_age_s = max_age_s;
        self
    }

    pub fn with_show_full_animation(mut self, show: bool) -> Self {
        self.show_full_animation = show;
        self
    }

    /// Frames this root contributes on `canvas`, capped at [`MAX_FRAME_COUNT`].
    pub fn frame_count(&self, canvas: CanvasMeta) -> usize {
        let n = self.child.frame_count(logical_bounds(canvas));
        if n > MAX_FRAME_COUNT {
            tracing::warn!(
                frames = n,
                cap = MAX_FRAME_COUNT,
                "root frame count exceeds cap, truncating"
            );
            return MAX_FRAME_COUNT;
        }
        n
    }

    pub fn paint_frame(
        &self,
        canvas: CanvasMeta,
        solid_background: bool,
        frame_idx: usize,
    ) -> LoomResult<RgbaImage> {
        let mut dc = Canvas::new(canvas.scaled_width(), canvas.scaled_height())?;
        if solid_background {
            dc.clear(Rgba8::BLACK);
        }
        dc.push();
        if canvas.is_2x {
            dc.scale_about(2.0, 2.0, Point::ORIGIN);
        }
        self.child.paint(&mut dc, logical_bounds(canvas), frame_idx)?;
        dc.pop();
        dc.into_image()
    }

    pub(crate) fn fingerprint(&self, h: &mut CanonicalHasher) {
        h.write_tag("root");
        self.child.fingerprint(h);
        h.write_u32(self.delay_ms);
        h.write_u32(self.max_age_s);
        h.write_bool(self.show_full_animation);
    }
}

fn logical_bounds(canvas: CanvasMeta) -> crate::foundation::core::IRect {
    crate::foundation::core::IRect::from_size(canvas.width as i32, canvas.height as i32)
}

/// Paint every frame of every root, in order.
#[tracing::instrument(skip(roots), fields(roots = roots.len()))]
pub fn paint_roots(
    solid_background: bool,
    canvas: CanvasMeta,
    roots: &[Root],
) -> LoomResult<Vec<RgbaImage>> {
    let mut frames = Vec::new();
    for root in roots {
        let n = root.frame_count(canvas);
        frames.reserve(n);
        for i in 0..n {
            frames.push(root.paint_frame(canvas, solid_background, i)?);
        }
    }
    tracing::debug!(frames = frames.len(), "painted roots");
    Ok(frames)
}

#[cfg(test)]
#[path = "../../tests/unit/widget/root.rs"]
mod tests;

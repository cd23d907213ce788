use crate::effects::image_filter::PixelEffect;
use crate::foundation::core::IRect;
use crate::foundation::error::LoomResult;
use crate::foundation::math::CanonicalHasher;
use crate::render::canvas::Canvas;
use crate::widget::{BoxedWidget, Widget};

/// Runs a [`PixelEffect`] over the child's own raster.
///
/// The child is painted alone at its paint bounds (plus the effect's padding), filtered, and the
/// result is drawn centered within the bounds handed to `paint`.
pub struct Filtered {
    pub child: BoxedWidget,
    pub effect: PixelEffect,
}

impl Filtered {
    pub fn new(child: impl Widget + 'static, effect: PixelEffect) -> Self {
        Self {
            child: Box::new(child),
            effect,
        }
    }
}

fn padded(cb: IRect, pad: i32) -> IRect {
    let grow = pad.saturating_mul(2);
    IRect::from_size(
        cb.width().saturating_add(grow),
        cb.height().saturating_add(grow),
    )
}

impl Widget for Filtered {
    fn paint_bounds(&self, bounds: IRect, frame_idx: usize) -> IRect {
        padded(self.child.paint_bounds(bounds, frame_idx), self.effect.padding())
    }

    fn paint(&self, canvas: &mut Canvas, bounds: IRect, frame_idx: usize) -> LoomResult<()> {
        let cb = self.child.paint_bounds(bounds, frame_idx);
        let pad = self.effect.padding();
        let mut tmp = Canvas::for_bounds(padded(cb, pad))?;
        tmp.translate(f64::from(pad), f64::from(pad));
        self.child.paint(&mut tmp, cb.at_origin(), frame_idx)?;

        let res = self.effect.run(tmp.into_image()?);
        let dx = (bounds.width() - res.width() as i32) / 2;
        let dy = (bounds.height() - res.height() as i32) / 2;
        canvas.draw_image(&res, f64::from(dx), f64::from(dy))
    }

    fn frame_count(&self, bounds: IRect) -> usize {
        self.child.frame_count(bounds)
    }

    fn fingerprint(&self, h: &mut CanonicalHasher) {
        h.write_tag("filtered");
        self.effect.fingerprint(h);
        self.child.fingerprint(h);
    }
}

/// Rotates the child (degrees, clockwise) about the center of its enlarged bounds.
pub struct Rotate {
    pub child: BoxedWidget,
    pub angle: f64,
}

impl Rotate {
    pub fn new(child: impl Widget + 'static, angle: f64) -> Self {
        Self {
            child: Box::new(child),
            angle,
        }
    }
}

impl Widget for Rotate {
    fn paint_bounds(&self, bounds: IRect, frame_idx: usize) -> IRect {
        let cb = self.child.paint_bounds(bounds, frame_idx);
        let rad = self.angle.to_radians();
        let (cos, sin) = (snap(rad.cos().abs()), snap(rad.sin().abs()));
        let (w, h) = (f64::from(cb.width()), f64::from(cb.height()));
        IRect::from_extent(w * cos + h * sin, w * sin + h * cos)
    }

    fn paint(&self, canvas: &mut Canvas, bounds: IRect, frame_idx: usize) -> LoomResult<()> {
        let cb = self.child.paint_bounds(bounds, frame_idx);
        let cx = f64::from(bounds.width()) / 2.0;
        let cy = f64::from(bounds.height()) / 2.0;

        canvas.push();
        canvas.translate(cx, cy);
        canvas.rotate(self.angle.to_radians());
        canvas.translate(-f64::from(cb.width()) / 2.0, -f64::from(cb.height()) / 2.0);
        let res = self.child.paint(canvas, cb.at_origin(), frame_idx);
        canvas.pop();
        res
    }

    fn frame_count(&self, bounds: IRect) -> usize {
        self.child.frame_count(bounds)
    }

    fn fingerprint(&self, h: &mut CanonicalHasher) {
        h.write_tag("rotate");
        h.write_f64(self.angle);
        self.child.fingerprint(h);
    }
}

fn snap(v: f64) -> f64 {
    if v < 1e-12 { 0.0 } else { v }
}

/// Shears the child by the given angles (degrees) about the center of its enlarged bounds.
pub struct Shear {
    pub child: BoxedWidget,
    pub x_angle: f64,
    pub y_angle: f64,
}

impl Shear {
    pub fn new(child: impl Widget + 'static, x_angle: f64, y_angle: f64) -> Self {
        Self {
            child: Box::new(child),
            x_angle,
            y_angle,
        }
    }

    fn factors(&self) -> (f64, f64) {
        let f = |deg: f64| if deg == 0.0 { 0.0 } else { deg.to_radians().tan() };
        (f(self.x_angle), f(self.y_angle))
    }
}

impl Widget for Shear {
    fn paint_bounds(&self, bounds: IRect, frame_idx: usize) -> IRect {
        let cb = self.child.paint_bounds(bounds, frame_idx);
        let (tx, ty) = self.factors();
        let (w, h) = (f64::from(cb.width()), f64::from(cb.height()));
        IRect::from_extent(w + h * tx.abs(), h + w * ty.abs())
    }

    fn paint(&self, canvas: &mut Canvas, bounds: IRect, frame_idx: usize) -> LoomResult<()> {
        let cb = self.child.paint_bounds(bounds, frame_idx);
        let (tx, ty) = self.factors();
        let cx = f64::from(bounds.width()) / 2.0;
        let cy = f64::from(bounds.height()) / 2.0;

        canvas.push();
        canvas.translate(cx, cy);
        canvas.shear(-tx, -ty);
        canvas.translate(-f64::from(cb.width()) / 2.0, -f64::from(cb.height()) / 2.0);
        let res = self.child.paint(canvas, cb.at_origin(), frame_idx);
        canvas.pop();
        res
    }

    fn frame_count(&self, bounds: IRect) -> usize {
        self.child.frame_count(bounds)
    }

    fn fingerprint(&self, h: &mut CanonicalHasher) {
        h.write_tag("shear");
        h.write_f64(self.x_angle);
        h.write_f64(self.y_angle);
        self.child.fingerprint(h);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/widget/filter.rs"]
mod tests;

use image::RgbaImage;

use crate::foundation::core::{IRect, Rgba8};
use crate::foundation::error::LoomResult;
use crate::foundation::math::{CanonicalHasher, rotate_hue};
use crate::render::canvas::Canvas;
use crate::widget::{BoxedWidget, Widget};

/// Per-pixel color adjustments applied to a child.
///
/// Stages run in a fixed order: invert, brightness, saturation, hue rotation, tint, opacity.
/// Unset (or negative) brightness, saturation and opacity mean 1.0. When no stage is active
/// the child is painted straight onto the parent canvas.
pub struct ColorTransform {
    pub child: BoxedWidget,
    pub brightness: Option<f64>,
    pub saturation: Option<f64>,
    /// Degrees; 0 leaves hue alone.
    pub hue_rotate: f64,
    pub opacity: Option<f64>,
    pub invert: bool,
    pub tint: Option<Rgba8>,
}

fn factor(v: Option<f64>) -> f64 {
    v.filter(|v| *v >= 0.0).unwrap_or(1.0)
}

impl ColorTransform {
    pub fn new(child: impl Widget + 'static) -> Self {
        Self {
            child: Box::new(child),
            brightness: None,
            saturation: None,
            hue_rotate: 0.0,
            opacity: None,
            invert: false,
            tint: None,
        }
    }

    pub fn with_brightness(mut self, v: f64) -> Self {
        self.brightness = Some(v);
        self
    }

    pub fn with_saturation(mut self, v: f64) -> Self {
        self.saturation = Some(v);
        self
    }

    pub fn with_hue_rotate(mut self, degrees: f64) -> Self {
        self.hue_rotate = degrees;
        self
    }

    pub fn with_opacity(mut self, v: f64) -> Self {
        self.opacity = Some(v);
        self
    }

    pub fn with_invert(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    pub fn with_tint(mut self, tint: Rgba8) -> Self {
        self.tint = Some(tint);
        self
    }

    pub fn is_passthrough(&self) -> bool {
        factor(self.brightness) == 1.0
            && factor(self.saturation) == 1.0
            && self.hue_rotate == 0.0
            && factor(self.opacity) == 1.0
            && !self.invert
            && self.tint.is_none()
    }

    /// Apply the active stages to every pixel of `img` in place.
    pub fn apply_to(&self, img: &mut RgbaImage) {
        let brightness = factor(self.brightness);
        let saturation = factor(self.saturation);
        let opacity = factor(self.opacity);
        let tint = self.tint.map(|t| {
            [
                f64::from(t.r) / 255.0,
                f64::from(t.g) / 255.0,
                f64::from(t.b) / 255.0,
            ]
        });

        for px in img.pixels_mut() {
            let [r, g, b, a] = px.0.map(|c| f64::from(c) / 255.0);
            let (mut r, mut g, mut b, mut a) = (r, g, b, a);

            if self.invert {
                r = 1.0 - r;
                g = 1.0 - g;
                b = 1.0 - b;
            }
            if brightness != 1.0 {
                r *= brightness;
                g *= brightness;
                b *= brightness;
            }
            if saturation != 1.0 {
                let gray = 0.299 * r + 0.587 * g + 0.114 * b;
                r = gray + saturation * (r - gray);
                g = gray + saturation * (g - gray);
                b = gray + saturation * (b - gray);
            }
            if self.hue_rotate != 0.0 {
                (r, g, b) = rotate_hue(r, g, b, self.hue_rotate);
            }
            if let Some([tr, tg, tb]) = tint {
                r *= tr;
                g *= tg;
                b *= tb;
            }
            if opacity != 1.0 {
                a *= opacity;
            }

            px.0 = [unit_to_u8(r), unit_to_u8(g), unit_to_u8(b), unit_to_u8(a)];
        }
    }
}

impl Widget for ColorTransform {
    fn paint_bounds(&self, bounds: IRect, frame_idx: usize) -> IRect {
        self.child.paint_bounds(bounds, frame_idx)
    }

    fn paint(&self, canvas: &mut Canvas, bounds: IRect, frame_idx: usize) -> LoomResult<()> {
        if self.is_passthrough() {
            return self.child.paint(canvas, bounds, frame_idx);
        }
        let cb = self.child.paint_bounds(bounds, frame_idx);
        if cb.is_empty() {
            return Ok(());
        }
        let mut tmp = Canvas::for_bounds(cb)?;
        self.child.paint(&mut tmp, bounds, frame_idx)?;
        let mut img = tmp.into_image()?;
        self.apply_to(&mut img);
        canvas.draw_image(&img, 0.0, 0.0)
    }

    fn frame_count(&self, bounds: IRect) -> usize {
        self.child.frame_count(bounds)
    }

    fn fingerprint(&self, h: &mut CanonicalHasher) {
        h.write_tag("color_transform");
        self.child.fingerprint(h);
        h.write_opt_f64(self.brightness);
        h.write_opt_f64(self.saturation);
        h.write_f64(self.hue_rotate);
        h.write_opt_f64(self.opacity);
        h.write_bool(self.invert);
        match self.tint {
            Some(t) => {
                h.write_u8(1);
                h.write_raw(&t.to_array());
            }
            None => h.write_u8(0),
        }
    }
}

/// Clamp to [0, 1] and scale to a byte, truncating.
fn unit_to_u8(v: f64) -> u8 {
    if v <= 0.0 {
        0
    } else if v >= 1.0 {
        255
    } else {
        (v * 255.0) as u8
    }
}

#[cfg(test)]
#[path = "../../tests/unit/widget/color_transform.rs"]
mod tests;

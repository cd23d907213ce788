use image::{RgbaImage, imageops};

use crate::effects::color_filter::{ColorFilter, Matrix3};
use crate::foundation::error::{LoomError, LoomResult};
use crate::foundation::math::{CanonicalHasher, hsl_to_rgb, rgb_to_hsl};

/// Pure frame-to-frame transform that may fail.
pub trait ImageFilter: Send + Sync {
    fn name(&self) -> &str;

    fn apply(&self, img: RgbaImage) -> LoomResult<RgbaImage>;
}

const MAX_OUTPUT_SIDE: u32 = u16::MAX as u32;

/// Nearest-neighbour upscale by an integer factor; factors 0 and 1 pass the frame through.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Magnify(pub u32);

impl ImageFilter for Magnify {
    fn name(&self) -> &str {
        "magnify"
    }

    fn apply(&self, img: RgbaImage) -> LoomResult<RgbaImage> {
        let factor = self.0;
        if factor <= 1 {
            return Ok(img);
        }
        let (w, h) = img.dimensions();
        let (ow, oh) = match (w.checked_mul(factor), h.checked_mul(factor)) {
            (Some(ow), Some(oh)) if ow <= MAX_OUTPUT_SIDE && oh <= MAX_OUTPUT_SIDE => (ow, oh),
            _ => {
                return Err(LoomError::validation(format!(
                    "magnify x{factor} of {w}x{h} exceeds {MAX_OUTPUT_SIDE}px per side"
                )));
            }
        };

        let mut out = RgbaImage::new(ow, oh);
        for (x, y, px) in img.enumerate_pixels() {
            for dy in 0..factor {
                for dx in 0..factor {
                    out.put_pixel(x * factor + dx, y * factor + dy, *px);
                }
            }
        }
        Ok(out)
    }
}

/// 3x3 matrix over the RGB channels; alpha is carried over untouched.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorMatrix(pub Matrix3);

impl From<ColorFilter> for ColorMatrix {
    fn from(f: ColorFilter) -> Self {
        Self(f.matrix())
    }
}

impl ColorMatrix {
    pub fn apply_in_place(&self, img: &mut RgbaImage) {
        let m = &self.0;
        for px in img.pixels_mut() {
            let [r, g, b, a] = px.0;
            let (r, g, b) = (f32::from(r), f32::from(g), f32::from(b));
            px.0 = [
                clamp_u8(m[0][0] * r + m[0][1] * g + m[0][2] * b),
                clamp_u8(m[1][0] * r + m[1][1] * g + m[1][2] * b),
                clamp_u8(m[2][0] * r + m[2][1] * g + m[2][2] * b),
                a,
            ];
        }
    }
}

impl ImageFilter for ColorMatrix {
    fn name(&self) -> &str {
        "color_matrix"
    }

    fn apply(&self, mut img: RgbaImage) -> LoomResult<RgbaImage> {
        self.apply_in_place(&mut img);
        Ok(img)
    }
}

/// Clamp to [0, 255], truncating the fraction.
fn clamp_u8(v: f32) -> u8 {
    if v <= 0.0 {
        0
    } else if v >= 255.0 {
        255
    } else {
        v as u8
    }
}

/// Format-agnostic pixel effects.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum PixelEffect {
    /// Gaussian blur with standard deviation `radius`.
    Blur { radius: f64 },
    /// Multiplicative brightness; -1 is black, 0 unchanged, 1 doubles every channel.
    Brightness { change: f64 },
    /// Contrast about mid-gray; 0 is unchanged, -1 flattens to gray.
    Contrast { factor: f64 },
    EdgeDetection { radius: f64 },
    Emboss,
    FlipHorizontal,
    FlipVertical,
    Gamma { gamma: f64 },
    Grayscale,
    /// Hue rotation in whole degrees.
    Hue { change: i32 },
    Invert,
    /// Relative saturation change; -1 removes all color.
    Saturation { factor: f64 },
    Sepia,
    Sharpen,
    /// Luma at or above `level` becomes white, everything else black.
    Threshold { level: u8 },
}

impl PixelEffect {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Blur { .. } => "blur",
            Self::Brightness { .. } => "brightness",
            Self::Contrast { .. } => "contrast",
            Self::EdgeDetection { .. } => "edge_detection",
            Self::Emboss => "emboss",
            Self::FlipHorizontal => "flip_horizontal",
            Self::FlipVertical => "flip_vertical",
            Self::Gamma { .. } => "gamma",
            Self::Grayscale => "grayscale",
            Self::Hue { .. } => "hue",
            Self::Invert => "invert",
            Self::Saturation { .. } => "saturation",
            Self::Sepia => "sepia",
            Self::Sharpen => "sharpen",
            Self::Threshold { .. } => "threshold",
        }
    }

    /// Extra pixels the effect needs on every side of its input, capped at the largest
    /// canvas side.
    pub fn padding(&self) -> i32 {
        match *self {
            Self::Blur { radius } if radius > 0.0 => {
                (radius * 3.0).ceil().min(f64::from(u16::MAX)) as i32
            }
            _ => 0,
        }
    }

    pub fn run(&self, mut img: RgbaImage) -> RgbaImage {
        match *self {
            Self::Blur { radius } => {
                if radius <= 0.0 {
                    img
                } else {
                    imageops::blur(&img, radius as f32)
                }
            }
            Self::Brightness { change } => {
                map_channels(&mut img, |c| c * (1.0 + change));
                img
            }
            Self::Contrast { factor } => {
                map_channels(&mut img, |c| ((c / 255.0 - 0.5) * (1.0 + factor) + 0.5) * 255.0);
                img
            }
            Self::EdgeDetection { radius } => {
                if radius <= 0.0 {
                    return img;
                }
                let side = (2.0 * radius + 1.0).ceil() as usize;
                let mut kernel = vec![-1.0f32; side * side];
                kernel[side * side / 2] = (side * side - 1) as f32;
                convolve(&img, &kernel, side, 0.0)
            }
            Self::Emboss => convolve(
                &img,
                &[-1.0, -1.0, 0.0, -1.0, 0.0, 1.0, 0.0, 1.0, 1.0],
                3,
                128.0,
            ),
            Self::FlipHorizontal => {
                imageops::flip_horizontal_in_place(&mut img);
                img
            }
            Self::FlipVertical => {
                imageops::flip_vertical_in_place(&mut img);
                img
            }
            Self::Gamma { gamma } => {
                let inv = 1.0 / gamma.max(1e-6);
                map_channels(&mut img, |c| (c / 255.0).powf(inv) * 255.0);
                img
            }
            Self::Grayscale => {
                ColorMatrix(ColorFilter::Bw.matrix()).apply_in_place(&mut img);
                img
            }
            Self::Hue { change } => {
                imageops::colorops::huerotate_in_place(&mut img, change);
                img
            }
            Self::Invert => {
                imageops::invert(&mut img);
                img
            }
            Self::Saturation { factor } => {
                for px in img.pixels_mut() {
                    let [r, g, b, a] = px.0;
                    let (h, s, l) = rgb_to_hsl(
                        f64::from(r) / 255.0,
                        f64::from(g) / 255.0,
                        f64::from(b) / 255.0,
                    );
                    let (r, g, b) = hsl_to_rgb(h, (s * (1.0 + factor)).clamp(0.0, 1.0), l);
                    px.0 = [unit_round(r), unit_round(g), unit_round(b), a];
                }
                img
            }
            Self::Sepia => {
                ColorMatrix(ColorFilter::Sepia.matrix()).apply_in_place(&mut img);
                img
            }
            Self::Sharpen => convolve(
                &img,
                &[0.0, -1.0, 0.0, -1.0, 5.0, -1.0, 0.0, -1.0, 0.0],
                3,
                0.0,
            ),
            Self::Threshold { level } => {
                for px in img.pixels_mut() {
                    let [r, g, b, a] = px.0;
                    let luma = 0.299 * f32::from(r) + 0.587 * f32::from(g) + 0.114 * f32::from(b);
                    let v = if luma as u8 >= level { 255 } else { 0 };
                    px.0 = [v, v, v, a];
                }
                img
            }
        }
    }

    pub(crate) fn fingerprint(&self, h: &mut CanonicalHasher) {
        h.write_tag(self.label());
        match *self {
            Self::Blur { radius: v }
            | Self::Brightness { change: v }
            | Self::Contrast { factor: v }
            | Self::EdgeDetection { radius: v }
            | Self::Gamma { gamma: v }
            | Self::Saturation { factor: v } => h.write_f64(v),
            Self::Hue { change } => h.write_i32(change),
            Self::Threshold { level } => h.write_u8(level),
            Self::Emboss
            | Self::FlipHorizontal
            | Self::FlipVertical
            | Self::Grayscale
            | Self::Invert
            | Self::Sepia
            | Self::Sharpen => {}
        }
    }
}

impl ImageFilter for PixelEffect {
    fn name(&self) -> &str {
        self.label()
    }

    fn apply(&self, img: RgbaImage) -> LoomResult<RgbaImage> {
        Ok(self.run(img))
    }
}

fn unit_round(v: f64) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Apply `f` to each RGB channel (as 0..=255 floats) through a lookup table.
fn map_channels(img: &mut RgbaImage, f: impl Fn(f64) -> f64) {
    let mut lut = [0u8; 256];
    for (i, slot) in lut.iter_mut().enumerate() {
        *slot = f(i as f64).round().clamp(0.0, 255.0) as u8;
    }
    for px in img.pixels_mut() {
        let [r, g, b, a] = px.0;
        px.0 = [lut[r as usize], lut[g as usize], lut[b as usize], a];
    }
}

/// Square-kernel convolution over RGB with clamped edges; alpha is kept.
fn convolve(img: &RgbaImage, kernel: &[f32], side: usize, bias: f32) -> RgbaImage {
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 {
        return img.clone();
    }
    let half = (side / 2) as i64;
    let mut out = RgbaImage::new(w, h);
    for (x, y, dst) in out.enumerate_pixels_mut() {
        let mut acc = [bias; 3];
        for ky in 0..side {
            for kx in 0..side {
                let sx = (i64::from(x) + kx as i64 - half).clamp(0, i64::from(w) - 1) as u32;
                let sy = (i64::from(y) + ky as i64 - half).clamp(0, i64::from(h) - 1) as u32;
                let k = kernel[ky * side + kx];
                let src = img.get_pixel(sx, sy).0;
                for c in 0..3 {
                    acc[c] += k * f32::from(src[c]);
                }
            }
        }
        let a = img.get_pixel(x, y).0[3];
        dst.0 = [clamp_u8(acc[0]), clamp_u8(acc[1]), clamp_u8(acc[2]), a];
    }
    out
}

/// Ordered composition of filters: `chain(f1..fn)(img) = fn(..f1(img))`.
#[derive(Default)]
pub struct FilterChain {
    filters: Vec<Box<dyn ImageFilter>>,
}

impl std::fmt::Debug for FilterChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.filters.iter().map(|x| x.name()))
            .finish()
    }
}

impl FilterChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, filter: impl ImageFilter + 'static) -> Self {
        self.push(filter);
        self
    }

    pub fn push(&mut self, filter: impl ImageFilter + 'static) {
        self.filters.push(Box::new(filter));
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.filters.iter().map(|f| f.name()).collect()
    }

    /// Run every stage in order, stopping at the first failure.
    pub fn apply(&self, img: RgbaImage) -> LoomResult<RgbaImage> {
        self.filters
            .iter()
            .enumerate()
            .try_fold(img, |img, (i, f)| {
                f.apply(img).map_err(|e| e.in_filter(i, f.name()))
            })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/image_filter.rs"]
mod tests;

use crate::foundation::error::{LoomError, LoomResult};

pub use kurbo::{Affine, BezPath, Point, Vec2};

/// Integer pixel rectangle, half-open on the max edges.
///
/// Paint bounds are always anchored at the local origin, so most values built by widgets have
/// `x0 == y0 == 0`.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct IRect {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl IRect {
    pub const EMPTY: Self = Self {
        x0: 0,
        y0: 0,
        x1: 0,
        y1: 0,
    };

    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn from_size(width: i32, height: i32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Rectangle anchored at the origin whose size is the ceiling of `width` x `height`.
    pub fn from_extent(width: f64, height: f64) -> Self {
        Self::from_size(ceil_px(width), ceil_px(height))
    }

    pub fn width(self) -> i32 {
        (self.x1 - self.x0).max(0)
    }

    pub fn height(self) -> i32 {
        (self.y1 - self.y0).max(0)
    }

    pub fn is_empty(self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Same size, anchored at the origin.
    pub fn at_origin(self) -> Self {
        Self::from_size(self.width(), self.height())
    }
}

fn ceil_px(v: f64) -> i32 {
    if v.is_finite() {
        v.ceil().clamp(0.0, f64::from(i32::MAX)) as i32
    } else {
        0
    }
}

/// Straight (non-premultiplied) RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Parse `#rgb`, `#rgba`, `#rrggbb` or `#rrggbbaa` (the `#` is optional).
    pub fn from_hex(s: &str) -> LoomResult<Self> {
        let hex = s.trim().trim_start_matches('#');
        let bad = || LoomError::validation(format!("invalid color {s:?}"));
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(bad());
        }
        let nibble = |i: usize| -> LoomResult<u8> {
            u8::from_str_radix(&hex[i..=i], 16)
                .map(|v| v * 17)
                .map_err(|_| bad())
        };
        let byte = |i: usize| -> LoomResult<u8> {
            u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| bad())
        };
        match hex.len() {
            3 => Ok(Self::rgb(nibble(0)?, nibble(1)?, nibble(2)?)),
            4 => Ok(Self::new(nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?)),
            6 => Ok(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Ok(Self::new(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => Err(bad()),
        }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn premultiplied(self) -> Rgba8Premul {
        Rgba8Premul::from_straight_rgba(self.r, self.g, self.b, self.a)
    }
}

impl From<image::Rgba<u8>> for Rgba8 {
    fn from(px: image::Rgba<u8>) -> Self {
        let [r, g, b, a] = px.0;
        Self::new(r, g, b, a)
    }
}

impl From<Rgba8> for image::Rgba<u8> {
    fn from(c: Rgba8) -> Self {
        image::Rgba(c.to_array())
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8Premul {
    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: premul_u8(r, a),
            g: premul_u8(g, a),
            b: premul_u8(b, a),
            a,
        }
    }

    pub fn to_straight(self) -> Rgba8 {
        Rgba8::new(
            unpremul_u8(self.r, self.a),
            unpremul_u8(self.g, self.a),
            unpremul_u8(self.b, self.a),
            self.a,
        )
    }
}

pub(crate) fn premul_u8(c: u8, a: u8) -> u8 {
    (((u16::from(c) * u16::from(a)) + 127) / 255) as u8
}

pub(crate) fn unpremul_u8(c: u8, a: u8) -> u8 {
    if a == 0 {
        return 0;
    }
    let v = (u32::from(c) * 255 + u32::from(a) / 2) / u32::from(a);
    v.min(255) as u8
}

/// Output surface description: logical size plus the 2x flag.
///
/// When `is_2x` is set, widgets are painted onto a canvas twice the logical size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct CanvasMeta {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub is_2x: bool,
}

impl Default for CanvasMeta {
    fn default() -> Self {
        Self {
            width: 64,
            height: 32,
            is_2x: false,
        }
    }
}

impl CanvasMeta {
    pub fn new(width: u32, height: u32) -> LoomResult<Self> {
        if width == 0 || height == 0 {
            return Err(LoomError::validation("canvas width and height must be > 0"));
        }
        let meta = Self {
            width,
            height,
            is_2x: false,
        };
        meta.check_raster_size()?;
        Ok(meta)
    }

    pub fn with_2x(mut self, is_2x: bool) -> LoomResult<Self> {
        self.is_2x = is_2x;
        self.check_raster_size()?;
        Ok(self)
    }

    pub fn scale(self) -> u32 {
        if self.is_2x { 2 } else { 1 }
    }

    pub fn scaled_width(self) -> u32 {
        self.width * self.scale()
    }

    pub fn scaled_height(self) -> u32 {
        self.height * self.scale()
    }

    /// Paint bounds of the full (scaled) canvas.
    pub fn bounds(self) -> IRect {
        IRect::from_size(self.scaled_width() as i32, self.scaled_height() as i32)
    }

    fn check_raster_size(self) -> LoomResult<()> {
        let limit = u32::from(u16::MAX);
        if self.width.saturating_mul(self.scale()) > limit
            || self.height.saturating_mul(self.scale()) > limit
        {
            return Err(LoomError::validation(format!(
                "canvas {}x{} exceeds the {limit}px raster limit",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;

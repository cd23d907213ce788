use crate::foundation::core::{IRect, Point, Vec2};
use crate::foundation::math::{CanonicalHasher, lerp};
use crate::render::canvas::Canvas;

/// One geometric step of an animation state.
///
/// Angles are in degrees. Rotate, Scale and Shear act about the origin handed to
/// [`Transform::apply`]; Translate ignores it and snaps through the [`Rounding`] policy.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Transform {
    Translate { x: f64, y: f64 },
    Rotate { angle: f64 },
    Scale { x: f64, y: f64 },
    Shear { x_angle: f64, y_angle: f64 },
}

impl Transform {
    pub const TRANSLATE_DEFAULT: Self = Self::Translate { x: 0.0, y: 0.0 };
    pub const ROTATE_DEFAULT: Self = Self::Rotate { angle: 0.0 };
    pub const SCALE_DEFAULT: Self = Self::Scale { x: 1.0, y: 1.0 };
    pub const SHEAR_DEFAULT: Self = Self::Shear {
        x_angle: 0.0,
        y_angle: 0.0,
    };

    /// The no-op value of the same variant.
    pub fn identity(&self) -> Self {
        match self {
            Self::Translate { .. } => Self::TRANSLATE_DEFAULT,
            Self::Rotate { .. } => Self::ROTATE_DEFAULT,
            Self::Scale { .. } => Self::SCALE_DEFAULT,
            Self::Shear { .. } => Self::SHEAR_DEFAULT,
        }
    }

    pub fn same_variant(&self, other: &Self) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    /// Linear interpolation towards `other`.
    ///
    /// Mismatched variants yield `(self.identity(), false)`: callers skip the pair instead of
    /// animating across a type change.
    pub fn interpolate(&self, other: &Self, progress: f64) -> (Self, bool) {
        let t = progress;
        match (*self, *other) {
            (Self::Translate { x: ax, y: ay }, Self::Translate { x: bx, y: by }) => (
                Self::Translate {
                    x: lerp(ax, bx, t),
                    y: lerp(ay, by, t),
                },
                true,
            ),
            (Self::Rotate { angle: a }, Self::Rotate { angle: b }) => {
                (Self::Rotate { angle: lerp(a, b, t) }, true)
            }
            (Self::Scale { x: ax, y: ay }, Self::Scale { x: bx, y: by }) => (
                Self::Scale {
                    x: lerp(ax, bx, t),
                    y: lerp(ay, by, t),
                },
                true,
            ),
            (
                Self::Shear {
                    x_angle: ax,
                    y_angle: ay,
                },
                Self::Shear {
                    x_angle: bx,
                    y_angle: by,
                },
            ) => (
                Self::Shear {
                    x_angle: lerp(ax, bx, t),
                    y_angle: lerp(ay, by, t),
                },
                true,
            ),
            _ => (self.identity(), false),
        }
    }

    pub fn apply(&self, canvas: &mut Canvas, origin: Vec2, rounding: Rounding) {
        let pivot = Point::new(origin.x, origin.y);
        match *self {
            Self::Translate { x, y } => canvas.translate(rounding.apply(x), rounding.apply(y)),
            Self::Rotate { angle } => canvas.rotate_about(angle.to_radians(), pivot),
            Self::Scale { x, y } => canvas.scale_about(x, y, pivot),
            // The radian value itself is the skew factor.
            Self::Shear { x_angle, y_angle } => {
                canvas.shear_about(x_angle.to_radians(), y_angle.to_radians(), pivot)
            }
        }
    }

    pub(crate) fn fingerprint(&self, h: &mut CanonicalHasher) {
        match *self {
            Self::Translate { x, y } => {
                h.write_u8(0);
                h.write_f64(x);
                h.write_f64(y);
            }
            Self::Rotate { angle } => {
                h.write_u8(1);
                h.write_f64(angle);
            }
            Self::Scale { x, y } => {
                h.write_u8(2);
                h.write_f64(x);
                h.write_f64(y);
            }
            Self::Shear { x_angle, y_angle } => {
                h.write_u8(3);
                h.write_f64(x_angle);
                h.write_f64(y_angle);
            }
        }
    }
}

/// Relative anchor for rotate/scale/shear, as fractions of the target bounds.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Origin {
    pub x: f64,
    pub y: f64,
}

impl Default for Origin {
    fn default() -> Self {
        Self { x: 0.5, y: 0.5 }
    }
}

impl Origin {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Absolute pivot point inside `bounds`.
    pub fn resolve(self, bounds: IRect) -> Vec2 {
        Vec2::new(
            self.x * f64::from(bounds.width()),
            self.y * f64::from(bounds.height()),
        )
    }
}

/// Snapping rule for translation offsets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rounding {
    #[default]
    Round,
    Floor,
    Ceil,
    None,
}

impl Rounding {
    pub fn apply(self, v: f64) -> f64 {
        match self {
            Self::Round => v.round(),
            Self::Floor => v.floor(),
            Self::Ceil => v.ceil(),
            Self::None => v,
        }
    }
}

/// Progress held outside an animation's active range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillMode {
    #[default]
    Forwards,
    Backwards,
}

impl FillMode {
    pub fn value(self) -> f64 {
        match self {
            Self::Forwards => 1.0,
            Self::Backwards => 0.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    Normal,
    Reverse,
    Alternate,
    AlternateReverse,
}

impl Direction {
    pub fn is_alternating(self) -> bool {
        matches!(self, Self::Alternate | Self::AlternateReverse)
    }

    fn tag(self) -> u8 {
        match self {
            Self::Normal => 0,
            Self::Reverse => 1,
            Self::Alternate => 2,
            Self::AlternateReverse => 3,
        }
    }
}

pub(crate) fn fingerprint_policies(
    h: &mut CanonicalHasher,
    origin: Origin,
    rounding: Rounding,
    fill: FillMode,
    direction: Direction,
) {
    h.write_f64(origin.x);
    h.write_f64(origin.y);
    h.write_u8(rounding as u8);
    h.write_u8(fill as u8);
    h.write_u8(direction.tag());
}

#[cfg(test)]
#[path = "../../tests/unit/animation/transform.rs"]
mod tests;

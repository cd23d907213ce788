use crate::foundation::error::{LoomError, LoomResult};

/// Timing curve applied to keyframe-segment progress.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Curve {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    CubicBezier {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    },
}

impl Curve {
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseIn => cubic_bezier_ease(t, 0.42, 0.0, 1.0, 1.0),
            Self::EaseOut => cubic_bezier_ease(t, 0.0, 0.0, 0.58, 1.0),
            Self::EaseInOut => cubic_bezier_ease(t, 0.42, 0.0, 0.58, 1.0),
            Self::CubicBezier { x1, y1, x2, y2 } => cubic_bezier_ease(t, x1, y1, x2, y2),
        }
    }

    pub(crate) fn fingerprint(self, h: &mut crate::foundation::math::CanonicalHasher) {
        match self {
            Self::Linear => h.write_u8(0),
            Self::EaseIn => h.write_u8(1),
            Self::EaseOut => h.write_u8(2),
            Self::EaseInOut => h.write_u8(3),
            Self::CubicBezier { x1, y1, x2, y2 } => {
                h.write_u8(4);
                for v in [x1, y1, x2, y2] {
                    h.write_f64(v);
                }
            }
        }
    }
}

impl std::str::FromStr for Curve {
    type Err = LoomError;

    /// Accepts `linear`, `ease_in`, `ease_out`, `ease_in_out` and `cubic-bezier(a, b, c, d)`.
    fn from_str(s: &str) -> LoomResult<Self> {
        let s = s.trim();
        match s {
            "linear" => return Ok(Self::Linear),
            "ease_in" => return Ok(Self::EaseIn),
            "ease_out" => return Ok(Self::EaseOut),
            "ease_in_out" => return Ok(Self::EaseInOut),
            _ => {}
        }

        let args = s
            .strip_prefix("cubic-bezier(")
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| LoomError::validation(format!("unknown curve {s:?}")))?;
        let vals = args
            .split(',')
            .map(|v| v.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| LoomError::validation(format!("curve {s:?}: {e}")))?;
        let [x1, y1, x2, y2] = vals[..] else {
            return Err(LoomError::validation(format!(
                "curve {s:?}: cubic-bezier takes 4 values, got {}",
                vals.len()
            )));
        };
        if !(0.0..=1.0).contains(&x1) || !(0.0..=1.0).contains(&x2) {
            return Err(LoomError::validation(format!(
                "curve {s:?}: x control points must be within [0, 1]"
            )));
        }
        Ok(Self::CubicBezier { x1, y1, x2, y2 })
    }
}

fn cubic_bezier_ease(x: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }
    // Solve u such that bx(u) = x, then return by(u).
    fn sample_curve(a1: f64, a2: f64, t: f64) -> f64 {
        let omt = 1.0 - t;
        3.0 * omt * omt * t * a1 + 3.0 * omt * t * t * a2 + t * t * t
    }
    fn sample_curve_derivative(a1: f64, a2: f64, t: f64) -> f64 {
        let omt = 1.0 - t;
        3.0 * omt * omt * a1 + 6.0 * omt * t * (a2 - a1) + 3.0 * t * t * (1.0 - a2)
    }

    let mut t = x;
    for _ in 0..8 {
        let x_t = sample_curve(x1, x2, t) - x;
        let d = sample_curve_derivative(x1, x2, t);
        if d.abs() < 1e-7 {
            break;
        }
        t = (t - x_t / d).clamp(0.0, 1.0);
    }

    let mut lo = 0.0;
    let mut hi = 1.0;
    for _ in 0..8 {
        let x_t = sample_curve(x1, x2, t);
        if x_t < x {
            lo = t;
        } else {
            hi = t;
        }
        t = 0.5 * (lo + hi);
    }

    sample_curve(y1, y2, t)
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;

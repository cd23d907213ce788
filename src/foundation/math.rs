use sha2::{Digest, Sha256};

pub(crate) fn lerp(a: f64, b: f64, t: f64) -> f64 {
    if t == 1.0 {
        return b;
    }
    a + (b - a) * t
}

/// Rotate the hue of a unit-range RGB triple by `degrees` through HSL.
pub(crate) fn rotate_hue(r: f64, g: f64, b: f64, degrees: f64) -> (f64, f64, f64) {
    let (h, s, l) = rgb_to_hsl(r, g, b);
    hsl_to_rgb((h + degrees).rem_euclid(360.0), s, l)
}

pub(crate) fn rgb_to_hsl(r: f64, g: f64, b: f64) -> (f64, f64, f64) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;
    if max == min {
        return (0.0, 0.0, l);
    }

    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };
    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };
    (h * 60.0, s, l)
}

pub(crate) fn hsl_to_rgb(h: f64, s: f64, l: f64) -> (f64, f64, f64) {
    if s == 0.0 {
        return (l, l, l);
    }
    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    (
        hue_to_channel(p, q, h + 120.0),
        hue_to_channel(p, q, h),
        hue_to_channel(p, q, h - 120.0),
    )
}

fn hue_to_channel(p: f64, q: f64, t: f64) -> f64 {
    let t = t.rem_euclid(360.0);
    if t < 60.0 {
        p + (q - p) * t / 60.0
    } else if t < 180.0 {
        q
    } else if t < 240.0 {
        p + (q - p) * (240.0 - t) / 60.0
    } else {
        p
    }
}

/// Order-sensitive SHA-256 stream used for content addressing.
///
/// Every value is written in a fixed little-endian encoding; strings and byte blobs carry a
/// length prefix so adjacent fields cannot alias.
#[derive(Clone, Debug, Default)]
pub struct CanonicalHasher {
    inner: Sha256,
}

impl CanonicalHasher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_raw(&mut self, b: &[u8]) {
        self.inner.update(b);
    }

    pub fn write_bytes(&mut self, b: &[u8]) {
        self.write_u64(b.len() as u64);
        self.write_raw(b);
    }

    pub fn write_str(&mut self, s: &str) {
        self.write_bytes(s.as_bytes());
    }

    /// Type tag for the value that follows.
    pub fn write_tag(&mut self, tag: &str) {
        self.write_str(tag);
    }

    pub fn write_u8(&mut self, v: u8) {
        self.write_raw(&[v]);
    }

    pub fn write_bool(&mut self, v: bool) {
        self.write_u8(u8::from(v));
    }

    pub fn write_u32(&mut self, v: u32) {
        self.write_raw(&v.to_le_bytes());
    }

    pub fn write_i32(&mut self, v: i32) {
        self.write_raw(&v.to_le_bytes());
    }

    pub fn write_u64(&mut self, v: u64) {
        self.write_raw(&v.to_le_bytes());
    }

    pub fn write_f32(&mut self, v: f32) {
        self.write_u32(v.to_bits());
    }

    pub fn write_f64(&mut self, v: f64) {
        self.write_u64(v.to_bits());
    }

    pub fn write_opt_f64(&mut self, v: Option<f64>) {
        match v {
            Some(v) => {
                self.write_u8(1);
                self.write_f64(v);
            }
            None => self.write_u8(0),
        }
    }

    pub fn finish(self) -> [u8; 32] {
        self.inner.finalize().into()
    }
}

/// Lowercase hex rendering of a digest.
pub fn hex_digest(digest: &[u8]) -> String {
    use std::fmt::Write as _;

    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest {
        let _ = write!(out, "{b:02x}");
    }
    out
}

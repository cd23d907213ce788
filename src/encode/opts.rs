use std::ops::RangeInclusive;

pub const WEBP_LEVEL_ENV: &str = "FRAMELOOM_WEBP_LEVEL";
pub const GIF_SPEED_ENV: &str = "FRAMELOOM_GIF_SPEED";
pub const AVIF_SPEED_ENV: &str = "FRAMELOOM_AVIF_SPEED";
pub const AVIF_QUALITY_ENV: &str = "FRAMELOOM_AVIF_QUALITY";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WebpOpts {
    /// 0 loops forever.
    pub loop_count: u16,
    pub background_rgba: [u8; 4],
    /// Lossless effort preset, 0 (fastest) to 9 (smallest output).
    pub level: u8,
}

impl Default for WebpOpts {
    fn default() -> Self {
        Self {
            loop_count: 0,
            background_rgba: [0, 0, 0, 0],
            level: 6,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GifOpts {
    /// Palette quantization speed, 1 (best) to 30 (fastest).
    pub speed: i32,
}

impl Default for GifOpts {
    fn default() -> Self {
        Self { speed: 10 }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AvifOpts {
    /// 0 (slowest, best) to 10 (fastest).
    pub speed: u8,
    /// 0 to 100; 100 is lossless.
    pub quality: u8,
}

impl Default for AvifOpts {
    fn default() -> Self {
        Self {
            speed: 0,
            quality: 100,
        }
    }
}

/// Codec settings for every output format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EncodeOpts {
    pub webp: WebpOpts,
    pub gif: GifOpts,
    pub avif: AvifOpts,
}

impl EncodeOpts {
    /// Defaults with `FRAMELOOM_*` environment overrides applied.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`EncodeOpts::from_env`] but reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut opts = Self::default();
        opts.webp.level =
            override_in_range(WEBP_LEVEL_ENV, lookup(WEBP_LEVEL_ENV), 0..=9, opts.webp.level);
        opts.gif.speed =
            override_in_range(GIF_SPEED_ENV, lookup(GIF_SPEED_ENV), 1..=30, opts.gif.speed);
        opts.avif.speed =
            override_in_range(AVIF_SPEED_ENV, lookup(AVIF_SPEED_ENV), 0..=10, opts.avif.speed);
        opts.avif.quality = override_in_range(
            AVIF_QUALITY_ENV,
            lookup(AVIF_QUALITY_ENV),
            0..=100,
            opts.avif.quality,
        );
        opts
    }
}

fn override_in_range<T>(
    name: &str,
    raw: Option<String>,
    range: RangeInclusive<T>,
    default: T,
) -> T
where
    T: std::str::FromStr + PartialOrd + Copy + std::fmt::Display,
{
    let Some(raw) = raw else {
        return default;
    };
    match raw.trim().parse::<T>() {
        Ok(v) if range.contains(&v) => v,
        _ => {
            tracing::warn!(
                var = name,
                value = %raw,
                min = %range.start(),
                max = %range.end(),
                "invalid encoder override; using default {default}"
            );
            default
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/opts.rs"]
mod tests;

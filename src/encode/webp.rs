//! Lossless WebP output through libwebp.
//!
//! A single frame (or a run of identical frames, which libwebp collapses anyway) becomes a
//! plain still file. Anything else goes through the libwebp animation encoder with one
//! timestamp per budgeted frame.

use image::RgbaImage;
use webp::{AnimEncoder, AnimFrame, Encoder, PixelLayout, WebPConfig};

use crate::encode::opts::WebpOpts;
use crate::encode::sink::{FrameSink, SinkConfig, check_frame_size};
use crate::foundation::error::{LoomError, LoomResult};

/// libwebp's lossless presets as (method, quality), indexed by level 0..=9.
const LOSSLESS_PRESETS: [(i32, f32); 10] = [
    (0, 0.0),
    (1, 20.0),
    (2, 25.0),
    (3, 30.0),
    (3, 50.0),
    (4, 50.0),
    (4, 75.0),
    (4, 90.0),
    (5, 90.0),
    (6, 100.0),
];
const MAX_SIDE: u32 = 16_383;

pub struct WebpSink {
    opts: WebpOpts,
    cfg: Option<SinkConfig>,
    frames: Vec<(RgbaImage, u32)>,
}

impl WebpSink {
    pub fn new(opts: WebpOpts) -> Self {
        Self {
            opts,
            cfg: None,
            frames: Vec::new(),
        }
    }
}

impl FrameSink for WebpSink {
    fn begin(&mut self, cfg: SinkConfig) -> LoomResult<()> {
        if cfg.width == 0 || cfg.height == 0 || cfg.width > MAX_SIDE || cfg.height > MAX_SIDE {
            return Err(LoomError::codec(format!(
                "webp canvas {}x{} is out of range",
                cfg.width, cfg.height
            )));
        }
        self.cfg = Some(cfg);
        self.frames.clear();
        Ok(())
    }

    fn push_frame(&mut self, frame: &RgbaImage, duration_ms: u32) -> LoomResult<()> {
        check_frame_size(self.cfg, frame)?;
        self.frames.push((frame.clone(), duration_ms));
        Ok(())
    }

    fn finish(&mut self) -> LoomResult<Vec<u8>> {
        let Some(cfg) = self.cfg else {
            return Err(LoomError::codec("webp finish before begin"));
        };
        let frames = std::mem::take(&mut self.frames);
        let Some((first, _)) = frames.first() else {
            return Ok(Vec::new());
        };
        let config = lossless_config(self.opts.level)?;
        if frames.iter().all(|(img, _)| img == first) {
            return encode_still(first, &config);
        }
        encode_animation(cfg, &frames, &config, self.opts)
    }
}

/// Lossless config for `level` (0 fastest, 9 smallest), the same table as
/// `WebPConfigLosslessPreset`.
pub(crate) fn lossless_config(level: u8) -> LoomResult<WebPConfig> {
    let (method, quality) = *LOSSLESS_PRESETS
        .get(usize::from(level))
        .ok_or_else(|| LoomError::validation(format!("webp level {level} is not in 0..=9")))?;
    let mut config =
        WebPConfig::new().map_err(|()| LoomError::codec("libwebp rejected the default config"))?;
    config.lossless = 1;
    config.method = method;
    config.quality = quality;
    config.exact = 1;
    Ok(config)
}

fn encode_still(frame: &RgbaImage, config: &WebPConfig) -> LoomResult<Vec<u8>> {
    let encoder = Encoder::new(frame.as_raw(), PixelLayout::Rgba, frame.width(), frame.height());
    let mem = encoder
        .encode_advanced(config)
        .map_err(|err| LoomError::codec(format!("webp encoding failed: {err:?}")))?;
    Ok(mem.to_vec())
}

fn encode_animation(
    cfg: SinkConfig,
    frames: &[(RgbaImage, u32)],
    config: &WebPConfig,
    opts: WebpOpts,
) -> LoomResult<Vec<u8>> {
    let total: u64 = frames.iter().map(|(_, ms)| u64::from(*ms)).sum();
    let total = i32::try_from(total)
        .map_err(|_| LoomError::codec(format!("webp animation of {total} ms is too long")))?;

    let mut anim = AnimEncoder::new(cfg.width, cfg.height, config);
    anim.set_loop_count(i32::from(opts.loop_count));
    // Packed little-endian with the first byte landing in the blue slot.
    let [r, g, b, a] = opts.background_rgba;
    anim.set_bgcolor([b, g, r, a]);

    // The encoder closes the stream with an end timestamp of 0, so frames are stamped
    // counting up from -total and the last one ends exactly at 0.
    let mut start = -total;
    for (img, ms) in frames {
        anim.add_frame(AnimFrame::from_rgba(
            img.as_raw(),
            img.width(),
            img.height(),
            start,
        ));
        start += *ms as i32;
    }
    let mem = anim
        .try_encode()
        .map_err(|err| LoomError::codec(format!("webp animation failed: {err:?}")))?;
    Ok(mem.to_vec())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/webp.rs"]
mod tests;

use std::num::NonZeroUsize;

use image::RgbaImage;
use libavif::{AddImageFlags, Encoder, RgbPixels, YuvFormat};

use crate::encode::opts::AvifOpts;
use crate::encode::sink::{FrameSink, SinkConfig, check_frame_size};
use crate::foundation::error::{LoomError, LoomResult};

/// Durations are handed to libavif in milliseconds.
const TIMESCALE_HZ: u64 = 1000;

/// AVIF output through libavif. One frame is written as a still image, more as an image
/// sequence with a per-frame duration.
pub struct AvifSink {
    opts: AvifOpts,
    cfg: Option<SinkConfig>,
    frames: Vec<(RgbaImage, u32)>,
}

impl AvifSink {
    pub fn new(opts: AvifOpts) -> Self {
        Self {
            opts,
            cfg: None,
            frames: Vec::new(),
        }
    }
}

impl FrameSink for AvifSink {
    fn begin(&mut self, cfg: SinkConfig) -> LoomResult<()> {
        if cfg.width == 0 || cfg.height == 0 {
            return Err(LoomError::codec(format!(
                "avif canvas {}x{} is empty",
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
        let frames = std::mem::take(&mut self.frames);
        if frames.is_empty() {
            return Ok(Vec::new());
        }

        let threads = std::thread::available_parallelism().map_or(1, NonZeroUsize::get);
        let mut encoder = Encoder::new();
        encoder
            .set_max_threads(threads)
            .set_speed(self.opts.speed)
            .set_quality(self.opts.quality)
            .set_alpha_quality(self.opts.quality)
            .set_timescale(TIMESCALE_HZ);

        let flags = if frames.len() == 1 {
            AddImageFlags::SINGLE
        } else {
            AddImageFlags::NONE
        };
        for (img, ms) in &frames {
            let rgba = RgbPixels::new(img.width(), img.height(), img.as_raw())
                .map_err(|err| LoomError::codec(format!("avif frame rejected: {err}")))?;
            let yuv = rgba.to_image(YuvFormat::Yuv444);
            encoder
                .add_image(&yuv, u64::from(*ms), flags)
                .map_err(|err| LoomError::codec(format!("adding avif frame: {err}")))?;
        }
        let data = encoder
            .finish()
            .map_err(|err| LoomError::codec(format!("encoding avif: {err}")))?;
        tracing::debug!(frames = frames.len(), bytes = data.len(), "encoded avif");
        Ok(data.to_vec())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/avif.rs"]
mod tests;

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, RgbaImage};

use crate::encode::opts::GifOpts;
use crate::encode::sink::{FrameSink, SinkConfig, check_frame_size};
use crate::foundation::error::{LoomError, LoomResult};

/// Palette GIF output. The codec quantizes each frame; delays are stored in whole
/// centiseconds, rounded down but never below one for a non-zero duration.
pub struct GifSink {
    opts: GifOpts,
    cfg: Option<SinkConfig>,
    frames: Vec<(RgbaImage, u32)>,
}

impl GifSink {
    pub fn new(opts: GifOpts) -> Self {
        Self {
            opts,
            cfg: None,
            frames: Vec::new(),
        }
    }
}

impl FrameSink for GifSink {
    fn begin(&mut self, cfg: SinkConfig) -> LoomResult<()> {
        if cfg.width > u32::from(u16::MAX) || cfg.height > u32::from(u16::MAX) {
            return Err(LoomError::codec(format!(
                "gif canvas {}x{} is out of range",
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
        if self.frames.is_empty() {
            return Ok(Vec::new());
        }
        let mut out = Vec::new();
        {
            let mut enc = GifEncoder::new_with_speed(&mut out, self.opts.speed);
            enc.set_repeat(Repeat::Infinite)?;
            for (img, ms) in self.frames.drain(..) {
                // A 0 delay plays as roughly 100 ms in most viewers.
                let centis = if ms > 0 { (ms / 10).max(1) } else { 0 };
                let delay = Delay::from_numer_denom_ms(centis * 10, 1);
                enc.encode_frame(Frame::from_parts(img, 0, 0, delay))?;
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/gif.rs"]
mod tests;

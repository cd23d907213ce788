use image::RgbaImage;

use crate::foundation::error::{LoomError, LoomResult};

/// What a sink learns before the first frame arrives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SinkConfig {
    pub width: u32,
    pub height: u32,
    /// Frames that will be pushed, after duration budgeting.
    pub frame_count: usize,
}

/// Codec backend fed one frame at a time by [`crate::Screens::encode_with`].
pub trait FrameSink {
    fn begin(&mut self, cfg: SinkConfig) -> LoomResult<()>;
    fn push_frame(&mut self, frame: &RgbaImage, duration_ms: u32) -> LoomResult<()>;
    fn finish(&mut self) -> LoomResult<Vec<u8>>;
}

/// Per-frame durations under a total budget of `max_duration_ms` (0 = unlimited).
///
/// The budget check runs after a frame is added, so any non-empty input yields at least one
/// frame even when the budget is smaller than a single delay.
pub fn frame_durations(frame_count: usize, delay_ms: u32, max_duration_ms: u32) -> Vec<u32> {
    let mut out = Vec::with_capacity(frame_count);
    let mut remaining = max_duration_ms;
    let limited = max_duration_ms > 0;
    for _ in 0..frame_count {
        let mut duration = delay_ms;
        if limited {
            duration = duration.min(remaining);
            remaining -= duration;
        }
        out.push(duration);
        if limited && remaining == 0 {
            break;
        }
    }
    out
}

/// Keeps every pushed frame; `finish` returns the raw RGBA bytes back to back.
#[derive(Debug, Default)]
pub struct InMemorySink {
    pub config: Option<SinkConfig>,
    pub frames: Vec<RgbaImage>,
    pub durations: Vec<u32>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_duration_ms(&self) -> u64 {
        self.durations.iter().map(|&d| u64::from(d)).sum()
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> LoomResult<()> {
        self.config = Some(cfg);
        self.frames.clear();
        self.durations.clear();
        Ok(())
    }

    fn push_frame(&mut self, frame: &RgbaImage, duration_ms: u32) -> LoomResult<()> {
        check_frame_size(self.config, frame)?;
        self.frames.push(frame.clone());
        self.durations.push(duration_ms);
        Ok(())
    }

    fn finish(&mut self) -> LoomResult<Vec<u8>> {
        Ok(self
            .frames
            .iter()
            .flat_map(|f| f.as_raw().iter().copied())
            .collect())
    }
}

/// Every frame of one animation must match the size announced in `begin`.
pub(crate) fn check_frame_size(cfg: Option<SinkConfig>, frame: &RgbaImage) -> LoomResult<()> {
    let Some(cfg) = cfg else {
        return Err(LoomError::codec("frame pushed before begin"));
    };
    if frame.dimensions() != (cfg.width, cfg.height) {
        return Err(LoomError::codec(format!(
            "frame is {}x{}, animation is {}x{}",
            frame.width(),
            frame.height(),
            cfg.width,
            cfg.height
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;

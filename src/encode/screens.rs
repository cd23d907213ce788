use std::borrow::Cow;
use std::cell::OnceCell;

use image::RgbaImage;

use crate::effects::image_filter::FilterChain;
use crate::encode::avif::AvifSink;
use crate::encode::gif::GifSink;
use crate::encode::opts::EncodeOpts;
use crate::encode::sink::{FrameSink, SinkConfig, frame_durations};
use crate::encode::webp::WebpSink;
use crate::foundation::core::CanvasMeta;
use crate::foundation::error::{LoomError, LoomResult};
use crate::foundation::math::{CanonicalHasher, hex_digest};
use crate::widget::root::{DEFAULT_DELAY_MS, Root, paint_roots};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    WebP,
    Gif,
    Avif,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::WebP => "webp",
            Self::Gif => "gif",
            Self::Avif => "avif",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = LoomError;

    fn from_str(s: &str) -> LoomResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "webp" => Ok(Self::WebP),
            "gif" => Ok(Self::Gif),
            "avif" => Ok(Self::Avif),
            other => Err(LoomError::validation(format!(
                "unknown output format {other:?} (expected webp, gif or avif)"
            ))),
        }
    }
}

/// Render roots (or a literal frame list) plus encoding hints, ready for a codec.
///
/// Frames are painted on the first [`Screens::render`] and reused afterwards. The memo is not
/// synchronized; give every concurrent render its own `Screens`.
pub struct Screens {
    roots: Vec<Root>,
    images: Vec<RgbaImage>,
    canvas: CanvasMeta,
    delay_ms: u32,
    max_age_s: u32,
    show_full_animation: bool,
    painted: OnceCell<Vec<RgbaImage>>,
}

impl std::fmt::Debug for Screens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Screens")
            .field("roots", &self.roots.len())
            .field("images", &self.images.len())
            .field("canvas", &self.canvas)
            .field("delay_ms", &self.delay_ms)
            .field("max_age_s", &self.max_age_s)
            .field("show_full_animation", &self.show_full_animation)
            .finish_non_exhaustive()
    }
}

impl Screens {
    /// Hints come from the first root: its delay and max age when positive, and its
    /// full-animation flag.
    pub fn from_roots(roots: Vec<Root>) -> Self {
        let mut screens = Self::empty();
        if let Some(first) = roots.first() {
            if first.delay_ms > 0 {
                screens.delay_ms = first.delay_ms;
            }
            screens.max_age_s = first.max_age_s;
            screens.show_full_animation = first.show_full_animation;
        }
        screens.roots = roots;
        screens
    }

    pub fn from_images(images: Vec<RgbaImage>) -> Self {
        Self {
            images,
            ..Self::empty()
        }
    }

    fn empty() -> Self {
        Self {
            roots: Vec::new(),
            images: Vec::new(),
            canvas: CanvasMeta::default(),
            delay_ms: DEFAULT_DELAY_MS,
            max_age_s: 0,
            show_full_animation: false,
            painted: OnceCell::new(),
        }
    }

    pub fn with_canvas(mut self, canvas: CanvasMeta) -> Self {
        self.canvas = canvas;
        self
    }

    /// Override the per-frame delay; 0 keeps the current value.
    pub fn with_delay_ms(mut self, delay_ms: u32) -> Self {
        if delay_ms > 0 {
            self.delay_ms = delay_ms;
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty() && self.images.is_empty()
    }

    pub fn delay_ms(&self) -> u32 {
        self.delay_ms
    }

    pub fn max_age_s(&self) -> u32 {
        self.max_age_s
    }

    pub fn show_full_animation(&self) -> bool {
        self.show_full_animation
    }

    pub fn canvas(&self) -> CanvasMeta {
        self.canvas
    }

    /// SHA-256 over the roots, delay and max age. Literal images are only hashed when there
    /// are no roots. Nothing is painted.
    pub fn hash(&self) -> [u8; 32] {
        let mut h = CanonicalHasher::new();
        h.write_tag("screens");
        h.write_u64(self.roots.len() as u64);
        for root in &self.roots {
            root.fingerprint(&mut h);
        }
        if self.roots.is_empty() {
            h.write_u64(self.images.len() as u64);
            for img in &self.images {
                h.write_u32(img.width());
                h.write_u32(img.height());
                h.write_bytes(img.as_raw());
            }
        }
        h.write_u32(self.delay_ms);
        h.write_u32(self.max_age_s);
        h.finish()
    }

    pub fn hash_hex(&self) -> String {
        hex_digest(&self.hash())
    }

    /// All frames, painted once on a black background and memoized.
    #[tracing::instrument(skip(self), fields(roots = self.roots.len()))]
    pub fn render(&self) -> LoomResult<&[RgbaImage]> {
        if self.roots.is_empty() {
            return Ok(&self.images);
        }
        if let Some(frames) = self.painted.get() {
            return Ok(frames);
        }
        let frames = paint_roots(true, self.canvas, &self.roots)?;
        Ok(self.painted.get_or_init(|| frames))
    }

    /// Frames after `chain`; borrowed when the chain is empty.
    pub fn render_filtered(&self, chain: &FilterChain) -> LoomResult<Cow<'_, [RgbaImage]>> {
        let frames = self.render()?;
        filter_frames(frames, chain)
    }

    /// Budget, filter and hand the frames to `sink`. No frames means no bytes and no codec
    /// calls.
    #[tracing::instrument(skip(self, sink, chain), fields(stages = chain.len()))]
    pub fn encode_with(
        &self,
        sink: &mut dyn FrameSink,
        max_duration_ms: u32,
        chain: &FilterChain,
    ) -> LoomResult<Vec<u8>> {
        let frames = self.render()?;
        if frames.is_empty() {
            return Ok(Vec::new());
        }
        let budget = if self.show_full_animation {
            0
        } else {
            max_duration_ms
        };
        let durations = frame_durations(frames.len(), self.delay_ms, budget);
        let emitted = filter_frames(&frames[..durations.len()], chain)?;

        let (width, height) = emitted[0].dimensions();
        sink.begin(SinkConfig {
            width,
            height,
            frame_count: emitted.len(),
        })?;
        for (frame, &ms) in emitted.iter().zip(&durations) {
            sink.push_frame(frame, ms)?;
        }
        let bytes = sink.finish()?;
        tracing::debug!(
            frames = frames.len(),
            emitted = emitted.len(),
            total_ms = durations.iter().map(|&d| u64::from(d)).sum::<u64>(),
            bytes = bytes.len(),
            "encoded screens"
        );
        Ok(bytes)
    }

    pub fn encode(
        &self,
        format: OutputFormat,
        max_duration_ms: u32,
        chain: &FilterChain,
        opts: &EncodeOpts,
    ) -> LoomResult<Vec<u8>> {
        match format {
            OutputFormat::WebP => {
                self.encode_with(&mut WebpSink::new(opts.webp), max_duration_ms, chain)
            }
            OutputFormat::Gif => {
                self.encode_with(&mut GifSink::new(opts.gif), max_duration_ms, chain)
            }
            OutputFormat::Avif => {
                self.encode_with(&mut AvifSink::new(opts.avif), max_duration_ms, chain)
            }
        }
    }

    pub fn encode_webp(&self, max_duration_ms: u32, chain: &FilterChain) -> LoomResult<Vec<u8>> {
        self.encode(OutputFormat::WebP, max_duration_ms, chain, &EncodeOpts::from_env())
    }

    pub fn encode_gif(&self, max_duration_ms: u32, chain: &FilterChain) -> LoomResult<Vec<u8>> {
        self.encode(OutputFormat::Gif, max_duration_ms, chain, &EncodeOpts::from_env())
    }

    pub fn encode_avif(&self, max_duration_ms: u32, chain: &FilterChain) -> LoomResult<Vec<u8>> {
        self.encode(OutputFormat::Avif, max_duration_ms, chain, &EncodeOpts::from_env())
    }
}

fn filter_frames<'a>(
    frames: &'a [RgbaImage],
    chain: &FilterChain,
) -> LoomResult<Cow<'a, [RgbaImage]>> {
    if chain.is_empty() {
        return Ok(Cow::Borrowed(frames));
    }
    let filtered = frames
        .iter()
        .map(|f| chain.apply(f.clone()))
        .collect::<LoomResult<Vec<_>>>()?;
    Ok(Cow::Owned(filtered))
}

#[cfg(test)]
#[path = "../../tests/unit/encode/screens.rs"]
mod tests;

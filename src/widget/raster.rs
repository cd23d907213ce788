//! Leaf widgets backed by a cached raster: text, decoded images and emoji sprites.
//!
//! Each one does its expensive work (glyph rasterization, decoding, scaling) in the
//! constructor and only blits afterwards.

use std::io::Cursor;

use image::codecs::gif::GifDecoder;
use image::codecs::webp::WebPDecoder;
use image::imageops::FilterType;
use image::{AnimationDecoder, ImageFormat, Rgba, RgbaImage};

use crate::foundation::core::{IRect, Rgba8};
use crate::foundation::error::{LoomError, LoomResult};
use crate::foundation::math::CanonicalHasher;
use crate::render::canvas::Canvas;
use crate::render::fonts::{self, DEFAULT_FONT, EmojiAtlas};
use crate::widget::Widget;

/// Widest text raster a single [`Text`] will produce.
pub const MAX_TEXT_WIDTH: u32 = 1000;

#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
    pub font: String,
    /// Explicit raster height; `None` uses ascent + descent.
    pub height: Option<u32>,
    /// Lifts the baseline by this many pixels.
    pub offset: i32,
    pub color: Rgba8,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font: DEFAULT_FONT.to_string(),
            height: None,
            offset: 0,
            color: Rgba8::WHITE,
        }
    }
}

impl TextStyle {
    pub fn with_font(mut self, font: impl Into<String>) -> Self {
        self.font = font.into();
        self
    }

    pub fn with_height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    pub fn with_offset(mut self, offset: i32) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_color(mut self, color: Rgba8) -> Self {
        self.color = color;
        self
    }
}

/// A single line of text drawn with a registered [`fonts::FontFace`].
#[derive(Clone, Debug)]
pub struct Text {
    content: String,
    style: TextStyle,
    img: RgbaImage,
}

impl Text {
    pub fn new(content: impl Into<String>, style: &TextStyle) -> LoomResult<Self> {
        let content = content.into();
        let face = fonts::font(&style.font)?;
        let metrics = face.metrics();

        let measured = face.measure(&content).max(0.0).floor() as u32;
        if measured > MAX_TEXT_WIDTH {
            tracing::warn!(
                width = measured,
                max = MAX_TEXT_WIDTH,
                "text raster truncated"
            );
        }
        let width = measured.min(MAX_TEXT_WIDTH);
        let height = style
            .height
            .unwrap_or((metrics.ascent + metrics.descent).max(0) as u32);

        let mut img = RgbaImage::new(width, height);
        let baseline = height as i32 - metrics.descent - style.offset;
        let top = baseline - metrics.ascent;
        let mask = face.rasterize(&content);
        for (mx, my, coverage) in mask.enumerate_pixels() {
            let (x, y) = (mx as i32, my as i32 + top);
            if coverage.0[0] == 0 || x >= width as i32 || y < 0 || y >= height as i32 {
                continue;
            }
            let a = (u16::from(coverage.0[0]) * u16::from(style.color.a) / 255) as u8;
            img.put_pixel(
                x as u32,
                y as u32,
                Rgba([style.color.r, style.color.g, style.color.b, a]),
            );
        }

        Ok(Self {
            content,
            style: style.clone(),
            img,
        })
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn size(&self) -> (u32, u32) {
        self.img.dimensions()
    }
}

impl Widget for Text {
    fn paint_bounds(&self, _bounds: IRect, _frame_idx: usize) -> IRect {
        raster_bounds(&self.img)
    }

    fn paint(&self, canvas: &mut Canvas, _bounds: IRect, _frame_idx: usize) -> LoomResult<()> {
        canvas.draw_image(&self.img, 0.0, 0.0)
    }

    fn fingerprint(&self, h: &mut CanonicalHasher) {
        h.write_tag("text");
        h.write_str(&self.content);
        h.write_str(&self.style.font);
        h.write_u32(self.style.height.unwrap_or(0));
        h.write_i32(self.style.offset);
        h.write_raw(&self.style.color.to_array());
    }
}

/// A decoded picture; animated GIF and WebP sources contribute one frame per widget frame.
#[derive(Clone, Debug)]
pub struct Image {
    frames: Vec<RgbaImage>,
    delay_ms: u32,
}

impl Image {
    /// Decode `bytes` and optionally resize. With one dimension given, the other follows the
    /// source aspect ratio.
    pub fn from_bytes(bytes: &[u8], width: Option<u32>, height: Option<u32>) -> LoomResult<Self> {
        let format = image::guess_format(bytes)?;
        let (frames, delay_ms) = match format {
            ImageFormat::Gif => decode_animation(GifDecoder::new(Cursor::new(bytes))?)?,
            ImageFormat::WebP => {
                let decoder = WebPDecoder::new(Cursor::new(bytes))?;
                if decoder.has_animation() {
                    decode_animation(decoder)?
                } else {
                    let img = image::load_from_memory_with_format(bytes, format)?;
                    (vec![img.into_rgba8()], 0)
                }
            }
            _ => (
                vec![image::load_from_memory_with_format(bytes, format)?.into_rgba8()],
                0,
            ),
        };
        tracing::debug!(?format, frames = frames.len(), "decoded image source");
        Ok(Self { frames, delay_ms }.resized(width, height))
    }

    /// Wrap rasters decoded elsewhere. At least one frame is required.
    pub fn from_frames(frames: Vec<RgbaImage>) -> LoomResult<Self> {
        if frames.is_empty() {
            return Err(LoomError::validation("image needs at least one frame"));
        }
        Ok(Self {
            frames,
            delay_ms: 0,
        })
    }

    fn resized(self, width: Option<u32>, height: Option<u32>) -> Self {
        let Some(first) = self.frames.first() else {
            return self;
        };
        let (sw, sh) = first.dimensions();
        let (tw, th) = match (width, height) {
            (None, None) => return self,
            (Some(w), Some(h)) => (w, h),
            (Some(w), None) if sw > 0 => (w, (u64::from(w) * u64::from(sh) / u64::from(sw)) as u32),
            (None, Some(h)) if sh > 0 => ((u64::from(h) * u64::from(sw) / u64::from(sh)) as u32, h),
            _ => return self,
        };
        if (tw, th) == (sw, sh) || tw == 0 || th == 0 {
            return self;
        }
        let frames = self
            .frames
            .iter()
            .map(|f| image::imageops::resize(f, tw, th, FilterType::Lanczos3))
            .collect();
        Self {
            frames,
            delay_ms: self.delay_ms,
        }
    }

    /// Delay between frames stored in the source animation, 0 for stills.
    pub fn source_delay_ms(&self) -> u32 {
        self.delay_ms
    }

    pub fn size(&self) -> (u32, u32) {
        self.frames.first().map_or((0, 0), |f| f.dimensions())
    }

    pub fn frames(&self) -> &[RgbaImage] {
        &self.frames
    }
}

fn decode_animation<'a>(decoder: impl AnimationDecoder<'a>) -> LoomResult<(Vec<RgbaImage>, u32)> {
    let frames = decoder.into_frames().collect_frames()?;
    let delay_ms = frames.first().map_or(0, |f| {
        let (num, den) = f.delay().numer_denom_ms();
        if den == 0 { 0 } else { num / den }
    });
    Ok((frames.into_iter().map(|f| f.into_buffer()).collect(), delay_ms))
}

impl Widget for Image {
    fn paint_bounds(&self, _bounds: IRect, frame_idx: usize) -> IRect {
        self.frame(frame_idx).map_or(IRect::EMPTY, raster_bounds)
    }

    fn paint(&self, canvas: &mut Canvas, _bounds: IRect, frame_idx: usize) -> LoomResult<()> {
        match self.frame(frame_idx) {
            Some(img) => canvas.draw_image(img, 0.0, 0.0),
            None => Ok(()),
        }
    }

    fn frame_count(&self, _bounds: IRect) -> usize {
        self.frames.len().max(1)
    }

    fn fingerprint(&self, h: &mut CanonicalHasher) {
        h.write_tag("image");
        h.write_u64(self.frames.len() as u64);
        for f in &self.frames {
            h.write_u32(f.width());
            h.write_u32(f.height());
            h.write_bytes(f.as_raw());
        }
    }
}

impl Image {
    fn frame(&self, frame_idx: usize) -> Option<&RgbaImage> {
        if self.frames.is_empty() {
            return None;
        }
        self.frames.get(frame_idx % self.frames.len())
    }
}

/// An emoji sprite from an [`EmojiAtlas`], scaled to `height` pixels.
#[derive(Clone, Debug)]
pub struct Emoji {
    sequence: String,
    height: u32,
    img: RgbaImage,
}

impl Emoji {
    pub fn new(sequence: impl Into<String>, height: i32, atlas: &dyn EmojiAtlas) -> LoomResult<Self> {
        let sequence = sequence.into();
        if height <= 0 {
            return Err(LoomError::validation(format!(
                "emoji height must be positive, got {height}"
            )));
        }
        if sequence.is_empty() {
            return Err(LoomError::validation("emoji sequence is empty"));
        }
        let sprite = atlas
            .lookup(&sequence)
            .ok_or_else(|| LoomError::validation(format!("emoji {sequence:?} not found")))?;

        let height = height as u32;
        let (sw, sh) = sprite.dimensions();
        let img = if sw == 0 || sh == 0 || sh == height {
            sprite
        } else {
            let width = ((f64::from(sw) * f64::from(height) / f64::from(sh)).round() as u32).max(1);
            image::imageops::resize(&sprite, width, height, FilterType::Nearest)
        };

        Ok(Self {
            sequence,
            height,
            img,
        })
    }

    pub fn size(&self) -> (u32, u32) {
        self.img.dimensions()
    }
}

impl Widget for Emoji {
    fn paint_bounds(&self, _bounds: IRect, _frame_idx: usize) -> IRect {
        raster_bounds(&self.img)
    }

    fn paint(&self, canvas: &mut Canvas, _bounds: IRect, _frame_idx: usize) -> LoomResult<()> {
        canvas.draw_image(&self.img, 0.0, 0.0)
    }

    fn fingerprint(&self, h: &mut CanonicalHasher) {
        h.write_tag("emoji");
        h.write_str(&self.sequence);
        h.write_u32(self.height);
        h.write_bytes(self.img.as_raw());
    }
}

fn raster_bounds(img: &RgbaImage) -> IRect {
    IRect::from_size(img.width() as i32, img.height() as i32)
}

#[cfg(test)]
#[path = "../../tests/unit/widget/raster.rs"]
mod tests;

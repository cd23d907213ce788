//! Glyph and emoji collaborators.
//!
//! Shaping and glyph rasterization live outside this crate. A host registers [`FontFace`]
//! implementations by name once per process; text widgets only consume metrics and coverage
//! masks. Emoji sprites come from an [`EmojiAtlas`] handed to the widget constructor.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock, Mutex};

use image::{GrayImage, Luma, RgbaImage};

use crate::foundation::error::{LoomError, LoomResult};

pub const DEFAULT_FONT: &str = "tb-8";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FontMetrics {
    /// Pixels above the baseline.
    pub ascent: i32,
    /// Pixels below the baseline.
    pub descent: i32,
}

pub trait FontFace: Send + Sync {
    fn metrics(&self) -> FontMetrics;

    /// Advance width of `text` in pixels.
    fn measure(&self, text: &str) -> f64;

    /// Coverage mask of `text`, `ceil(measure)` wide and `ascent + descent` tall, with the
    /// baseline at row `ascent`.
    fn rasterize(&self, text: &str) -> GrayImage;
}

pub trait EmojiAtlas {
    /// Sprite for a full emoji sequence, if the atlas has one.
    fn lookup(&self, sequence: &str) -> Option<RgbaImage>;
}

impl EmojiAtlas for HashMap<String, RgbaImage> {
    fn lookup(&self, sequence: &str) -> Option<RgbaImage> {
        self.get(sequence).cloned()
    }
}

type FontRegistry = HashMap<String, Arc<dyn FontFace>>;

static FONTS: LazyLock<Mutex<FontRegistry>> = LazyLock::new(|| {
    let mut fonts: FontRegistry = HashMap::new();
    fonts.insert(DEFAULT_FONT.to_string(), Arc::new(CellFace::new(5, 6, 2)));
    Mutex::new(fonts)
});

fn registry() -> std::sync::MutexGuard<'static, FontRegistry> {
    FONTS.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Register (or replace) a face under `name` for the rest of the process.
pub fn register_font(name: impl Into<String>, face: Arc<dyn FontFace>) {
    let name = name.into();
    tracing::debug!(font = %name, "registering font face");
    registry().insert(name, face);
}

pub fn font(name: &str) -> LoomResult<Arc<dyn FontFace>> {
    let found = registry().get(name).cloned();
    found.ok_or_else(|| {
        LoomError::validation(format!(
            "unknown font {name:?} (registered: {})",
            font_names().join(", ")
        ))
    })
}

/// Registered face names, sorted.
pub fn font_names() -> Vec<String> {
    let mut names = registry().keys().cloned().collect::<Vec<_>>();
    names.sort();
    names
}

/// Monospace face that renders every non-space character as a solid cell.
///
/// Useful as a layout stand-in when no real glyph source is registered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellFace {
    pub advance: u32,
    pub ascent: i32,
    pub descent: i32,
}

impl CellFace {
    pub fn new(advance: u32, ascent: i32, descent: i32) -> Self {
        Self {
            advance,
            ascent,
            descent,
        }
    }
}

impl FontFace for CellFace {
    fn metrics(&self) -> FontMetrics {
        FontMetrics {
            ascent: self.ascent,
            descent: self.descent,
        }
    }

    fn measure(&self, text: &str) -> f64 {
        f64::from(self.advance) * text.chars().count() as f64
    }

    fn rasterize(&self, text: &str) -> GrayImage {
        let width = self.measure(text).ceil() as u32;
        let height = (self.ascent + self.descent).max(0) as u32;
        let mut mask = GrayImage::new(width, height);
        let ink = self.advance.saturating_sub(1).max(1);
        for (i, ch) in text.chars().enumerate() {
            if ch.is_whitespace() {
                continue;
            }
            let x0 = i as u32 * self.advance;
            for y in 0..self.ascent.max(0) as u32 {
                for x in x0..(x0 + ink).min(width) {
                    mask.put_pixel(x, y, Luma([255]));
                }
            }
        }
        mask
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/fonts.rs"]
mod tests;

use crate::foundation::core::{IRect, Rgba8};
use crate::foundation::error::LoomResult;
use crate::foundation::math::CanonicalHasher;
use crate::render::canvas::Canvas;
use crate::widget::{BoxedWidget, Widget};

/// Rectangle with an optional background and an optional centered child.
///
/// Unset dimensions take the outer bounds. `padding` shrinks the area offered to the child on
/// every side.
#[derive(Default)]
pub struct Block {
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub padding: i32,
    pub color: Option<Rgba8>,
    pub child: Option<BoxedWidget>,
}

impl Block {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_size(mut self, width: i32, height: i32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_padding(mut self, padding: i32) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_color(mut self, color: Rgba8) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_child(mut self, child: impl Widget + 'static) -> Self {
        self.child = Some(Box::new(child));
        self
    }

    fn size(&self, bounds: IRect) -> IRect {
        IRect::from_size(
            self.width.unwrap_or(bounds.width()).max(0),
            self.height.unwrap_or(bounds.height()).max(0),
        )
    }

    fn inner(&self, bounds: IRect) -> IRect {
        let size = self.size(bounds);
        IRect::from_size(
            (size.width() - 2 * self.padding).max(0),
            (size.height() - 2 * self.padding).max(0),
        )
    }
}

impl Widget for Block {
    fn paint_bounds(&self, bounds: IRect, _frame_idx: usize) -> IRect {
        self.size(bounds)
    }

    fn paint(&self, canvas: &mut Canvas, bounds: IRect, frame_idx: usize) -> LoomResult<()> {
        let size = self.size(bounds);
        if let Some(color) = self.color {
            canvas.fill_rect(
                kurbo::Rect::new(0.0, 0.0, f64::from(size.width()), f64::from(size.height())),
                color,
            );
        }
        let Some(child) = &self.child else {
            return Ok(());
        };
        let inner = self.inner(bounds);
        let cb = child.paint_bounds(inner, frame_idx);
        let dx = self.padding + (inner.width() - cb.width()) / 2;
        let dy = self.padding + (inner.height() - cb.height()) / 2;

        canvas.push();
        canvas.translate(f64::from(dx), f64::from(dy));
        let res = child.paint(canvas, inner, frame_idx);
        canvas.pop();
        res
    }

    fn frame_count(&self, bounds: IRect) -> usize {
        self.child
            .as_ref()
            .map_or(1, |c| c.frame_count(self.inner(bounds)))
    }

    fn fingerprint(&self, h: &mut CanonicalHasher) {
        h.write_tag("block");
        h.write_i32(self.width.unwrap_or(-1));
        h.write_i32(self.height.unwrap_or(-1));
        h.write_i32(self.padding);
        match self.color {
            Some(c) => {
                h.write_u8(1);
                h.write_raw(&c.to_array());
            }
            None => h.write_u8(0),
        }
        match &self.child {
            Some(c) => {
                h.write_u8(1);
                c.fingerprint(h);
            }
            None => h.write_u8(0),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/widget/block.rs"]
mod tests;

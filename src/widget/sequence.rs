use crate::foundation::core::IRect;
use crate::foundation::error::LoomResult;
use crate::foundation::math::CanonicalHasher;
use crate::render::canvas::Canvas;
use crate::widget::{BoxedWidget, Widget};

/// Plays its children one after another on a shared timeline.
///
/// Child `i` owns the global frames `[offset_i, offset_i + frame_count_i)`, where `offset_i` is
/// the sum of the preceding children's frame counts.
#[derive(Default)]
pub struct Sequence {
    pub children: Vec<BoxedWidget>,
}

impl Sequence {
    pub fn new(children: Vec<BoxedWidget>) -> Self {
        Self { children }
    }

    pub fn push(mut self, child: impl Widget + 'static) -> Self {
        self.children.push(Box::new(child));
        self
    }

    /// Owning child and its local frame index for global frame `frame_idx`.
    pub fn locate(&self, bounds: IRect, frame_idx: usize) -> Option<(&dyn Widget, usize)> {
        let mut offset = 0usize;
        for child in &self.children {
            let n = child.frame_count(bounds);
            if frame_idx < offset + n {
                return Some((child.as_ref(), frame_idx - offset));
            }
            offset += n;
        }
        None
    }
}

impl Widget for Sequence {
    fn paint_bounds(&self, bounds: IRect, frame_idx: usize) -> IRect {
        self.locate(bounds, frame_idx)
            .map_or(IRect::EMPTY, |(child, local)| child.paint_bounds(bounds, local))
    }

    fn paint(&self, canvas: &mut Canvas, bounds: IRect, frame_idx: usize) -> LoomResult<()> {
        let Some((child, local)) = self.locate(bounds, frame_idx) else {
            return Ok(());
        };
        canvas.push();
        let res = child.paint(canvas, bounds, local);
        canvas.pop();
        res
    }

    fn frame_count(&self, bounds: IRect) -> usize {
        self.children.iter().map(|c| c.frame_count(bounds)).sum()
    }

    fn fingerprint(&self, h: &mut CanonicalHasher) {
        h.write_tag("sequence");
        h.write_u64(self.children.len() as u64);
        for c in &self.children {
            c.fingerprint(h);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/widget/sequence.rs"]
mod tests;

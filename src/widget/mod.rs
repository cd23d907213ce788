//! Widget contract and the built-in widgets.
//!
//! A widget paints itself in local space anchored at (0, 0). Every call receives the outer
//! bounds offered by the parent and a frame index on the widget's own timeline.

use image::RgbaImage;

use crate::foundation::core::IRect;
use crate::foundation::error::LoomResult;
use crate::foundation::math::CanonicalHasher;
use crate::render::canvas::Canvas;

pub(crate) mod block;
pub(crate) mod color_transform;
pub(crate) mod filter;
pub(crate) mod raster;
pub(crate) mod root;
pub(crate) mod sequence;
pub(crate) mod shape;
pub(crate) mod transformation;

pub trait Widget {
    /// Minimal local rectangle needed to paint frame `frame_idx` inside `bounds`.
    fn paint_bounds(&self, bounds: IRect, frame_idx: usize) -> IRect;

    /// Draw frame `frame_idx` at the local origin. Implementations restore any canvas
    /// transform they change.
    fn paint(&self, canvas: &mut Canvas, bounds: IRect, frame_idx: usize) -> LoomResult<()>;

    /// Number of distinct frames this widget offers for `bounds`.
    fn frame_count(&self, _bounds: IRect) -> usize {
        1
    }

    /// Feed every output-affecting field into `h`, prefixed with a type tag.
    fn fingerprint(&self, h: &mut CanonicalHasher);
}

pub type BoxedWidget = Box<dyn Widget>;

impl<W: Widget + ?Sized> Widget for Box<W> {
    fn paint_bounds(&self, bounds: IRect, frame_idx: usize) -> IRect {
        (**self).paint_bounds(bounds, frame_idx)
    }

    fn paint(&self, canvas: &mut Canvas, bounds: IRect, frame_idx: usize) -> LoomResult<()> {
        (**self).paint(canvas, bounds, frame_idx)
    }

    fn frame_count(&self, bounds: IRect) -> usize {
        (**self).frame_count(bounds)
    }

    fn fingerprint(&self, h: &mut CanonicalHasher) {
        (**self).fingerprint(h)
    }
}

/// Paint one frame of `widget` onto a fresh transparent canvas the size of `bounds`.
pub fn paint_widget(widget: &dyn Widget, bounds: IRect, frame_idx: usize) -> LoomResult<RgbaImage> {
    let mut canvas = Canvas::for_bounds(bounds)?;
    widget.paint(&mut canvas, bounds.at_origin(), frame_idx)?;
    canvas.into_image()
}

/// Paint `child` alone onto a canvas sized to its own paint bounds.
///
/// `child_bounds` is what the child is told it may use.
pub(crate) fn paint_offscreen(
    child: &dyn Widget,
    child_bounds: IRect,
    frame_idx: usize,
) -> LoomResult<RgbaImage> {
    let cb = child.paint_bounds(child_bounds, frame_idx);
    let mut canvas = Canvas::for_bounds(cb)?;
    child.paint(&mut canvas, child_bounds, frame_idx)?;
    canvas.into_image()
}

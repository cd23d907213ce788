use std::f64::consts::{FRAC_PI_2, PI, TAU};

use kurbo::Shape as _;

use crate::foundation::core::{BezPath, IRect, Point, Rgba8};
use crate::foundation::error::LoomResult;
use crate::foundation::math::CanonicalHasher;
use crate::render::canvas::Canvas;
use crate::widget::Widget;

const PATH_TOLERANCE: f64 = 0.1;

/// Geometric extent in the widget's own coordinate space.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Extent {
    min_x: f64,
    max_x: f64,
    min_y: f64,
    max_y: f64,
}

impl Extent {
    fn of_points(points: impl IntoIterator<Item = Point>) -> Option<Self> {
        let mut it = points.into_iter();
        let first = it.next()?;
        let mut e = Self {
            min_x: first.x,
            max_x: first.x,
            min_y: first.y,
            max_y: first.y,
        };
        for p in it {
            e.include(p);
        }
        Some(e)
    }

    fn include(&mut self, p: Point) {
        self.min_x = self.min_x.min(p.x);
        self.max_x = self.max_x.max(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_y = self.max_y.max(p.y);
    }

    fn expand(mut self, by: f64) -> Self {
        self.min_x -= by;
        self.max_x += by;
        self.min_y -= by;
        self.max_y += by;
        self
    }

    fn to_bounds(self) -> IRect {
        IRect::from_extent(self.max_x - self.min_x, self.max_y - self.min_y)
    }
}

fn write_color(h: &mut CanonicalHasher, c: Rgba8) {
    h.write_raw(&c.to_array());
}

/// Stroked circular arc. Angles are in radians, measured clockwise from +x (y points down).
#[derive(Clone, Debug, PartialEq)]
pub struct Arc {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    pub color: Rgba8,
    pub width: f64,
}

impl Arc {
    fn extent(&self) -> Extent {
        let at = |angle: f64| {
            Point::new(
                self.x + self.radius * angle.cos(),
                self.y + self.radius * angle.sin(),
            )
        };
        let mut e = Extent {
            min_x: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            min_y: f64::INFINITY,
            max_y: f64::NEG_INFINITY,
        };
        e.include(at(self.start_angle));
        e.include(at(self.end_angle));

        let norm = |a: f64| a.rem_euclid(TAU);
        let (start, end) = (norm(self.start_angle), norm(self.end_angle));
        for cardinal in [0.0, FRAC_PI_2, PI, 3.0 * FRAC_PI_2] {
            // A sweep that wraps past zero covers everything outside (end, start).
            let swept = if start <= end {
                (start..=end).contains(&cardinal)
            } else {
                cardinal >= start || cardinal <= end
            };
            if swept {
                e.include(at(cardinal));
            }
        }
        e.expand(self.width / 2.0)
    }
}

impl Widget for Arc {
    fn paint_bounds(&self, _bounds: IRect, _frame_idx: usize) -> IRect {
        self.extent().to_bounds()
    }

    fn paint(&self, canvas: &mut Canvas, _bounds: IRect, _frame_idx: usize) -> LoomResult<()> {
        let e = self.extent();
        let arc = kurbo::Arc::new(
            Point::new(self.x, self.y),
            (self.radius, self.radius),
            self.start_angle,
            self.end_angle - self.start_angle,
            0.0,
        );
        canvas.push();
        canvas.translate(-e.min_x, -e.min_y);
        canvas.stroke_path(&arc.to_path(PATH_TOLERANCE), self.color, self.width);
        canvas.pop();
        Ok(())
    }

    fn fingerprint(&self, h: &mut CanonicalHasher) {
        h.write_tag("arc");
        for v in [
            self.x,
            self.y,
            self.radius,
            self.start_angle,
            self.end_angle,
            self.width,
        ] {
            h.write_f64(v);
        }
        write_color(h, self.color);
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Line {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub color: Rgba8,
    pub width: f64,
}

impl Line {
    fn extent(&self) -> Extent {
        Extent {
            min_x: self.x1.min(self.x2),
            max_x: self.x1.max(self.x2),
            min_y: self.y1.min(self.y2),
            max_y: self.y1.max(self.y2),
        }
        .expand(self.width / 2.0)
    }
}

impl Widget for Line {
    fn paint_bounds(&self, _bounds: IRect, _frame_idx: usize) -> IRect {
        self.extent().to_bounds()
    }

    fn paint(&self, canvas: &mut Canvas, _bounds: IRect, _frame_idx: usize) -> LoomResult<()> {
        let e = self.extent();
        let mut path = BezPath::new();
        path.move_to((self.x1, self.y1));
        path.line_to((self.x2, self.y2));
        canvas.push();
        canvas.translate(-e.min_x, -e.min_y);
        canvas.stroke_path(&path, self.color, self.width);
        canvas.pop();
        Ok(())
    }

    fn fingerprint(&self, h: &mut CanonicalHasher) {
        h.write_tag("line");
        for v in [self.x1, self.y1, self.x2, self.y2, self.width] {
            h.write_f64(v);
        }
        write_color(h, self.color);
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PolygonStroke {
    pub color: Rgba8,
    pub width: f64,
}

/// Closed polygon with an optional fill and an optional outline.
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    pub vertices: Vec<Point>,
    pub fill: Option<Rgba8>,
    pub stroke: Option<PolygonStroke>,
}

impl Polygon {
    pub fn filled(vertices: Vec<Point>, color: Rgba8) -> Self {
        Self {
            vertices,
            fill: Some(color),
            stroke: None,
        }
    }

    pub fn with_stroke(mut self, color: Rgba8, width: f64) -> Self {
        self.stroke = Some(PolygonStroke { color, width });
        self
    }

    fn extent(&self) -> Option<Extent> {
        let e = Extent::of_points(self.vertices.iter().copied())?;
        Some(match self.stroke {
            Some(s) => e.expand(s.width / 2.0),
            None => e,
        })
    }
}

impl Widget for Polygon {
    fn paint_bounds(&self, _bounds: IRect, _frame_idx: usize) -> IRect {
        self.extent().map_or(IRect::EMPTY, Extent::to_bounds)
    }

    fn paint(&self, canvas: &mut Canvas, _bounds: IRect, _frame_idx: usize) -> LoomResult<()> {
        let Some(e) = self.extent() else {
            return Ok(());
        };
        let mut path = BezPath::new();
        for (i, p) in self.vertices.iter().enumerate() {
            if i == 0 {
                path.move_to(*p);
            } else {
                path.line_to(*p);
            }
        }
        path.close_path();

        canvas.push();
        canvas.translate(-e.min_x, -e.min_y);
        if let Some(fill) = self.fill {
            canvas.fill_path(&path, fill);
        }
        if let Some(s) = self.stroke {
            canvas.stroke_path(&path, s.color, s.width);
        }
        canvas.pop();
        Ok(())
    }

    fn fingerprint(&self, h: &mut CanonicalHasher) {
        h.write_tag("polygon");
        h.write_u64(self.vertices.len() as u64);
        for p in &self.vertices {
            h.write_f64(p.x);
            h.write_f64(p.y);
        }
        match self.fill {
            Some(c) => {
                h.write_u8(1);
                write_color(h, c);
            }
            None => h.write_u8(0),
        }
        match self.stroke {
            Some(s) => {
                h.write_u8(1);
                write_color(h, s.color);
                h.write_f64(s.width);
            }
            None => h.write_u8(0),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/widget/shape.rs"]
mod tests;

use super::*;
use crate::widget::paint_widget;

const OUTER: IRect = IRect {
    x0: 0,
    y0: 0,
    x1: 64,
    y1: 32,
};

#[test]
fn empty_polygon_has_zero_bounds_and_draws_nothing() {
    let poly = Polygon::filled(Vec::new(), Rgba8::WHITE).with_stroke(Rgba8::WHITE, 2.0);
    let b = poly.paint_bounds(OUTER, 0);
    assert!(b.is_empty());
    assert_eq!(b, IRect::EMPTY);

    let mut canvas = Canvas::new(8, 8).unwrap();
    poly.paint(&mut canvas, OUTER, 0).unwrap();
    assert_eq!(canvas.draw_ops(), 0);
    assert_eq!(poly.frame_count(OUTER), 1);
}

#[test]
fn polygon_bounds_follow_vertex_extent_and_stroke() {
    let verts = vec![
        Point::new(2.0, 3.0),
        Point::new(10.0, 3.0),
        Point::new(6.0, 9.0),
    ];
    let poly = Polygon::filled(verts.clone(), Rgba8::WHITE);
    assert_eq!(poly.paint_bounds(OUTER, 0), IRect::from_size(8, 6));

    let stroked = Polygon::filled(verts, Rgba8::WHITE).with_stroke(Rgba8::BLACK, 2.0);
    assert_eq!(stroked.paint_bounds(OUTER, 0), IRect::from_size(10, 8));
}

#[test]
fn polygon_paints_in_positive_local_space() {
    let poly = Polygon::filled(
        vec![
            Point::new(-5.0, -5.0),
            Point::new(-1.0, -5.0),
            Point::new(-1.0, -1.0),
            Point::new(-5.0, -1.0),
        ],
        Rgba8::rgb(0, 255, 0),
    );
    let bounds = poly.paint_bounds(OUTER, 0);
    assert_eq!(bounds, IRect::from_size(4, 4));
    let img = paint_widget(&poly, bounds, 0).unwrap();
    assert_eq!(img.get_pixel(1, 1).0, [0, 255, 0, 255]);
}

#[test]
fn line_bounds_include_half_width_each_side() {
    let line = Line {
        x1: 0.0,
        y1: 0.0,
        x2: 10.0,
        y2: 0.0,
        color: Rgba8::WHITE,
        width: 2.0,
    };
    assert_eq!(line.paint_bounds(OUTER, 0), IRect::from_size(12, 2));
    let img = paint_widget(&line, line.paint_bounds(OUTER, 0), 0).unwrap();
    assert_eq!(img.get_pixel(5, 0).0[3], 255);
    assert_eq!(img.get_pixel(5, 1).0[3], 255);
}

#[test]
fn quarter_arc_bounds_cover_only_swept_quadrant() {
    let arc = Arc {
        x: 0.0,
        y: 0.0,
        radius: 10.0,
        start_angle: 0.0,
        end_angle: FRAC_PI_2,
        color: Rgba8::WHITE,
        width: 2.0,
    };
    assert_eq!(arc.paint_bounds(OUTER, 0), IRect::from_size(12, 12));
}

#[test]
fn arc_crossing_zero_includes_the_zero_cardinal() {
    let arc = Arc {
        x: 0.0,
        y: 0.0,
        radius: 10.0,
        start_angle: -FRAC_PI_2,
        end_angle: FRAC_PI_2,
        color: Rgba8::WHITE,
        width: 0.0,
    };
    let b = arc.paint_bounds(OUTER, 0);
    assert_eq!(b.height(), 20);
    assert!((10..=11).contains(&b.width()), "{b:?}");
}

#[test]
fn full_circle_bounds_are_diameter_plus_stroke() {
    let arc = Arc {
        x: 16.0,
        y: 16.0,
        radius: 8.0,
        start_angle: 0.0,
        end_angle: 2.0 * PI - 1e-9,
        color: Rgba8::WHITE,
        width: 1.0,
    };
    assert_eq!(arc.paint_bounds(OUTER, 0), IRect::from_size(17, 17));
    let img = paint_widget(&arc, IRect::from_size(17, 17), 0).unwrap();
    assert!(img.get_pixel(8, 0).0[3] > 0);
    assert_eq!(img.get_pixel(8, 8).0[3], 0);
}

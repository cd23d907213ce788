use super::*;
use crate::foundation::core::Rgba8;
use crate::foundation::error::LoomError;
use crate::widget::block::Block;
use crate::widget::paint_widget;
use crate::widget::testing::Swatch;

fn white_block(w: i32, h: i32) -> Block {
    Block::new().with_size(w, h).with_color(Rgba8::WHITE)
}

#[test]
fn blur_pads_bounds_by_three_radii() {
    let f = Filtered::new(Swatch::new(4, 2, 1), PixelEffect::Blur { radius: 1.0 });
    assert_eq!(
        f.paint_bounds(IRect::from_size(64, 32), 0),
        IRect::from_size(10, 8)
    );
    let f = Filtered::new(Swatch::new(4, 2, 1), PixelEffect::Invert);
    assert_eq!(
        f.paint_bounds(IRect::from_size(64, 32), 0),
        IRect::from_size(4, 2)
    );
}

#[test]
fn huge_blur_radius_errors_instead_of_overflowing() {
    let f = Filtered::new(Swatch::new(4, 4, 1), PixelEffect::Blur { radius: 1e9 });
    let b = f.paint_bounds(IRect::from_size(64, 32), 0);
    assert_eq!(b, IRect::from_size(4 + 2 * 65_535, 4 + 2 * 65_535));
    let err = paint_widget(&f, IRect::from_size(64, 32), 0).unwrap_err();
    assert!(matches!(err, LoomError::Paint(_)), "{err}");
}

#[test]
fn filtered_child_is_centered_in_outer_bounds() {
    let f = Filtered::new(white_block(2, 2), PixelEffect::Invert);
    let img = paint_widget(&f, IRect::from_size(6, 6), 0).unwrap();
    let p = img.get_pixel(2, 2).0;
    assert!(p[0] <= 2 && p[3] >= 253, "{p:?}");
    assert_eq!(img.get_pixel(0, 0).0[3], 0);
    assert_eq!(img.get_pixel(5, 5).0[3], 0);
}

#[test]
fn filtered_frame_count_follows_child() {
    let f = Filtered::new(Swatch::new(1, 1, 9), PixelEffect::Sepia);
    assert_eq!(f.frame_count(IRect::from_size(4, 4)), 9);
}

#[test]
fn rotate_bounds_grow_to_rotated_box() {
    let r = Rotate::new(Swatch::new(10, 4, 1), 90.0);
    assert_eq!(
        r.paint_bounds(IRect::from_size(64, 32), 0),
        IRect::from_size(4, 10)
    );
    let r = Rotate::new(Swatch::new(10, 4, 1), 0.0);
    assert_eq!(
        r.paint_bounds(IRect::from_size(64, 32), 0),
        IRect::from_size(10, 4)
    );
}

#[test]
fn rotate_quarter_turn_swaps_axes() {
    let r = Rotate::new(white_block(4, 2), 90.0);
    let img = paint_widget(&r, IRect::from_size(4, 4), 0).unwrap();
    // A 4x2 bar rotated about the center of a 4x4 square becomes a 2x4 bar.
    assert!(img.get_pixel(1, 0).0[3] >= 250);
    assert!(img.get_pixel(2, 3).0[3] >= 250);
    assert_eq!(img.get_pixel(0, 1).0[3], 0);
    assert_eq!(img.get_pixel(3, 2).0[3], 0);
}

#[test]
fn shear_bounds_widen_by_tangent() {
    let s = Shear::new(Swatch::new(10, 4, 1), 45.0, 0.0);
    assert_eq!(
        s.paint_bounds(IRect::from_size(64, 32), 0),
        IRect::from_size(14, 4)
    );
    let s = Shear::new(Swatch::new(10, 4, 1), 0.0, 0.0);
    assert_eq!(
        s.paint_bounds(IRect::from_size(64, 32), 0),
        IRect::from_size(10, 4)
    );
}

#[test]
fn transforms_do_not_leak_into_parent() {
    let mut canvas = Canvas::new(8, 8).unwrap();
    let before = canvas.transform();
    Rotate::new(Swatch::new(2, 2, 1), 33.0)
        .paint(&mut canvas, IRect::from_size(8, 8), 0)
        .unwrap();
    Shear::new(Swatch::new(2, 2, 1), 10.0, 20.0)
        .paint(&mut canvas, IRect::from_size(8, 8), 0)
        .unwrap();
    assert_eq!(canvas.transform(), before);
}

use super::*;
use crate::widget::paint_widget;
use crate::widget::testing::Swatch;

#[test]
fn unsized_block_fills_outer_bounds() {
    let block = Block::new().with_color(Rgba8::rgb(9, 9, 9));
    let outer = IRect::from_size(5, 3);
    assert_eq!(block.paint_bounds(outer, 0), outer);
    let img = paint_widget(&block, outer, 0).unwrap();
    assert!(img.pixels().all(|p| p.0 == [9, 9, 9, 255]));
}

#[test]
fn child_is_centered_inside_padding() {
    let block = Block::new()
        .with_size(10, 10)
        .with_padding(1)
        .with_child(Swatch::new(2, 2, 1));
    let img = paint_widget(&block, IRect::from_size(10, 10), 0).unwrap();
    assert_eq!(img.get_pixel(4, 4).0, [0, 0, 200, 255]);
    assert_eq!(img.get_pixel(5, 5).0, [0, 0, 200, 255]);
    assert_eq!(img.get_pixel(3, 3).0[3], 0);
    assert_eq!(img.get_pixel(6, 6).0[3], 0);
}

#[test]
fn frame_count_follows_child() {
    let outer = IRect::from_size(8, 8);
    assert_eq!(Block::new().frame_count(outer), 1);
    assert_eq!(
        Block::new().with_child(Swatch::new(1, 1, 7)).frame_count(outer),
        7
    );
}

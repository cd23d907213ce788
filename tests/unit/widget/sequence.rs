use super::*;
use crate::widget::paint_widget;
use crate::widget::testing::Swatch;

const OUTER: IRect = IRect {
    x0: 0,
    y0: 0,
    x1: 16,
    y1: 16,
};

fn seq(counts: &[usize]) -> Sequence {
    Sequence::new(
        counts
            .iter()
            .enumerate()
            .map(|(i, &n)| Box::new(Swatch::new(i as i32 + 1, 1, n)) as BoxedWidget)
            .collect(),
    )
}

#[test]
fn frame_count_is_sum_of_children() {
    let cases: [&[usize]; 4] = [&[], &[1], &[3, 1, 4], &[0, 2, 0, 5]];
    for counts in cases {
        let s = seq(counts);
        assert_eq!(s.frame_count(OUTER), counts.iter().sum::<usize>());
    }
}

#[test]
fn global_index_maps_to_child_and_local_index() {
    let s = seq(&[3, 1, 4]);
    let expected = [
        (1, 0),
        (1, 1),
        (1, 2),
        (2, 0),
        (3, 0),
        (3, 1),
        (3, 2),
        (3, 3),
    ];
    for (i, &(width, local)) in expected.iter().enumerate() {
        let (child, got_local) = s.locate(OUTER, i).unwrap();
        assert_eq!(got_local, local, "frame {i}");
        assert_eq!(child.paint_bounds(OUTER, 0).width(), width, "frame {i}");
        assert_eq!(s.paint_bounds(OUTER, i).width(), width);
    }
}

#[test]
fn zero_frame_children_are_skipped() {
    let s = seq(&[0, 2]);
    assert_eq!(s.paint_bounds(OUTER, 0).width(), 2);
}

#[test]
fn out_of_range_index_is_empty_and_paints_nothing() {
    let s = seq(&[2, 2]);
    let n = s.frame_count(OUTER);
    for i in [n, n + 1, n + 100] {
        assert_eq!(s.paint_bounds(OUTER, i), IRect::EMPTY);
        let mut canvas = Canvas::new(4, 4).unwrap();
        s.paint(&mut canvas, OUTER, i).unwrap();
        assert_eq!(canvas.draw_ops(), 0);
    }
}

#[test]
fn paint_delegates_local_frame_and_restores_transform() {
    let s = seq(&[2, 3]);
    let img = paint_widget(&s, IRect::from_size(4, 1), 4).unwrap();
    // Swatch encodes its local frame in the red channel.
    assert_eq!(img.get_pixel(0, 0).0, [2, 0, 200, 255]);

    let mut canvas = Canvas::new(4, 4).unwrap();
    canvas.translate(1.0, 1.0);
    let before = canvas.transform();
    s.paint(&mut canvas, OUTER, 1).unwrap();
    assert_eq!(canvas.transform(), before);
}

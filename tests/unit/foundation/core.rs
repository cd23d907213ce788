use super::*;

#[test]
fn irect_sizes_and_emptiness() {
    let r = IRect::from_size(7, 3);
    assert_eq!((r.width(), r.height()), (7, 3));
    assert!(!r.is_empty());
    assert!(IRect::EMPTY.is_empty());
    assert!(IRect::from_size(5, 0).is_empty());
    assert_eq!(IRect::new(2, 2, 1, 1).width(), 0);
}

#[test]
fn irect_from_extent_rounds_up() {
    assert_eq!(IRect::from_extent(2.1, 3.0), IRect::from_size(3, 3));
    assert_eq!(IRect::from_extent(-4.0, f64::NAN), IRect::EMPTY);
}

#[test]
fn hex_colors_parse_all_forms() {
    assert_eq!(Rgba8::from_hex("#f00").unwrap(), Rgba8::rgb(255, 0, 0));
    assert_eq!(
        Rgba8::from_hex("0f08").unwrap(),
        Rgba8::new(0, 255, 0, 136)
    );
    assert_eq!(
        Rgba8::from_hex("#102030").unwrap(),
        Rgba8::rgb(0x10, 0x20, 0x30)
    );
    assert_eq!(
        Rgba8::from_hex("#10203040").unwrap(),
        Rgba8::new(0x10, 0x20, 0x30, 0x40)
    );
    assert!(Rgba8::from_hex("#12345").is_err());
    assert!(Rgba8::from_hex("#zzz").is_err());
}

#[test]
fn premultiply_round_trips_opaque_and_clears_transparent() {
    let c = Rgba8::new(200, 100, 50, 255);
    assert_eq!(c.premultiplied().to_straight(), c);
    let clear = Rgba8::new(200, 100, 50, 0).premultiplied();
    assert_eq!(clear, Rgba8Premul::transparent());
}

#[test]
fn canvas_meta_scales_when_2x() {
    let meta = CanvasMeta::default();
    assert_eq!((meta.scaled_width(), meta.scaled_height()), (64, 32));
    let meta = meta.with_2x(true).unwrap();
    assert_eq!((meta.scaled_width(), meta.scaled_height()), (128, 64));
    assert_eq!(meta.bounds(), IRect::from_size(128, 64));
}

#[test]
fn canvas_meta_rejects_degenerate_sizes() {
    assert!(CanvasMeta::new(0, 32).is_err());
    assert!(CanvasMeta::new(40_000, 10).unwrap().with_2x(true).is_err());
}

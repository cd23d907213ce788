use super::*;

fn gradient(w: u32, h: u32) -> RgbaImage {
    RgbaImage::from_fn(w, h, |x, y| {
        let v = (x * 37 + y * 101) as u8;
        image::Rgba([v, v.wrapping_mul(3), v ^ 0x5a, (x * 17 + y) as u8])
    })
}

struct Fails;

impl ImageFilter for Fails {
    fn name(&self) -> &str {
        "fails"
    }

    fn apply(&self, _img: RgbaImage) -> LoomResult<RgbaImage> {
        Err(LoomError::validation("nope"))
    }
}

struct AddRed(u8);

impl ImageFilter for AddRed {
    fn name(&self) -> &str {
        "add_red"
    }

    fn apply(&self, mut img: RgbaImage) -> LoomResult<RgbaImage> {
        for p in img.pixels_mut() {
            p.0[0] = p.0[0].saturating_add(self.0);
        }
        Ok(img)
    }
}

#[test]
fn magnify_zero_and_one_are_passthrough() {
    let img = gradient(5, 4);
    assert_eq!(Magnify(0).apply(img.clone()).unwrap(), img);
    assert_eq!(Magnify(1).apply(img.clone()).unwrap(), img);
}

#[test]
fn magnify_replicates_pixels_into_blocks() {
    let img = gradient(2, 2);
    let out = Magnify(3).apply(img.clone()).unwrap();
    assert_eq!(out.dimensions(), (6, 6));
    for y in 0..6 {
        for x in 0..6 {
            assert_eq!(out.get_pixel(x, y), img.get_pixel(x / 3, y / 3), "({x},{y})");
        }
    }
}

#[test]
fn magnify_rejects_oversized_output() {
    let img = RgbaImage::new(2, 1);
    assert!(Magnify(u32::MAX).apply(img).is_err());
    let img = RgbaImage::new(300, 1);
    assert!(Magnify(300).apply(img).is_err());
}

#[test]
fn identity_matrix_is_byte_exact() {
    let img = gradient(17, 9);
    let out = ColorMatrix::from(ColorFilter::None).apply(img.clone()).unwrap();
    assert_eq!(out.as_raw(), img.as_raw());
}

#[test]
fn bw_on_pure_red_uses_bt601_weight_and_keeps_alpha() {
    let img = RgbaImage::from_pixel(1, 1, image::Rgba([255, 0, 0, 99]));
    let out = ColorMatrix::from(ColorFilter::Bw).apply(img).unwrap();
    let expected = (255.0 * 0.299f64).floor() as u8;
    assert_eq!(out.get_pixel(0, 0).0, [expected, expected, expected, 99]);
    assert_eq!(expected, 76);
}

#[test]
fn matrix_output_clamps_both_ends() {
    let img = RgbaImage::from_pixel(1, 1, image::Rgba([250, 250, 250, 255]));
    let out = ColorMatrix::from(ColorFilter::Pastel).apply(img).unwrap();
    assert_eq!(out.get_pixel(0, 0).0, [255, 255, 255, 255]);

    let img = RgbaImage::from_pixel(1, 1, image::Rgba([0, 0, 200, 255]));
    let out = ColorMatrix([[0.0, 0.0, -1.0], [0.0; 3], [0.0; 3]])
        .apply(img)
        .unwrap();
    assert_eq!(out.get_pixel(0, 0).0, [0, 0, 0, 255]);
}

#[test]
fn dimmed_quarters_channels() {
    let img = RgbaImage::from_pixel(1, 1, image::Rgba([200, 100, 3, 10]));
    let out = ColorMatrix::from(ColorFilter::Dimmed).apply(img).unwrap();
    assert_eq!(out.get_pixel(0, 0).0, [50, 25, 0, 10]);
}

#[test]
fn chain_applies_in_order() {
    let chain = FilterChain::new().with(AddRed(10)).with(Magnify(2));
    assert_eq!(chain.len(), 2);
    assert_eq!(chain.names(), vec!["add_red", "magnify"]);
    let img = RgbaImage::from_pixel(1, 1, image::Rgba([5, 0, 0, 255]));
    let out = chain.apply(img).unwrap();
    assert_eq!(out.dimensions(), (2, 2));
    assert!(out.pixels().all(|p| p.0 == [15, 0, 0, 255]));
}

#[test]
fn chain_stops_at_first_failure_and_reports_position() {
    let chain = FilterChain::new()
        .with(Magnify(2))
        .with(Fails)
        .with(AddRed(1));
    let err = chain.apply(RgbaImage::new(1, 1)).unwrap_err();
    match err {
        LoomError::Filter {
            index,
            name,
            source,
        } => {
            assert_eq!(index, 1);
            assert_eq!(name, "fails");
            assert!(matches!(*source, LoomError::Validation(_)));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn empty_chain_is_identity() {
    let img = gradient(3, 3);
    let chain = FilterChain::new();
    assert!(chain.is_empty());
    assert_eq!(chain.apply(img.clone()).unwrap(), img);
}

#[test]
fn flips_mirror_pixels() {
    let img = gradient(3, 2);
    let h = PixelEffect::FlipHorizontal.run(img.clone());
    let v = PixelEffect::FlipVertical.run(img.clone());
    assert_eq!(h.get_pixel(0, 0), img.get_pixel(2, 0));
    assert_eq!(v.get_pixel(1, 0), img.get_pixel(1, 1));
}

#[test]
fn invert_keeps_alpha() {
    let img = RgbaImage::from_pixel(1, 1, image::Rgba([10, 20, 30, 40]));
    let out = PixelEffect::Invert.run(img);
    assert_eq!(out.get_pixel(0, 0).0, [245, 235, 225, 40]);
}

#[test]
fn brightness_extremes() {
    let img = RgbaImage::from_pixel(1, 1, image::Rgba([100, 50, 0, 200]));
    let black = PixelEffect::Brightness { change: -1.0 }.run(img.clone());
    assert_eq!(black.get_pixel(0, 0).0, [0, 0, 0, 200]);
    let same = PixelEffect::Brightness { change: 0.0 }.run(img.clone());
    assert_eq!(same, img);
    let double = PixelEffect::Brightness { change: 1.0 }.run(img);
    assert_eq!(double.get_pixel(0, 0).0, [200, 100, 0, 200]);
}

#[test]
fn threshold_splits_on_luma() {
    let img = RgbaImage::from_fn(2, 1, |x, _| {
        if x == 0 {
            image::Rgba([250, 250, 250, 255])
        } else {
            image::Rgba([10, 10, 10, 128])
        }
    });
    let out = PixelEffect::Threshold { level: 128 }.run(img);
    assert_eq!(out.get_pixel(0, 0).0, [255, 255, 255, 255]);
    assert_eq!(out.get_pixel(1, 0).0, [0, 0, 0, 128]);
}

#[test]
fn saturation_minus_one_removes_color() {
    let img = RgbaImage::from_pixel(1, 1, image::Rgba([255, 0, 0, 255]));
    let out = PixelEffect::Saturation { factor: -1.0 }.run(img);
    let [r, g, b, a] = out.get_pixel(0, 0).0;
    assert_eq!((r, a), (g, 255));
    assert_eq!(g, b);
}

#[test]
fn sharpen_and_edges_leave_flat_images_alone() {
    let flat = RgbaImage::from_pixel(4, 4, image::Rgba([90, 90, 90, 255]));
    assert_eq!(PixelEffect::Sharpen.run(flat.clone()), flat);
    let edges = PixelEffect::EdgeDetection { radius: 1.0 }.run(flat);
    assert!(edges.pixels().all(|p| p.0 == [0, 0, 0, 255]));
}

#[test]
fn blur_padding_is_three_radii() {
    assert_eq!(PixelEffect::Blur { radius: 1.2 }.padding(), 4);
    assert_eq!(PixelEffect::Blur { radius: 0.0 }.padding(), 0);
    assert_eq!(PixelEffect::Sepia.padding(), 0);
    assert_eq!(PixelEffect::Blur { radius: 1e9 }.padding(), 65_535);
    assert_eq!(PixelEffect::Blur { radius: f64::INFINITY }.padding(), 65_535);
    assert_eq!(PixelEffect::Blur { radius: f64::NAN }.padding(), 0);
    let img = gradient(6, 6);
    let out = PixelEffect::Blur { radius: 1.0 }.run(img);
    assert_eq!(out.dimensions(), (6, 6));
}

#[test]
fn hue_rotation_keeps_grays_and_alpha() {
    let gray = RgbaImage::from_pixel(2, 2, image::Rgba([128, 128, 128, 77]));
    let out = PixelEffect::Hue { change: 120 }.run(gray);
    for p in out.pixels() {
        for c in &p.0[..3] {
            assert!((127..=129).contains(c), "{p:?}");
        }
        assert_eq!(p.0[3], 77);
    }

    let red = RgbaImage::from_pixel(1, 1, image::Rgba([255, 0, 0, 255]));
    let [r, g, b, a] = PixelEffect::Hue { change: 180 }.run(red).get_pixel(0, 0).0;
    assert!(r < g && g == b, "{:?}", [r, g, b]);
    assert_eq!(a, 255);
}

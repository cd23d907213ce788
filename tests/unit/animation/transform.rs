use super::*;

fn samples() -> [(Transform, Transform); 4] {
    [
        (
            Transform::Translate { x: -3.0, y: 4.0 },
            Transform::Translate { x: 5.0, y: 10.0 },
        ),
        (
            Transform::Rotate { angle: 10.0 },
            Transform::Rotate { angle: 190.0 },
        ),
        (
            Transform::Scale { x: 0.5, y: 2.0 },
            Transform::Scale { x: 1.5, y: 1.0 },
        ),
        (
            Transform::Shear {
                x_angle: 0.0,
                y_angle: 15.0,
            },
            Transform::Shear {
                x_angle: 30.0,
                y_angle: -15.0,
            },
        ),
    ]
}

#[test]
fn same_variant_interpolation_hits_endpoints() {
    for (a, b) in samples() {
        assert_eq!(a.interpolate(&b, 0.0), (a, true));
        assert_eq!(a.interpolate(&b, 1.0), (b, true));
    }
}

#[test]
fn interpolation_is_componentwise_linear() {
    let a = Transform::Translate { x: 0.0, y: 10.0 };
    let b = Transform::Translate { x: 8.0, y: 20.0 };
    assert_eq!(
        a.interpolate(&b, 0.25).0,
        Transform::Translate { x: 2.0, y: 12.5 }
    );
    let a = Transform::Rotate { angle: 0.0 };
    let b = Transform::Rotate { angle: 90.0 };
    assert_eq!(a.interpolate(&b, 0.5).0, Transform::Rotate { angle: 45.0 });
}

#[test]
fn cross_variant_interpolation_yields_identity_not_ok() {
    let rotate = Transform::Rotate { angle: 45.0 };
    let scale = Transform::Scale { x: 2.0, y: 2.0 };
    let translate = Transform::Translate { x: 1.0, y: 1.0 };
    let shear = Transform::Shear {
        x_angle: 5.0,
        y_angle: 5.0,
    };
    assert_eq!(
        rotate.interpolate(&scale, 0.5),
        (Transform::ROTATE_DEFAULT, false)
    );
    assert_eq!(
        scale.interpolate(&rotate, 0.5),
        (Transform::SCALE_DEFAULT, false)
    );
    assert_eq!(
        translate.interpolate(&shear, 0.5),
        (Transform::TRANSLATE_DEFAULT, false)
    );
    assert_eq!(
        shear.interpolate(&translate, 0.5),
        (Transform::SHEAR_DEFAULT, false)
    );
}

#[test]
fn identity_values_match_defaults() {
    assert_eq!(
        Transform::Scale { x: 3.0, y: 4.0 }.identity(),
        Transform::Scale { x: 1.0, y: 1.0 }
    );
    assert_eq!(
        Transform::Rotate { angle: 3.0 }.identity(),
        Transform::Rotate { angle: 0.0 }
    );
}

#[test]
fn rounding_policies() {
    assert_eq!(Rounding::Round.apply(1.5), 2.0);
    assert_eq!(Rounding::Floor.apply(1.7), 1.0);
    assert_eq!(Rounding::Ceil.apply(1.2), 2.0);
    assert_eq!(Rounding::None.apply(1.2), 1.2);
    assert_eq!(Rounding::default(), Rounding::Round);
}

#[test]
fn fill_modes_and_origin() {
    assert_eq!(FillMode::Forwards.value(), 1.0);
    assert_eq!(FillMode::Backwards.value(), 0.0);
    let o = Origin::default().resolve(IRect::from_size(64, 32));
    assert_eq!(o, Vec2::new(32.0, 16.0));
    let o = Origin::new(0.0, 1.0).resolve(IRect::from_size(10, 20));
    assert_eq!(o, Vec2::new(0.0, 20.0));
}

#[test]
fn translate_snaps_through_rounding() {
    let mut canvas = Canvas::new(8, 8).unwrap();
    Transform::Translate { x: 1.4, y: 2.6 }.apply(&mut canvas, Vec2::ZERO, Rounding::Round);
    assert_eq!(
        canvas.transform(),
        kurbo::Affine::translate(Vec2::new(1.0, 3.0))
    );

    let mut canvas = Canvas::new(8, 8).unwrap();
    Transform::Translate { x: 1.4, y: 2.6 }.apply(&mut canvas, Vec2::ZERO, Rounding::None);
    assert_eq!(
        canvas.transform(),
        kurbo::Affine::translate(Vec2::new(1.4, 2.6))
    );
}

#[test]
fn rotate_keeps_origin_fixed() {
    let mut canvas = Canvas::new(8, 8).unwrap();
    let origin = Vec2::new(4.0, 4.0);
    Transform::Rotate { angle: 90.0 }.apply(&mut canvas, origin, Rounding::Round);
    let p = canvas.transform() * Point::new(4.0, 4.0);
    assert!((p.x - 4.0).abs() < 1e-9 && (p.y - 4.0).abs() < 1e-9);
    let q = canvas.transform() * Point::new(6.0, 4.0);
    assert!((q.x - 4.0).abs() < 1e-9 && (q.y - 6.0).abs() < 1e-9);
}

#[test]
fn scale_keeps_origin_fixed() {
    let mut canvas = Canvas::new(8, 8).unwrap();
    Transform::Scale { x: 2.0, y: 3.0 }.apply(&mut canvas, Vec2::new(2.0, 2.0), Rounding::Round);
    let p = canvas.transform() * Point::new(2.0, 2.0);
    assert!((p.x - 2.0).abs() < 1e-9 && (p.y - 2.0).abs() < 1e-9);
    let q = canvas.transform() * Point::new(3.0, 3.0);
    assert!((q.x - 4.0).abs() < 1e-9 && (q.y - 5.0).abs() < 1e-9);
}

#[test]
fn shear_uses_radians_as_the_skew_factor() {
    let mut canvas = Canvas::new(8, 8).unwrap();
    Transform::Shear {
        x_angle: 45.0,
        y_angle: 0.0,
    }
    .apply(&mut canvas, Vec2::ZERO, Rounding::Round);
    let c = canvas.transform().as_coeffs();
    assert!((c[2] - std::f64::consts::FRAC_PI_4).abs() < 1e-12, "{c:?}");
    assert_eq!([c[0], c[1], c[3], c[4], c[5]], [1.0, 0.0, 1.0, 0.0, 0.0]);

    let mut canvas = Canvas::new(8, 8).unwrap();
    Transform::Shear {
        x_angle: 0.0,
        y_angle: 90.0,
    }
    .apply(&mut canvas, Vec2::new(2.0, 2.0), Rounding::Round);
    let pivot = canvas.transform() * Point::new(2.0, 2.0);
    assert!((pivot.x - 2.0).abs() < 1e-9 && (pivot.y - 2.0).abs() < 1e-9);
    let q = canvas.transform() * Point::new(3.0, 2.0);
    assert!((q.y - (2.0 + std::f64::consts::FRAC_PI_2)).abs() < 1e-9, "{q:?}");
}

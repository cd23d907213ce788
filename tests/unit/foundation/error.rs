use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        LoomError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        LoomError::animation("x")
            .to_string()
            .contains("animation error:")
    );
    assert!(LoomError::paint("x").to_string().contains("paint error:"));
    assert!(LoomError::codec("x").to_string().contains("codec error:"));
    assert!(
        LoomError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn filter_wrapping_names_position_and_source() {
    let err = LoomError::validation("bad pixel").in_filter(2, "magnify");
    let msg = err.to_string();
    assert!(msg.contains("filter 2 (magnify)"));
    assert!(msg.contains("bad pixel"));
    match err {
        LoomError::Filter { index, source, .. } => {
            assert_eq!(index, 2);
            assert!(matches!(*source, LoomError::Validation(_)));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = LoomError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn json_errors_map_to_serde() {
    let err: LoomError = serde_json::from_str::<u32>("nope").unwrap_err().into();
    assert!(matches!(err, LoomError::Serde(_)));
}

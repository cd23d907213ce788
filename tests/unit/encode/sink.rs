use super::*;

#[test]
fn budget_clamps_the_last_frame() {
    assert_eq!(frame_durations(5, 50, 120), [50, 50, 20]);
    assert_eq!(frame_durations(5, 50, 100), [50, 50]);
}

#[test]
fn zero_budget_means_unlimited() {
    assert_eq!(frame_durations(4, 50, 0), [50; 4]);
}

#[test]
fn tiny_budget_still_emits_one_frame() {
    assert_eq!(frame_durations(5, 50, 10), [10]);
    assert_eq!(frame_durations(1, 50, 1), [1]);
}

#[test]
fn no_frames_no_durations() {
    assert!(frame_durations(0, 50, 120).is_empty());
    assert!(frame_durations(0, 50, 0).is_empty());
}

#[test]
fn budget_larger_than_animation_keeps_every_frame() {
    assert_eq!(frame_durations(3, 50, 1000), [50, 50, 50]);
}

#[test]
fn in_memory_sink_records_frames() {
    let mut sink = InMemorySink::new();
    sink.begin(SinkConfig {
        width: 2,
        height: 1,
        frame_count: 2,
    })
    .unwrap();
    let frame = RgbaImage::from_raw(2, 1, vec![1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
    sink.push_frame(&frame, 50).unwrap();
    sink.push_frame(&frame, 20).unwrap();
    assert_eq!(sink.durations, [50, 20]);
    assert_eq!(sink.total_duration_ms(), 70);
    assert_eq!(sink.finish().unwrap().len(), 16);
}

#[test]
fn mismatched_frame_size_is_a_codec_error() {
    let mut sink = InMemorySink::new();
    sink.begin(SinkConfig {
        width: 2,
        height: 2,
        frame_count: 1,
    })
    .unwrap();
    let err = sink.push_frame(&RgbaImage::new(3, 2), 50).unwrap_err();
    assert!(matches!(err, LoomError::Codec(_)));
}

#[test]
fn push_before_begin_fails() {
    let mut sink = InMemorySink::new();
    assert!(sink.push_frame(&RgbaImage::new(1, 1), 50).is_err());
}

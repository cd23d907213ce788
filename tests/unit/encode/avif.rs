use image::Rgba;

use super::*;

fn cfg(frame_count: usize) -> SinkConfig {
    SinkConfig {
        width: 4,
        height: 4,
        frame_count,
    }
}

fn fast() -> AvifOpts {
    AvifOpts {
        speed: 10,
        quality: 60,
    }
}

fn solid(px: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(4, 4, Rgba(px))
}

/// `(sample_count, sample_delta)` pairs of the first `stts` box.
fn sample_durations(bytes: &[u8]) -> Vec<(u32, u32)> {
    let at = bytes.windows(4).position(|w| w == b"stts").unwrap();
    let be = |i: usize| u32::from_be_bytes([bytes[i], bytes[i + 1], bytes[i + 2], bytes[i + 3]]);
    let entries = be(at + 8) as usize;
    (0..entries)
        .map(|i| (be(at + 12 + i * 8), be(at + 16 + i * 8)))
        .collect()
}

#[test]
fn single_frame_encodes_to_a_still_avif() {
    let mut sink = AvifSink::new(fast());
    sink.begin(cfg(1)).unwrap();
    sink.push_frame(&solid([9, 90, 200, 255]), 50).unwrap();
    let bytes = sink.finish().unwrap();
    assert_eq!(&bytes[4..8], b"ftyp");
    assert_eq!(&bytes[8..12], b"avif");
    assert!(libavif::is_avif(&bytes));
    assert!(!bytes.windows(4).any(|w| w == b"stts"));
}

#[test]
fn several_frames_become_a_timed_sequence() {
    let mut sink = AvifSink::new(fast());
    sink.begin(cfg(3)).unwrap();
    sink.push_frame(&solid([255, 0, 0, 255]), 50).unwrap();
    sink.push_frame(&solid([0, 255, 0, 255]), 50).unwrap();
    sink.push_frame(&solid([0, 0, 255, 255]), 20).unwrap();
    let bytes = sink.finish().unwrap();
    assert_eq!(&bytes[8..12], b"avis");
    assert!(libavif::is_avif(&bytes));
    assert_eq!(sample_durations(&bytes), [(2, 50), (1, 20)]);
}

#[test]
fn nothing_pushed_yields_no_bytes() {
    let mut sink = AvifSink::new(AvifOpts::default());
    sink.begin(cfg(0)).unwrap();
    assert!(sink.finish().unwrap().is_empty());
}

#[test]
fn mismatched_frames_and_empty_canvases_are_rejected() {
    let mut sink = AvifSink::new(fast());
    assert!(matches!(
        sink.begin(SinkConfig {
            width: 0,
            height: 4,
            frame_count: 1,
        }),
        Err(LoomError::Codec(_))
    ));
    sink.begin(cfg(1)).unwrap();
    assert!(sink.push_frame(&RgbaImage::new(3, 4), 50).is_err());
}

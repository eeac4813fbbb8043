//! End-to-end tests of the worker engine: raw bands in, composited
//! frames out.

use std::time::{Duration, Instant};

use sky_core::{BandColor, Dims, FrameBuffer};
use sky_ops::ScaleWindow;
use sky_render::{Engine, RenderConfig, RenderEvent};

const DEADLINE: Duration = Duration::from_secs(10);

fn identity_config() -> RenderConfig {
    RenderConfig { gamma: 1.0 }
}

/// Polls until a frame satisfying `pred` arrives, or panics at the
/// deadline with the last frame seen.
fn wait_for_frame(engine: &mut Engine, pred: impl Fn(&FrameBuffer) -> bool) -> FrameBuffer {
    let start = Instant::now();
    let mut last: Option<FrameBuffer> = None;
    while start.elapsed() < DEADLINE {
        for event in engine.poll(Duration::from_millis(50)) {
            if let RenderEvent::FrameReady { frame } = event {
                if pred(&frame) {
                    return frame;
                }
                last = Some(frame);
            }
        }
    }
    panic!("no matching frame before deadline, last seen: {last:?}");
}

#[test]
fn test_single_red_band_end_to_end() {
    let dims = Dims::new(3, 1).unwrap();
    let mut engine = Engine::new(dims, identity_config());
    let red = engine.register_channel(BandColor::RED);

    engine.set_raw_band(red, dims, vec![0.0, 128.0, 255.0]).unwrap();
    engine
        .set_scale_window(red, ScaleWindow::new(0.0, 255.0).unwrap())
        .unwrap();

    let frame = wait_for_frame(&mut engine, |f| f.pixel(2) == [255, 0, 0, 255]);
    assert_eq!(frame.pixel(0), [0, 0, 0, 255]);
    assert_eq!(frame.pixel(1), [128, 0, 0, 255]);
    assert_eq!(frame.pixel(2), [255, 0, 0, 255]);
}

#[test]
fn test_two_bands_accumulate_into_rgb() {
    let dims = Dims::new(2, 2).unwrap();
    let mut engine = Engine::new(dims, identity_config());
    let red = engine.register_channel(BandColor::RED);
    let green = engine.register_channel(BandColor::GREEN);

    engine.set_raw_band(red, dims, vec![100.0; 4]).unwrap();
    engine.set_raw_band(green, dims, vec![50.0; 4]).unwrap();
    let window = ScaleWindow::new(0.0, 255.0).unwrap();
    engine.set_scale_window(red, window).unwrap();
    engine.set_scale_window(green, window).unwrap();

    let frame = wait_for_frame(&mut engine, |f| f.pixel(0) == [100, 50, 0, 255]);
    for j in 0..4 {
        assert_eq!(frame.pixel(j), [100, 50, 0, 255]);
    }
}

#[test]
fn test_clear_channels_yields_black_frame() {
    let dims = Dims::new(2, 1).unwrap();
    let mut engine = Engine::new(dims, identity_config());
    let red = engine.register_channel(BandColor::RED);

    engine.set_raw_band(red, dims, vec![200.0, 200.0]).unwrap();
    engine
        .set_scale_window(red, ScaleWindow::new(0.0, 255.0).unwrap())
        .unwrap();
    wait_for_frame(&mut engine, |f| f.pixel(0)[0] == 200);

    engine.clear_channels();
    assert_eq!(engine.channel_count(), 0);
    wait_for_frame(&mut engine, |f| f.pixel(0) == [0, 0, 0, 255]);
}

#[test]
fn test_mismatched_band_degrades_to_missing() {
    let dims = Dims::new(2, 1).unwrap();
    let mut engine = Engine::new(dims, identity_config());
    let red = engine.register_channel(BandColor::RED);
    let green = engine.register_channel(BandColor::GREEN);

    engine.set_raw_band(red, dims, vec![80.0, 80.0]).unwrap();
    // green arrives at a different size; it scales on its own surface but
    // stays out of the composite
    let odd = Dims::new(3, 1).unwrap();
    engine.set_raw_band(green, odd, vec![40.0; 3]).unwrap();

    let window = ScaleWindow::new(0.0, 255.0).unwrap();
    engine.set_scale_window(red, window).unwrap();
    engine.set_scale_window(green, window).unwrap();

    let frame = wait_for_frame(&mut engine, |f| f.pixel(0)[0] == 80);
    assert_eq!(frame.pixel(0), [80, 0, 0, 255]);
    assert_eq!(frame.pixel(1), [80, 0, 0, 255]);
}

#[test]
fn test_invalid_window_surfaces_as_error_event() {
    let dims = Dims::new(1, 1).unwrap();
    let mut engine = Engine::new(dims, identity_config());
    let red = engine.register_channel(BandColor::RED);
    engine.set_raw_band(red, dims, vec![10.0]).unwrap();
    engine
        .set_scale_window(red, ScaleWindow { low: 9.0, high: 9.0 })
        .unwrap();

    let start = Instant::now();
    loop {
        assert!(start.elapsed() < DEADLINE, "no error event before deadline");
        let events = engine.poll(Duration::from_millis(50));
        if events.iter().any(|e| {
            matches!(e, RenderEvent::ScalerError { channel, .. } if *channel == red)
        }) {
            break;
        }
    }
}

#[test]
fn test_rapid_windows_settle_on_newest() {
    let dims = Dims::new(1, 1).unwrap();
    let mut engine = Engine::new(dims, identity_config());
    let red = engine.register_channel(BandColor::RED);
    engine.set_raw_band(red, dims, vec![128.0]).unwrap();

    // burst of requests; only the newest is guaranteed to render
    for high in [1000.0, 500.0, 300.0, 255.0] {
        engine
            .set_scale_window(red, ScaleWindow::new(0.0, high).unwrap())
            .unwrap();
    }

    let frame = wait_for_frame(&mut engine, |f| f.pixel(0)[0] == 128);
    assert_eq!(frame.pixel(0), [128, 0, 0, 255]);
}

#[test]
fn test_register_filter_maps_colors() {
    let dims = Dims::new(1, 1).unwrap();
    let mut engine = Engine::new(dims, identity_config());
    assert!(engine.register_filter("h-alpha").is_some());
    assert!(engine.register_filter("oiii").is_some());
    assert!(engine.register_filter("unknown-filter").is_none());
    assert_eq!(engine.channel_count(), 2);
}

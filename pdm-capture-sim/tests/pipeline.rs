//! End-to-end pipeline tests against the simulated DMIC backend.
//!
//! These drive the real producer thread, so block sizes are kept small
//! (10 ms cadence) to keep the suite fast.

use std::sync::Arc;
use std::time::Duration;

use pdm_capture_core::{
    BlockPool, CaptureConfig, CaptureError, ChannelConfig, ChannelMap, DmicDriver, DriverConfig,
    PdmClockConfig, PdmSession, StreamConfig, Trigger,
};
use pdm_capture_sim::{DeviceRegistry, SimDmicDriver};

/// 320 bytes per channel = 10 ms blocks at 16 kHz / 16-bit.
fn fast_config(channels: u8) -> CaptureConfig {
    CaptureConfig {
        channels,
        block_size_bytes: 320 * channels as u32,
        ..Default::default()
    }
}

fn read_block(session: &mut PdmSession<SimDmicDriver>) -> Vec<u8> {
    for _ in 0..50 {
        let data = session.read_timeout(Duration::from_millis(100)).unwrap();
        if !data.is_empty() {
            return data;
        }
    }
    panic!("no block delivered within 5s");
}

#[test]
fn mono_capture_delivers_full_blocks() {
    let registry = DeviceRegistry::with_default_device();
    let mut session = registry.open_session("pdm0", 0).unwrap();

    session.configure(fast_config(1)).unwrap();
    session.start().unwrap();

    let first = read_block(&mut session);
    assert_eq!(first.len(), 320);
    assert_eq!(&first[..4], &[0, 1, 2, 3]);

    for _ in 0..4 {
        assert_eq!(read_block(&mut session).len(), 320);
    }

    session.stop().unwrap();
    assert!(session.state().is_configured());
}

#[test]
fn stereo_capture_doubles_the_block() {
    let registry = DeviceRegistry::with_default_device();
    let mut session = registry.open_session("pdm0", 0).unwrap();

    session.configure(fast_config(2)).unwrap();
    assert_eq!(session.channel_map().unwrap().low_word, 0b11);

    session.start().unwrap();
    assert_eq!(read_block(&mut session).len(), 640);
    session.stop().unwrap();
}

#[test]
fn short_timeout_reads_empty_without_error() {
    let registry = DeviceRegistry::with_default_device();
    let mut session = registry.open_session("pdm0", 0).unwrap();

    // Default config derives 100 ms blocks, so nothing completes in 5 ms.
    session.configure(CaptureConfig::default()).unwrap();
    session.start().unwrap();

    let data = session.read_timeout(Duration::from_millis(5)).unwrap();
    assert!(data.is_empty());
    assert!(session.state().is_running());

    session.stop().unwrap();
}

#[test]
fn stop_abandons_queued_blocks_back_to_the_pool() {
    let registry = DeviceRegistry::with_default_device();
    let mut session = registry.open_session("pdm0", 0).unwrap();

    session.configure(fast_config(1)).unwrap();
    session.start().unwrap();

    // Let the producer fill the whole pool without reading anything.
    std::thread::sleep(Duration::from_millis(120));
    session.stop().unwrap();

    assert_eq!(session.pool().free_blocks(), session.pool().total_blocks());
}

#[test]
fn restart_after_stop_captures_again() {
    let registry = DeviceRegistry::with_default_device();
    let mut session = registry.open_session("pdm0", 0).unwrap();

    session.configure(fast_config(1)).unwrap();
    session.start().unwrap();
    assert_eq!(read_block(&mut session).len(), 320);

    session.stop().unwrap();
    assert!(matches!(
        session.read(),
        Err(CaptureError::InvalidState(_))
    ));

    session.start().unwrap();
    assert_eq!(read_block(&mut session).len(), 320);
    session.stop().unwrap();
}

#[test]
fn hardware_envelope_rejections_surface_as_unsupported() {
    let registry = DeviceRegistry::with_default_device();
    let mut session = registry.open_session("pdm0", 0).unwrap();

    // 32-bit passes core validation but the simulated decimator is 16-bit.
    let err = session
        .configure(CaptureConfig {
            sample_width_bits: 32,
            ..Default::default()
        })
        .unwrap_err();
    assert!(matches!(err, CaptureError::Unsupported(_)));

    let err = session
        .configure(CaptureConfig {
            sample_rate_hz: 96000,
            block_size_bytes: 320,
            ..Default::default()
        })
        .unwrap_err();
    assert!(matches!(err, CaptureError::Unsupported(_)));

    // Rejections never advance the lifecycle.
    assert!(session.state().is_unconfigured());
}

#[test]
fn producer_counts_overruns_when_the_pool_stalls() {
    let registry = DeviceRegistry::with_default_device();
    let mut driver = registry.open("pdm0").unwrap();

    // Two 320-byte blocks fill within 20 ms; nobody reads, so later block
    // periods are lost to backpressure.
    let pool = Arc::new(BlockPool::new(2, 320));
    let config = DriverConfig {
        stream: StreamConfig {
            rate_hz: 16000,
            width_bits: 16,
            block_size: 320,
            pool: Arc::clone(&pool),
        },
        channel: ChannelConfig {
            channels: 1,
            map: ChannelMap::build(1).unwrap(),
        },
        clock: PdmClockConfig::default(),
    };
    driver.configure(&config).unwrap();

    driver.trigger(Trigger::Start).unwrap();
    std::thread::sleep(Duration::from_millis(100));
    driver.trigger(Trigger::Stop).unwrap();

    assert!(driver.overruns() > 0);
    assert_eq!(pool.free_blocks(), 2);
}

#[test]
fn open_session_fails_on_unknown_device() {
    let registry = DeviceRegistry::with_default_device();
    assert_eq!(
        registry.open_session("dmic7", 0).err(),
        Some(CaptureError::DeviceNotFound {
            name: "dmic7".into()
        })
    );
}

#[test]
fn session_prints_like_the_device() {
    let registry = DeviceRegistry::with_default_device();
    let mut session = registry.open_session("pdm0", 0).unwrap();
    session.configure(fast_config(2)).unwrap();

    assert_eq!(
        session.to_string(),
        "PDM(device=pdm0, stream=0, rate=16000, width=16, channels=2)"
    );
}

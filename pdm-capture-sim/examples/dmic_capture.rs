//! Capture a handful of blocks from the simulated microphone, mono then
//! stereo, printing the delivered buffer sizes.

use pdm_capture_core::{CaptureConfig, CaptureError};
use pdm_capture_sim::DeviceRegistry;

fn capture_blocks(registry: &DeviceRegistry, channels: u8) -> Result<(), CaptureError> {
    println!("PCM output rate: 16000, channels: {channels}");

    let mut session = registry.open_session("pdm0", 0)?;
    session.configure(CaptureConfig {
        channels,
        block_size_bytes: 320 * channels as u32,
        ..Default::default()
    })?;

    for i in 0..8 {
        session.start()?;
        let data = session.read()?;
        println!("{} - got buffer of {} bytes", i + 1, data.len());
        session.stop()?;
    }
    Ok(())
}

fn main() -> Result<(), CaptureError> {
    let registry = DeviceRegistry::with_default_device();

    capture_blocks(&registry, 1)?;
    capture_blocks(&registry, 2)?;
    Ok(())
}

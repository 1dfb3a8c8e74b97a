use std::sync::Arc;
use std::time::Duration;

use crate::channel_map::ChannelMap;
use crate::models::device::DeviceInfo;
use crate::models::error::CaptureError;
use crate::pool::{BlockPool, PooledBlock};

/// Hardware command starting or stopping the peripheral's data production.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Start,
    Stop,
}

/// Per-stream PCM parameters handed to the driver.
///
/// The block pool rides along with the stream configuration: the driver
/// acquires blocks from it while capturing and the consumer releases them
/// after copy-out.
#[derive(Debug, Clone)]
pub struct StreamConfig {
    pub rate_hz: u32,
    pub width_bits: u8,
    pub block_size: usize,
    pub pool: Arc<BlockPool>,
}

/// Channel routing handed to the driver.
#[derive(Debug, Clone, Copy)]
pub struct ChannelConfig {
    pub channels: u8,
    pub map: ChannelMap,
}

/// PDM clock envelope the hardware may pick an operating point from.
#[derive(Debug, Clone, Copy)]
pub struct PdmClockConfig {
    pub min_clk_hz: u32,
    pub max_clk_hz: u32,
    pub min_duty_pct: u8,
    pub max_duty_pct: u8,
}

impl Default for PdmClockConfig {
    fn default() -> Self {
        Self {
            min_clk_hz: 1_000_000,
            max_clk_hz: 3_500_000,
            min_duty_pct: 40,
            max_duty_pct: 60,
        }
    }
}

/// Full hardware configuration applied in one `configure` call.
#[derive(Debug, Clone)]
pub struct DriverConfig {
    pub stream: StreamConfig,
    pub channel: ChannelConfig,
    pub clock: PdmClockConfig,
}

/// Interface to a digital-microphone capture peripheral.
///
/// Implemented by hardware backends; [`PdmSession`](crate::PdmSession) drives
/// it through the configure/trigger/read lifecycle. The driver is the block
/// producer: it acquires blocks from the configured pool, fills them
/// asynchronously, and hands each completed block over exactly once through
/// [`read`](DmicDriver::read).
pub trait DmicDriver: Send {
    /// Identity of the device backing this driver.
    fn device_info(&self) -> DeviceInfo;

    /// Apply a full hardware configuration.
    ///
    /// Fails with `InvalidArgument`, `Unsupported`, or `Io` depending on why
    /// the peripheral rejects it. Must not disturb an applied configuration
    /// on failure.
    fn configure(&mut self, config: &DriverConfig) -> Result<(), CaptureError>;

    /// Start or stop data production.
    ///
    /// Stopping abandons any in-flight blocks back to the pool unread.
    fn trigger(&mut self, trigger: Trigger) -> Result<(), CaptureError>;

    /// Pull the next completed block, waiting up to `timeout`.
    ///
    /// `Ok(None)` means the wait elapsed with no block available: a normal
    /// outcome for a polling consumer, not an error.
    fn read(
        &mut self,
        stream_id: u8,
        timeout: Duration,
    ) -> Result<Option<PooledBlock>, CaptureError>;
}

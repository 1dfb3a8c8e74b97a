use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::channel_map::ChannelMap;
use crate::models::config::CaptureConfig;
use crate::models::device::DeviceInfo;
use crate::models::error::CaptureError;
use crate::models::state::CaptureState;
use crate::pool::BlockPool;
use crate::traits::dmic_driver::{
    ChannelConfig, DmicDriver, DriverConfig, PdmClockConfig, StreamConfig, Trigger,
};

/// Bounded wait used by [`PdmSession::read`], matching a 100 ms block cadence.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(100);

/// A capture session bound to one digital-microphone device.
///
/// Owns the device driver, the block pool, and the active configuration, and
/// enforces the configure/start/stop/read ordering. Generic over the hardware
/// backend via [`DmicDriver`].
///
/// All operations are `&mut self`: a session is driven from one logical
/// thread while the driver's producer fills pool blocks concurrently.
pub struct PdmSession<D: DmicDriver> {
    driver: D,
    stream_id: u8,
    pool: Arc<BlockPool>,
    config: CaptureConfig,
    map: Option<ChannelMap>,
    state: CaptureState,
}

impl<D: DmicDriver> PdmSession<D> {
    /// Bind a session to `driver` on stream 0 with a default-sized pool.
    pub fn new(driver: D) -> Self {
        Self::with_stream(driver, 0)
    }

    /// Bind a session to `driver` on the given hardware stream index.
    pub fn with_stream(driver: D, stream_id: u8) -> Self {
        Self::with_pool(driver, stream_id, Arc::new(BlockPool::with_defaults()))
    }

    /// Bind a session with a caller-supplied pool.
    ///
    /// The pool is reused across configure/start/stop cycles for the life of
    /// the session; it is never reallocated.
    pub fn with_pool(driver: D, stream_id: u8, pool: Arc<BlockPool>) -> Self {
        Self {
            driver,
            stream_id,
            pool,
            config: CaptureConfig::default(),
            map: None,
            state: CaptureState::Unconfigured,
        }
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    /// The active configuration (defaults until `configure` succeeds).
    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    /// The active channel routing, once configured.
    pub fn channel_map(&self) -> Option<ChannelMap> {
        self.map
    }

    pub fn pool(&self) -> &BlockPool {
        &self.pool
    }

    pub fn stream_id(&self) -> u8 {
        self.stream_id
    }

    pub fn device_info(&self) -> DeviceInfo {
        self.driver.device_info()
    }

    /// Validate `config` and program it into the peripheral.
    ///
    /// On success the session's configuration and channel map are replaced
    /// atomically and the session transitions to `Configured`. On any failure
    /// the prior configuration, map, and state are left untouched.
    pub fn configure(&mut self, config: CaptureConfig) -> Result<(), CaptureError> {
        if self.state.is_running() {
            return Err(CaptureError::InvalidState(
                "cannot reconfigure while capture is running",
            ));
        }

        config.validate().map_err(CaptureError::InvalidArgument)?;

        let block_size = config.effective_block_size();
        if block_size > self.pool.block_size() {
            return Err(CaptureError::InvalidArgument(format!(
                "block size {} exceeds the pool's {}-byte blocks",
                block_size,
                self.pool.block_size()
            )));
        }

        let map = ChannelMap::build(config.channels)?;

        let driver_config = DriverConfig {
            stream: StreamConfig {
                rate_hz: config.sample_rate_hz,
                width_bits: config.sample_width_bits,
                block_size,
                pool: Arc::clone(&self.pool),
            },
            channel: ChannelConfig {
                channels: config.channels,
                map,
            },
            clock: PdmClockConfig::default(),
        };
        self.driver.configure(&driver_config)?;

        self.config = config;
        self.map = Some(map);
        self.state = CaptureState::Configured;
        Ok(())
    }

    /// Fire the start trigger. No-op when already running.
    pub fn start(&mut self) -> Result<(), CaptureError> {
        match self.state {
            CaptureState::Running => Ok(()),
            CaptureState::Unconfigured => Err(CaptureError::InvalidState(
                "not configured, call configure() first",
            )),
            CaptureState::Configured => {
                self.driver.trigger(Trigger::Start)?;
                self.state = CaptureState::Running;
                Ok(())
            }
        }
    }

    /// Fire the stop trigger. No-op when already stopped.
    ///
    /// Any blocks the peripheral had in flight are abandoned back to the pool
    /// unread.
    pub fn stop(&mut self) -> Result<(), CaptureError> {
        if !self.state.is_running() {
            return Ok(());
        }
        self.driver.trigger(Trigger::Stop)?;
        self.state = CaptureState::Configured;
        Ok(())
    }

    /// Pull one completed block with the default 100 ms wait.
    pub fn read(&mut self) -> Result<Vec<u8>, CaptureError> {
        self.read_timeout(DEFAULT_READ_TIMEOUT)
    }

    /// Pull one completed block, waiting up to `timeout`.
    ///
    /// Returns an empty buffer when the wait elapses with no data, so callers
    /// can poll without treating a quiet microphone as a failure. On success
    /// the block's bytes are copied into a fresh buffer sized to the
    /// delivered length and the block goes back to the pool before this
    /// method returns, on every exit path including destination allocation
    /// failure.
    pub fn read_timeout(&mut self, timeout: Duration) -> Result<Vec<u8>, CaptureError> {
        if !self.state.is_running() {
            return Err(CaptureError::InvalidState("not active, call start() first"));
        }

        let block = match self.driver.read(self.stream_id, timeout)? {
            Some(block) => block,
            None => return Ok(Vec::new()),
        };

        let mut out = Vec::new();
        if out.try_reserve_exact(block.len()).is_err() {
            self.pool.release(block);
            return Err(CaptureError::OutOfMemory);
        }
        out.extend_from_slice(block.bytes());
        self.pool.release(block);
        Ok(out)
    }
}

impl<D: DmicDriver> fmt::Display for PdmSession<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PDM(device={}, stream={}, rate={}, width={}, channels={})",
            self.driver.device_info().name,
            self.stream_id,
            self.config.sample_rate_hz,
            self.config.sample_width_bits,
            self.config.channels
        )
    }
}

//! Simulated DMIC capture driver.
//!
//! Stands in for a hardware PDM peripheral: a producer thread fills pool
//! blocks at the configured block cadence and queues them for the consumer.
//! The block payload is a deterministic byte ramp rather than audio; the
//! simulator exercises the pipeline, not the acoustics.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

use pdm_capture_core::{
    BlockPool, CaptureError, DeviceInfo, DmicDriver, DriverConfig, PooledBlock, Trigger,
};

const EIO: i32 = 5;
const EINVAL: i32 = 22;

/// PCM rate envelope the simulated peripheral accepts.
pub const MIN_RATE_HZ: u32 = 8_000;
pub const MAX_RATE_HZ: u32 = 48_000;

/// The simulated decimator only produces 16-bit PCM.
pub const SUPPORTED_WIDTH_BITS: u8 = 16;

/// Completed blocks waiting for the consumer, shared with the producer thread.
struct Delivered {
    queue: Mutex<VecDeque<PooledBlock>>,
    available: Condvar,
}

/// Hardware parameters captured at `configure` time.
struct AppliedConfig {
    block_size: usize,
    interval: Duration,
    pool: Arc<BlockPool>,
}

/// In-process driver that emulates a single-stream DMIC peripheral.
///
/// `trigger(Start)` spawns a producer thread; `trigger(Stop)` joins it and
/// abandons queued blocks back to the pool.
pub struct SimDmicDriver {
    info: DeviceInfo,
    config: Option<AppliedConfig>,
    delivered: Arc<Delivered>,
    running: Arc<AtomicBool>,
    overruns: Arc<AtomicU64>,
    producer: Option<thread::JoinHandle<()>>,
}

impl SimDmicDriver {
    pub fn new(info: DeviceInfo) -> Self {
        Self {
            info,
            config: None,
            delivered: Arc::new(Delivered {
                queue: Mutex::new(VecDeque::new()),
                available: Condvar::new(),
            }),
            running: Arc::new(AtomicBool::new(false)),
            overruns: Arc::new(AtomicU64::new(0)),
            producer: None,
        }
    }

    /// Block periods dropped because the pool was exhausted.
    pub fn overruns(&self) -> u64 {
        self.overruns.load(Ordering::Relaxed)
    }

    fn stop_producer(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.producer.take() {
            let _ = handle.join();
        }

        // Abandon queued blocks unread.
        if let Some(config) = &self.config {
            let mut queue = self.delivered.queue.lock();
            let abandoned = queue.len();
            while let Some(block) = queue.pop_front() {
                config.pool.release(block);
            }
            if abandoned > 0 {
                log::debug!("{}: abandoned {} queued blocks", self.info.name, abandoned);
            }
        }
    }
}

impl DmicDriver for SimDmicDriver {
    fn device_info(&self) -> DeviceInfo {
        self.info.clone()
    }

    fn configure(&mut self, config: &DriverConfig) -> Result<(), CaptureError> {
        if self.running.load(Ordering::SeqCst) {
            return Err(CaptureError::Io { errno: EIO });
        }

        let stream = &config.stream;
        if !(MIN_RATE_HZ..=MAX_RATE_HZ).contains(&stream.rate_hz) {
            return Err(CaptureError::Unsupported(format!(
                "pcm rate {} outside {}..={} Hz",
                stream.rate_hz, MIN_RATE_HZ, MAX_RATE_HZ
            )));
        }
        if stream.width_bits != SUPPORTED_WIDTH_BITS {
            return Err(CaptureError::Unsupported(format!(
                "sample width {} (simulated decimator is 16-bit only)",
                stream.width_bits
            )));
        }

        let channels = config.channel.channels;
        if channels == 0 || channels != config.channel.map.channel_count() {
            return Err(CaptureError::InvalidArgument(format!(
                "channel count {channels} does not match the routing map"
            )));
        }

        let frame_bytes = (stream.width_bits as usize / 8) * channels as usize;
        if stream.block_size == 0 || stream.block_size % frame_bytes != 0 {
            return Err(CaptureError::InvalidArgument(format!(
                "block size {} is not a multiple of the {}-byte frame",
                stream.block_size, frame_bytes
            )));
        }
        if stream.block_size > stream.pool.block_size() {
            return Err(CaptureError::InvalidArgument(format!(
                "block size {} exceeds pool blocks of {} bytes",
                stream.block_size,
                stream.pool.block_size()
            )));
        }

        let byte_rate = stream.rate_hz as u64 * frame_bytes as u64;
        let interval =
            Duration::from_micros(stream.block_size as u64 * 1_000_000 / byte_rate);

        log::debug!(
            "{}: configured rate={} width={} channels={} block={} ({}us cadence), map lo={:#x} hi={:#x}",
            self.info.name,
            stream.rate_hz,
            stream.width_bits,
            config.channel.channels,
            stream.block_size,
            interval.as_micros(),
            config.channel.map.low_word,
            config.channel.map.high_word,
        );

        self.config = Some(AppliedConfig {
            block_size: stream.block_size,
            interval,
            pool: Arc::clone(&stream.pool),
        });
        Ok(())
    }

    fn trigger(&mut self, trigger: Trigger) -> Result<(), CaptureError> {
        match trigger {
            Trigger::Start => {
                if self.running.load(Ordering::SeqCst) {
                    return Ok(());
                }
                let config = self.config.as_ref().ok_or(CaptureError::Io { errno: EIO })?;

                self.running.store(true, Ordering::SeqCst);
                let running = Arc::clone(&self.running);
                let delivered = Arc::clone(&self.delivered);
                let overruns = Arc::clone(&self.overruns);
                let pool = Arc::clone(&config.pool);
                let block_size = config.block_size;
                let interval = config.interval;
                let name = self.info.name.clone();

                let spawned = thread::Builder::new()
                    .name("pdm-sim-producer".into())
                    .spawn(move || {
                        let mut seq: u64 = 0;
                        while running.load(Ordering::SeqCst) {
                            thread::sleep(interval);
                            if !running.load(Ordering::SeqCst) {
                                break;
                            }

                            let Some(mut block) = pool.acquire() else {
                                // Hardware backpressure: the slab is exhausted,
                                // this block period is lost.
                                overruns.fetch_add(1, Ordering::Relaxed);
                                log::warn!("{name}: pool exhausted, dropping block {seq}");
                                seq += 1;
                                continue;
                            };

                            for (i, byte) in block.buf_mut()[..block_size].iter_mut().enumerate()
                            {
                                *byte = (seq as usize + i) as u8;
                            }
                            block.set_len(block_size);
                            seq += 1;

                            delivered.queue.lock().push_back(block);
                            delivered.available.notify_one();
                        }
                    });

                match spawned {
                    Ok(handle) => {
                        self.producer = Some(handle);
                        Ok(())
                    }
                    Err(_) => {
                        self.running.store(false, Ordering::SeqCst);
                        Err(CaptureError::Io { errno: EIO })
                    }
                }
            }
            Trigger::Stop => {
                self.stop_producer();
                Ok(())
            }
        }
    }

    fn read(
        &mut self,
        stream_id: u8,
        timeout: Duration,
    ) -> Result<Option<PooledBlock>, CaptureError> {
        if stream_id != 0 {
            return Err(CaptureError::Io { errno: EINVAL });
        }

        let deadline = Instant::now() + timeout;
        let mut queue = self.delivered.queue.lock();
        loop {
            if let Some(block) = queue.pop_front() {
                return Ok(Some(block));
            }
            if Instant::now() >= deadline {
                return Ok(None);
            }
            let timed_out = self
                .delivered
                .available
                .wait_until(&mut queue, deadline)
                .timed_out();
            if timed_out && queue.is_empty() {
                return Ok(None);
            }
        }
    }
}

impl Drop for SimDmicDriver {
    fn drop(&mut self) {
        self.stop_producer();
    }
}

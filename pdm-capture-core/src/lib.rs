//! # pdm-capture-core
//!
//! Platform-agnostic PDM microphone capture core library.
//!
//! Provides the bounded block pool, channel routing, and the capture session
//! state machine. Hardware backends implement the [`DmicDriver`] trait and
//! plug into the generic [`PdmSession`].
//!
//! ## Architecture
//!
//! ```text
//! pdm-capture-core (this crate)
//! ├── models/       ← CaptureError, CaptureState, CaptureConfig, DeviceInfo
//! ├── channel_map   ← packed slot/side routing builder
//! ├── pool          ← fixed-count, fixed-capacity block pool
//! ├── traits/       ← DmicDriver + driver-facing config structs
//! └── session/      ← PdmSession (configure/start/stop/read orchestrator)
//! ```
//!
//! ## Data flow
//!
//! ```text
//! [DMIC peripheral] ─ acquire ─→ [BlockPool] ←─ release ─ [PdmSession::read]
//!         │                                                      ↑
//!         └───────────── completed blocks (DmicDriver::read) ────┘
//! ```
//!
//! The peripheral fills pool blocks asynchronously; `read` pulls one
//! completed block under a bounded wait, copies it into a caller-owned
//! buffer, and returns the block to the pool.

pub mod channel_map;
pub mod models;
pub mod pool;
pub mod session;
pub mod traits;

// Re-export key types at crate root for convenience.
pub use channel_map::{ChannelMap, ChannelSide, MAX_CHANNELS};
pub use models::config::{CaptureConfig, SUPPORTED_WIDTHS};
pub use models::device::DeviceInfo;
pub use models::error::CaptureError;
pub use models::state::CaptureState;
pub use pool::{BlockPool, PooledBlock, DEFAULT_BLOCK_CAPACITY, DEFAULT_BLOCK_COUNT};
pub use session::capture::{PdmSession, DEFAULT_READ_TIMEOUT};
pub use traits::dmic_driver::{
    ChannelConfig, DmicDriver, DriverConfig, PdmClockConfig, StreamConfig, Trigger,
};

//! # pdm-capture-sim
//!
//! In-process simulated DMIC backend for pdm-capture-kit.
//!
//! Provides a [`DeviceRegistry`] for named-device discovery and a
//! [`SimDmicDriver`] that implements
//! [`DmicDriver`](pdm_capture_core::DmicDriver) with a producer thread
//! filling pool blocks at the configured block cadence. Useful for driving
//! the capture pipeline end to end without hardware.

pub mod driver;
pub mod registry;

pub use driver::{SimDmicDriver, MAX_RATE_HZ, MIN_RATE_HZ, SUPPORTED_WIDTH_BITS};
pub use registry::DeviceRegistry;

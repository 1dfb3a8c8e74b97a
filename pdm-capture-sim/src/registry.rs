//! Named-device lookup for the simulated backend.
//!
//! Plays the role of the platform's device-tree lookup: sessions are
//! constructed against a device name and fail fast when the device is
//! missing or still initializing.

use std::collections::BTreeMap;

use parking_lot::Mutex;

use pdm_capture_core::{CaptureError, DeviceInfo, PdmSession};

use crate::driver::SimDmicDriver;

/// Registry of simulated DMIC devices, keyed by name.
pub struct DeviceRegistry {
    devices: Mutex<BTreeMap<String, bool>>,
}

impl DeviceRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            devices: Mutex::new(BTreeMap::new()),
        }
    }

    /// A registry with the conventional `pdm0` device ready for use.
    pub fn with_default_device() -> Self {
        let registry = Self::new();
        registry.register("pdm0");
        registry
    }

    /// Register a device that is ready to capture.
    pub fn register(&self, name: &str) {
        self.devices.lock().insert(name.to_string(), true);
    }

    /// Register a device that exists but has not finished initializing.
    pub fn register_not_ready(&self, name: &str) {
        self.devices.lock().insert(name.to_string(), false);
    }

    /// All known devices, in name order.
    pub fn list(&self) -> Vec<DeviceInfo> {
        self.devices
            .lock()
            .iter()
            .map(|(name, &is_ready)| DeviceInfo::new(name.clone(), is_ready))
            .collect()
    }

    /// Open a driver on the named device.
    pub fn open(&self, name: &str) -> Result<SimDmicDriver, CaptureError> {
        let devices = self.devices.lock();
        let is_ready = *devices.get(name).ok_or_else(|| CaptureError::DeviceNotFound {
            name: name.to_string(),
        })?;
        if !is_ready {
            return Err(CaptureError::DeviceNotReady {
                name: name.to_string(),
            });
        }
        Ok(SimDmicDriver::new(DeviceInfo::new(name, true)))
    }

    /// Open a capture session on the named device and hardware stream.
    pub fn open_session(
        &self,
        name: &str,
        stream_id: u8,
    ) -> Result<PdmSession<SimDmicDriver>, CaptureError> {
        Ok(PdmSession::with_stream(self.open(name)?, stream_id))
    }
}

impl Default for DeviceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

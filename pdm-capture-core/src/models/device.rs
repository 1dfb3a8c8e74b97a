use serde::{Deserialize, Serialize};

/// A capture device known to a backend's discovery layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// Device-tree style identifier, e.g. `"pdm0"`.
    pub name: String,

    /// Whether the device finished initializing and can be opened.
    pub is_ready: bool,
}

impl DeviceInfo {
    pub fn new(name: impl Into<String>, is_ready: bool) -> Self {
        Self {
            name: name.into(),
            is_ready,
        }
    }
}

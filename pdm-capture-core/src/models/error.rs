use thiserror::Error;

/// Errors surfaced by capture operations.
///
/// Every error is returned synchronously by the failing operation; nothing is
/// retried internally. A timed-out read is not an error; it returns an empty
/// buffer instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CaptureError {
    /// No capture device is registered under the requested name.
    #[error("PDM device not found: {name}")]
    DeviceNotFound { name: String },

    /// The device exists but has not finished initializing.
    #[error("PDM device not ready: {name}")]
    DeviceNotReady { name: String },

    /// The requested configuration is rejected before reaching hardware.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The hardware cannot satisfy the requested mode.
    #[error("unsupported configuration: {0}")]
    Unsupported(String),

    /// An operation was invoked out of lifecycle order.
    #[error("invalid state: {0}")]
    InvalidState(&'static str),

    /// Driver-level failure carrying the native error code.
    #[error("driver i/o error (errno {errno})")]
    Io { errno: i32 },

    /// Destination buffer allocation failed during a read.
    #[error("out of memory")]
    OutOfMemory,
}

/// Capture session state machine.
///
/// State transitions:
/// ```text
/// unconfigured → configured → running
///                     ↑           │
///                     └── stop ───┘
/// ```
/// `configure` is allowed from `Unconfigured` and `Configured` (idempotent
/// reconfiguration), never from `Running`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    /// Device bound, no capture parameters applied to hardware yet.
    Unconfigured,
    /// Hardware programmed with an active configuration, capture stopped.
    Configured,
    /// Capture trigger fired, the peripheral is filling blocks.
    Running,
}

impl CaptureState {
    pub fn is_unconfigured(&self) -> bool {
        matches!(self, Self::Unconfigured)
    }

    pub fn is_configured(&self) -> bool {
        matches!(self, Self::Configured)
    }

    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }
}

use serde::{Deserialize, Serialize};

use crate::channel_map::MAX_CHANNELS;

/// PCM sample widths accepted by the capture pipeline.
pub const SUPPORTED_WIDTHS: [u8; 4] = [8, 16, 24, 32];

/// Configuration for a capture session.
///
/// `block_size_bytes == 0` requests auto-derivation: one block holds 100 ms
/// of audio at the configured rate, width, and channel count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// PCM output rate in Hz (default: 16000).
    pub sample_rate_hz: u32,

    /// Sample width in bits (default: 16). Valid values: 8, 16, 24, 32.
    pub sample_width_bits: u8,

    /// Number of microphone channels, 1–16 (default: 1).
    pub channels: u8,

    /// Bytes per capture block, or 0 to derive a 100 ms block (default: 0).
    pub block_size_bytes: u32,
}

impl CaptureConfig {
    /// The block size that will be programmed into the hardware: the explicit
    /// value when set, otherwise 100 ms of audio.
    pub fn effective_block_size(&self) -> usize {
        if self.block_size_bytes != 0 {
            return self.block_size_bytes as usize;
        }
        (self.sample_width_bits as usize / 8)
            * (self.sample_rate_hz as usize / 10)
            * self.channels as usize
    }

    /// Bytes per interleaved frame (one sample per channel).
    pub fn frame_bytes(&self) -> usize {
        (self.sample_width_bits as usize / 8) * self.channels as usize
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.sample_rate_hz == 0 {
            return Err("sample rate must be positive".into());
        }
        if !SUPPORTED_WIDTHS.contains(&self.sample_width_bits) {
            return Err(format!("unsupported sample width: {}", self.sample_width_bits));
        }
        if self.channels == 0 || self.channels > MAX_CHANNELS {
            return Err(format!(
                "channel count {} outside 1..={}",
                self.channels, MAX_CHANNELS
            ));
        }
        if self.effective_block_size() == 0 {
            return Err("derived block size is zero".into());
        }
        Ok(())
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: 16000,
            sample_width_bits: 16,
            channels: 1,
            block_size_bytes: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_derives_100ms_mono_block() {
        let config = CaptureConfig::default();
        // 16/8 * 16000/10 * 1
        assert_eq!(config.effective_block_size(), 3200);
    }

    #[test]
    fn explicit_block_size_wins() {
        let config = CaptureConfig {
            block_size_bytes: 320,
            ..Default::default()
        };
        assert_eq!(config.effective_block_size(), 320);
    }

    #[test]
    fn stereo_doubles_derived_size() {
        let config = CaptureConfig {
            channels: 2,
            ..Default::default()
        };
        assert_eq!(config.effective_block_size(), 6400);
        assert_eq!(config.frame_bytes(), 4);
    }

    #[test]
    fn validate_rejects_bad_width() {
        let config = CaptureConfig {
            sample_width_bits: 12,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_and_excess_channels() {
        for channels in [0u8, 17] {
            let config = CaptureConfig {
                channels,
                ..Default::default()
            };
            assert!(config.validate().is_err(), "channels = {channels}");
        }
    }

    #[test]
    fn validate_rejects_zero_rate() {
        let config = CaptureConfig {
            sample_rate_hz: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_accepts_full_channel_range() {
        for channels in 1..=MAX_CHANNELS {
            let config = CaptureConfig {
                channels,
                ..Default::default()
            };
            assert!(config.validate().is_ok(), "channels = {channels}");
        }
    }

    #[test]
    fn serde_round_trip() {
        let config = CaptureConfig {
            sample_rate_hz: 32000,
            sample_width_bits: 24,
            channels: 4,
            block_size_bytes: 1280,
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: CaptureConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn serde_partial_fills_defaults() {
        let config: CaptureConfig = serde_json::from_str(r#"{"channels": 2}"#).unwrap();
        assert_eq!(config.channels, 2);
        assert_eq!(config.sample_rate_hz, 16000);
        assert_eq!(config.block_size_bytes, 0);
    }
}

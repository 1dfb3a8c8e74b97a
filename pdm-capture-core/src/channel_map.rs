//! Packed microphone channel routing.
//!
//! The capture hardware routes up to [`MAX_CHANNELS`] physical slots through a
//! pair of 32-bit enable words: slot `i` occupies bit `i` of `low_word` for
//! the first eight slots and bit `i - 8` of `high_word` for the rest. Which
//! side of the stereo pair a slot feeds is fixed by its index parity, so the
//! two words fully describe the routing.

use crate::models::error::CaptureError;

/// Maximum addressable microphone slots in the packed representation.
pub const MAX_CHANNELS: u8 = 16;

/// Slots per routing word.
const SLOTS_PER_WORD: u8 = 8;

/// Which side of the stereo pair a slot feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelSide {
    Left,
    Right,
}

impl ChannelSide {
    /// Side assignment for a physical slot: even slots are left, odd right.
    ///
    /// This reproduces the mono (slot 0 → left) and stereo (slot 0 → left,
    /// slot 1 → right) routings as the degenerate cases.
    pub fn of_slot(slot: u8) -> Self {
        if slot % 2 == 0 {
            ChannelSide::Left
        } else {
            ChannelSide::Right
        }
    }
}

/// Packed per-channel slot routing, eight slots per word.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelMap {
    pub low_word: u32,
    pub high_word: u32,
}

impl ChannelMap {
    /// Build the routing map for `channel_count` microphones.
    ///
    /// Counts above [`MAX_CHANNELS`] are rejected rather than silently
    /// overflowing the low/high split.
    pub fn build(channel_count: u8) -> Result<Self, CaptureError> {
        if channel_count == 0 {
            return Err(CaptureError::InvalidArgument(
                "channel count must be at least 1".into(),
            ));
        }
        if channel_count > MAX_CHANNELS {
            return Err(CaptureError::InvalidArgument(format!(
                "channel count {channel_count} exceeds the {MAX_CHANNELS}-slot routing table"
            )));
        }

        let mut map = ChannelMap::default();
        for slot in 0..channel_count {
            map.enable_slot(slot);
        }
        Ok(map)
    }

    fn enable_slot(&mut self, slot: u8) {
        debug_assert!(slot < MAX_CHANNELS);
        if slot < SLOTS_PER_WORD {
            self.low_word |= 1 << slot;
        } else {
            self.high_word |= 1 << (slot - SLOTS_PER_WORD);
        }
    }

    /// Whether the given physical slot is routed.
    pub fn contains(&self, slot: u8) -> bool {
        if slot < SLOTS_PER_WORD {
            self.low_word & (1 << slot) != 0
        } else if slot < MAX_CHANNELS {
            self.high_word & (1 << (slot - SLOTS_PER_WORD)) != 0
        } else {
            false
        }
    }

    /// Number of routed slots.
    pub fn channel_count(&self) -> u8 {
        (self.low_word.count_ones() + self.high_word.count_ones()) as u8
    }
}

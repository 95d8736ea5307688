//! The in-memory mirror of the chip state.
//!
//! Fields hold raw values as set by the caller or decoded from a file.  Nothing
//! here validates ranges; the encoders in [crate::registers] mask each field to
//! its bit width, so e.g. a `multiple` of 255 is sent as 15.

use crate::consts::{NUM_CHANNELS, NUM_OPERATORS};

/// One of the four sound-generating operators of a channel
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Operator {
    /// 3 bit signed-magnitude code, 4 is no detune
    pub detune: u8,
    /// Frequency multiple, 0..=15 (0 means x0.5)
    pub multiple: u8,
    /// Attenuation, 0 is loudest and 127 silent
    pub total_level: u8,
    /// Rate key scaling, 0..=3
    pub key_scale: u8,
    /// 0..=31
    pub attack_rate: u8,
    /// Amplitude modulation by the LFO
    pub amp_mod_on: bool,
    /// 0..=31
    pub decay_rate: u8,
    /// 0..=31
    pub sustain_rate: u8,
    /// 0..=15
    pub sustain_level: u8,
    /// 0..=15
    pub release_rate: u8,
    /// Bit 3 enables the SSG envelope, bits 0-2 select the mode
    pub ssg_envelope: u8,
}

/// One of the six voices of the chip
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Channel {
    /// Index of this channel within the chip.  Determines the register bank
    /// and address offset.
    pub channel_id: u8,
    /// Operator 1 self-feedback, 0..=3
    pub feedback: u8,
    /// Operator topology, 0..=7
    pub algorithm: u8,
    /// Stereo enable bitmask: bit 1 left, bit 0 right
    pub audio_out: u8,
    /// LFO amplitude modulation sensitivity, 0..=3
    pub amp_mod_sens: u8,
    /// LFO phase modulation sensitivity, 0..=7
    pub phase_mod_sens: u8,
    /// Operators, in register order
    pub operators: [Operator; NUM_OPERATORS],
}

impl Channel {
    /// Create an all-zero channel tagged with `channel_id`
    pub fn new(channel_id: u8) -> Self {
        Self {
            channel_id,
            ..Default::default()
        }
    }
}

/// The whole chip: global LFO state and six channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Chip {
    /// LFO enable
    pub lfo_on: bool,
    /// LFO frequency select, 0..=7
    pub lfo_freq: u8,
    /// 24 bit SysEx vendor id of the target device.  This is not part of the
    /// register state and is not carried in the flattened array.
    pub vendor_id: u32,
    /// Channels 0..=5, always tagged with their own index
    pub channels: [Channel; NUM_CHANNELS],
}

impl Chip {
    /// Create an all-zero chip
    pub fn new() -> Self {
        Self {
            lfo_on: false,
            lfo_freq: 0,
            vendor_id: 0,
            channels: core::array::from_fn(|i| Channel::new(i as u8)),
        }
    }
    /// Get a channel by index
    pub fn channel(&self, channel_id: u8) -> Option<&Channel> {
        self.channels.get(channel_id as usize)
    }
    /// Get a mutable channel by index
    pub fn channel_mut(&mut self, channel_id: u8) -> Option<&mut Channel> {
        self.channels.get_mut(channel_id as usize)
    }
    /// Copy `voice` into every channel slot, keeping each slot's own
    /// `channel_id`
    pub fn replicate_voice(&mut self, voice: &Channel) {
        for (i, ch) in self.channels.iter_mut().enumerate() {
            *ch = Channel {
                channel_id: i as u8,
                ..*voice
            };
        }
    }
}

impl Default for Chip {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channels_tagged_with_index() {
        let chip = Chip::new();
        for (i, ch) in chip.channels.iter().enumerate() {
            assert_eq!(ch.channel_id as usize, i);
            assert_eq!(ch.operators, [Operator::default(); NUM_OPERATORS]);
        }
        assert!(chip.channel(6).is_none());
    }

    #[test]
    fn snapshot_round_trip() {
        let mut chip = Chip::new();
        chip.vendor_id = 0x12_3456;
        chip.lfo_on = true;
        chip.channels[4].operators[1].amp_mod_on = true;
        chip.channels[4].operators[1].total_level = 0x55;
        let json = serde_json::to_string(&chip).unwrap();
        let back: Chip = serde_json::from_str(&json).unwrap();
        assert_eq!(back, chip);
    }

    #[test]
    fn replicate_keeps_ids() {
        let mut chip = Chip::new();
        let mut voice = Channel::new(3);
        voice.algorithm = 5;
        voice.operators[2].total_level = 99;
        chip.replicate_voice(&voice);
        for (i, ch) in chip.channels.iter().enumerate() {
            assert_eq!(ch.channel_id as usize, i);
            assert_eq!(ch.algorithm, 5);
            assert_eq!(ch.operators[2].total_level, 99);
        }
    }
}

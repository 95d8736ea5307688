//! Built-in voices, usable without any patch file.

use crate::model::{Channel, Chip, Operator};

/// A voice known to this crate
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum FactoryPreset {
    /// Bright bell with LFO tremolo on the first operator
    Bell,
    /// Electric piano
    Piano,
}

#[allow(clippy::too_many_arguments)]
const fn op(
    detune: u8,
    multiple: u8,
    total_level: u8,
    key_scale: u8,
    attack_rate: u8,
    amp_mod_on: bool,
    decay_rate: u8,
    sustain_rate: u8,
    sustain_level: u8,
    release_rate: u8,
) -> Operator {
    Operator {
        detune,
        multiple,
        total_level,
        key_scale,
        attack_rate,
        amp_mod_on,
        decay_rate,
        sustain_rate,
        sustain_level,
        release_rate,
        ssg_envelope: 0,
    }
}

const BELL: Channel = Channel {
    channel_id: 0,
    feedback: 3,
    algorithm: 4,
    audio_out: 3,
    amp_mod_sens: 2,
    phase_mod_sens: 0,
    operators: [
        op(3, 15, 0x28, 1, 31, true, 4, 10, 1, 3),
        op(5, 3, 0x08, 1, 30, false, 8, 6, 3, 3),
        op(5, 7, 0x0C, 1, 31, false, 4, 17, 3, 1),
        op(4, 2, 0x04, 1, 31, false, 5, 12, 2, 3),
    ],
};

const PIANO: Channel = Channel {
    channel_id: 0,
    feedback: 2,
    algorithm: 4,
    audio_out: 3,
    amp_mod_sens: 1,
    phase_mod_sens: 0,
    operators: [
        op(0, 1, 0x30, 3, 31, false, 0, 8, 1, 0),
        op(0, 0, 0x01, 2, 25, false, 7, 6, 1, 7),
        op(0, 2, 0x30, 3, 31, false, 0, 8, 1, 0),
        op(0, 1, 0x01, 2, 27, false, 7, 6, 1, 7),
    ],
};

impl FactoryPreset {
    /// Every factory preset, in menu order
    pub const ALL: [Self; 2] = [Self::Bell, Self::Piano];

    /// Display name
    pub fn name(self) -> &'static str {
        match self {
            Self::Bell => "Bell",
            Self::Piano => "Piano",
        }
    }
    /// The voice applied to each channel
    pub fn voice(self) -> Channel {
        match self {
            Self::Bell => BELL,
            Self::Piano => PIANO,
        }
    }
    /// Whether the preset runs the LFO
    pub fn lfo_on(self) -> bool {
        matches!(self, Self::Bell)
    }
    /// Overwrite the LFO and all six channels of `chip` with this preset
    pub fn apply(self, chip: &mut Chip) {
        chip.lfo_on = self.lfo_on();
        chip.lfo_freq = 0;
        chip.replicate_voice(&self.voice());
    }
}

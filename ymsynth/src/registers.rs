//! Pure encoding of the model into chip register writes.
//!
//! The chip exposes two register banks of three channels each.  Channel
//! registers sit at `base + channel_id % 3`, operator registers at
//! `base + channel_id % 3 + operator_id * 4`, and the bank is
//! `channel_id / 3`.

use crate::consts::*;
use crate::model::{Channel, Chip, Operator};

/// A single register write: the unit both transports deliver
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RegisterWrite {
    /// Register address within the bank
    pub addr: u8,
    /// Register value
    pub data: u8,
    /// Bank select, 0 or 1
    pub bank: u8,
}

impl RegisterWrite {
    /// Constructor
    pub const fn new(addr: u8, data: u8, bank: u8) -> Self {
        Self { addr, data, bank }
    }
}

/// Number of writes issued by [Chip::channel_writes]
pub const CHANNEL_WRITES: usize = 2;
/// Number of writes issued by [Chip::operator_writes]
pub const OPERATOR_WRITES: usize = 7;
/// Number of writes issued by [Chip::register_writes]
pub const CHIP_WRITES: usize = 1 + NUM_CHANNELS * (CHANNEL_WRITES + NUM_OPERATORS * OPERATOR_WRITES);

/// Register address offset of a channel within its bank
pub const fn channel_offset(channel_id: u8) -> u8 {
    channel_id % CHANNELS_PER_BANK
}

/// Register bank holding a channel
pub const fn bank(channel_id: u8) -> u8 {
    channel_id / CHANNELS_PER_BANK
}

/// Address of an operator register given the register's base address.
/// Meaningful for `operator_id` in `0..4`; larger ids wrap around the address
/// space like every other out-of-range field.
pub const fn operator_addr(base: u8, channel_id: u8, operator_id: u8) -> u8 {
    base.wrapping_add(channel_offset(channel_id))
        .wrapping_add(operator_id.wrapping_mul(OPERATOR_STRIDE))
}

impl Operator {
    /// DT1/MUL register
    pub fn reg_detune_multiple(&self) -> u8 {
        ((self.detune & MASK_DETUNE) << 4) | (self.multiple & MASK_MULTIPLE)
    }
    /// TL register
    pub fn reg_total_level(&self) -> u8 {
        self.total_level & MASK_TOTAL_LEVEL
    }
    /// RS/AR register
    pub fn reg_key_scale_attack(&self) -> u8 {
        ((self.key_scale & MASK_KEY_SCALE) << 6) | (self.attack_rate & MASK_ATTACK_RATE)
    }
    /// AM/D1R register
    pub fn reg_amp_mod_decay(&self) -> u8 {
        ((self.amp_mod_on as u8 & MASK_AMP_MOD_ON) << 7) | (self.decay_rate & MASK_DECAY_RATE)
    }
    /// D2R register
    pub fn reg_sustain_rate(&self) -> u8 {
        self.sustain_rate & MASK_SUSTAIN_RATE
    }
    /// D1L/RR register
    pub fn reg_sustain_level_release(&self) -> u8 {
        ((self.sustain_level & MASK_SUSTAIN_LEVEL) << 4) | (self.release_rate & MASK_RELEASE_RATE)
    }
    /// SSG-EG register
    pub fn reg_ssg_envelope(&self) -> u8 {
        self.ssg_envelope & MASK_SSG_ENVELOPE
    }
}

impl Channel {
    /// FB/ALGORITHM register
    pub fn reg_feedback_algorithm(&self) -> u8 {
        ((self.feedback & MASK_FEEDBACK) << 3) | (self.algorithm & MASK_ALGORITHM)
    }
    /// L/R/AMS/PMS register
    pub fn reg_stereo_ams_pms(&self) -> u8 {
        ((self.audio_out & MASK_AUDIO_OUT) << 6)
            | ((self.amp_mod_sens & MASK_AMP_MOD_SENS) << 4)
            | (self.phase_mod_sens & MASK_PHASE_MOD_SENS)
    }
}

impl Chip {
    /// LFO register
    pub fn reg_lfo(&self) -> u8 {
        ((self.lfo_on as u8 & MASK_LFO_ON) << 3) | (self.lfo_freq & MASK_LFO_FREQ)
    }
    /// The global LFO write
    pub fn lfo_write(&self) -> RegisterWrite {
        RegisterWrite::new(ADDR_LFO, self.reg_lfo(), BANK_LFO)
    }
    /// The two per-channel writes, or `None` if `channel_id` is not a channel
    pub fn channel_writes(&self, channel_id: u8) -> Option<[RegisterWrite; CHANNEL_WRITES]> {
        let ch = self.channel(channel_id)?;
        let offset = channel_offset(channel_id);
        let bank = bank(channel_id);
        Some([
            RegisterWrite::new(ADDR_FEEDBACK_ALGORITHM + offset, ch.reg_feedback_algorithm(), bank),
            RegisterWrite::new(ADDR_STEREO_AMS_PMS + offset, ch.reg_stereo_ams_pms(), bank),
        ])
    }
    /// The seven per-operator writes, or `None` if either index is out of
    /// range
    pub fn operator_writes(
        &self,
        channel_id: u8,
        operator_id: u8,
    ) -> Option<[RegisterWrite; OPERATOR_WRITES]> {
        let op = self.channel(channel_id)?.operators.get(operator_id as usize)?;
        let bank = bank(channel_id);
        let write = |base, data| RegisterWrite::new(operator_addr(base, channel_id, operator_id), data, bank);
        Some([
            write(ADDR_DETUNE_MULTIPLE, op.reg_detune_multiple()),
            write(ADDR_TOTAL_LEVEL, op.reg_total_level()),
            write(ADDR_KEY_SCALE_ATTACK, op.reg_key_scale_attack()),
            write(ADDR_AMP_MOD_DECAY, op.reg_amp_mod_decay()),
            write(ADDR_SUSTAIN_RATE, op.reg_sustain_rate()),
            write(ADDR_SUSTAIN_LEVEL_RELEASE, op.reg_sustain_level_release()),
            write(ADDR_SSG_EG, op.reg_ssg_envelope()),
        ])
    }
    /// The writes configuring one channel completely: the channel registers
    /// followed by each operator in order
    pub fn voice_writes(&self, channel_id: u8) -> impl Iterator<Item = RegisterWrite> + '_ {
        let ops = (0..NUM_OPERATORS as u8)
            .filter_map(move |op| self.operator_writes(channel_id, op))
            .flatten();
        self.channel_writes(channel_id).into_iter().flatten().chain(ops)
    }
    /// Every write needed to mirror the model onto the chip: the LFO, then
    /// each channel in turn (see [Chip::voice_writes])
    pub fn register_writes(&self) -> impl Iterator<Item = RegisterWrite> + '_ {
        core::iter::once(self.lfo_write())
            .chain((0..NUM_CHANNELS as u8).flat_map(move |ch| self.voice_writes(ch)))
    }
}

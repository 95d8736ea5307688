//! The flattened register array carried by `SET_REGISTERS` and `SAVE_PRESET`.
//!
//! The device firmware reads this as a packed struct, so the field order is an
//! interface contract:
//!
//! ```text
//! lfo_on, lfo_freq,
//! for each channel 0..6:
//!     feedback, algorithm, audio_out, amp_mod_sens, phase_mod_sens,
//!     for each operator 0..4:
//!         detune, multiple, total_level, key_scale, attack_rate, amp_mod_on,
//!         decay_rate, sustain_rate, sustain_level, release_rate, ssg_envelope
//! ```
//!
//! Values are written raw, unmasked.

use crate::consts::FLAT_LEN;
use crate::model::{Channel, Chip, Operator};
use crate::{FormatError, VendorId};

/// The whole model as sent over the wire
pub type FlatRegisters = [u8; FLAT_LEN];

struct Writer<'a> {
    buf: &'a mut FlatRegisters,
    pos: usize,
}

impl Writer<'_> {
    fn put(&mut self, value: u8) {
        self.buf[self.pos] = value;
        self.pos += 1;
    }
}

struct Reader<'a> {
    buf: &'a FlatRegisters,
    pos: usize,
}

impl Reader<'_> {
    fn get(&mut self) -> u8 {
        let value = self.buf[self.pos];
        self.pos += 1;
        value
    }
    fn get_bool(&mut self) -> bool {
        self.get() != 0
    }
}

impl Operator {
    fn flatten_into(&self, w: &mut Writer) {
        w.put(self.detune);
        w.put(self.multiple);
        w.put(self.total_level);
        w.put(self.key_scale);
        w.put(self.attack_rate);
        w.put(self.amp_mod_on as u8);
        w.put(self.decay_rate);
        w.put(self.sustain_rate);
        w.put(self.sustain_level);
        w.put(self.release_rate);
        w.put(self.ssg_envelope);
    }
    fn unflatten_from(r: &mut Reader) -> Self {
        Self {
            detune: r.get(),
            multiple: r.get(),
            total_level: r.get(),
            key_scale: r.get(),
            attack_rate: r.get(),
            amp_mod_on: r.get_bool(),
            decay_rate: r.get(),
            sustain_rate: r.get(),
            sustain_level: r.get(),
            release_rate: r.get(),
            ssg_envelope: r.get(),
        }
    }
}

impl Channel {
    fn flatten_into(&self, w: &mut Writer) {
        w.put(self.feedback);
        w.put(self.algorithm);
        w.put(self.audio_out);
        w.put(self.amp_mod_sens);
        w.put(self.phase_mod_sens);
        for op in &self.operators {
            op.flatten_into(w);
        }
    }
    fn unflatten_from(channel_id: u8, r: &mut Reader) -> Self {
        // struct literal fields evaluate in source order
        Self {
            channel_id,
            feedback: r.get(),
            algorithm: r.get(),
            audio_out: r.get(),
            amp_mod_sens: r.get(),
            phase_mod_sens: r.get(),
            operators: core::array::from_fn(|_| Operator::unflatten_from(r)),
        }
    }
}

impl Chip {
    /// Flatten the register state into wire order
    pub fn flatten(&self) -> FlatRegisters {
        let mut buf = [0u8; FLAT_LEN];
        let mut w = Writer {
            buf: &mut buf,
            pos: 0,
        };
        w.put(self.lfo_on as u8);
        w.put(self.lfo_freq);
        for ch in &self.channels {
            ch.flatten_into(&mut w);
        }
        debug_assert_eq!(w.pos, FLAT_LEN);
        buf
    }
    /// Rebuild a model from its flattened form.  The vendor id is not part of
    /// the array; it travels in the frame header and is passed in separately.
    pub fn unflatten(flat: &FlatRegisters, vendor: VendorId) -> Self {
        let mut chip = Self::new();
        chip.vendor_id = vendor.get();
        chip.apply_flat(flat);
        chip
    }
    /// Overwrite the register state from its flattened form, keeping the
    /// vendor id
    pub fn apply_flat(&mut self, flat: &FlatRegisters) {
        let mut r = Reader { buf: flat, pos: 0 };
        self.lfo_on = r.get_bool();
        self.lfo_freq = r.get();
        for (i, ch) in self.channels.iter_mut().enumerate() {
            *ch = Channel::unflatten_from(i as u8, &mut r);
        }
    }
    /// Like [Chip::unflatten] for a buffer of unchecked length
    pub fn from_flat_slice(bytes: &[u8], vendor: VendorId) -> Result<Self, FormatError> {
        let flat: &FlatRegisters = bytes.try_into().map_err(|_| FormatError::FlatLength {
            len: bytes.len(),
            expected: FLAT_LEN,
        })?;
        Ok(Self::unflatten(flat, vendor))
    }
}

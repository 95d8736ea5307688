//! The 43 byte single-voice patch file.
//!
//! | Offset | Content |
//! |---|---|
//! | 0 | algorithm |
//! | 1 | feedback |
//! | 2 | `audio_out << 6 \| amp_mod_sens << 4 \| phase_mod_sens` |
//! | 3 + 10n | operator n: multiple, detune, total_level, key_scale, attack_rate, `amp_mod_on << 7 \| decay_rate`, sustain_rate, release_rate, sustain_level, ssg_envelope |
//!
//! A file describes one voice, which is applied to all six channels.  Byte
//! values are taken as-is; the register encoders mask them later.

use crate::consts::{NUM_OPERATORS, PATCH_FILE_LEN, PATCH_OPERATOR_LEN, PATCH_VOICE_LEN};
use crate::model::{Channel, Chip, Operator};
use crate::FormatError;

fn parse_operator(bytes: &[u8]) -> Operator {
    Operator {
        multiple: bytes[0],
        detune: bytes[1],
        total_level: bytes[2],
        key_scale: bytes[3],
        attack_rate: bytes[4],
        amp_mod_on: (bytes[5] >> 7) & 0x01 != 0,
        decay_rate: bytes[5] & 0x1F,
        sustain_rate: bytes[6],
        release_rate: bytes[7],
        sustain_level: bytes[8],
        ssg_envelope: bytes[9],
    }
}

/// Decode a patch file into a single voice.  The returned channel is tagged
/// as channel 0.
pub fn parse_voice(bytes: &[u8]) -> Result<Channel, FormatError> {
    if bytes.len() != PATCH_FILE_LEN {
        log::warn!("Patch file size {}/{}", bytes.len(), PATCH_FILE_LEN);
        return Err(FormatError::PatchLength {
            len: bytes.len(),
            expected: PATCH_FILE_LEN,
        });
    }
    let (voice, ops) = bytes.split_at(PATCH_VOICE_LEN);
    let mut chunks = ops.chunks_exact(PATCH_OPERATOR_LEN);
    let operators: [Operator; NUM_OPERATORS] =
        core::array::from_fn(|_| chunks.next().map(parse_operator).unwrap_or_default());
    Ok(Channel {
        channel_id: 0,
        algorithm: voice[0],
        feedback: voice[1],
        audio_out: (voice[2] >> 6) & 0x03,
        amp_mod_sens: (voice[2] >> 4) & 0x03,
        phase_mod_sens: voice[2] & 0x07,
        operators,
    })
}

impl Chip {
    /// Decode a patch file and apply it to every channel.  On error the model
    /// is left untouched.
    pub fn apply_patch(&mut self, bytes: &[u8]) -> Result<(), FormatError> {
        let voice = parse_voice(bytes)?;
        self.replicate_voice(&voice);
        log::debug!("Patch applied: algorithm {}, feedback {}", voice.algorithm, voice.feedback);
        Ok(())
    }
    /// Build a fresh model from a patch file
    pub fn from_patch(bytes: &[u8]) -> Result<Self, FormatError> {
        let mut chip = Self::new();
        chip.apply_patch(bytes)?;
        Ok(chip)
    }
}

//! Named constants for the chip layout, register map and wire formats.

#![allow(missing_docs)]

// Chip layout
pub const NUM_CHANNELS: usize = 6;
pub const NUM_OPERATORS: usize = 4;
pub const CHANNELS_PER_BANK: u8 = 3;
pub const OPERATOR_STRIDE: u8 = 4;

// Register addresses (bank relative)
pub const ADDR_LFO: u8 = 0x22;
pub const ADDR_DETUNE_MULTIPLE: u8 = 0x30;
pub const ADDR_TOTAL_LEVEL: u8 = 0x40;
pub const ADDR_KEY_SCALE_ATTACK: u8 = 0x50;
pub const ADDR_AMP_MOD_DECAY: u8 = 0x60;
pub const ADDR_SUSTAIN_RATE: u8 = 0x70;
pub const ADDR_SUSTAIN_LEVEL_RELEASE: u8 = 0x80;
pub const ADDR_SSG_EG: u8 = 0x90;
pub const ADDR_FEEDBACK_ALGORITHM: u8 = 0xB0;
/// Some firmware revisions wrote this register at 0xB7 instead.  That does not
/// fit the per-channel addressing used for every other register and has never
/// been checked against hardware, so 0xB4 is what gets sent.
pub const ADDR_STEREO_AMS_PMS: u8 = 0xB4;
/// The LFO register only exists in the first bank.
pub const BANK_LFO: u8 = 0;

// Field masks, applied on encode
pub const MASK_LFO_ON: u8 = 0x01;
pub const MASK_LFO_FREQ: u8 = 0x07;
pub const MASK_FEEDBACK: u8 = 0x03;
pub const MASK_ALGORITHM: u8 = 0x07;
pub const MASK_AUDIO_OUT: u8 = 0x03;
pub const MASK_AMP_MOD_SENS: u8 = 0x03;
pub const MASK_PHASE_MOD_SENS: u8 = 0x07;
pub const MASK_DETUNE: u8 = 0x07;
pub const MASK_MULTIPLE: u8 = 0x0F;
pub const MASK_TOTAL_LEVEL: u8 = 0x7F;
pub const MASK_KEY_SCALE: u8 = 0x03;
pub const MASK_ATTACK_RATE: u8 = 0x1F;
pub const MASK_AMP_MOD_ON: u8 = 0x01;
pub const MASK_DECAY_RATE: u8 = 0x1F;
pub const MASK_SUSTAIN_RATE: u8 = 0x1F;
pub const MASK_SUSTAIN_LEVEL: u8 = 0x0F;
pub const MASK_RELEASE_RATE: u8 = 0x0F;
pub const MASK_SSG_ENVELOPE: u8 = 0x0F;

/// Detune code meaning "no detune".  Codes 5..=7 detune downwards.
pub const DETUNE_ZERO: u8 = 4;

// Flattened register array
pub const FLAT_GLOBAL_LEN: usize = 2;
pub const FLAT_CHANNEL_LEN: usize = 5;
pub const FLAT_OPERATOR_LEN: usize = 11;
pub const FLAT_LEN: usize =
    FLAT_GLOBAL_LEN + NUM_CHANNELS * (FLAT_CHANNEL_LEN + NUM_OPERATORS * FLAT_OPERATOR_LEN);

// Patch file
pub const PATCH_FILE_LEN: usize = 43;
pub const PATCH_VOICE_LEN: usize = 3;
pub const PATCH_OPERATOR_LEN: usize = 10;

// SysEx framing
pub const SYSEX_START: u8 = 0xF0;
pub const SYSEX_END: u8 = 0xF7;
pub const VENDOR_ID_LEN: usize = 3;
pub const VENDOR_ID_MASK: u32 = 0x00FF_FFFF;
/// Vendor id plus command byte, the shortest body the receiver accepts
pub const SYSEX_MIN_BODY_LEN: usize = VENDOR_ID_LEN + 1;

pub const CMD_SET_REGISTERS: u8 = 0x00;
pub const CMD_SAVE_PRESET: u8 = 0x01;
pub const CMD_LOAD_PRESET: u8 = 0x02;
pub const CMD_LOAD_DEFAULT_PRESET: u8 = 0x03;

// Presets
pub const NUM_USER_PRESETS: u8 = 8;
pub const NUM_DEFAULT_PRESETS: u8 = 8;
pub const PRESET_NAME_LEN: usize = 15;
pub const PRESET_CODED_NAME_LEN: usize = 2 * PRESET_NAME_LEN;

// Payload and frame sizes
pub const SET_REGISTERS_PAYLOAD_LEN: usize = FLAT_LEN;
pub const SAVE_PRESET_PAYLOAD_LEN: usize = 1 + PRESET_CODED_NAME_LEN + FLAT_LEN;
pub const LOAD_PRESET_PAYLOAD_LEN: usize = 1;
/// Start marker, vendor id, command byte and end marker
pub const FRAME_OVERHEAD: usize = 1 + SYSEX_MIN_BODY_LEN + 1;
pub const MAX_FRAME_LEN: usize = FRAME_OVERHEAD + SAVE_PRESET_PAYLOAD_LEN;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_lengths() {
        assert_eq!(FLAT_LEN, 296);
        assert_eq!(SAVE_PRESET_PAYLOAD_LEN, 327);
        assert_eq!(FRAME_OVERHEAD + SET_REGISTERS_PAYLOAD_LEN, 302);
        assert_eq!(
            PATCH_VOICE_LEN + NUM_OPERATORS * PATCH_OPERATOR_LEN,
            PATCH_FILE_LEN
        );
    }
}

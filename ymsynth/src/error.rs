use thiserror::Error;

use crate::consts::{NUM_DEFAULT_PRESETS, NUM_USER_PRESETS};

/// A buffer did not have the shape its format requires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FormatError {
    /// A patch file must be exactly [crate::consts::PATCH_FILE_LEN] bytes
    #[error("patch file is {len} bytes, expected {expected}")]
    PatchLength {
        /// Length received
        len: usize,
        /// Length required
        expected: usize,
    },
    /// A flattened register array must be exactly [crate::consts::FLAT_LEN] bytes
    #[error("register array is {len} bytes, expected {expected}")]
    FlatLength {
        /// Length received
        len: usize,
        /// Length required
        expected: usize,
    },
    /// The message is not enclosed in SysEx start/end markers
    #[error("missing SysEx start or end marker")]
    Unframed,
    /// The message body is too short to carry a vendor id and a command
    #[error("SysEx body too short ({len} bytes)")]
    Truncated {
        /// Body length, excluding the markers
        len: usize,
    },
    /// The command byte is not one of the known commands
    #[error("unknown SysEx command 0x{0:02X}")]
    UnknownCommand(u8),
    /// The body length does not match the command
    #[error("SysEx command 0x{command:02X} has a {len} byte body, expected {expected}")]
    CommandLength {
        /// Command byte
        command: u8,
        /// Body length, excluding the markers
        len: usize,
        /// Body length the command requires
        expected: usize,
    },
    /// The preset name in a save command is not valid UTF-8
    #[error("preset name is not valid UTF-8")]
    PresetName,
}

/// The two independently numbered preset spaces on the device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresetSpace {
    /// Presets written by the user (`SAVE_PRESET` / `LOAD_PRESET`)
    User,
    /// Read-only presets shipped with the firmware (`LOAD_DEFAULT_PRESET`)
    Default,
}

impl PresetSpace {
    /// Number of slots in this space
    pub const fn slots(self) -> u8 {
        match self {
            Self::User => NUM_USER_PRESETS,
            Self::Default => NUM_DEFAULT_PRESETS,
        }
    }
    /// Returns `Ok(index)` if `index` addresses a slot in this space
    pub fn check(self, index: u8) -> Result<u8, RangeError> {
        if index < self.slots() {
            Ok(index)
        } else {
            Err(RangeError { space: self, index })
        }
    }
}

/// A preset index outside its valid window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{space:?} preset index {index} out of range 0..{}", .space.slots())]
pub struct RangeError {
    /// Preset space that was addressed
    pub space: PresetSpace,
    /// Index that was requested
    pub index: u8,
}

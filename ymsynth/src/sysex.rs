//! SysEx command frames understood by the device firmware.
//!
//! Every frame has the shape
//!
//! ```text
//! F0 <vendor id: 3 bytes, MSB first> <command> <payload...> F7
//! ```
//!
//! | Command | Code | Payload |
//! |---|---|---|
//! | `SET_REGISTERS` | 0 | flattened register array (296 bytes) |
//! | `SAVE_PRESET` | 1 | slot, preset name as 15 nibble pairs, flattened array |
//! | `LOAD_PRESET` | 2 | slot |
//! | `LOAD_DEFAULT_PRESET` | 3 | slot |
//!
//! There is no acknowledgement in the protocol.  Preset slots are checked
//! before a frame is built, so an out-of-range request never reaches the wire.

use arrayvec::{ArrayString, ArrayVec};

use crate::codec::FlatRegisters;
use crate::consts::*;
use crate::error::{FormatError, PresetSpace, RangeError};
use crate::model::Chip;

/// A 24 bit SysEx vendor (manufacturer) id
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VendorId(u32);

impl VendorId {
    /// Create a vendor id, dropping anything above the low 24 bits
    pub const fn new(id: u32) -> Self {
        Self(id & VENDOR_ID_MASK)
    }
    /// The raw 24 bit value
    pub const fn get(self) -> u32 {
        self.0
    }
    /// Wire representation, most significant byte first
    pub const fn to_bytes(self) -> [u8; VENDOR_ID_LEN] {
        [(self.0 >> 16) as u8, (self.0 >> 8) as u8, self.0 as u8]
    }
    /// Inverse of [VendorId::to_bytes]
    pub const fn from_bytes(bytes: [u8; VENDOR_ID_LEN]) -> Self {
        Self(((bytes[0] as u32) << 16) | ((bytes[1] as u32) << 8) | bytes[2] as u32)
    }
}

impl From<u32> for VendorId {
    fn from(id: u32) -> Self {
        Self::new(id)
    }
}

impl Chip {
    /// The vendor id frames for this model are addressed to
    pub fn vendor(&self) -> VendorId {
        VendorId::new(self.vendor_id)
    }
}

/// Command byte of a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SysExCommand {
    /// Apply a full register state
    SetRegisters = CMD_SET_REGISTERS,
    /// Store a register state and a name in a user slot
    SavePreset = CMD_SAVE_PRESET,
    /// Recall a user slot
    LoadPreset = CMD_LOAD_PRESET,
    /// Recall a factory slot
    LoadDefaultPreset = CMD_LOAD_DEFAULT_PRESET,
}

impl SysExCommand {
    /// Decode a command byte
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            CMD_SET_REGISTERS => Some(Self::SetRegisters),
            CMD_SAVE_PRESET => Some(Self::SavePreset),
            CMD_LOAD_PRESET => Some(Self::LoadPreset),
            CMD_LOAD_DEFAULT_PRESET => Some(Self::LoadDefaultPreset),
            _ => None,
        }
    }
    /// Payload length for this command
    pub const fn payload_len(self) -> usize {
        match self {
            Self::SetRegisters => SET_REGISTERS_PAYLOAD_LEN,
            Self::SavePreset => SAVE_PRESET_PAYLOAD_LEN,
            Self::LoadPreset | Self::LoadDefaultPreset => LOAD_PRESET_PAYLOAD_LEN,
        }
    }
}

/// A preset name of at most [PRESET_NAME_LEN] bytes
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PresetName(ArrayString<PRESET_NAME_LEN>);

impl PresetName {
    /// Create a name, truncating on a character boundary if `name` is longer
    /// than the device can store
    pub fn new(name: &str) -> Self {
        let mut out = ArrayString::new();
        for c in name.chars() {
            if out.try_push(c).is_err() {
                log::debug!("Preset name truncated to \"{}\"", out);
                break;
            }
        }
        Self(out)
    }
    /// The name
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
    /// Wire representation: every byte split into its low nibble then its
    /// high nibble, zero padded to the full name length
    pub fn encode(&self) -> [u8; PRESET_CODED_NAME_LEN] {
        let mut coded = [0u8; PRESET_CODED_NAME_LEN];
        for (pair, byte) in coded.chunks_exact_mut(2).zip(self.0.bytes()) {
            pair[0] = byte & 0x0F;
            pair[1] = byte >> 4;
        }
        coded
    }
    /// Inverse of [PresetName::encode].  The name ends at the first zero byte.
    pub fn decode(coded: &[u8; PRESET_CODED_NAME_LEN]) -> Result<Self, FormatError> {
        let mut raw = ArrayVec::<u8, PRESET_NAME_LEN>::new();
        for pair in coded.chunks_exact(2) {
            let byte = (pair[0] & 0x0F) | ((pair[1] & 0x0F) << 4);
            if byte == 0 {
                break;
            }
            raw.push(byte);
        }
        let name = core::str::from_utf8(&raw).map_err(|_| FormatError::PresetName)?;
        ArrayString::from(name)
            .map(Self)
            .map_err(|_| FormatError::PresetName)
    }
}

impl From<&str> for PresetName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl core::fmt::Display for PresetName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A complete, ready to send SysEx frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SysExFrame(ArrayVec<u8, MAX_FRAME_LEN>);

impl SysExFrame {
    fn build(vendor: VendorId, command: SysExCommand, payload: &[&[u8]]) -> Self {
        let mut buf = ArrayVec::new();
        buf.push(SYSEX_START);
        buf.extend(vendor.to_bytes());
        buf.push(command as u8);
        for part in payload {
            buf.extend(part.iter().copied());
        }
        buf.push(SYSEX_END);
        debug_assert_eq!(buf.len(), FRAME_OVERHEAD + command.payload_len());
        Self(buf)
    }
    /// `SET_REGISTERS` carrying the whole model, addressed to the model's
    /// vendor id
    pub fn set_registers(chip: &Chip) -> Self {
        Self::build(chip.vendor(), SysExCommand::SetRegisters, &[&chip.flatten()])
    }
    /// `SAVE_PRESET` storing the model under `name` in user slot `index`
    pub fn save_preset(index: u8, name: &PresetName, chip: &Chip) -> Result<Self, RangeError> {
        let index = PresetSpace::User.check(index)?;
        Ok(Self::build(
            chip.vendor(),
            SysExCommand::SavePreset,
            &[&[index], &name.encode(), &chip.flatten()],
        ))
    }
    /// `LOAD_PRESET` for user slot `index`
    pub fn load_preset(vendor: VendorId, index: u8) -> Result<Self, RangeError> {
        let index = PresetSpace::User.check(index)?;
        Ok(Self::build(vendor, SysExCommand::LoadPreset, &[&[index]]))
    }
    /// `LOAD_DEFAULT_PRESET` for factory slot `index`
    pub fn load_default_preset(vendor: VendorId, index: u8) -> Result<Self, RangeError> {
        let index = PresetSpace::Default.check(index)?;
        Ok(Self::build(vendor, SysExCommand::LoadDefaultPreset, &[&[index]]))
    }
    /// The frame bytes, markers included
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
    /// The command byte
    pub fn command(&self) -> u8 {
        self.0[1 + VENDOR_ID_LEN]
    }
    /// Total frame length
    pub fn len(&self) -> usize {
        self.0.len()
    }
    /// Always false; a frame carries at least its markers
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    /// True if every byte between the markers is a valid MIDI data byte.  Only
    /// out-of-range model fields or vendor ids can make this false.
    pub fn is_seven_bit(&self) -> bool {
        self.0[1..self.0.len() - 1].iter().all(|b| b & 0x80 == 0)
    }
}

impl AsRef<[u8]> for SysExFrame {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

/// A decoded command, as the receiving firmware sees it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SysExMessage {
    /// `SET_REGISTERS`
    SetRegisters(FlatRegisters),
    /// `SAVE_PRESET`
    SavePreset {
        /// Slot to write
        index: u8,
        /// Preset name
        name: PresetName,
        /// Register state
        registers: FlatRegisters,
    },
    /// `LOAD_PRESET`
    LoadPreset(u8),
    /// `LOAD_DEFAULT_PRESET`
    LoadDefaultPreset(u8),
}

impl SysExMessage {
    /// Decode a complete frame into its vendor id and command.  Lengths are
    /// checked per command; slot indices are passed through unchecked.
    pub fn decode(frame: &[u8]) -> Result<(VendorId, Self), FormatError> {
        let body = match frame {
            [SYSEX_START, body @ .., SYSEX_END] => body,
            _ => return Err(FormatError::Unframed),
        };
        if body.len() < SYSEX_MIN_BODY_LEN {
            return Err(FormatError::Truncated { len: body.len() });
        }
        let (header, payload) = body.split_at(SYSEX_MIN_BODY_LEN);
        let vendor = VendorId::from_bytes([header[0], header[1], header[2]]);
        let code = header[VENDOR_ID_LEN];
        let command = SysExCommand::from_u8(code).ok_or(FormatError::UnknownCommand(code))?;
        if payload.len() != command.payload_len() {
            return Err(FormatError::CommandLength {
                command: code,
                len: body.len(),
                expected: SYSEX_MIN_BODY_LEN + command.payload_len(),
            });
        }
        let flat = |bytes: &[u8]| -> FlatRegisters {
            let mut regs = [0u8; FLAT_LEN];
            regs.copy_from_slice(bytes);
            regs
        };
        let message = match command {
            SysExCommand::SetRegisters => Self::SetRegisters(flat(payload)),
            SysExCommand::SavePreset => {
                let (name, regs) = payload[1..].split_at(PRESET_CODED_NAME_LEN);
                let mut coded = [0u8; PRESET_CODED_NAME_LEN];
                coded.copy_from_slice(name);
                Self::SavePreset {
                    index: payload[0],
                    name: PresetName::decode(&coded)?,
                    registers: flat(regs),
                }
            }
            SysExCommand::LoadPreset => Self::LoadPreset(payload[0]),
            SysExCommand::LoadDefaultPreset => Self::LoadDefaultPreset(payload[0]),
        };
        Ok((vendor, message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Operator;

    const VENDOR: VendorId = VendorId::new(0x00_21_7D);

    fn addressed_chip() -> Chip {
        Chip {
            vendor_id: VENDOR.get(),
            ..Chip::new()
        }
    }

    #[test]
    fn vendor_bytes() {
        assert_eq!(VendorId::new(0x123456).to_bytes(), [0x12, 0x34, 0x56]);
        assert_eq!(VendorId::new(0xFF12_3456).get(), 0x12_3456);
        assert_eq!(VendorId::from_bytes([0x12, 0x34, 0x56]), VendorId::new(0x123456));
    }

    #[test]
    fn set_registers_frame() {
        let frame = SysExFrame::set_registers(&addressed_chip());
        let bytes = frame.as_bytes();
        assert_eq!(frame.len(), 302);
        assert_eq!(bytes[0], 0xF0);
        assert_eq!(&bytes[1..4], &[0x00, 0x21, 0x7D]);
        assert_eq!(bytes[4], 0x00);
        assert_eq!(bytes[301], 0xF7);
        assert!(bytes[5..301].iter().all(|&b| b == 0));
        assert!(frame.is_seven_bit());
    }

    #[test]
    fn save_preset_frame() {
        let mut chip = addressed_chip();
        chip.lfo_on = true;
        let name = PresetName::new("Bell");
        let frame = SysExFrame::save_preset(3, &name, &chip).unwrap();
        let bytes = frame.as_bytes();
        assert_eq!(frame.len(), FRAME_OVERHEAD + 327);
        assert_eq!(frame.command(), CMD_SAVE_PRESET);
        assert_eq!(bytes[5], 3);
        // 'B' = 0x42, 'e' = 0x65
        assert_eq!(&bytes[6..10], &[0x02, 0x04, 0x05, 0x06]);
        assert!(bytes[6 + 8..6 + PRESET_CODED_NAME_LEN].iter().all(|&b| b == 0));
        assert_eq!(bytes[6 + PRESET_CODED_NAME_LEN], 1); // lfo_on
    }

    #[test]
    fn preset_indices_checked() {
        let name = PresetName::new("x");
        assert_eq!(
            SysExFrame::save_preset(8, &name, &addressed_chip()),
            Err(RangeError {
                space: PresetSpace::User,
                index: 8
            })
        );
        assert!(SysExFrame::load_preset(VENDOR, 8).is_err());
        assert_eq!(
            SysExFrame::load_default_preset(VENDOR, 200).unwrap_err().space,
            PresetSpace::Default
        );
        let load = SysExFrame::load_default_preset(VENDOR, 7).unwrap();
        assert_eq!(load.as_bytes(), &[0xF0, 0x00, 0x21, 0x7D, 0x03, 0x07, 0xF7]);
        let load = SysExFrame::load_preset(VENDOR, 0).unwrap();
        assert_eq!(load.as_bytes(), &[0xF0, 0x00, 0x21, 0x7D, 0x02, 0x00, 0xF7]);
    }

    #[test]
    fn preset_names() {
        assert_eq!(PresetName::new("User preset 12345").as_str(), "User preset 123");
        // a two byte character straddling the limit is dropped whole
        assert_eq!(PresetName::new("abcdefghijklmn\u{e9}").as_str(), "abcdefghijklmn");
        let name = PresetName::new("Piano");
        assert_eq!(PresetName::decode(&name.encode()), Ok(name));
    }

    #[test]
    fn decode_frames() {
        let mut chip = addressed_chip();
        chip.channels[5].operators[3] = Operator {
            total_level: 0x7F,
            ..Default::default()
        };
        let frame = SysExFrame::save_preset(2, &"Organ".into(), &chip).unwrap();
        let (vendor, msg) = SysExMessage::decode(frame.as_bytes()).unwrap();
        assert_eq!(vendor, VENDOR);
        assert_eq!(
            msg,
            SysExMessage::SavePreset {
                index: 2,
                name: PresetName::new("Organ"),
                registers: chip.flatten(),
            }
        );
        let frame = SysExFrame::set_registers(&chip);
        assert_eq!(
            SysExMessage::decode(frame.as_bytes()).unwrap().1,
            SysExMessage::SetRegisters(chip.flatten())
        );
    }

    #[test]
    fn frames_follow_model_vendor() {
        let mut chip = Chip::new();
        chip.vendor_id = 0x12_3456;
        let frame = SysExFrame::set_registers(&chip);
        assert_eq!(&frame.as_bytes()[1..4], &[0x12, 0x34, 0x56]);
        chip.vendor_id = 0x7D;
        chip.lfo_freq = 2;
        let frame = SysExFrame::save_preset(0, &"x".into(), &chip).unwrap();
        assert_eq!(&frame.as_bytes()[1..4], &[0x00, 0x00, 0x7D]);
        let (vendor, msg) = SysExMessage::decode(frame.as_bytes()).unwrap();
        match msg {
            SysExMessage::SavePreset { registers, .. } => {
                assert_eq!(Chip::unflatten(&registers, vendor), chip);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn decode_rejects_malformed() {
        assert_eq!(SysExMessage::decode(&[0x01, 0xF7]), Err(FormatError::Unframed));
        assert_eq!(
            SysExMessage::decode(&[0xF0, 0, 0, 0xF7]),
            Err(FormatError::Truncated { len: 2 })
        );
        assert_eq!(
            SysExMessage::decode(&[0xF0, 0, 0, 0, 0x09, 0xF7]),
            Err(FormatError::UnknownCommand(0x09))
        );
        assert_eq!(
            SysExMessage::decode(&[0xF0, 0, 0, 0, 0x02, 1, 2, 0xF7]),
            Err(FormatError::CommandLength {
                command: 2,
                len: 6,
                expected: 5
            })
        );
    }
}

//! This crate contains the register-level model of a YM2612 (OPN2) FM chip
//! together with every wire format used to configure one remotely.  It is
//! `no_std` and performs no I/O: the host side lives in `ymsynth_link`.
//!
//! The pieces, leaf first:
//!
//!  - [model]: the in-memory mirror of the chip (one [Chip] owning six
//!    [Channel]s, each owning four [Operator]s).
//!  - [registers]: the pure bit-packing functions turning that mirror into
//!    chip register bytes, addresses and banks.
//!  - [codec]: the flattened 296 byte representation of the whole model,
//!    which is what the device firmware expects in preset messages.
//!  - [patch]: the 43 byte single-voice patch file format.
//!  - [sysex]: building (and decoding) the SysEx command frames.
//!  - [presets]: a couple of factory voices.
//!
//! Every field is masked to its bit width when encoded, never clamped or
//! rejected.  Out-of-range input silently loses its high bits, exactly as the
//! chip itself would.

#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]

pub mod codec;
pub mod consts;
mod error;
pub mod model;
pub mod patch;
pub mod presets;
pub mod registers;
pub mod sysex;

pub use error::{FormatError, PresetSpace, RangeError};
pub use model::{Channel, Chip, Operator};
pub use presets::FactoryPreset;
pub use registers::RegisterWrite;
pub use sysex::{PresetName, SysExCommand, SysExFrame, SysExMessage, VendorId};

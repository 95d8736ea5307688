//! Host side of the YM2612 board: delivers the register model from [ymsynth]
//! to a device over either of the two links the firmware understands.
//!
//!  - [transport::SerialTransport]: the text command line (`writeReg` /
//!    `reset`), one register per round trip, acknowledged with `OK`.
//!  - [transport::MidiTransport]: SysEx frames carrying the whole model or a
//!    preset command, fire and forget.
//!
//! [Session] ties a model to the links chosen by a [LinkConfig] and is the
//! entry point for a front end.  Everything is synchronous: each call blocks
//! until the device has answered (serial) or the frame has been handed to the
//! MIDI output.

pub mod config;
mod error;
mod session;
pub mod transport;

pub use config::{LinkConfig, MidiConfig, MidiPortSelector, SerialConfig};
pub use error::{Error, TransportError};
pub use session::Session;
pub use transport::{Link, Transport};

pub use ymsynth;

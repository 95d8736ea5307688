use thiserror::Error;
use ymsynth::{FormatError, RangeError};

/// Failure to deliver something to a device
#[derive(Debug, Error)]
pub enum TransportError {
    /// No endpoint is configured for this link
    #[error("device not initialized")]
    NotConfigured,
    /// The link cannot carry this operation (e.g. single register writes over
    /// SysEx)
    #[error("operation not supported by the {0} link")]
    Unsupported(&'static str),
    /// The device stopped answering before acknowledging the command
    #[error("no acknowledgement for {command:?} (reply: {reply:?})")]
    NoAck {
        /// Command line sent, without the newline
        command: String,
        /// Everything received before the reply ended
        reply: String,
    },
    /// Some writes of a sequence failed; the others were still attempted
    #[error("{failed} of {attempted} register writes failed")]
    Incomplete {
        /// Writes that failed
        failed: usize,
        /// Writes attempted
        attempted: usize,
    },
    /// The channel id does not name one of the six channels
    #[error("no channel {0}")]
    NoSuchChannel(u8),
    /// The operator id does not name one of the channel's four operators
    #[error("no operator {channel}-{operator}")]
    NoSuchOperator {
        /// Channel requested
        channel: u8,
        /// Operator requested
        operator: u8,
    },
    /// Could not find the requested MIDI output
    #[error("no MIDI output matching {0}")]
    NoSuchPort(String),
    /// Error reported by the MIDI backend
    #[error("MIDI: {0}")]
    Midi(String),
    /// Error opening the serial port
    #[error("serial port: {0}")]
    Serial(#[from] serialport::Error),
    /// I/O error on an open port
    #[error("I/O: {0}")]
    Io(#[from] std::io::Error),
}

/// Any failure the [crate::Session] can report
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed input buffer
    #[error(transparent)]
    Format(#[from] FormatError),
    /// Preset slot out of range
    #[error(transparent)]
    Range(#[from] RangeError),
    /// Delivery failed
    #[error(transparent)]
    Transport(#[from] TransportError),
}

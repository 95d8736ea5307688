//! The board's text command line.
//!
//! Each command is one ASCII line.  The board echoes and prints freely; a
//! command succeeded if `OK` shows up in the reply before it goes quiet.

use std::io::{ErrorKind, Read, Write};
use std::thread;
use std::time::Duration;

use ymsynth::RegisterWrite;

use super::Transport;
use crate::config::{SerialConfig, RESET_SETTLE, SERIAL_PACING, SERIAL_READ_TIMEOUT};
use crate::TransportError;

const ACK: &[u8] = b"OK";

/// A byte stream to the board.  Reads are expected to give up after a short
/// timeout, either returning `Ok(0)` or a [ErrorKind::TimedOut] error.
pub trait SerialLine: Read + Write + Send {}

impl<T: Read + Write + Send> SerialLine for T {}

#[derive(Clone, Copy)]
struct Timing {
    pacing: Duration,
    reset_settle: Duration,
}

const BOARD_TIMING: Timing = Timing {
    pacing: SERIAL_PACING,
    reset_settle: RESET_SETTLE,
};

/// Transport over the serial command line
pub struct SerialTransport {
    line: Box<dyn SerialLine>,
    timing: Timing,
}

impl SerialTransport {
    /// Open the configured port with the per-byte read timeout
    pub fn open(config: &SerialConfig) -> Result<Self, TransportError> {
        let port = serialport::new(config.port.as_str(), config.baud_rate)
            .timeout(SERIAL_READ_TIMEOUT)
            .open()?;
        log::info!("Serial: {} @ {} baud", config.port, config.baud_rate);
        Ok(Self::new(Box::new(port)))
    }
    /// Use an already open line
    pub fn new(line: Box<dyn SerialLine>) -> Self {
        Self {
            line,
            timing: BOARD_TIMING,
        }
    }
    #[cfg(test)]
    fn without_delays(line: Box<dyn SerialLine>) -> Self {
        Self {
            line,
            timing: Timing {
                pacing: Duration::ZERO,
                reset_settle: Duration::ZERO,
            },
        }
    }

    /// Send one command line and wait for the acknowledgement
    fn send_command(&mut self, command: &str) -> Result<(), TransportError> {
        self.line.write_all(format!("{}\n", command).as_bytes())?;
        self.line.flush()?;
        let mut reply = Vec::new();
        let mut byte = [0u8; 1];
        loop {
            match self.line.read(&mut byte) {
                Ok(0) => break,
                Ok(_) => {
                    reply.push(byte[0]);
                    if reply.ends_with(ACK) {
                        log::debug!("CMD: {}: OK", command);
                        thread::sleep(self.timing.pacing);
                        return Ok(());
                    }
                }
                Err(e) if e.kind() == ErrorKind::TimedOut => break,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        log::warn!("CMD: {}: ERR", command);
        Err(TransportError::NoAck {
            command: command.to_owned(),
            reply: String::from_utf8_lossy(&reply).into_owned(),
        })
    }
}

impl Transport for SerialTransport {
    fn name(&self) -> &'static str {
        "serial"
    }
    fn write_register(&mut self, write: RegisterWrite) -> Result<(), TransportError> {
        log::debug!("CMD: writeReg: {:02X}-{:02X}-{:02X}", write.addr, write.data, write.bank);
        self.send_command(&format!("writeReg {} {} {}", write.addr, write.data, write.bank))
    }
    fn reset(&mut self) -> Result<(), TransportError> {
        log::info!("CMD: reset");
        self.send_command("reset")?;
        thread::sleep(self.timing.reset_settle);
        Ok(())
    }
}

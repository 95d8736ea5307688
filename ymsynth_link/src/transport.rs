//! This module abstracts over the ways of getting register values onto the
//! board.  [Transport] is the single capability every link offers; [Link] is
//! the variant chosen once, from configuration, when a session starts.

use ymsynth::{Chip, RegisterWrite};

use crate::config::{MidiConfig, SerialConfig};
use crate::TransportError;

/// Something that can put register values on the chip
pub trait Transport {
    /// Short name for log messages
    fn name(&self) -> &'static str;
    /// Write one register.  Attempted exactly once; retrying is up to the
    /// caller.
    fn write_register(&mut self, write: RegisterWrite) -> Result<(), TransportError>;
    /// Reboot the board, blocking until it is ready for new commands
    fn reset(&mut self) -> Result<(), TransportError>;
    /// Mirror the whole model onto the chip.  By default this writes every
    /// register in turn (see [write_all]).
    fn push(&mut self, chip: &Chip) -> Result<(), TransportError> {
        write_all(self, chip.register_writes())
    }
}

/// Attempt every write in `writes`, regardless of earlier failures, and fail
/// if any of them did
pub fn write_all<T, I>(transport: &mut T, writes: I) -> Result<(), TransportError>
where
    T: Transport + ?Sized,
    I: IntoIterator<Item = RegisterWrite>,
{
    let (attempted, failed) = writes.into_iter().fold((0, 0), |(attempted, failed), write| {
        match transport.write_register(write) {
            Ok(()) => (attempted + 1, failed),
            Err(e) => {
                log::warn!(
                    "{}: write {:02X}-{:02X}-{:02X} failed: {}",
                    transport.name(),
                    write.addr,
                    write.data,
                    write.bank,
                    e
                );
                (attempted + 1, failed + 1)
            }
        }
    });
    if failed == 0 {
        Ok(())
    } else {
        Err(TransportError::Incomplete { failed, attempted })
    }
}

/// Write the global LFO register
pub fn setup_lfo<T: Transport + ?Sized>(transport: &mut T, chip: &Chip) -> Result<(), TransportError> {
    transport.write_register(chip.lfo_write())
}

/// Write the feedback/algorithm and stereo/sensitivity registers of a channel.
/// An invalid `channel_id` writes nothing and fails.
pub fn setup_channel<T: Transport + ?Sized>(
    transport: &mut T,
    chip: &Chip,
    channel_id: u8,
) -> Result<(), TransportError> {
    match chip.channel_writes(channel_id) {
        Some(writes) => write_all(transport, writes),
        None => {
            log::warn!("CH: id not valid: {}", channel_id);
            Err(TransportError::NoSuchChannel(channel_id))
        }
    }
}

/// Write the seven registers of one operator.  Invalid ids write nothing and
/// fail.
pub fn setup_operator<T: Transport + ?Sized>(
    transport: &mut T,
    chip: &Chip,
    channel_id: u8,
    operator_id: u8,
) -> Result<(), TransportError> {
    match chip.operator_writes(channel_id, operator_id) {
        Some(writes) => write_all(transport, writes),
        None => {
            log::warn!("OP: id not valid: {}-{}", channel_id, operator_id);
            Err(TransportError::NoSuchOperator {
                channel: channel_id,
                operator: operator_id,
            })
        }
    }
}

mod disabled;
pub use disabled::Disabled;

mod serial;
pub use serial::{SerialLine, SerialTransport};

mod midi;
pub use midi::{MidiTransport, SysExSink};

/// The link variants, chosen once when a session is built
pub enum Link {
    /// Text command line
    Serial(SerialTransport),
    /// MIDI SysEx output
    Midi(MidiTransport),
    /// Nothing configured
    Disabled(Disabled),
}

impl Link {
    /// Open the serial port if one is configured.  A port that fails to open
    /// leaves the link disabled.
    pub fn serial(config: Option<&SerialConfig>) -> Self {
        match config.map(SerialTransport::open) {
            Some(Ok(transport)) => Self::Serial(transport),
            Some(Err(e)) => {
                log::error!("Serial port not opened: {}", e);
                Self::Disabled(Disabled)
            }
            None => Self::Disabled(Disabled),
        }
    }
    /// Open the MIDI output if one is configured.  An output that fails to
    /// open leaves the link disabled.
    pub fn midi(config: Option<&MidiConfig>) -> Self {
        match config.map(MidiTransport::open) {
            Some(Ok(transport)) => Self::Midi(transport),
            Some(Err(e)) => {
                log::error!("MIDI output not opened: {}", e);
                Self::Disabled(Disabled)
            }
            None => Self::Disabled(Disabled),
        }
    }
    /// False for [Link::Disabled]
    pub fn is_configured(&self) -> bool {
        !matches!(self, Self::Disabled(_))
    }
    /// The SysEx transport, if this is a MIDI link
    pub fn as_midi_mut(&mut self) -> Option<&mut MidiTransport> {
        match self {
            Self::Midi(midi) => Some(midi),
            _ => None,
        }
    }
    fn inner(&mut self) -> &mut dyn Transport {
        match self {
            Self::Serial(t) => t,
            Self::Midi(t) => t,
            Self::Disabled(t) => t,
        }
    }
}

impl Transport for Link {
    fn name(&self) -> &'static str {
        match self {
            Self::Serial(t) => t.name(),
            Self::Midi(t) => t.name(),
            Self::Disabled(t) => t.name(),
        }
    }
    fn write_register(&mut self, write: RegisterWrite) -> Result<(), TransportError> {
        self.inner().write_register(write)
    }
    fn reset(&mut self) -> Result<(), TransportError> {
        self.inner().reset()
    }
    fn push(&mut self, chip: &Chip) -> Result<(), TransportError> {
        self.inner().push(chip)
    }
}

#[cfg(test)]
pub(crate) mod mock {
    //! Transports recording what they were asked to do
    use super::*;
    pub use super::midi::mock::RecordingSink;

    /// Records every write; fails those whose index is listed in `fail_at`
    #[derive(Default)]
    pub struct RecordingTransport {
        pub writes: Vec<RegisterWrite>,
        pub fail_at: Vec<usize>,
        pub resets: usize,
    }

    impl Transport for RecordingTransport {
        fn name(&self) -> &'static str {
            "mock"
        }
        fn write_register(&mut self, write: RegisterWrite) -> Result<(), TransportError> {
            let index = self.writes.len();
            self.writes.push(write);
            if self.fail_at.contains(&index) {
                Err(TransportError::NoAck {
                    command: format!("write {}", index),
                    reply: String::new(),
                })
            } else {
                Ok(())
            }
        }
        fn reset(&mut self) -> Result<(), TransportError> {
            self.resets += 1;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::RecordingTransport;
    use super::*;
    use ymsynth::registers::CHIP_WRITES;

    #[test]
    fn failures_do_not_stop_the_sequence() {
        let mut chip = Chip::new();
        chip.channels[1].operators[2].total_level = 0x33;
        let mut t = RecordingTransport {
            fail_at: vec![1],
            ..Default::default()
        };
        let result = setup_operator(&mut t, &chip, 1, 2);
        assert!(matches!(
            result,
            Err(TransportError::Incomplete {
                failed: 1,
                attempted: 7
            })
        ));
        assert_eq!(t.writes.len(), 7);
        assert_eq!(t.writes[1], RegisterWrite::new(0x49, 0x33, 0));
        assert_eq!(t.writes[6].addr, 0x99);
    }

    #[test]
    fn push_writes_everything() {
        let chip = Chip::new();
        let mut t = RecordingTransport {
            fail_at: vec![0, 100],
            ..Default::default()
        };
        let result = t.push(&chip);
        assert!(matches!(
            result,
            Err(TransportError::Incomplete { failed: 2, .. })
        ));
        assert_eq!(t.writes.len(), CHIP_WRITES);
        assert_eq!(t.writes, chip.register_writes().collect::<Vec<_>>());

        let mut t = RecordingTransport::default();
        assert!(t.push(&chip).is_ok());
    }

    #[test]
    fn channel_setup() {
        let mut chip = Chip::new();
        chip.channels[5].algorithm = 7;
        let mut t = RecordingTransport::default();
        setup_lfo(&mut t, &chip).unwrap();
        setup_channel(&mut t, &chip, 5).unwrap();
        assert!(matches!(
            setup_channel(&mut t, &chip, 6),
            Err(TransportError::NoSuchChannel(6))
        ));
        assert_eq!(
            t.writes,
            vec![
                RegisterWrite::new(0x22, 0, 0),
                RegisterWrite::new(0xB2, 0x07, 1),
                RegisterWrite::new(0xB6, 0, 1),
            ]
        );
    }

    #[test]
    fn invalid_operator_writes_nothing() {
        let chip = Chip::new();
        let mut t = RecordingTransport::default();
        assert!(matches!(
            setup_operator(&mut t, &chip, 2, 4),
            Err(TransportError::NoSuchOperator {
                channel: 2,
                operator: 4
            })
        ));
        assert!(matches!(
            setup_operator(&mut t, &chip, 6, 0),
            Err(TransportError::NoSuchOperator { channel: 6, .. })
        ));
        assert!(t.writes.is_empty());
    }

    #[test]
    fn disabled_link() {
        let mut link = Link::serial(None);
        assert!(!link.is_configured());
        assert!(link.as_midi_mut().is_none());
        assert!(matches!(
            link.write_register(RegisterWrite::default()),
            Err(TransportError::NotConfigured)
        ));
        assert!(matches!(
            Link::midi(None).reset(),
            Err(TransportError::NotConfigured)
        ));
    }
}

//! SysEx over a MIDI output.  Open loop: success means the frame was handed
//! to the output, not that the board applied it.
//!
//! Frames are addressed to the vendor id held by the model being sent.

use midir::{MidiOutput, MidiOutputConnection};
use ymsynth::{Chip, PresetName, RegisterWrite, SysExFrame, VendorId};

use super::Transport;
use crate::config::{MidiConfig, MIDI_CLIENT_NAME};
use crate::{Error, TransportError};

/// Anything that can emit a raw SysEx message
pub trait SysExSink {
    /// Send one complete message, markers included
    fn send_sysex(&mut self, bytes: &[u8]) -> Result<(), TransportError>;
}

impl SysExSink for MidiOutputConnection {
    fn send_sysex(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        self.send(bytes)
            .map_err(|e| TransportError::Midi(e.to_string()))
    }
}

/// Transport sending SysEx command frames
pub struct MidiTransport {
    sink: Box<dyn SysExSink>,
}

impl MidiTransport {
    /// Connect to the configured MIDI output
    pub fn open(config: &MidiConfig) -> Result<Self, TransportError> {
        let output =
            MidiOutput::new(MIDI_CLIENT_NAME).map_err(|e| TransportError::Midi(e.to_string()))?;
        let port = output
            .ports()
            .into_iter()
            .enumerate()
            .find(|(i, p)| {
                output
                    .port_name(p)
                    .map(|name| config.port.matches(*i, &name))
                    .unwrap_or(false)
            })
            .map(|(_, p)| p)
            .ok_or_else(|| TransportError::NoSuchPort(format!("{:?}", config.port)))?;
        let name = output.port_name(&port).unwrap_or_default();
        let conn = output
            .connect(&port, MIDI_CLIENT_NAME)
            .map_err(|e| TransportError::Midi(e.to_string()))?;
        log::info!("MIDI: {}", name);
        Ok(Self::new(Box::new(conn)))
    }
    /// Use an already connected sink
    pub fn new(sink: Box<dyn SysExSink>) -> Self {
        Self { sink }
    }
    /// Send a prepared frame verbatim
    pub fn send(&mut self, frame: &SysExFrame) -> Result<(), TransportError> {
        if let Err(e) = wmidi::MidiMessage::try_from(frame.as_bytes()) {
            log::warn!(
                "SysEx command {} carries non MIDI data ({:?}); sending anyway",
                frame.command(),
                e
            );
        }
        log::debug!("SysEx: command {}, {} bytes", frame.command(), frame.len());
        self.sink.send_sysex(frame.as_bytes())
    }
    /// `SET_REGISTERS` with the whole model
    pub fn set_registers(&mut self, chip: &Chip) -> Result<(), TransportError> {
        self.send(&SysExFrame::set_registers(chip))
    }
    /// `SAVE_PRESET`: store the model under `name` in user slot `index`
    pub fn save_preset(&mut self, index: u8, name: &PresetName, chip: &Chip) -> Result<(), Error> {
        let frame = SysExFrame::save_preset(index, name, chip)?;
        log::info!("SAVE PRESET {}: {}", index, name);
        Ok(self.send(&frame)?)
    }
    /// `LOAD_PRESET` from user slot `index` of the board answering to `vendor`
    pub fn load_preset(&mut self, vendor: VendorId, index: u8) -> Result<(), Error> {
        let frame = SysExFrame::load_preset(vendor, index)?;
        log::info!("LOAD PRESET {}", index);
        Ok(self.send(&frame)?)
    }
    /// `LOAD_DEFAULT_PRESET` from factory slot `index` of the board answering
    /// to `vendor`
    pub fn load_default_preset(&mut self, vendor: VendorId, index: u8) -> Result<(), Error> {
        let frame = SysExFrame::load_default_preset(vendor, index)?;
        log::info!("LOAD DEFAULT PRESET {}", index);
        Ok(self.send(&frame)?)
    }
}

impl Transport for MidiTransport {
    fn name(&self) -> &'static str {
        "midi"
    }
    /// The firmware has no SysEx command for a single register
    fn write_register(&mut self, _write: RegisterWrite) -> Result<(), TransportError> {
        Err(TransportError::Unsupported(self.name()))
    }
    fn reset(&mut self) -> Result<(), TransportError> {
        Err(TransportError::Unsupported(self.name()))
    }
    fn push(&mut self, chip: &Chip) -> Result<(), TransportError> {
        self.set_registers(chip)
    }
}


#[cfg(test)]
mod tests {
    use super::mock::RecordingSink;
    use super::*;
    use ymsynth::{PresetSpace, RangeError};

    const VENDOR: VendorId = VendorId::new(0x00_12_34);

    fn transport() -> (MidiTransport, RecordingSink) {
        let sink = RecordingSink::default();
        (MidiTransport::new(Box::new(sink.clone())), sink)
    }

    fn chip() -> Chip {
        Chip {
            vendor_id: VENDOR.get(),
            ..Chip::new()
        }
    }

    #[test]
    fn push_sends_one_frame() {
        let (mut t, sink) = transport();
        t.push(&chip()).unwrap();
        let sent = sink.sent.borrow();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].len(), 302);
        assert_eq!(&sent[0][..5], &[0xF0, 0x00, 0x12, 0x34, 0x00]);
        assert_eq!(sent[0][301], 0xF7);
    }

    #[test]
    fn vendor_taken_from_model() {
        let (mut t, sink) = transport();
        let mut model = chip();
        t.push(&model).unwrap();
        model.vendor_id = 0x12_3456;
        t.push(&model).unwrap();
        let sent = sink.sent.borrow();
        assert_eq!(&sent[0][1..4], &[0x00, 0x12, 0x34]);
        assert_eq!(&sent[1][1..4], &[0x12, 0x34, 0x56]);
    }

    #[test]
    fn out_of_range_preset_sends_nothing() {
        let (mut t, sink) = transport();
        let result = t.save_preset(8, &PresetName::new("x"), &chip());
        assert!(matches!(
            result,
            Err(Error::Range(RangeError {
                space: PresetSpace::User,
                index: 8
            }))
        ));
        assert!(t.load_preset(VENDOR, 9).is_err());
        assert!(t.load_default_preset(VENDOR, 8).is_err());
        assert!(sink.sent.borrow().is_empty());
    }

    #[test]
    fn preset_commands() {
        let (mut t, sink) = transport();
        t.load_preset(VENDOR, 1).unwrap();
        t.load_default_preset(VENDOR, 7).unwrap();
        t.save_preset(0, &PresetName::new("User preset 0"), &chip())
            .unwrap();
        let sent = sink.sent.borrow();
        assert_eq!(sent[0], vec![0xF0, 0x00, 0x12, 0x34, 0x02, 0x01, 0xF7]);
        assert_eq!(sent[1], vec![0xF0, 0x00, 0x12, 0x34, 0x03, 0x07, 0xF7]);
        assert_eq!(sent[2].len(), 333);
        assert_eq!(&sent[2][1..5], &[0x00, 0x12, 0x34, 0x01]);
    }

    #[test]
    fn oversized_fields_sent_verbatim() {
        let (mut t, sink) = transport();
        let mut model = chip();
        model.channels[0].operators[0].multiple = 0xFF;
        t.set_registers(&model).unwrap();
        assert_eq!(sink.sent.borrow()[0], SysExFrame::set_registers(&model).as_bytes());
    }

    #[test]
    fn no_register_level_access() {
        let (mut t, sink) = transport();
        assert!(matches!(
            t.write_register(RegisterWrite::default()),
            Err(TransportError::Unsupported("midi"))
        ));
        assert!(t.reset().is_err());
        assert!(sink.sent.borrow().is_empty());
    }
}

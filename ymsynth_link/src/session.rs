use ymsynth::{Chip, FactoryPreset, FormatError, PresetName, VendorId};

use crate::config::LinkConfig;
use crate::transport::{Link, MidiTransport, Transport};
use crate::{Error, TransportError};

/// A model of the chip together with the links to the board it mirrors.
///
/// The links are chosen once, when the session is built; an unconfigured (or
/// unopenable) device stays [Link::Disabled] and every operation on it fails
/// with [TransportError::NotConfigured].
pub struct Session {
    chip: Chip,
    serial: Link,
    midi: Link,
}

impl Session {
    /// Open every device named in `config`
    pub fn open(config: &LinkConfig) -> Self {
        Self::with_links(
            VendorId::new(config.vendor_id),
            Link::serial(config.serial.as_ref()),
            Link::midi(config.midi.as_ref()),
        )
    }
    /// Build a session around already opened links.  `vendor` becomes the
    /// model's vendor id, which addresses every SysEx frame.
    pub fn with_links(vendor: VendorId, serial: Link, midi: Link) -> Self {
        let mut chip = Chip::new();
        chip.vendor_id = vendor.get();
        Self { chip, serial, midi }
    }
    /// The model
    pub fn chip(&self) -> &Chip {
        &self.chip
    }
    /// The model, for direct edits
    pub fn chip_mut(&mut self) -> &mut Chip {
        &mut self.chip
    }
    /// Apply a 43 byte patch file to all six channels.  The model is left
    /// untouched if the file is malformed.
    pub fn apply_patch_file(&mut self, bytes: &[u8]) -> Result<&Chip, FormatError> {
        self.chip.apply_patch(bytes)?;
        log::info!("Patch file loaded");
        Ok(&self.chip)
    }
    /// Write every register over the serial command line
    pub fn push_to_serial(&mut self) -> Result<(), TransportError> {
        let serial = configured(&mut self.serial, "serial")?;
        serial.push(&self.chip)
    }
    /// Send the model as one `SET_REGISTERS` frame
    pub fn push_to_midi(&mut self) -> Result<(), TransportError> {
        midi_link(&mut self.midi)?.push(&self.chip)
    }
    /// Push the model to every configured device.  Each configured device is
    /// attempted even if an earlier one failed.
    pub fn set_register_values(&mut self) -> Result<(), TransportError> {
        if !self.serial.is_configured() && !self.midi.is_configured() {
            log::warn!("No device initialized");
            return Err(TransportError::NotConfigured);
        }
        let results = [
            self.serial.is_configured().then(|| self.push_to_serial()),
            self.midi.is_configured().then(|| self.push_to_midi()),
        ];
        results.into_iter().flatten().fold(Ok(()), |acc, r| acc.and(r))
    }
    /// Store the model in user slot `index`.  Without a name the slot is
    /// called `User preset <index>`.
    pub fn save_preset(&mut self, index: u8, name: Option<&str>) -> Result<(), Error> {
        let name = match name {
            Some(name) => PresetName::new(name),
            None => PresetName::new(&format!("User preset {}", index)),
        };
        midi_link(&mut self.midi)?.save_preset(index, &name, &self.chip)
    }
    /// Recall user slot `index` on the board
    pub fn load_preset(&mut self, index: u8) -> Result<(), Error> {
        midi_link(&mut self.midi)?.load_preset(self.chip.vendor(), index)
    }
    /// Recall factory slot `index` on the board
    pub fn load_default_preset(&mut self, index: u8) -> Result<(), Error> {
        midi_link(&mut self.midi)?.load_default_preset(self.chip.vendor(), index)
    }
    /// Reboot the board over the serial command line
    pub fn reset_board(&mut self) -> Result<(), TransportError> {
        configured(&mut self.serial, "serial")?.reset()
    }
    /// Load a built-in voice into the model, then reset the board and write
    /// every register over the serial command line
    pub fn apply_factory_preset(&mut self, preset: FactoryPreset) -> Result<(), TransportError> {
        log::info!("PRESET: {}", preset.name());
        preset.apply(&mut self.chip);
        let serial = configured(&mut self.serial, "serial")?;
        // the board comes up with its own preset; a failed reset is not fatal
        if let Err(e) = serial.reset() {
            log::warn!("Reset failed: {}", e);
        }
        serial.push(&self.chip)
    }
}

fn midi_link(link: &mut Link) -> Result<&mut MidiTransport, TransportError> {
    match link.as_midi_mut() {
        Some(midi) => Ok(midi),
        None => {
            log::warn!("MIDI not initialized");
            Err(TransportError::NotConfigured)
        }
    }
}

fn configured<'a>(link: &'a mut Link, what: &str) -> Result<&'a mut Link, TransportError> {
    if link.is_configured() {
        Ok(link)
    } else {
        log::warn!("{} not initialized", what);
        Err(TransportError::NotConfigured)
    }
}

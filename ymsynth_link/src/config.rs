//! Device configuration and the fixed protocol timings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Baud rate the board's command line listens at
pub const DEFAULT_BAUD_RATE: u32 = 115_200;
/// How long to wait for each byte of a serial reply
pub const SERIAL_READ_TIMEOUT: Duration = Duration::from_secs(1);
/// Pause after each acknowledged serial command; the board's UART task is slow
/// to drain its queue
pub const SERIAL_PACING: Duration = Duration::from_millis(10);
/// Time the board needs to come back after `reset`
pub const RESET_SETTLE: Duration = Duration::from_secs(2);
/// Client name registered with the MIDI backend
pub const MIDI_CLIENT_NAME: &str = "ymsynth";

/// Serial command line endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerialConfig {
    /// OS name of the port, e.g. `/dev/ttyACM0` or `COM3`
    pub port: String,
    /// Line speed
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
}

fn default_baud_rate() -> u32 {
    DEFAULT_BAUD_RATE
}

impl SerialConfig {
    /// Configuration for `port` at the default speed
    pub fn new(port: impl Into<String>) -> Self {
        Self {
            port: port.into(),
            baud_rate: DEFAULT_BAUD_RATE,
        }
    }
}

/// How to pick one of the MIDI outputs the backend reports
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MidiPortSelector {
    /// Position in the backend's port list
    Index(usize),
    /// First port whose name contains this text
    Name(String),
}

impl MidiPortSelector {
    /// True if this selector picks the port at `index` named `name`
    pub fn matches(&self, index: usize, name: &str) -> bool {
        match self {
            Self::Index(i) => *i == index,
            Self::Name(n) => name.contains(n.as_str()),
        }
    }
}

/// MIDI output endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MidiConfig {
    /// Output port to open
    pub port: MidiPortSelector,
}

/// Which devices to talk to.  A missing section leaves that link disabled.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkConfig {
    /// 24 bit SysEx vendor id the firmware answers to
    #[serde(default)]
    pub vendor_id: u32,
    /// Serial command line, if any
    #[serde(default)]
    pub serial: Option<SerialConfig>,
    /// MIDI output, if any
    #[serde(default)]
    pub midi: Option<MidiConfig>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_selection() {
        assert!(MidiPortSelector::Index(2).matches(2, "anything"));
        assert!(!MidiPortSelector::Index(2).matches(1, "anything"));
        let by_name = MidiPortSelector::Name("YM2612".into());
        assert!(by_name.matches(5, "USB MIDI YM2612 Board:0"));
        assert!(!by_name.matches(0, "Midi Through"));
    }

    #[test]
    fn load_from_json() {
        let config: LinkConfig = serde_json::from_str(
            r#"{"vendor_id":125,"midi":{"port":{"name":"YM"}},"serial":{"port":"COM3"}}"#,
        )
        .unwrap();
        assert_eq!(config.vendor_id, 125);
        assert_eq!(config.serial, Some(SerialConfig::new("COM3")));
        assert_eq!(config.serial.unwrap().baud_rate, 115_200);
        assert_eq!(
            config.midi.unwrap().port,
            MidiPortSelector::Name("YM".into())
        );

        let config: LinkConfig =
            serde_json::from_str(r#"{"midi":{"port":{"index":1}}}"#).unwrap();
        assert_eq!(config.vendor_id, 0);
        assert!(config.serial.is_none());
        assert_eq!(config.midi.unwrap().port, MidiPortSelector::Index(1));

        let config: LinkConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, LinkConfig::default());
    }

    #[test]
    fn baud_rate_overridable() {
        let config: SerialConfig =
            serde_json::from_str(r#"{"port":"/dev/ttyACM0","baud_rate":9600}"#).unwrap();
        assert_eq!(config.baud_rate, 9600);
        let round: SerialConfig =
            serde_json::from_str(&serde_json::to_string(&config).unwrap()).unwrap();
        assert_eq!(round, config);
    }

    #[test]
    fn defaults() {
        let config = LinkConfig::default();
        assert!(config.serial.is_none());
        assert!(config.midi.is_none());
        assert_eq!(SerialConfig::new("COM3").baud_rate, 115_200);
    }
}

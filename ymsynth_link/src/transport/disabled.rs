use ymsynth::{Chip, RegisterWrite};

use super::Transport;
use crate::TransportError;

/// Stand-in for a link with no device behind it.  Performs no I/O and fails
/// every operation.
#[derive(Debug, Default, Clone, Copy)]
pub struct Disabled;

impl Transport for Disabled {
    fn name(&self) -> &'static str {
        "disabled"
    }
    fn write_register(&mut self, _write: RegisterWrite) -> Result<(), TransportError> {
        Err(TransportError::NotConfigured)
    }
    fn reset(&mut self) -> Result<(), TransportError> {
        Err(TransportError::NotConfigured)
    }
    fn push(&mut self, _chip: &Chip) -> Result<(), TransportError> {
        Err(TransportError::NotConfigured)
    }
}

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::MessageParseError;

/// The single authoritative safety state of the interceptor.
///
/// Every variant other than [`Fault::NoFault`] has the same effect on the
/// output (overrides are ignored and the sensed pedal is passed through); they
/// only differ in what they tell the remote peer through the status frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, IntoPrimitive, TryFromPrimitive)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[num_enum(error_type(name = MessageParseError, constructor = MessageParseError::UnknownFault))]
#[repr(u8)]
pub enum Fault {
    /// Normal operation, override values are honoured
    NoFault = 0,
    /// An inbound command failed its checksum (or was too short to carry one)
    BadChecksum = 1,
    /// The previous status frame was still pending when the next one was due
    SendFailure = 2,
    /// The CAN controller reported a bus level error
    BusError = 3,
    /// No control decision has been made since boot
    #[default]
    Startup = 4,
    /// No command has been accepted within the configured number of ticks
    Timeout = 5,
    /// A release command carried non-zero values
    InvalidCommand = 6,
}

impl Fault {
    /// Whether the override path is live
    pub fn is_healthy(self) -> bool {
        self == Self::NoFault
    }

    /// The value placed in the high nibble of the status byte
    pub fn nibble(self) -> u8 {
        u8::from(self) & 0x0F
    }
}

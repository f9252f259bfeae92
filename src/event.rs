use crate::{BootMode, Fault, MessageParseError, PedalPosition, StatusReport};

/// What handling one inbound frame did to the shared state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RxEvent {
    /// Frame was on some other identifier and left everything untouched
    Ignored,
    /// Boot mode escape frame, nothing else was processed
    BootModeRequested(BootMode),
    /// Frame could not be trusted, the fault is now [`Fault::BadChecksum`]
    Rejected(MessageParseError),
    /// Checksum was fine but the index was not the next one. Only the stored
    /// index moved.
    OutOfSequence { expected: u8, received: u8 },
    /// Override registers now hold these values
    OverrideAccepted(PedalPosition),
    /// Release request applied, overrides zeroed. The resulting fault is
    /// [`Fault::NoFault`] for a clean release and [`Fault::InvalidCommand`]
    /// otherwise.
    Released(Fault),
}

impl RxEvent {
    /// Whether the frame counted as an accepted command (and so reset the
    /// timeout counter)
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::OverrideAccepted(_) | Self::Released(_))
    }
}

/// Outcome of trying to queue the status frame on a timer tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransmitOutcome {
    Queued(StatusReport),
    /// The previous frame had not gone out yet
    MailboxBusy,
    /// The driver refused the frame
    DriverError,
}

/// What one timer tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickEvent {
    pub transmit: TransmitOutcome,
    /// The timeout ceiling has been reached and the fault set
    pub timed_out: bool,
    /// Level the liveness indicator was set to
    pub led: bool,
}

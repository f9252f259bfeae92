use embedded_can::ErrorKind;

use crate::{BootMode, PedalPosition};

/// The CAN peripheral as the interceptor needs it: a non-blocking driver plus
/// direct access to the transmit mailbox the status frame goes through.
pub trait CanMailbox: embedded_can::nb::Can {
    /// Whether the previous status frame has left the mailbox
    fn is_transmit_empty(&self) -> bool;

    /// Drops whatever is waiting to be transmitted
    fn abort_transmit(&mut self);

    /// Clears the request-complete flag raised by the transmit interrupt
    fn acknowledge_transmit_complete(&mut self);
}

/// Board level peripherals driven by the control core
pub trait Board {
    /// Samples both accelerator position sensors
    fn read_pedal(&mut self) -> PedalPosition;

    /// Sets both analog output channels
    fn write_pedal(&mut self, position: PedalPosition);

    fn feed_watchdog(&mut self);

    fn set_led(&mut self, on: bool);

    /// Resets into the requested firmware. Real hardware does not return.
    fn enter_boot_mode(&mut self, mode: BootMode);
}

pub(crate) fn error_kind_name(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::Overrun => "overrun",
        ErrorKind::Bit => "bit",
        ErrorKind::Stuff => "stuff",
        ErrorKind::Crc => "crc",
        ErrorKind::Form => "form",
        ErrorKind::Acknowledge => "acknowledge",
        _ => "other",
    }
}

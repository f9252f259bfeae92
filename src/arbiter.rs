use crate::{Board, Fault, SharedState};

/// A reading (or command) for both pedal channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PedalPosition {
    pub value_0: u16,
    pub value_1: u16,
}

impl PedalPosition {
    pub const ZERO: Self = Self::new(0, 0);

    pub const fn new(value_0: u16, value_1: u16) -> Self {
        Self { value_0, value_1 }
    }

    /// Elementwise maximum of the two positions
    pub fn max(self, other: Self) -> Self {
        Self {
            value_0: self.value_0.max(other.value_0),
            value_1: self.value_1.max(other.value_1),
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

/// Chooses what to put on the analog outputs.
///
/// While healthy the override can only raise each channel above what the
/// driver is pressing. In any other state the sensed pedal goes straight
/// through and the overrides are ignored.
pub fn arbitrate(fault: Fault, sensed: PedalPosition, overrides: PedalPosition) -> PedalPosition {
    if fault.is_healthy() {
        sensed.max(overrides)
    } else {
        sensed
    }
}

/// One pass of the main control loop: sample the pedal, publish it for the
/// status frame, drive the outputs and feed the watchdog.
pub fn control_step<B: Board>(state: &SharedState, board: &mut B) -> PedalPosition {
    let sensed = board.read_pedal();
    state.set_sensed(sensed);

    let output = arbitrate(state.fault(), sensed, state.overrides());
    board.write_pedal(output);

    board.feed_watchdog();

    output
}

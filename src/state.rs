use core::sync::atomic::{AtomicBool, AtomicU16, AtomicU32, AtomicU8, Ordering};

use crate::{Fault, PedalPosition, COUNTER_MASK};

/// Everything shared between the interrupt handlers and the main loop.
///
/// Each field is its own atomic and is only ever loaded or stored whole (no
/// read-modify-write instructions), so this works on cores without CAS and
/// never blocks an interrupt. Reads across different fields may interleave
/// with a handler; the arbiter only takes a maximum, which tolerates that.
#[derive(Debug)]
pub struct SharedState {
    override_0: AtomicU16,
    override_1: AtomicU16,
    fault: AtomicU8,
    last_index: AtomicU8,
    timeout_ticks: AtomicU32,
    tx_index: AtomicU8,
    sensed_0: AtomicU16,
    sensed_1: AtomicU16,
    led: AtomicBool,
}

impl SharedState {
    pub const fn new() -> Self {
        Self {
            override_0: AtomicU16::new(0),
            override_1: AtomicU16::new(0),
            fault: AtomicU8::new(Fault::Startup as u8),
            last_index: AtomicU8::new(0),
            timeout_ticks: AtomicU32::new(0),
            tx_index: AtomicU8::new(0),
            sensed_0: AtomicU16::new(0),
            sensed_1: AtomicU16::new(0),
            led: AtomicBool::new(false),
        }
    }

    /* Fault */

    pub fn fault(&self) -> Fault {
        // only ever stored from a `Fault`, fall back to a degraded state anyway
        Fault::try_from(self.fault.load(Ordering::Relaxed)).unwrap_or(Fault::Startup)
    }

    pub fn set_fault(&self, fault: Fault) {
        self.fault.store(fault.into(), Ordering::Relaxed);
    }

    /* Override registers */

    pub fn overrides(&self) -> PedalPosition {
        PedalPosition::new(
            self.override_0.load(Ordering::Relaxed),
            self.override_1.load(Ordering::Relaxed),
        )
    }

    pub fn set_overrides(&self, position: PedalPosition) {
        self.override_0.store(position.value_0, Ordering::Relaxed);
        self.override_1.store(position.value_1, Ordering::Relaxed);
    }

    pub fn clear_overrides(&self) {
        self.set_overrides(PedalPosition::ZERO);
    }

    /* Inbound sequence */

    /// Index of the last checksum-valid command
    pub fn last_index(&self) -> u8 {
        self.last_index.load(Ordering::Relaxed)
    }

    pub fn set_last_index(&self, index: u8) {
        self.last_index.store(index & COUNTER_MASK, Ordering::Relaxed);
    }

    /// The only index that will be acted upon next
    pub fn expected_index(&self) -> u8 {
        self.last_index().wrapping_add(1) & COUNTER_MASK
    }

    /* Command timeout */

    pub fn timeout_ticks(&self) -> u32 {
        self.timeout_ticks.load(Ordering::Relaxed)
    }

    pub fn reset_timeout(&self) {
        self.timeout_ticks.store(0, Ordering::Relaxed);
    }

    /// Counts one tick towards `ceiling`. Returns `true` once the ceiling has
    /// been reached, at which point the counter stops advancing.
    pub fn advance_timeout(&self, ceiling: u32) -> bool {
        let ticks = self.timeout_ticks();

        if ticks >= ceiling {
            true
        } else {
            self.timeout_ticks.store(ticks + 1, Ordering::Relaxed);
            false
        }
    }

    /* Outbound sequence */

    pub fn tx_index(&self) -> u8 {
        self.tx_index.load(Ordering::Relaxed)
    }

    pub fn advance_tx_index(&self) {
        let next = self.tx_index().wrapping_add(1) & COUNTER_MASK;
        self.tx_index.store(next, Ordering::Relaxed);
    }

    /* Sensed pedal */

    /// Most recent reading taken by the control loop
    pub fn sensed(&self) -> PedalPosition {
        PedalPosition::new(
            self.sensed_0.load(Ordering::Relaxed),
            self.sensed_1.load(Ordering::Relaxed),
        )
    }

    pub fn set_sensed(&self, position: PedalPosition) {
        self.sensed_0.store(position.value_0, Ordering::Relaxed);
        self.sensed_1.store(position.value_1, Ordering::Relaxed);
    }

    /* Liveness */

    /// Flips the liveness indicator and returns its new level
    pub fn toggle_led(&self) -> bool {
        let on = !self.led.load(Ordering::Relaxed);
        self.led.store(on, Ordering::Relaxed);
        on
    }
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}

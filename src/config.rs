use embedded_can::StandardId;

/// Identifier the remote controller sends [`OverrideCommand`](crate::OverrideCommand)s on
pub const DEFAULT_INPUT_ID: StandardId = standard_id(0x200);

/// Identifier [`StatusReport`](crate::StatusReport)s are broadcast on
pub const DEFAULT_OUTPUT_ID: StandardId = standard_id(0x201);

/// Timer ticks without an accepted command before the link times out
pub const DEFAULT_TIMEOUT_TICKS: u32 = 10;

const fn standard_id(raw: u16) -> StandardId {
    match StandardId::new(raw) {
        Some(id) => id,
        None => panic!("standard CAN identifier out of range"),
    }
}

/// Static settings of the interceptor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    #[cfg_attr(feature = "defmt", defmt(Debug2Format))]
    pub input_id: StandardId,
    #[cfg_attr(feature = "defmt", defmt(Debug2Format))]
    pub output_id: StandardId,
    /// The `timeout` fault is raised on the tick after this many ticks have
    /// passed without an accepted command
    pub timeout_ticks: u32,
}

impl Config {
    pub const DEFAULT: Self = Self {
        input_id: DEFAULT_INPUT_ID,
        output_id: DEFAULT_OUTPUT_ID,
        timeout_ticks: DEFAULT_TIMEOUT_TICKS,
    };

    pub const fn with_input_id(mut self, input_id: StandardId) -> Self {
        self.input_id = input_id;
        self
    }

    pub const fn with_output_id(mut self, output_id: StandardId) -> Self {
        self.output_id = output_id;
        self
    }

    pub const fn with_timeout_ticks(mut self, timeout_ticks: u32) -> Self {
        self.timeout_ticks = timeout_ticks;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::DEFAULT
    }
}

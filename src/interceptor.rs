use embedded_can::{nb::Can, Error, ErrorKind, Frame};

use crate::{
    arbiter, hal::error_kind_name, transmitter, validator, Board, CanMailbox, Config, Fault,
    PedalPosition, RxEvent, SharedState, TickEvent,
};

/// The control core, one entry point per interrupt source plus the main loop.
///
/// Every method takes `&self` and runs to completion without blocking, so a
/// single instance can live in a `static` next to its [`SharedState`]:
///
/// * CAN receive interrupt: [`Interceptor::on_rx_interrupt`]
/// * CAN transmit-complete interrupt: [`Interceptor::on_transmit_complete`]
/// * CAN status-change/error interrupt: [`Interceptor::on_bus_error`]
/// * fixed rate timer interrupt: [`Interceptor::on_timer_tick`]
/// * main loop: [`Interceptor::run_control_step`]
#[derive(Debug, Clone, Copy)]
pub struct Interceptor<'a> {
    state: &'a SharedState,
    config: Config,
}

impl<'a> Interceptor<'a> {
    pub const fn new(state: &'a SharedState, config: Config) -> Self {
        Self { state, config }
    }

    pub fn state(&self) -> &'a SharedState {
        self.state
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn fault(&self) -> Fault {
        self.state.fault()
    }

    /// Validates a single received frame
    pub fn on_frame_received<F: Frame>(&self, frame: &F) -> RxEvent {
        validator::process_frame(self.state, &self.config, frame)
    }

    /// Drains the receive FIFO. Returns the number of frames handled.
    ///
    /// A boot mode escape hands control to [`Board::enter_boot_mode`] straight
    /// away and leaves anything behind it in the FIFO.
    pub fn on_rx_interrupt<C: Can, B: Board>(&self, can: &mut C, board: &mut B) -> usize {
        let mut handled = 0;

        loop {
            let frame = match can.receive() {
                Ok(frame) => frame,
                Err(nb::Error::WouldBlock) => break,
                Err(nb::Error::Other(error)) => {
                    error!("receive failed: {}", error_kind_name(error.kind()));
                    break;
                }
            };

            handled += 1;

            if let RxEvent::BootModeRequested(mode) = self.on_frame_received(&frame) {
                board.enter_boot_mode(mode);
                break;
            }
        }

        handled
    }

    pub fn on_transmit_complete<C: CanMailbox>(&self, can: &mut C) {
        can.acknowledge_transmit_complete();
    }

    /// Bus level error. Always wins over whatever fault was set before, and
    /// drops the pending status frame.
    pub fn on_bus_error<C: CanMailbox>(&self, can: &mut C, kind: Option<ErrorKind>) {
        match kind {
            Some(kind) => error!("CAN bus error: {}", error_kind_name(kind)),
            None => error!("CAN bus error"),
        }

        self.state.set_fault(Fault::BusError);
        can.abort_transmit();
    }

    pub fn on_timer_tick<C: CanMailbox, B: Board>(&self, can: &mut C, board: &mut B) -> TickEvent {
        transmitter::timer_tick(self.state, &self.config, can, board)
    }

    /// One iteration of the main loop. Returns what was written to the
    /// analog outputs.
    pub fn run_control_step<B: Board>(&self, board: &mut B) -> PedalPosition {
        arbiter::control_step(self.state, board)
    }
}

#[cfg(test)]
mod tests {
    use embedded_can::ErrorKind;

    use super::Interceptor;
    use crate::{
        hal::mock::{MockBoard, MockCan},
        BootMode, CanFrame, Config, Fault, OverrideCommand, PedalPosition, SharedState,
        StatusReport, TransmitOutcome,
    };

    fn command(command: OverrideCommand) -> CanFrame {
        CanFrame::new_data(Config::DEFAULT.input_id, &command.as_bytes()).unwrap()
    }

    #[test]
    fn startup_to_override_and_back() {
        let state = SharedState::new();
        let interceptor = Interceptor::new(&state, Config::DEFAULT);
        let mut can = MockCan::default();
        let mut board = MockBoard::with_pedal(PedalPosition::new(200, 200));

        // overrides are ignored until the controller clears the startup fault
        can.push_rx(command(OverrideCommand::new(900, 900, true, 1)));
        assert_eq!(interceptor.on_rx_interrupt(&mut can, &mut board), 1);
        assert_eq!(interceptor.run_control_step(&mut board), PedalPosition::new(200, 200));

        can.push_rx(command(OverrideCommand::release(2)));
        can.push_rx(command(OverrideCommand::new(900, 100, true, 3)));
        assert_eq!(interceptor.on_rx_interrupt(&mut can, &mut board), 2);
        assert_eq!(interceptor.fault(), Fault::NoFault);
        assert_eq!(interceptor.run_control_step(&mut board), PedalPosition::new(900, 200));

        // the driver pressing harder always wins
        board.pedal = PedalPosition::new(1000, 50);
        assert_eq!(interceptor.run_control_step(&mut board), PedalPosition::new(1000, 100));

        can.push_rx(command(OverrideCommand::release(4)));
        interceptor.on_rx_interrupt(&mut can, &mut board);
        assert_eq!(state.overrides(), PedalPosition::ZERO);
        assert_eq!(interceptor.run_control_step(&mut board), PedalPosition::new(1000, 50));
    }

    #[test]
    fn fault_freezes_out_stale_overrides() {
        let state = SharedState::new();
        let interceptor = Interceptor::new(&state, Config::DEFAULT);
        let mut can = MockCan::default();
        let mut board = MockBoard::with_pedal(PedalPosition::new(10, 10));

        can.push_rx(command(OverrideCommand::release(1)));
        can.push_rx(command(OverrideCommand::new(500, 500, true, 2)));
        interceptor.on_rx_interrupt(&mut can, &mut board);
        assert_eq!(interceptor.run_control_step(&mut board), PedalPosition::new(500, 500));

        let mut corrupt = OverrideCommand::new(600, 600, true, 3).as_bytes();
        corrupt[5] ^= 0xFF;
        can.push_rx(CanFrame::new_data(Config::DEFAULT.input_id, &corrupt).unwrap());
        interceptor.on_rx_interrupt(&mut can, &mut board);

        assert_eq!(interceptor.fault(), Fault::BadChecksum);
        assert_eq!(state.overrides(), PedalPosition::new(500, 500));
        assert_eq!(interceptor.run_control_step(&mut board), PedalPosition::new(10, 10));
    }

    #[test]
    fn timeout_then_recovery() {
        let state = SharedState::new();
        let interceptor = Interceptor::new(&state, Config::DEFAULT);
        let mut can = MockCan::default();
        let mut board = MockBoard::with_pedal(PedalPosition::new(10, 10));

        can.push_rx(command(OverrideCommand::release(1)));
        can.push_rx(command(OverrideCommand::new(300, 300, true, 2)));
        interceptor.on_rx_interrupt(&mut can, &mut board);

        for _ in 0..10 {
            interceptor.run_control_step(&mut board);
            let event = interceptor.on_timer_tick(&mut can, &mut board);
            can.complete_transmit();
            interceptor.on_transmit_complete(&mut can);
            assert!(!event.timed_out);
        }
        assert_eq!(interceptor.run_control_step(&mut board), PedalPosition::new(300, 300));

        let event = interceptor.on_timer_tick(&mut can, &mut board);
        assert!(event.timed_out);
        assert_eq!(interceptor.fault(), Fault::Timeout);
        assert_eq!(interceptor.run_control_step(&mut board), PedalPosition::new(10, 10));

        // a fresh override alone resets the counter but keeps the fault
        can.push_rx(command(OverrideCommand::new(300, 300, true, 3)));
        interceptor.on_rx_interrupt(&mut can, &mut board);
        assert_eq!(state.timeout_ticks(), 0);
        assert_eq!(interceptor.fault(), Fault::Timeout);

        can.push_rx(command(OverrideCommand::release(4)));
        interceptor.on_rx_interrupt(&mut can, &mut board);
        assert_eq!(interceptor.fault(), Fault::NoFault);
        assert_eq!(can.acknowledged, 10);
    }

    #[test]
    fn bus_error_forces_fault_and_clears_mailbox() {
        let state = SharedState::new();
        let interceptor = Interceptor::new(&state, Config::DEFAULT);
        let mut can = MockCan::default();
        let mut board = MockBoard::default();

        state.set_fault(Fault::NoFault);
        interceptor.on_timer_tick(&mut can, &mut board);
        assert!(can.pending.is_some());

        interceptor.on_bus_error(&mut can, Some(ErrorKind::Stuff));

        assert_eq!(interceptor.fault(), Fault::BusError);
        assert!(can.pending.is_none());
        assert_eq!(can.aborts, 1);

        // the next status frame reports it
        let event = interceptor.on_timer_tick(&mut can, &mut board);
        assert!(matches!(
            event.transmit,
            TransmitOutcome::Queued(StatusReport {
                fault: Fault::BusError,
                index: 1,
                ..
            })
        ));
    }

    #[test]
    fn boot_mode_escape_stops_draining() {
        let state = SharedState::new();
        let interceptor = Interceptor::new(&state, Config::DEFAULT);
        let mut can = MockCan::default();
        let mut board = MockBoard::default();

        let escape = BootMode::Bootloader.as_bytes();
        can.push_rx(CanFrame::new_data(Config::DEFAULT.input_id, &escape).unwrap());
        can.push_rx(command(OverrideCommand::release(1)));

        assert_eq!(interceptor.on_rx_interrupt(&mut can, &mut board), 1);
        assert_eq!(board.boot_mode, Some(BootMode::Bootloader));
        assert_eq!(interceptor.fault(), Fault::Startup);
    }

    #[test]
    fn receive_error_stops_draining() {
        let state = SharedState::new();
        let interceptor = Interceptor::new(&state, Config::DEFAULT);
        let mut can = MockCan::default();
        let mut board = MockBoard::default();

        can.rx.push_back(Err(ErrorKind::Overrun)).unwrap();
        can.push_rx(command(OverrideCommand::release(1)));

        assert_eq!(interceptor.on_rx_interrupt(&mut can, &mut board), 0);
        assert_eq!(interceptor.on_rx_interrupt(&mut can, &mut board), 1);
        assert_eq!(interceptor.fault(), Fault::NoFault);
    }

    #[test]
    fn works_from_a_static() {
        static STATE: SharedState = SharedState::new();
        static INTERCEPTOR: Interceptor<'static> = Interceptor::new(&STATE, Config::DEFAULT);

        let mut board = MockBoard::with_pedal(PedalPosition::new(1, 2));
        assert_eq!(INTERCEPTOR.run_control_step(&mut board), PedalPosition::new(1, 2));
        assert_eq!(STATE.sensed(), PedalPosition::new(1, 2));
    }
}

use embedded_can::{nb::Can, Error, Frame};

use crate::{
    hal::error_kind_name, Board, CanMailbox, Config, Fault, SharedState, StatusReport, TickEvent,
    TransmitOutcome,
};

/// Snapshot of what the next status frame should carry
pub fn status_report(state: &SharedState) -> StatusReport {
    StatusReport {
        position: state.sensed(),
        fault: state.fault(),
        index: state.tx_index(),
    }
}

/// Builds the status frame for `report` on the configured output identifier
pub fn status_frame<F: Frame>(config: &Config, report: &StatusReport) -> Option<F> {
    F::new(config.output_id, &report.as_bytes())
}

/// Fixed rate timer handler: queue a status frame, blink, count towards the
/// command timeout.
pub fn timer_tick<C: CanMailbox, B: Board>(
    state: &SharedState,
    config: &Config,
    can: &mut C,
    board: &mut B,
) -> TickEvent {
    let transmit = send_status(state, config, can);

    let led = state.toggle_led();
    board.set_led(led);

    let timed_out = state.advance_timeout(config.timeout_ticks);
    if timed_out {
        if state.fault() != Fault::Timeout {
            warn!("no command accepted for {} ticks", config.timeout_ticks);
        }
        state.set_fault(Fault::Timeout);
    }

    TickEvent {
        transmit,
        timed_out,
        led,
    }
}

fn send_status<C: CanMailbox>(state: &SharedState, config: &Config, can: &mut C) -> TransmitOutcome {
    if !can.is_transmit_empty() {
        warn!("previous status frame still pending");
        state.set_fault(Fault::SendFailure);
        return TransmitOutcome::MailboxBusy;
    }

    let report = status_report(state);

    let Some(frame) = status_frame::<C::Frame>(config, &report) else {
        error!("driver could not build a status frame");
        state.set_fault(Fault::SendFailure);
        return TransmitOutcome::DriverError;
    };

    match can.transmit(&frame) {
        Ok(_) => {
            state.advance_tx_index();
            TransmitOutcome::Queued(report)
        }
        Err(nb::Error::WouldBlock) => {
            warn!("transmit mailbox busy");
            state.set_fault(Fault::SendFailure);
            TransmitOutcome::MailboxBusy
        }
        Err(nb::Error::Other(error)) => {
            error!("status transmit failed: {}", error_kind_name(error.kind()));
            state.set_fault(Fault::SendFailure);
            TransmitOutcome::DriverError
        }
    }
}

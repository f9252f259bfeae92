use embedded_can::{Frame, Id};

use crate::{
    BootMode, Config, Fault, MessageParseError, OverrideCommand, RxEvent, SharedState,
};

/// Handles one frame taken from the receive FIFO.
///
/// Frames on other identifiers are ignored. Boot mode escapes are reported
/// back without touching the pedal state; the caller performs the reset.
pub fn process_frame<F: Frame>(state: &SharedState, config: &Config, frame: &F) -> RxEvent {
    if frame.id() != Id::Standard(config.input_id) {
        return RxEvent::Ignored;
    }

    if frame.is_remote_frame() {
        return reject(state, MessageParseError::RemoteFrame);
    }

    if let Some(mode) = BootMode::from_payload(frame.data()) {
        info!("boot mode escape received: {}", mode);
        return RxEvent::BootModeRequested(mode);
    }

    match OverrideCommand::from_bytes(frame.data()) {
        Ok(command) => apply_command(state, command),
        Err(error) => reject(state, error),
    }
}

/// Applies a checksum-valid command.
///
/// Only the command directly following the last seen index acts on the
/// registers. Any other index is taken silently as the new reference so the
/// sender can resynchronise.
pub fn apply_command(state: &SharedState, command: OverrideCommand) -> RxEvent {
    let expected = state.expected_index();

    let event = if command.index != expected {
        debug!(
            "out of sequence command: expected {}, received {}",
            expected, command.index
        );

        RxEvent::OutOfSequence {
            expected,
            received: command.index,
        }
    } else if command.enable {
        let values = command.values();
        state.set_overrides(values);
        state.reset_timeout();

        trace!("override accepted: {}", values);
        RxEvent::OverrideAccepted(values)
    } else {
        let fault = if command.is_clean_release() {
            info!("release command, fault cleared");
            Fault::NoFault
        } else {
            warn!("release command with non-zero values: {}", command.values());
            Fault::InvalidCommand
        };

        state.set_fault(fault);
        state.clear_overrides();
        state.reset_timeout();

        RxEvent::Released(fault)
    };

    state.set_last_index(command.index);

    event
}

fn reject(state: &SharedState, error: MessageParseError) -> RxEvent {
    warn!("rejected pedal command: {}", error);
    state.set_fault(Fault::BadChecksum);
    RxEvent::Rejected(error)
}

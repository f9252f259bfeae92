//! Control core of a CAN driven accelerator pedal interceptor.
//!
//! A remote controller sends [`OverrideCommand`]s on the input identifier.
//! They are checksummed and sequenced, and while the link is healthy the
//! interceptor drives each analog output channel with the larger of the
//! driver's own pedal reading and the commanded value. Any anomaly moves the
//! shared [`Fault`] away from [`Fault::NoFault`], after which the sensed pedal
//! is passed through untouched until the controller sends a clean release.
//! A [`StatusReport`] echoing the sensed pedal and the fault is broadcast on
//! the output identifier every timer tick.
//!
//! All mutable state lives in a [`SharedState`] made of single word atomics,
//! so it can sit in a `static` and be touched from interrupt handlers and the
//! main loop alike. [`Interceptor`] binds it to a [`Config`] and exposes one
//! short, non-blocking method per interrupt source.

#![no_std]

#[macro_use]
mod fmt;

mod arbiter;
mod checksum;
mod config;
mod event;
mod fault;
mod frame;
mod hal;
mod interceptor;
mod message;
mod state;
mod transmitter;
mod validator;

/// Size of both pedal messages (the boot mode escape frame is 8 bytes)
pub const PEDAL_MESSAGE_SIZE: usize = 6;

/// Mask applied to both rolling 4 bit counters
pub const COUNTER_MASK: u8 = 0x0F;

pub use arbiter::*;
pub use checksum::pedal_checksum;
pub use config::*;
pub use event::*;
pub use fault::*;
pub use frame::*;
pub use hal::*;
pub use interceptor::*;
pub use message::*;
pub use state::*;
pub use transmitter::*;
pub use validator::*;

pub use embedded_can::{Id, StandardId};

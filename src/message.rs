use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::{checksum::pedal_checksum, Fault, PedalPosition, COUNTER_MASK, PEDAL_MESSAGE_SIZE};

const ENABLE_BIT: u8 = 1 << 7;

/// First word (little endian) of both boot mode escape frames
pub const BOOT_MODE_MAGIC: u32 = 0xDEAD_FACE;

/// Command sent by the remote controller on the input identifier.
///
/// Wire layout: `value_0` (big endian), `value_1` (big endian),
/// `enable << 7 | index`, checksum over the first five bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OverrideCommand {
    pub value_0: u16,
    pub value_1: u16,
    /// Cleared for a release request
    pub enable: bool,
    /// Rolling 4 bit sequence index
    pub index: u8,
}

impl OverrideCommand {
    pub fn new(value_0: u16, value_1: u16, enable: bool, index: u8) -> Self {
        Self {
            value_0,
            value_1,
            enable,
            index: index & COUNTER_MASK,
        }
    }

    /// A release request with both values at zero, the only command which
    /// clears a fault.
    pub fn release(index: u8) -> Self {
        Self::new(0, 0, false, index)
    }

    /// Whether this is a release request carrying the mandatory zero values
    pub fn is_clean_release(&self) -> bool {
        !self.enable && self.values().is_zero()
    }

    pub fn values(&self) -> PedalPosition {
        PedalPosition::new(self.value_0, self.value_1)
    }

    pub fn as_bytes(&self) -> [u8; PEDAL_MESSAGE_SIZE] {
        let [v0_hi, v0_lo] = self.value_0.to_be_bytes();
        let [v1_hi, v1_lo] = self.value_1.to_be_bytes();
        let enable = if self.enable { ENABLE_BIT } else { 0 };
        let status = enable | (self.index & COUNTER_MASK);

        seal([v0_hi, v0_lo, v1_hi, v1_lo, status, 0])
    }

    /// Decodes a command from a frame payload. Only the first six bytes are
    /// considered; anything after them is ignored.
    pub fn from_bytes(buffer: &[u8]) -> Result<Self, MessageParseError> {
        let payload = verify(buffer)?;

        Ok(Self {
            value_0: u16::from_be_bytes([payload[0], payload[1]]),
            value_1: u16::from_be_bytes([payload[2], payload[3]]),
            enable: payload[4] & ENABLE_BIT != 0,
            index: payload[4] & COUNTER_MASK,
        })
    }
}

/// Status broadcast by the interceptor on the output identifier.
///
/// Wire layout: sensed channel 0 (big endian), sensed channel 1 (big endian),
/// `fault << 4 | index`, checksum over the first five bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusReport {
    pub position: PedalPosition,
    pub fault: Fault,
    /// Transmit packet index, independent of the inbound sequence
    pub index: u8,
}

impl StatusReport {
    pub fn as_bytes(&self) -> [u8; PEDAL_MESSAGE_SIZE] {
        let [p0_hi, p0_lo] = self.position.value_0.to_be_bytes();
        let [p1_hi, p1_lo] = self.position.value_1.to_be_bytes();
        let status = (self.fault.nibble() << 4) | (self.index & COUNTER_MASK);

        seal([p0_hi, p0_lo, p1_hi, p1_lo, status, 0])
    }

    pub fn from_bytes(buffer: &[u8]) -> Result<Self, MessageParseError> {
        let payload = verify(buffer)?;

        Ok(Self {
            position: PedalPosition::new(
                u16::from_be_bytes([payload[0], payload[1]]),
                u16::from_be_bytes([payload[2], payload[3]]),
            ),
            fault: Fault::try_from(payload[4] >> 4)?,
            index: payload[4] & COUNTER_MASK,
        })
    }
}

/// Alternate firmware the device can be rebooted into by an escape frame.
///
/// The discriminant is the second little endian word of the escape payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u32)]
pub enum BootMode {
    Softloader = 0x0AB0_0B1E,
    Bootloader = 0x02B0_0B1E,
}

impl BootMode {
    /// Recognises an 8 byte escape payload. Returns `None` for anything else,
    /// including payloads with the right first word and an unknown second one.
    pub fn from_payload(data: &[u8]) -> Option<Self> {
        let data: &[u8; 8] = data.try_into().ok()?;

        let low = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);
        let high = u32::from_le_bytes([data[4], data[5], data[6], data[7]]);

        if low != BOOT_MODE_MAGIC {
            return None;
        }

        Self::try_from(high).ok()
    }

    pub fn as_bytes(&self) -> [u8; 8] {
        let mut payload = [0u8; 8];
        payload[..4].copy_from_slice(&BOOT_MODE_MAGIC.to_le_bytes());
        payload[4..].copy_from_slice(&u32::from(*self).to_le_bytes());
        payload
    }
}

/// Various errors which can arise while decoding a pedal message
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MessageParseError {
    #[error("Received a remote frame where a data frame was expected")]
    RemoteFrame,
    #[error("Received a message with ({0:?}) bytes but at least 6 are required")]
    NotEnoughBytes(usize),
    #[error("Received a message with checksum ({0:?}) but computed ({1:?})")]
    BadChecksum(u8, u8),
    #[error("Tried to decode a fault code but it was out of range ({0:?})")]
    UnknownFault(u8),
}

fn seal(mut payload: [u8; PEDAL_MESSAGE_SIZE]) -> [u8; PEDAL_MESSAGE_SIZE] {
    payload[PEDAL_MESSAGE_SIZE - 1] = pedal_checksum(&payload[..PEDAL_MESSAGE_SIZE - 1]);
    payload
}

fn verify(buffer: &[u8]) -> Result<&[u8; PEDAL_MESSAGE_SIZE], MessageParseError> {
    let payload: &[u8; PEDAL_MESSAGE_SIZE] = buffer
        .get(..PEDAL_MESSAGE_SIZE)
        .and_then(|head| head.try_into().ok())
        .ok_or(MessageParseError::NotEnoughBytes(buffer.len()))?;

    let received = payload[PEDAL_MESSAGE_SIZE - 1];
    let computed = pedal_checksum(&payload[..PEDAL_MESSAGE_SIZE - 1]);

    if received != computed {
        return Err(MessageParseError::BadChecksum(received, computed));
    }

    Ok(payload)
}

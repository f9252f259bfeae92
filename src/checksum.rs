const POLY: u8 = 0xD5;
const INIT: u8 = 0xFF;

/// CRC-8 (poly 0xD5, init 0xFF, no final XOR) used by both pedal messages.
///
/// The bytes are consumed from the last one to the first, each processed MSB
/// first. Both ends of the link must agree on this bit for bit.
pub fn pedal_checksum(data: &[u8]) -> u8 {
    let mut crc = INIT;

    for byte in data.iter().rev() {
        crc ^= byte;

        for _ in 0..8 {
            crc = if crc & 0x80 != 0 {
                (crc << 1) ^ POLY
            } else {
                crc << 1
            };
        }
    }

    crc
}

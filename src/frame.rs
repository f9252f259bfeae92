use embedded_can::Id;
use heapless::Vec;

/// Maximum number of data bytes in a classic CAN frame
pub const MAX_FRAME_DATA_LENGTH: usize = 8;

/// A classic CAN 2.0 frame as seen by the interceptor.
///
/// Any driver frame type implementing [`embedded_can::Frame`] works with the
/// handlers; this type exists so the crate (and its users' tests) have a
/// concrete, allocation free frame to build status reports into.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CanFrame {
    #[cfg_attr(feature = "defmt", defmt(Debug2Format))]
    id: Id,
    dlc: usize,
    #[cfg_attr(feature = "defmt", defmt(Debug2Format))]
    data: Vec<u8, MAX_FRAME_DATA_LENGTH>,
    remote: bool,
}

impl CanFrame {
    /// Creates a new data frame. `data` must have a length in the range 0..=8
    /// or else `None` will be returned instead.
    pub fn new_data(id: impl Into<Id>, data: &[u8]) -> Option<Self> {
        let data = Vec::from_slice(data).ok()?;

        Some(Self {
            id: id.into(),
            dlc: data.len(),
            data,
            remote: false,
        })
    }

    /// Creates a new remote frame. `dlc` must be in the range 0..=8 or else
    /// `None` will be returned instead.
    pub fn new_remote(id: impl Into<Id>, dlc: usize) -> Option<Self> {
        if dlc > MAX_FRAME_DATA_LENGTH {
            return None;
        }

        Some(Self {
            id: id.into(),
            dlc,
            data: Vec::new(),
            remote: true,
        })
    }

    /// Gets the message ID of the frame
    pub fn id(&self) -> Id {
        self.id
    }

    /// Gets the DLC (Data Length Code) of the frame
    pub fn dlc(&self) -> usize {
        self.dlc
    }

    /// Gets the data associated with the frame (empty for remote frames)
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn is_remote(&self) -> bool {
        self.remote
    }
}

impl embedded_can::Frame for CanFrame {
    fn new(id: impl Into<Id>, data: &[u8]) -> Option<Self> {
        Self::new_data(id, data)
    }

    fn new_remote(id: impl Into<Id>, dlc: usize) -> Option<Self> {
        CanFrame::new_remote(id, dlc)
    }

    fn is_extended(&self) -> bool {
        matches!(self.id, Id::Extended(_))
    }

    fn is_remote_frame(&self) -> bool {
        self.remote
    }

    fn id(&self) -> Id {
        self.id
    }

    fn dlc(&self) -> usize {
        self.dlc
    }

    fn data(&self) -> &[u8] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use embedded_can::{ExtendedId, Frame, Id, StandardId};

    use super::CanFrame;

    #[test]
    fn data_frames() {
        let frame = CanFrame::new_data(StandardId::MAX, &[0, 1, 2]).unwrap();

        assert_eq!(frame.id(), Id::Standard(StandardId::MAX));
        assert_eq!(frame.dlc(), 3);
        assert_eq!(frame.data(), &[0, 1, 2]);
        assert!(!frame.is_remote());
        assert!(Frame::is_data_frame(&frame));
        assert!(Frame::is_standard(&frame));

        assert!(CanFrame::new_data(StandardId::ZERO, &[0; 8]).is_some());
        assert!(CanFrame::new_data(StandardId::ZERO, &[0; 9]).is_none());
    }

    #[test]
    fn remote_frames() {
        let frame = CanFrame::new_remote(ExtendedId::MAX, 6).unwrap();

        assert_eq!(frame.dlc(), 6);
        assert!(frame.data().is_empty());
        assert!(Frame::is_remote_frame(&frame));
        assert!(Frame::is_extended(&frame));

        assert!(CanFrame::new_remote(StandardId::ZERO, 9).is_none());
    }
}

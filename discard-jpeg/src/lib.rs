//! Locating APP1 segments in JPEG data
//!
//! This crate does not walk the segment structure of a JPEG file. It scans for
//! the first `FF E1` byte pair, which also finds Exif data in streams that are
//! not strictly well formed.

mod error;

use discard_common::math::*;
pub use error::Error;

pub const EXIF_IDENTIFIER_STRING: &[u8] = b"Exif\0\0";

pub const MARKER_START: u8 = 0xFF;

/// Length of the big endian segment length field
pub const SEGMENT_LENGTH_SIZE: usize = 2;

/// APP1 segment header
///
/// The declared length is only recorded here. Whether reads have to stay
/// inside of it is decided by the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct App1 {
    pos: usize,
    declared_len: u16,
}

impl App1 {
    /// Position of the `FF` byte of the marker
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Length field of the segment, including its own two bytes
    pub fn declared_len(&self) -> u16 {
        self.declared_len
    }

    /// Position of the length field
    pub fn length_pos(&self) -> Result<usize, Error> {
        self.pos.safe_add(2).map_err(|_| Error::PositionTooLarge)
    }

    /// Position of the first byte after the length field
    pub fn data_pos(&self) -> Result<usize, Error> {
        self.length_pos()?
            .safe_add(SEGMENT_LENGTH_SIZE)
            .map_err(|_| Error::PositionTooLarge)
    }

    /// First position after the segment according to its declared length
    pub fn declared_end(&self) -> Result<usize, Error> {
        self.length_pos()?
            .safe_add(self.declared_len.into())
            .map_err(|_| Error::PositionTooLarge)
    }

    /// Finds the first APP1 marker and reads its length field
    pub fn find(data: &[u8]) -> Result<Self, Error> {
        let pos = find_app1(data)?;

        let length_pos = pos.safe_add(2).map_err(|_| Error::PositionTooLarge)?;
        let length_end = length_pos
            .safe_add(SEGMENT_LENGTH_SIZE)
            .map_err(|_| Error::PositionTooLarge)?;
        let length_bytes: [u8; 2] = data
            .get(length_pos..length_end)
            .and_then(|x| x.try_into().ok())
            .ok_or(Error::UnexpectedEof {
                pos: length_pos,
                len: data.len(),
            })?;
        let declared_len = u16::from_be_bytes(length_bytes);

        Ok(Self { pos, declared_len })
    }
}

/// Returns `true` if the data starts with an SOI marker
pub fn is_filetype(data: &[u8]) -> bool {
    data.starts_with(&[MARKER_START, Marker::SOI.into()])
}

/// Position of the first occurrence of `FF` followed by the marker byte
///
/// Only complete byte pairs are considered, so a trailing `FF` never matches.
pub fn find_marker(data: &[u8], marker: Marker) -> Option<usize> {
    let marker_byte: u8 = marker.into();
    data.windows(2)
        .position(|x| x[0] == MARKER_START && x[1] == marker_byte)
}

/// Position of the first APP1 marker
pub fn find_app1(data: &[u8]) -> Result<usize, Error> {
    find_marker(data, Marker::APP1).ok_or(Error::MarkerNotFound { len: data.len() })
}

discard_common::utils::convertible_enum!(
    #[repr(u8)]
    #[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
    pub enum Marker {
        /// Start of image
        SOI = 0xD8,
        /// Exif, XMP
        APP1 = 0xE1,
    }
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_scan() {
        assert_eq!(find_app1(&[0, 0, 0xFF, 0xE1, 0, 2]), Ok(2));
        assert_eq!(find_app1(&[0xFF, 0xE1]), Ok(0));
        assert_eq!(
            find_app1(&[0xE1, 0xFF]),
            Err(Error::MarkerNotFound { len: 2 })
        );
        assert_eq!(find_app1(&[0xFF]), Err(Error::MarkerNotFound { len: 1 }));
        assert_eq!(find_app1(&[]), Err(Error::MarkerNotFound { len: 0 }));
    }

    #[test]
    fn first_marker_wins() {
        let data = [0xFF, 0xE0, 0xFF, 0xE1, 0x00, 0x10, 0xFF, 0xE1, 0x00, 0x20];
        let app1 = App1::find(&data).unwrap();
        assert_eq!(app1.pos(), 2);
        assert_eq!(app1.declared_len(), 0x10);
        assert_eq!(app1.data_pos(), Ok(6));
        assert_eq!(app1.declared_end(), Ok(20));
    }

    #[test]
    fn length_truncated() {
        assert_eq!(
            App1::find(&[0xFF, 0xE1, 0x00]),
            Err(Error::UnexpectedEof { pos: 2, len: 3 })
        );
    }

    #[test]
    fn soi() {
        assert!(is_filetype(&[0xFF, 0xD8, 0xFF, 0xE1]));
        assert!(!is_filetype(&[0x00, 0x00, 0xFF, 0xE1]));
        assert_eq!(Marker::from(0xE1), Marker::APP1);
        assert_eq!(Marker::from(0x01), Marker::Unknown(0x01));
    }
}

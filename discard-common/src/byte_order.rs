/// Byte order of multi-byte integers in a TIFF structure
///
/// Encoded as `II` (little endian) or `MM` (big endian) at the start of
/// every TIFF header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ByteOrder {
    LittleEndian,
    BigEndian,
}

impl ByteOrder {
    pub const LITTLE_ENDIAN_MARKER: [u8; 2] = *b"II";
    pub const BIG_ENDIAN_MARKER: [u8; 2] = *b"MM";

    /// Byte order for an `II` or `MM` marker
    ///
    /// ```
    /// # use discard_common::byte_order::ByteOrder;
    /// assert_eq!(ByteOrder::from_marker(*b"MM"), Some(ByteOrder::BigEndian));
    /// assert_eq!(ByteOrder::from_marker(*b"XX"), None);
    /// ```
    pub fn from_marker(marker: [u8; 2]) -> Option<Self> {
        match marker {
            Self::LITTLE_ENDIAN_MARKER => Some(Self::LittleEndian),
            Self::BIG_ENDIAN_MARKER => Some(Self::BigEndian),
            _ => None,
        }
    }

    pub fn marker(self) -> [u8; 2] {
        match self {
            Self::LittleEndian => Self::LITTLE_ENDIAN_MARKER,
            Self::BigEndian => Self::BIG_ENDIAN_MARKER,
        }
    }

    pub fn u16(self, bytes: [u8; 2]) -> u16 {
        match self {
            Self::LittleEndian => u16::from_le_bytes(bytes),
            Self::BigEndian => u16::from_be_bytes(bytes),
        }
    }

    pub fn u32(self, bytes: [u8; 4]) -> u32 {
        match self {
            Self::LittleEndian => u32::from_le_bytes(bytes),
            Self::BigEndian => u32::from_be_bytes(bytes),
        }
    }

    pub fn u16_bytes(self, value: u16) -> [u8; 2] {
        match self {
            Self::LittleEndian => value.to_le_bytes(),
            Self::BigEndian => value.to_be_bytes(),
        }
    }

    pub fn u32_bytes(self, value: u32) -> [u8; 4] {
        match self {
            Self::LittleEndian => value.to_le_bytes(),
            Self::BigEndian => value.to_be_bytes(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_value_both_orders() {
        let le = ByteOrder::LittleEndian;
        let be = ByteOrder::BigEndian;

        assert_eq!(le.u16([42, 0]), 42);
        assert_eq!(be.u16([0, 42]), 42);
        assert_eq!(le.u32([0x14, 0, 0, 0]), be.u32([0, 0, 0, 0x14]));
        assert_eq!(be.u32_bytes(8), [0, 0, 0, 8]);
        assert_eq!(le.marker(), *b"II");
    }
}

use discard_common::math::MathError;
use discard_common::read::ReadError;

/// Field of the APP1 and TIFF header that is read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderField {
    SegmentLength,
    ExifIdentifier,
    ByteOrder,
    Magic,
    IfdOffset,
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum LocateError {
    #[error("No APP1 marker found in {len} bytes")]
    MarkerNotFound { len: usize },
    #[error("Expected Exif identifier at byte {pos}, found {found:x?}")]
    InvalidExifIdentifier { pos: usize, found: Vec<u8> },
    #[error("Unknown byte order {found:x?} at byte {pos}")]
    UnknownByteOrder { pos: usize, found: [u8; 2] },
    #[error("TIFF magic at byte {pos} is {found}, expected 42")]
    InvalidTiffMagic { pos: usize, found: u16 },
    #[error("Header truncated reading {field:?} at byte {pos}, data is {len} bytes long")]
    TruncatedHeader {
        field: HeaderField,
        pos: usize,
        len: usize,
    },
    #[error("Reading {field:?} ends at byte {read_end}, past the APP1 segment end at {segment_end}")]
    SegmentLengthViolation {
        field: HeaderField,
        segment_end: usize,
        read_end: usize,
    },
    #[error("IFD offset {raw} relative to TIFF header at byte {tiff_start} overflows")]
    OffsetOverflow { tiff_start: usize, raw: u32 },
    #[error("Position too large")]
    PositionTooLarge,
}

impl From<discard_jpeg::Error> for LocateError {
    fn from(value: discard_jpeg::Error) -> Self {
        match value {
            discard_jpeg::Error::MarkerNotFound { len } => Self::MarkerNotFound { len },
            discard_jpeg::Error::UnexpectedEof { pos, len } => Self::TruncatedHeader {
                field: HeaderField::SegmentLength,
                pos,
                len,
            },
            discard_jpeg::Error::PositionTooLarge => Self::PositionTooLarge,
        }
    }
}

impl From<MathError> for LocateError {
    fn from(_: MathError) -> Self {
        Self::PositionTooLarge
    }
}

impl From<ReadError> for LocateError {
    fn from(_: ReadError) -> Self {
        Self::PositionTooLarge
    }
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum ExciseError {
    #[error("Tag count of IFD at byte {offset} is outside of the {len} bytes of data")]
    TruncatedIfd { offset: u32, len: usize },
    #[error("IFD at byte {offset} with {tag_count} tags ends at byte {end}, data is {len} bytes long")]
    IfdOutOfBounds {
        offset: u32,
        tag_count: u16,
        end: u64,
        len: usize,
    },
    #[error("Next IFD at byte {offset} is outside of the {len} bytes of data")]
    ChainOutOfBounds { offset: u32, len: usize },
    #[error("IFD chain loops back to byte {offset}")]
    ChainCycle { offset: u32 },
    #[error("Math: {0}")]
    Math(#[from] MathError),
}

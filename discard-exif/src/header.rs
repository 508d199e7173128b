use std::io::Cursor;

use discard_common::byte_order::ByteOrder;
use discard_common::math::*;
use discard_common::read::{position, ReadExt};
use discard_jpeg::{App1, EXIF_IDENTIFIER_STRING};

use crate::error::{HeaderField, LocateError};
use crate::observer::{Event, Observer};

/// Value of the first IFD offset if the IFD directly follows the TIFF header
pub const IFD_DIRECTLY_AFTER_HEADER: u32 = 8;

pub const TIFF_MAGIC: u16 = 42;

/// Size of marker, segment length, Exif identifier and TIFF header
pub const MIN_HEADER_LEN: usize = 18;

/// How IFD offsets from the TIFF structure map to positions in the file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OffsetPolicy {
    /// An offset of 8 points directly after the TIFF header, all other values
    /// are used as absolute positions in the file
    #[default]
    Compat,
    /// Every offset is counted from the start of the TIFF header
    TiffRelative,
}

/// Whether header reads have to stay inside the declared APP1 length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SegmentBounds {
    #[default]
    Trust,
    Enforce,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LocateOptions {
    pub offset_policy: OffsetPolicy,
    pub segment_bounds: SegmentBounds,
}

/// Decoded APP1 and TIFF header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TiffHeader {
    app1: App1,
    tiff_start: usize,
    byte_order: ByteOrder,
    raw_ifd_offset: u32,
    ifd_offset: u32,
    offset_policy: OffsetPolicy,
}

impl TiffHeader {
    /// Position of the APP1 marker
    pub fn marker_pos(&self) -> usize {
        self.app1.pos()
    }

    /// Declared APP1 segment length, including the length field
    pub fn segment_len(&self) -> u16 {
        self.app1.declared_len()
    }

    /// Position of the byte order marker
    pub fn tiff_start(&self) -> usize {
        self.tiff_start
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// First IFD offset as stored in the header
    pub fn raw_ifd_offset(&self) -> u32 {
        self.raw_ifd_offset
    }

    /// Absolute position of the first IFD
    pub fn ifd_offset(&self) -> u32 {
        self.ifd_offset
    }

    pub fn offset_policy(&self) -> OffsetPolicy {
        self.offset_policy
    }

    /// Maps an offset stored in the TIFF structure to a file position
    pub fn resolve_offset(&self, raw: u32) -> Result<u32, MathError> {
        resolve_offset(self.offset_policy, self.tiff_start, raw)
    }
}

fn resolve_offset(policy: OffsetPolicy, tiff_start: usize, raw: u32) -> Result<u32, MathError> {
    match policy {
        OffsetPolicy::Compat if raw == IFD_DIRECTLY_AFTER_HEADER => {
            tiff_start.u32()?.safe_add(IFD_DIRECTLY_AFTER_HEADER)
        }
        OffsetPolicy::Compat => Ok(raw),
        OffsetPolicy::TiffRelative => tiff_start.u32()?.safe_add(raw),
    }
}

/// Cursor over the header that honors the segment bounds
struct HeaderReader<'a> {
    cursor: Cursor<&'a [u8]>,
    segment_end: Option<usize>,
}

impl<'a> HeaderReader<'a> {
    fn pos(&self) -> Result<usize, LocateError> {
        Ok(position(&self.cursor)?)
    }

    fn len(&self) -> usize {
        self.cursor.get_ref().len()
    }

    fn read<const N: usize>(&mut self, field: HeaderField) -> Result<[u8; N], LocateError> {
        let pos = self.pos()?;
        let read_end = pos.safe_add(N)?;

        if let Some(segment_end) = self.segment_end {
            if read_end > segment_end {
                return Err(LocateError::SegmentLengthViolation {
                    field,
                    segment_end,
                    read_end,
                });
            }
        }

        self.cursor
            .read_array()
            .map_err(|_| LocateError::TruncatedHeader {
                field,
                pos,
                len: self.len(),
            })
    }
}

/// Finds the first APP1 segment and decodes the TIFF header in it
///
/// The returned header contains the absolute position of the first IFD.
pub fn locate(
    data: &[u8],
    options: &LocateOptions,
    observer: &dyn Observer,
) -> Result<TiffHeader, LocateError> {
    let app1 = App1::find(data)?;
    observer.event(&Event::MarkerFound { pos: app1.pos() });
    observer.event(&Event::SegmentLength {
        declared_len: app1.declared_len(),
    });

    let segment_end = match options.segment_bounds {
        SegmentBounds::Trust => None,
        SegmentBounds::Enforce => Some(app1.declared_end()?),
    };

    let mut cursor = Cursor::new(data);
    cursor.set_position(app1.data_pos()?.u64()?);
    let mut reader = HeaderReader {
        cursor,
        segment_end,
    };

    let identifier_pos = reader.pos()?;
    let identifier = reader.read::<6>(HeaderField::ExifIdentifier).map_err(|err| {
        if let LocateError::TruncatedHeader { .. } = err {
            LocateError::InvalidExifIdentifier {
                pos: identifier_pos,
                found: data.get(identifier_pos..).unwrap_or_default().to_vec(),
            }
        } else {
            err
        }
    })?;
    if identifier != EXIF_IDENTIFIER_STRING {
        return Err(LocateError::InvalidExifIdentifier {
            pos: identifier_pos,
            found: identifier.to_vec(),
        });
    }

    let tiff_start = reader.pos()?;
    let byte_order_marker = reader.read(HeaderField::ByteOrder)?;
    let byte_order =
        ByteOrder::from_marker(byte_order_marker).ok_or(LocateError::UnknownByteOrder {
            pos: tiff_start,
            found: byte_order_marker,
        })?;
    observer.event(&Event::ByteOrder(byte_order));

    let magic_pos = reader.pos()?;
    let magic = byte_order.u16(reader.read(HeaderField::Magic)?);
    if magic != TIFF_MAGIC {
        return Err(LocateError::InvalidTiffMagic {
            pos: magic_pos,
            found: magic,
        });
    }

    let raw_ifd_offset = byte_order.u32(reader.read(HeaderField::IfdOffset)?);
    let ifd_offset = resolve_offset(options.offset_policy, tiff_start, raw_ifd_offset).map_err(
        |_| LocateError::OffsetOverflow {
            tiff_start,
            raw: raw_ifd_offset,
        },
    )?;
    observer.event(&Event::IfdOffset {
        raw: raw_ifd_offset,
        resolved: ifd_offset,
    });

    Ok(TiffHeader {
        app1,
        tiff_start,
        byte_order,
        raw_ifd_offset,
        ifd_offset,
        offset_policy: options.offset_policy,
    })
}

use std::collections::BTreeSet;
use std::ops::Range;

use discard_common::byte_order::ByteOrder;
use discard_common::math::*;

use crate::error::ExciseError;
use crate::header::TiffHeader;
use crate::observer::{Event, Observer};

/// Size of the tag count field
pub const TAG_COUNT_SIZE: u64 = 2;
/// Size of one IFD entry
pub const TAG_SIZE: u64 = 12;
/// Size of the next IFD offset field
pub const NEXT_IFD_OFFSET_SIZE: u64 = 4;

/// Byte range covered by one IFD
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IfdExtent {
    start: usize,
    tag_count: u16,
    end: usize,
}

impl IfdExtent {
    pub fn start(&self) -> usize {
        self.start
    }

    /// First byte after the next IFD offset field
    pub fn end(&self) -> usize {
        self.end
    }

    pub fn tag_count(&self) -> u16 {
        self.tag_count
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Reads the next IFD offset field at the end of the IFD
    pub fn next_ifd_offset(&self, data: &[u8], byte_order: ByteOrder) -> Option<u32> {
        let pos = self.end.checked_sub(4)?;
        let bytes = data.get(pos..self.end)?.try_into().ok()?;
        Some(byte_order.u32(bytes))
    }
}

/// Determines the extent of the IFD at `offset`
///
/// The tag count is read as unsigned value. The IFD including its next IFD
/// offset field must be contained in `data`.
pub fn ifd_extent(
    data: &[u8],
    offset: u32,
    byte_order: ByteOrder,
) -> Result<IfdExtent, ExciseError> {
    let truncated = || ExciseError::TruncatedIfd {
        offset,
        len: data.len(),
    };

    let start = offset.usize().map_err(|_| truncated())?;
    let count_end = start.safe_add(2).map_err(|_| truncated())?;
    let count_bytes = data
        .get(start..count_end)
        .and_then(|x| x.try_into().ok())
        .ok_or_else(truncated)?;
    let tag_count = byte_order.u16(count_bytes);

    let ifd_len = u64::from(tag_count)
        .safe_mul(TAG_SIZE)?
        .safe_add(TAG_COUNT_SIZE)?
        .safe_add(NEXT_IFD_OFFSET_SIZE)?;
    let end = u64::from(offset).safe_add(ifd_len)?;

    if end > data.len().u64()? {
        return Err(ExciseError::IfdOutOfBounds {
            offset,
            tag_count,
            end,
            len: data.len(),
        });
    }

    Ok(IfdExtent {
        start,
        tag_count,
        end: end.usize()?,
    })
}

/// Removes the IFD at `ifd_offset`
///
/// Returns `data[..ifd_offset]` followed by everything after the IFD's next
/// IFD offset field.
pub fn excise(
    data: &[u8],
    ifd_offset: u32,
    byte_order: ByteOrder,
    observer: &dyn Observer,
) -> Result<Vec<u8>, ExciseError> {
    let extent = ifd_extent(data, ifd_offset, byte_order)?;
    observer.event(&Event::TagCount {
        offset: ifd_offset,
        count: extent.tag_count(),
    });
    observer.event(&Event::Excised {
        start: extent.start(),
        end: extent.end(),
    });

    Ok(remove_ranges(data, vec![extent.range()]))
}

/// Removes the first IFD and every IFD linked from it
///
/// The chain is walked on the unmodified data first. All ranges are then
/// removed in a single copy.
pub fn excise_chain(
    data: &[u8],
    header: &TiffHeader,
    observer: &dyn Observer,
) -> Result<Vec<u8>, ExciseError> {
    let byte_order = header.byte_order();
    let mut visited = BTreeSet::new();
    let mut ranges = Vec::new();
    let mut offset = header.ifd_offset();

    loop {
        if !visited.insert(offset) {
            return Err(ExciseError::ChainCycle { offset });
        }

        let extent = if ranges.is_empty() {
            ifd_extent(data, offset, byte_order)?
        } else {
            ifd_extent(data, offset, byte_order).map_err(|err| match err {
                ExciseError::TruncatedIfd { .. } | ExciseError::IfdOutOfBounds { .. } => {
                    ExciseError::ChainOutOfBounds {
                        offset,
                        len: data.len(),
                    }
                }
                err => err,
            })?
        };
        observer.event(&Event::TagCount {
            offset,
            count: extent.tag_count(),
        });
        ranges.push(extent.range());

        // Always present since the extent includes the field
        let Some(raw_next) = extent.next_ifd_offset(data, byte_order) else {
            break;
        };
        observer.event(&Event::NextIfd {
            from: offset,
            raw: raw_next,
        });

        if raw_next == 0 {
            break;
        }

        offset = header
            .resolve_offset(raw_next)
            .map_err(|_| ExciseError::ChainOutOfBounds {
                offset: raw_next,
                len: data.len(),
            })?;
    }

    for range in &ranges {
        observer.event(&Event::Excised {
            start: range.start,
            end: range.end,
        });
    }

    Ok(remove_ranges(data, ranges))
}

/// Copies `data` without the given ranges
///
/// Ranges may be unsorted and overlapping. They must be within `data`.
fn remove_ranges(data: &[u8], mut ranges: Vec<Range<usize>>) -> Vec<u8> {
    ranges.sort_by_key(|x| x.start);

    let mut merged: Vec<Range<usize>> = Vec::with_capacity(ranges.len());
    for range in ranges {
        match merged.last_mut() {
            Some(last) if range.start <= last.end => last.end = last.end.max(range.end),
            _ => merged.push(range),
        }
    }

    let removed = merged
        .iter()
        .fold(0_usize, |acc, x| acc.saturating_add(x.len()));
    let mut result = Vec::with_capacity(data.len().saturating_sub(removed));

    let mut pos = 0;
    for range in merged {
        result.extend_from_slice(data.get(pos..range.start).unwrap_or_default());
        pos = range.end;
    }
    result.extend_from_slice(data.get(pos..).unwrap_or_default());

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::NoopObserver;

    #[test]
    fn remove_overlapping_ranges() {
        let data: Vec<u8> = (0..20).collect();
        let result = remove_ranges(&data, vec![10..12, 2..4, 3..6, 18..20]);
        assert_eq!(result, vec![0, 1, 6, 7, 8, 9, 12, 13, 14, 15, 16, 17]);

        assert_eq!(remove_ranges(&data, Vec::new()), data);
    }

    #[test]
    fn extent_le() {
        let mut data = vec![0xAA; 4];
        data.extend_from_slice(&2_u16.to_le_bytes());
        data.extend_from_slice(&[0; 24]);
        data.extend_from_slice(&0x30_u32.to_le_bytes());

        let extent = ifd_extent(&data, 4, ByteOrder::LittleEndian).unwrap();
        assert_eq!(extent.range(), 4..34);
        assert_eq!(extent.len(), 30);
        assert_eq!(extent.tag_count(), 2);
        assert_eq!(
            extent.next_ifd_offset(&data, ByteOrder::LittleEndian),
            Some(0x30)
        );

        // Same bytes read big endian give 512 tags
        assert_eq!(
            ifd_extent(&data, 4, ByteOrder::BigEndian),
            Err(ExciseError::IfdOutOfBounds {
                offset: 4,
                tag_count: 512,
                end: 4 + 2 + 512 * 12 + 4,
                len: 34,
            })
        );
    }

    #[test]
    fn tag_count_is_unsigned() {
        let mut data = vec![0xFF, 0xFF];
        data.extend_from_slice(&[0; 64]);

        assert_eq!(
            excise(&data, 0, ByteOrder::BigEndian, &NoopObserver),
            Err(ExciseError::IfdOutOfBounds {
                offset: 0,
                tag_count: u16::MAX,
                end: 2 + 65535 * 12 + 4,
                len: 66,
            })
        );
    }

    #[test]
    fn offsets_outside_data() {
        let data = [0, 0, 0, 0, 0, 0];
        assert_eq!(
            ifd_extent(&data, 5, ByteOrder::BigEndian),
            Err(ExciseError::TruncatedIfd { offset: 5, len: 6 })
        );
        assert_eq!(
            ifd_extent(&data, u32::MAX, ByteOrder::BigEndian),
            Err(ExciseError::TruncatedIfd {
                offset: u32::MAX,
                len: 6
            })
        );
        assert_eq!(
            excise(&data, 0, ByteOrder::BigEndian, &NoopObserver),
            Ok(Vec::new())
        );
    }
}

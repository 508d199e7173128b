use discard_common::byte_order::ByteOrder;

/// Diagnostic events emitted while locating and excising IFDs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    MarkerFound { pos: usize },
    SegmentLength { declared_len: u16 },
    ByteOrder(ByteOrder),
    /// Offset as stored in the header and the absolute position it resolved to
    IfdOffset { raw: u32, resolved: u32 },
    TagCount { offset: u32, count: u16 },
    /// Raw value of the next IFD field of the IFD at `from`
    NextIfd { from: u32, raw: u32 },
    Excised { start: usize, end: usize },
}

/// Receiver for [`Event`]s
///
/// Any `Fn(&Event)` can be used as observer.
pub trait Observer {
    fn event(&self, event: &Event);
}

impl<F: Fn(&Event)> Observer for F {
    fn event(&self, event: &Event) {
        self(event)
    }
}

/// Forwards events to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl Observer for TracingObserver {
    fn event(&self, event: &Event) {
        match event {
            Event::MarkerFound { pos } => tracing::debug!("Found APP1 marker at byte {pos}"),
            Event::SegmentLength { declared_len } => {
                tracing::debug!("APP1 segment declares {declared_len} bytes")
            }
            Event::ByteOrder(byte_order) => tracing::debug!("TIFF byte order is {byte_order:?}"),
            Event::IfdOffset { raw, resolved } => {
                tracing::debug!("Offset to first IFD is {raw}, resolved to byte {resolved}")
            }
            Event::TagCount { offset, count } => {
                tracing::debug!("IFD at byte {offset} has {count} tags")
            }
            Event::NextIfd { from, raw } => {
                tracing::debug!("IFD at byte {from} points to next IFD {raw}")
            }
            Event::Excised { start, end } => tracing::info!("Removed bytes {start}..{end}"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl Observer for NoopObserver {
    fn event(&self, _: &Event) {}
}

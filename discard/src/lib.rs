//! Strip Exif metadata from JPEG files
//!
//! The first Exif IFD is cut out of the file, all other bytes stay untouched.
//! The image data is never decoded or re-encoded.
//!
//! ```
//! let input = [
//!     0x00, 0x00, 0xFF, 0xE1, 0x00, 0x0F, b'E', b'x', b'i', b'f', 0x00, 0x00,
//!     b'M', b'M', 0x00, 0x2A, 0x00, 0x00, 0x00, 0x14, 0x00, 0x01,
//!     0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
//!     0xFF, 0xFF,
//! ];
//! let output = discard::discard_exif(input.as_slice()).unwrap();
//! assert_eq!(output.len(), input.len() - 18);
//! assert_eq!(output[20..], [0xFF, 0xFF]);
//! ```

mod error;
pub mod hook;

use std::io::Read;

use discard_common::error::ErrorWithData;
pub use discard_exif::{
    ByteOrder, Event, ExciseError, LocateError, LocateOptions, NoopObserver, Observer,
    OffsetPolicy, SegmentBounds, TiffHeader, TracingObserver,
};
pub use error::Error;

/// Which IFDs are removed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExcisionMode {
    /// Only the IFD the TIFF header points to
    #[default]
    FirstIfd,
    /// The first IFD and all IFDs reachable via next IFD offsets
    Chain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Options {
    pub offset_policy: OffsetPolicy,
    pub segment_bounds: SegmentBounds,
    pub mode: ExcisionMode,
}

impl Options {
    pub fn locate_options(&self) -> LocateOptions {
        LocateOptions {
            offset_policy: self.offset_policy,
            segment_bounds: self.segment_bounds,
        }
    }
}

/// Configured Exif removal
///
/// Holds no state between calls. Each call only depends on its input.
#[derive(Debug, Clone)]
pub struct Discard<O = TracingObserver> {
    options: Options,
    observer: O,
}

impl Discard {
    pub fn new(options: Options) -> Self {
        Self {
            options,
            observer: TracingObserver,
        }
    }
}

impl Default for Discard {
    fn default() -> Self {
        Self::new(Options::default())
    }
}

impl<O: Observer> Discard<O> {
    /// Replaces the receiver of diagnostic events
    pub fn with_observer<P: Observer>(self, observer: P) -> Discard<P> {
        Discard {
            options: self.options,
            observer,
        }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Returns `data` without the Exif IFD
    pub fn apply(&self, data: &[u8]) -> Result<Vec<u8>, Error> {
        let header = discard_exif::locate(data, &self.options.locate_options(), &self.observer)
            .map_err(Error::HeaderParseFailed)?;

        let result = match self.options.mode {
            ExcisionMode::FirstIfd => discard_exif::excise(
                data,
                header.ifd_offset(),
                header.byte_order(),
                &self.observer,
            ),
            ExcisionMode::Chain => discard_exif::excise_chain(data, &header, &self.observer),
        }
        .map_err(Error::IfdRemovalFailed)?;

        Ok(result)
    }

    /// Reads all of `input` and removes the Exif IFD
    pub fn apply_reader(&self, input: impl Read) -> Result<Vec<u8>, Error> {
        let data = read_all(input)?;
        self.apply(&data)
    }

    /// Like [`Self::apply`] but hands `data` back on failure
    pub fn apply_owned(&self, data: Vec<u8>) -> Result<Vec<u8>, ErrorWithData<Error>> {
        match self.apply(&data) {
            Ok(result) => Ok(result),
            Err(err) => Err(ErrorWithData::new(err, data)),
        }
    }
}

/// Reads `input` and returns it without the first Exif IFD
///
/// Uses the default [`Options`].
pub fn discard_exif(input: impl Read) -> Result<Vec<u8>, Error> {
    Discard::new(Options::default()).apply_reader(input)
}

/// Returns `data` without the first Exif IFD
pub fn discard_exif_bytes(data: &[u8]) -> Result<Vec<u8>, Error> {
    Discard::new(Options::default()).apply(data)
}

/// Reads the whole input into memory
///
/// Only a clean end of stream ends the input. Any read error, including
/// [`std::io::ErrorKind::UnexpectedEof`], is returned.
pub fn read_all(mut input: impl Read) -> std::io::Result<Vec<u8>> {
    let mut data = Vec::new();
    input.read_to_end(&mut data)?;
    Ok(data)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::io;

    use super::*;

    const REFERENCE: [u8; 40] = [
        0x00, 0x00, 0xFF, 0xE1, 0x00, 0x0F, b'E', b'x', b'i', b'f', 0x00, 0x00, b'M', b'M', 0x00,
        0x2A, 0x00, 0x00, 0x00, 0x14, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFF, 0xFF,
    ];

    /// Returns its data and then fails with the given error kind
    struct FailingReader {
        data: Vec<u8>,
        kind: io::ErrorKind,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.data.is_empty() {
                return Err(io::Error::new(self.kind, "stream broke"));
            }
            let n = buf.len().min(self.data.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data.drain(..n);
            Ok(n)
        }
    }

    #[test]
    fn observer_sees_every_step() {
        let events = RefCell::new(Vec::new());
        {
            let discard = Discard::new(Options::default())
                .with_observer(|e: &Event| events.borrow_mut().push(*e));
            discard.apply(&REFERENCE).unwrap();
        }

        assert_eq!(
            events.into_inner(),
            vec![
                Event::MarkerFound { pos: 2 },
                Event::SegmentLength { declared_len: 15 },
                Event::ByteOrder(ByteOrder::BigEndian),
                Event::IfdOffset {
                    raw: 20,
                    resolved: 20
                },
                Event::TagCount {
                    offset: 20,
                    count: 1
                },
                Event::Excised { start: 20, end: 38 },
            ]
        );
    }

    #[test]
    fn truncated_stream_fails() {
        let reader = FailingReader {
            data: REFERENCE[..36].to_vec(),
            kind: io::ErrorKind::UnexpectedEof,
        };
        assert!(matches!(discard_exif(reader), Err(Error::Io(_))));
    }

    #[test]
    fn clean_end_of_stream() {
        let result = discard_exif(io::Cursor::new(REFERENCE.to_vec())).unwrap();
        assert_eq!(result.len(), 22);
    }

    #[test]
    fn other_read_errors_propagate() {
        let reader = FailingReader {
            data: REFERENCE.to_vec(),
            kind: io::ErrorKind::PermissionDenied,
        };
        assert!(matches!(discard_exif(reader), Err(Error::Io(_))));
    }

    #[test]
    fn owned_returns_input_on_failure() {
        let data = vec![0x00, 0x11, 0x22];
        let err = Discard::new(Options::default()).apply_owned(data.clone()).unwrap_err();
        assert!(err.err().is_marker_not_found());
        assert_eq!(err.into_inner(), data);
    }

    #[test]
    fn chain_mode_selected() {
        let options = Options {
            mode: ExcisionMode::Chain,
            ..Default::default()
        };
        let discard = Discard::new(options).with_observer(NoopObserver);
        assert_eq!(discard.options().mode, ExcisionMode::Chain);
        assert_eq!(
            discard.apply(&REFERENCE).unwrap(),
            discard_exif_bytes(&REFERENCE).unwrap()
        );
    }
}

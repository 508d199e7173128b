//! Adapter for upload hooks of file hosting services
//!
//! A host hands over the uploaded bytes and an output sink. It expects either
//! modified bytes in the sink, an untouched upload, or a rejection reason.

use std::io::{Read, Write};

use crate::{read_all, Discard, Observer, Options, TracingObserver};

/// What happens to uploads that cannot be processed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FailurePolicy {
    /// Reject every upload that fails
    #[default]
    RejectAll,
    /// Accept uploads without APP1 marker unmodified, reject other failures
    PassThroughWithoutExif,
    /// Accept every failing upload unmodified
    PassThroughAll,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// Stripped data of `size` bytes was written to the output
    Modified { size: usize },
    /// Nothing was written, the upload is used as is
    Unmodified,
    /// Nothing was written, the upload has to be refused
    Rejected(String),
}

impl UploadOutcome {
    /// Rejection reason, empty if the upload is accepted
    pub fn rejection(&self) -> &str {
        match self {
            Self::Rejected(reason) => reason,
            _ => "",
        }
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }
}

#[derive(Debug, Clone)]
pub struct UploadFilter<O = TracingObserver> {
    discard: Discard<O>,
    policy: FailurePolicy,
}

impl UploadFilter {
    pub fn new(options: Options, policy: FailurePolicy) -> Self {
        Self {
            discard: Discard::new(options),
            policy,
        }
    }
}

impl<O: Observer> UploadFilter<O> {
    pub fn with_discard(discard: Discard<O>, policy: FailurePolicy) -> Self {
        Self { discard, policy }
    }

    /// Strips Exif data from an upload before it is stored
    pub fn file_will_be_uploaded(&self, file: impl Read, output: &mut impl Write) -> UploadOutcome {
        let data = match read_all(file) {
            Ok(data) => data,
            Err(err) => {
                tracing::error!("Reading uploaded file failed: {err}");
                return UploadOutcome::Rejected(format!(
                    "An error occurred while trying to read the uploaded file: {err}"
                ));
            }
        };

        let result = match self.discard.apply(&data) {
            Ok(result) => result,
            Err(err) => {
                let pass = match self.policy {
                    FailurePolicy::RejectAll => false,
                    FailurePolicy::PassThroughWithoutExif => err.is_marker_not_found(),
                    FailurePolicy::PassThroughAll => true,
                };

                if pass {
                    tracing::info!("Accepting upload unmodified: {err}");
                    return UploadOutcome::Unmodified;
                }

                tracing::error!("Removing Exif data from upload failed: {err}");
                return UploadOutcome::Rejected(format!(
                    "An error occurred while removing Exif data: {err}"
                ));
            }
        };

        if let Err(err) = output.write_all(&result) {
            tracing::error!("Writing processed upload failed: {err}");
            return UploadOutcome::Rejected(format!(
                "An error occurred while writing the processed file: {err}"
            ));
        }

        tracing::info!("Successfully processed a new image");
        UploadOutcome::Modified { size: result.len() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exif_jpeg(tag_count: u16) -> Vec<u8> {
        let mut data = vec![0xFF, 0xD8, 0xFF, 0xE1, 0x00, 0x10];
        data.extend_from_slice(b"Exif\0\0II");
        data.extend_from_slice(&42_u16.to_le_bytes());
        data.extend_from_slice(&8_u32.to_le_bytes());
        data.extend_from_slice(&tag_count.to_le_bytes());
        data.extend_from_slice(&[0; 16]);
        data.extend_from_slice(&[0xFF, 0xD9]);
        data
    }

    #[test]
    fn modified() {
        let filter = UploadFilter::new(Options::default(), FailurePolicy::RejectAll);
        let mut output = Vec::new();
        let outcome = filter.file_will_be_uploaded(exif_jpeg(1).as_slice(), &mut output);

        assert_eq!(outcome, UploadOutcome::Modified { size: 22 });
        assert_eq!(outcome.rejection(), "");
        assert_eq!(output.len(), 22);
        assert_eq!(output[20..], [0xFF, 0xD9]);
    }

    #[test]
    fn rejected_without_output() {
        let filter = UploadFilter::new(Options::default(), FailurePolicy::RejectAll);
        let mut output = Vec::new();
        let outcome = filter.file_will_be_uploaded([0xFF, 0xD8, 0xFF, 0xD9].as_slice(), &mut output);

        assert!(outcome.is_rejected());
        assert!(!outcome.rejection().is_empty());
        assert!(output.is_empty());
    }

    #[test]
    fn pass_through_policies() {
        let no_exif = [0xFF, 0xD8, 0xFF, 0xD9];
        let broken_ifd = exif_jpeg(100);

        let filter = UploadFilter::new(Options::default(), FailurePolicy::PassThroughWithoutExif);
        let mut output = Vec::new();
        assert_eq!(
            filter.file_will_be_uploaded(no_exif.as_slice(), &mut output),
            UploadOutcome::Unmodified
        );
        assert!(filter
            .file_will_be_uploaded(broken_ifd.as_slice(), &mut output)
            .is_rejected());

        let filter = UploadFilter::new(Options::default(), FailurePolicy::PassThroughAll);
        assert_eq!(
            filter.file_will_be_uploaded(broken_ifd.as_slice(), &mut output),
            UploadOutcome::Unmodified
        );
        assert!(output.is_empty());
    }

    struct TruncatedUpload(Vec<u8>);

    impl Read for TruncatedUpload {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.0.is_empty() {
                return Err(std::io::ErrorKind::UnexpectedEof.into());
            }
            let n = buf.len().min(self.0.len());
            buf[..n].copy_from_slice(&self.0[..n]);
            self.0.drain(..n);
            Ok(n)
        }
    }

    #[test]
    fn truncated_upload_rejected() {
        let discard = Discard::new(Options::default()).with_observer(crate::NoopObserver);
        let filter = UploadFilter::with_discard(discard, FailurePolicy::PassThroughAll);

        let mut upload = exif_jpeg(1);
        upload.truncate(36);
        let mut output = Vec::new();
        let outcome = filter.file_will_be_uploaded(TruncatedUpload(upload), &mut output);

        assert!(outcome.is_rejected());
        assert!(outcome.rejection().contains("read the uploaded file"));
        assert!(output.is_empty());
    }
}

use discard_exif::{ExciseError, LocateError};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Reading input failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parsing image headers failed: {0}")]
    HeaderParseFailed(#[source] LocateError),
    #[error("Removing Exif IFD failed: {0}")]
    IfdRemovalFailed(#[source] ExciseError),
}

impl Error {
    /// Returns `true` if the data contains no APP1 marker at all
    pub fn is_marker_not_found(&self) -> bool {
        matches!(
            self,
            Self::HeaderParseFailed(LocateError::MarkerNotFound { .. })
        )
    }
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("No APP1 marker (FF E1) found in {len} bytes")]
    MarkerNotFound { len: usize },
    #[error("Unexpected end of data reading APP1 segment length at byte {pos}, data is {len} bytes long")]
    UnexpectedEof { pos: usize, len: usize },
    #[error("Segment position too large")]
    PositionTooLarge,
}

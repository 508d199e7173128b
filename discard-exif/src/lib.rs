//! Removing Exif IFDs from JPEG data
//!
//! [`locate`] finds the APP1 segment and decodes the TIFF header inside of it.
//! [`excise`] and [`excise_chain`] cut the IFD bytes out of the buffer. The
//! input is never modified, results are always newly allocated.

pub mod error;
mod header;
mod ifd;
mod observer;

pub use discard_common::byte_order::ByteOrder;
pub use error::{ExciseError, HeaderField, LocateError};
pub use header::*;
pub use ifd::*;
pub use observer::*;

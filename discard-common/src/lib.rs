//! Helpers shared between the exif-discard crates
//!
//! Nothing in here knows about JPEG or TIFF. The crates on top use these
//! helpers to keep every offset computation checked.

pub mod byte_order;
pub mod error;
pub mod math;
pub mod read;
pub mod utils;

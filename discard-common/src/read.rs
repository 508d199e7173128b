use std::io::{Cursor, Read};

use crate::math::*;

pub trait ReadExt: Read {
    fn read_array<const T: usize>(&mut self) -> Result<[u8; T], ReadError> {
        let buf = &mut [0; T];
        self.read_exact(buf)?;
        Ok(*buf)
    }
}

impl<T: AsRef<[u8]>> ReadExt for Cursor<T> {}

/// Position of a cursor as `usize`
///
/// ```
/// # use std::io::Cursor;
/// # use discard_common::read::*;
/// let mut s = Cursor::new(b"MM\0*".as_slice());
/// s.read_array::<2>().unwrap();
/// assert_eq!(position(&s).unwrap(), 2);
/// ```
pub fn position<T>(cursor: &Cursor<T>) -> Result<usize, ReadError> {
    Ok(cursor.position().usize()?)
}

#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("Math: {0}")]
    Math(#[from] MathError),
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),
}

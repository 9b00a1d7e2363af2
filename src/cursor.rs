//! Reading octets from a buffer.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::fmt;
use bytes::Bytes;
use crate::error::DecodeError;


//------------ Cursor --------------------------------------------------------

/// A bounds-checked, forward-only reader over a buffer.
///
/// The cursor hands out the octets it reads as `Bytes` values sharing the
/// underlying buffer, so nothing is copied.
#[derive(Clone, Debug)]
pub struct Cursor {
    /// The data not yet read.
    data: Bytes,

    /// The position of the first octet of `data` in the original input.
    pos: usize,
}

impl Cursor {
    /// Creates a cursor over the complete buffer.
    pub fn new(data: Bytes) -> Self {
        Self::with_pos(data, 0)
    }

    /// Creates a cursor for data that started at `pos` in some outer input.
    ///
    /// The position is only used for error reporting.
    pub fn with_pos(data: Bytes, pos: usize) -> Self {
        Cursor { data, pos }
    }

    /// Returns the current position.
    pub fn pos(&self) -> Pos {
        self.pos.into()
    }

    /// Returns whether all data has been read.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the data not yet read.
    pub fn remaining(&self) -> &[u8] {
        self.data.as_ref()
    }

    /// Takes a single octet.
    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        match self.data.first().copied() {
            Some(res) => {
                self.advance(1);
                Ok(res)
            }
            None => Err(DecodeError::out_of_bounds(self.pos()))
        }
    }

    /// Takes the next `len` octets.
    ///
    /// A length of zero always succeeds with an empty value.
    pub fn read_slice(&mut self, len: usize) -> Result<Bytes, DecodeError> {
        if len > self.data.len() {
            return Err(DecodeError::out_of_bounds(self.pos()))
        }
        self.pos += len;
        Ok(self.data.split_to(len))
    }

    /// Takes all remaining octets.
    pub fn read_remainder(&mut self) -> Bytes {
        self.pos += self.data.len();
        self.data.split_off(0)
    }

    fn advance(&mut self, len: usize) {
        self.pos += len;
        bytes::Buf::advance(&mut self.data, len);
    }
}


//------------ Pos -----------------------------------------------------------

/// The logical position within an input.
///
/// Values of this type can only be used for diagnostics. This is why we use
/// a newtype.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Pos(usize);

impl From<usize> for Pos {
    fn from(pos: usize) -> Pos {
        Pos(pos)
    }
}

impl From<Pos> for usize {
    fn from(pos: Pos) -> usize {
        pos.0
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}


//============ Tests =========================================================

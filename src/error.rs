//! Error Handling.
//!
//! This is a private module. Its public content is being re-exported by the
//! parent.

use std::{error, fmt};
use std::convert::Infallible;
use crate::cursor::Pos;


//------------ DecodeError ---------------------------------------------------

/// An error happened while decoding data.
///
/// Decoding stops at the first error. No partial result is kept. Besides the
/// kind of error, the value records the position in the input where the
/// offending field started.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DecodeError {
    kind: DecodeErrorKind,
    pos: Pos,
}

impl DecodeError {
    pub(crate) fn new(kind: DecodeErrorKind, pos: Pos) -> Self {
        Self { kind, pos }
    }

    pub(crate) fn out_of_bounds(pos: Pos) -> Self {
        Self::new(DecodeErrorKind::OutOfBounds, pos)
    }

    /// Returns the kind of error.
    pub fn kind(&self) -> DecodeErrorKind {
        self.kind
    }

    /// Returns the position in the input where the error was detected.
    pub fn pos(&self) -> Pos {
        self.pos
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} at position {}", self.kind, self.pos)
    }
}

impl error::Error for DecodeError { }


//------------ DecodeErrorKind -----------------------------------------------

/// The kind of a decoding error.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum DecodeErrorKind {
    /// The input ended before a field was complete.
    OutOfBounds,

    /// The first length octet uses an unsupported form.
    ///
    /// This covers both the indefinite form (0x80) and definite lengths
    /// with more than two length octets. The offending octet is included.
    InvalidLengthField(u8),

    /// The tag was encoded in a longer form than necessary.
    ///
    /// This is only reported in restricted mode.
    NonMinimalTag,

    /// The length was encoded in a longer form than necessary.
    ///
    /// This is only reported in restricted mode.
    NonMinimalLength,

    /// Values were nested deeper than the decoder allows.
    DepthExceeded(usize),
}

impl fmt::Display for DecodeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            DecodeErrorKind::OutOfBounds => f.write_str("out of bounds"),
            DecodeErrorKind::InvalidLengthField(octet) => {
                write!(f, "invalid length field 0x{:02x}", octet)
            }
            DecodeErrorKind::NonMinimalTag => {
                f.write_str("tag not in shortest form")
            }
            DecodeErrorKind::NonMinimalLength => {
                f.write_str("length not in shortest form")
            }
            DecodeErrorKind::DepthExceeded(limit) => {
                write!(f, "nesting deeper than {} levels", limit)
            }
        }
    }
}


//------------ EncodeError ---------------------------------------------------

/// An error happened while encoding a value.
///
/// The type is generic over the error of the [`Target`] being written to.
/// For targets that cannot fail, this is `Infallible`.
///
/// [`Target`]: crate::Target
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EncodeError<E = Infallible> {
    /// The tag number does not fit into the identifier octets.
    ///
    /// At most 15 bits of tag number are supported.
    TagOutOfRange(u32),

    /// The length does not fit into the length octets.
    ///
    /// At most two length octets are supported.
    LengthOutOfRange(usize),

    /// Writing to the target failed.
    Target(E),
}

impl<E> EncodeError<E> {
    /// Converts the target error into a different type.
    pub fn map_target<F>(self, op: impl FnOnce(E) -> F) -> EncodeError<F> {
        match self {
            EncodeError::TagOutOfRange(tag) => EncodeError::TagOutOfRange(tag),
            EncodeError::LengthOutOfRange(len) => {
                EncodeError::LengthOutOfRange(len)
            }
            EncodeError::Target(err) => EncodeError::Target(op(err)),
        }
    }
}

impl EncodeError<Infallible> {
    /// Widens an error from an infallible target to any target error.
    pub fn widen<E>(self) -> EncodeError<E> {
        self.map_target(|err| match err { })
    }
}

impl<E: fmt::Display> fmt::Display for EncodeError<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            EncodeError::TagOutOfRange(tag) => {
                write!(f, "tag number {} out of range", tag)
            }
            EncodeError::LengthOutOfRange(len) => {
                write!(f, "length {} out of range", len)
            }
            EncodeError::Target(ref err) => err.fmt(f),
        }
    }
}

impl<E: error::Error> error::Error for EncodeError<E> { }


//------------ UnknownClass --------------------------------------------------

/// A class name or number did not name one of the four classes.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnknownClass(String);

impl UnknownClass {
    pub(crate) fn new(input: impl fmt::Display) -> Self {
        UnknownClass(input.to_string())
    }

    /// Returns the rejected input.
    pub fn input(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UnknownClass {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Unknown class: {}", self.0)
    }
}

impl error::Error for UnknownClass { }


//------------ UnknownKind ---------------------------------------------------

/// A kind name or number was neither primitive nor constructed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnknownKind(String);

impl UnknownKind {
    pub(crate) fn new(input: impl fmt::Display) -> Self {
        UnknownKind(input.to_string())
    }

    /// Returns the rejected input.
    pub fn input(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UnknownKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Unknown kind: {}", self.0)
    }
}

impl error::Error for UnknownKind { }


//============ Tests =========================================================

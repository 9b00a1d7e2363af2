//! The length octets.
//!
//! This is a private module. The [`Length`] defined herein is not
//! publicly exposed.

use crate::cursor::Cursor;
use crate::error::{DecodeError, DecodeErrorKind, EncodeError};
use crate::mode::Mode;
use crate::target::Header;


//------------ Length -------------------------------------------------------

/// The length octets of an encoded value.
///
/// Only definite lengths are supported.
///
/// # Encoding
///
/// If the first octet is less than 0x80, it is the length. The octet 0x81
/// announces one and 0x82 two following octets with the big-endian length.
/// Anything else, including the indefinite form 0x80, is rejected. Lengths
/// are therefore limited to 16 bits.
///
/// In restricted mode, the long forms must not be used for a length that
/// fits into a shorter form.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Length(usize);

impl Length {
    /// The largest length that can be encoded.
    pub const MAX: usize = 0xffff;

    /// The largest length encoded in a single octet.
    const MAX_SHORT: usize = 0x7f;

    /// The largest length encoded with one following octet.
    const MAX_ONE_OCTET: usize = 0xff;

    const ONE_OCTET: u8 = 0x81;
    const TWO_OCTETS: u8 = 0x82;

    pub fn new(len: usize) -> Self {
        Length(len)
    }

    /// Returns the length as a `usize`.
    pub fn to_usize(self) -> usize {
        self.0
    }

    /// Takes the length octets from the beginning of a cursor.
    pub fn take_from<M: Mode>(
        cursor: &mut Cursor
    ) -> Result<Self, DecodeError> {
        let pos = cursor.pos();
        let len = match cursor.read_u8()? {
            n if n & 0x80 == 0 => return Ok(Length(n.into())),
            Self::ONE_OCTET => {
                let len = usize::from(cursor.read_u8()?);
                if M::IS_RESTRICTED && len <= Self::MAX_SHORT {
                    return Err(DecodeError::new(
                        DecodeErrorKind::NonMinimalLength, pos
                    ))
                }
                len
            }
            Self::TWO_OCTETS => {
                let len = usize::from(cursor.read_u8()?) << 8
                    | usize::from(cursor.read_u8()?);
                if M::IS_RESTRICTED && len <= Self::MAX_ONE_OCTET {
                    return Err(DecodeError::new(
                        DecodeErrorKind::NonMinimalLength, pos
                    ))
                }
                len
            }
            n => {
                return Err(DecodeError::new(
                    DecodeErrorKind::InvalidLengthField(n), pos
                ))
            }
        };
        Ok(Length(len))
    }

    /// Returns the number of length octets.
    ///
    /// Lengths beyond [`MAX`](Self::MAX) are reported as three octets.
    /// Encoding them fails.
    pub fn encoded_len(self) -> usize {
        if self.0 <= Self::MAX_SHORT {
            1
        }
        else if self.0 <= Self::MAX_ONE_OCTET {
            2
        }
        else {
            3
        }
    }

    /// Appends the length octets to a header.
    pub fn append_encoded(
        self, target: &mut Header
    ) -> Result<(), EncodeError> {
        if self.0 <= Self::MAX_SHORT {
            target.push(self.0 as u8)
        }
        else if self.0 <= Self::MAX_ONE_OCTET {
            target.extend_from_slice(&[Self::ONE_OCTET, self.0 as u8])
        }
        else if self.0 <= Self::MAX {
            target.extend_from_slice(&[
                Self::TWO_OCTETS, (self.0 >> 8) as u8, self.0 as u8
            ])
        }
        else {
            return Err(EncodeError::LengthOutOfRange(self.0))
        }
        Ok(())
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use bytes::Bytes;
    use crate::mode::{Ber, Der};
    use super::*;

    fn take_from<M: Mode>(
        src: &'static [u8]
    ) -> Result<usize, DecodeErrorKind> {
        let mut cursor = Cursor::new(Bytes::from_static(src));
        let res = Length::take_from::<M>(&mut cursor).map_err(|err| {
            err.kind()
        })?;
        assert!(cursor.is_empty(), "trailing data");
        Ok(res.to_usize())
    }

    #[test]
    fn ber_take_from() {
        assert_eq!(take_from::<Ber>(b"\x00"), Ok(0x00));
        assert_eq!(take_from::<Ber>(b"\x12"), Ok(0x12));
        assert_eq!(take_from::<Ber>(b"\x7f"), Ok(0x7f));
        assert_eq!(take_from::<Ber>(b"\x81\x00"), Ok(0));
        assert_eq!(take_from::<Ber>(b"\x81\xF0"), Ok(0xF0));
        assert_eq!(take_from::<Ber>(b"\x82\x00\x00"), Ok(0));
        assert_eq!(take_from::<Ber>(b"\x82\xF0\x0E"), Ok(0xF00E));
        assert_eq!(take_from::<Ber>(b"\x82\x00\x0E"), Ok(0x0E));
        assert_eq!(
            take_from::<Ber>(b"\x80"),
            Err(DecodeErrorKind::InvalidLengthField(0x80))
        );
        assert_eq!(
            take_from::<Ber>(b"\x83\x01\x00\x00"),
            Err(DecodeErrorKind::InvalidLengthField(0x83))
        );
        assert_eq!(
            take_from::<Ber>(b"\xFF"),
            Err(DecodeErrorKind::InvalidLengthField(0xFF))
        );
        assert_eq!(
            take_from::<Ber>(b"\x82\x01"),
            Err(DecodeErrorKind::OutOfBounds)
        );
        assert_eq!(take_from::<Ber>(b""), Err(DecodeErrorKind::OutOfBounds));
    }

    #[test]
    fn der_take_from() {
        assert_eq!(take_from::<Der>(b"\x00"), Ok(0x00));
        assert_eq!(take_from::<Der>(b"\x7f"), Ok(0x7f));
        assert_eq!(
            take_from::<Der>(b"\x81\x00"),
            Err(DecodeErrorKind::NonMinimalLength)
        );
        assert_eq!(
            take_from::<Der>(b"\x81\x7f"),
            Err(DecodeErrorKind::NonMinimalLength)
        );
        assert_eq!(take_from::<Der>(b"\x81\x80"), Ok(0x80));
        assert_eq!(take_from::<Der>(b"\x81\xF0"), Ok(0xF0));
        assert_eq!(
            take_from::<Der>(b"\x82\x00\xff"),
            Err(DecodeErrorKind::NonMinimalLength)
        );
        assert_eq!(take_from::<Der>(b"\x82\x01\x00"), Ok(0x100));
        assert_eq!(take_from::<Der>(b"\x82\xF0\x0E"), Ok(0xF00E));
        assert_eq!(
            take_from::<Der>(b"\x80"),
            Err(DecodeErrorKind::InvalidLengthField(0x80))
        );
    }

    #[test]
    fn encode() {
        fn step(len: usize, res: &[u8]) {
            let len = Length::new(len);
            let mut header = Header::new();
            len.append_encoded(&mut header).unwrap();
            assert_eq!(
                header.as_slice(), res,
                "append failed for {:?}: {:?}", len, header
            );
            assert_eq!(len.encoded_len(), res.len());
        }

        step(0, b"\x00");
        step(0x12, b"\x12");
        step(0x7f, b"\x7f");
        step(0x80, b"\x81\x80");
        step(0xff, b"\x81\xff");
        step(0x100, b"\x82\x01\x00");
        step(0xdead, b"\x82\xde\xad");
        step(0xffff, b"\x82\xff\xff");
    }

    #[test]
    fn encode_out_of_range() {
        let mut header = Header::new();
        assert_eq!(
            Length::new(0x10000).append_encoded(&mut header),
            Err(EncodeError::LengthOutOfRange(0x10000))
        );
        assert_eq!(Length::new(0x10000).encoded_len(), 3);
    }
}

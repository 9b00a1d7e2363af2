//! The identifier octets of an encoded value.
//!
//! This is a private module. The relevant items are re-exported by the
//! parent.

use std::{fmt, str};
use crate::cursor::Cursor;
use crate::error::{
    DecodeError, DecodeErrorKind, EncodeError, UnknownClass, UnknownKind
};
use crate::mode::Mode;
use crate::target::Header;


//------------ Ident ---------------------------------------------------------

/// The identifier octets: class, kind, and tag number.
///
/// # Encoding
///
/// The first octet carries the class in bits 8 and 7 and the kind in bit 6.
/// Tag numbers up to 30 go into the remaining five bits. Otherwise these
/// bits are all one and the number follows: numbers up to 127 in a single
/// octet, larger numbers in two octets with the high bit of the first one
/// set. This limits tag numbers to 15 bits.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Ident {
    pub class: Class,
    pub kind: Kind,
    pub number: u32,
}

impl Ident {
    /// The largest tag number that can be encoded.
    pub const MAX_NUMBER: u32 = 0x7fff;

    /// The largest tag number that fits into the first octet.
    const MAX_SHORT: u32 = 0x1e;

    /// The largest tag number that fits into a single subsequent octet.
    const MAX_ONE_OCTET: u32 = 0x7f;

    /// The bits in the first octet that mark a long form tag.
    const LONG_FORM: u8 = 0x1f;

    /// The bit marking a second subsequent tag octet.
    const CONTINUED: u8 = 0x80;

    pub fn new(class: Class, kind: Kind, number: u32) -> Self {
        Ident { class, kind, number }
    }

    /// Takes the identifier octets from the beginning of a cursor.
    pub fn take_from<M: Mode>(
        cursor: &mut Cursor
    ) -> Result<Self, DecodeError> {
        let pos = cursor.pos();
        let first = cursor.read_u8()?;
        let class = Class::from_octet(first);
        let kind = Kind::from_octet(first);

        let number = first & Self::LONG_FORM;
        if number != Self::LONG_FORM {
            return Ok(Ident::new(class, kind, number.into()))
        }

        let x0 = cursor.read_u8()?;
        let number = if x0 & Self::CONTINUED != 0 {
            let x1 = cursor.read_u8()?;
            let number = u32::from(x0 & !Self::CONTINUED) << 8
                | u32::from(x1);
            if M::IS_RESTRICTED && number <= Self::MAX_ONE_OCTET {
                return Err(DecodeError::new(
                    DecodeErrorKind::NonMinimalTag, pos
                ))
            }
            number
        }
        else {
            let number = u32::from(x0);
            if M::IS_RESTRICTED && number <= Self::MAX_SHORT {
                return Err(DecodeError::new(
                    DecodeErrorKind::NonMinimalTag, pos
                ))
            }
            number
        };
        Ok(Ident::new(class, kind, number))
    }

    /// Returns the number of identifier octets for a tag number.
    ///
    /// Numbers beyond [`MAX_NUMBER`](Self::MAX_NUMBER) are reported as
    /// three octets. Encoding them fails.
    pub fn encoded_len(number: u32) -> usize {
        if number <= Self::MAX_SHORT {
            1
        }
        else if number <= Self::MAX_ONE_OCTET {
            2
        }
        else {
            3
        }
    }

    /// Appends the identifier octets to a header.
    pub fn append_encoded(
        self, target: &mut Header
    ) -> Result<(), EncodeError> {
        let first = self.class.into_octet() | self.kind.into_octet();
        if self.number <= Self::MAX_SHORT {
            target.push(first | self.number as u8);
        }
        else if self.number <= Self::MAX_ONE_OCTET {
            target.extend_from_slice(&[
                first | Self::LONG_FORM, self.number as u8
            ]);
        }
        else if self.number <= Self::MAX_NUMBER {
            target.extend_from_slice(&[
                first | Self::LONG_FORM,
                (self.number >> 8) as u8 | Self::CONTINUED,
                self.number as u8,
            ]);
        }
        else {
            return Err(EncodeError::TagOutOfRange(self.number))
        }
        Ok(())
    }
}


//------------ Class ---------------------------------------------------------

/// The class of a tag.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Class {
    #[default]
    Universal,
    Application,
    Context,
    Private,
}

impl Class {
    const fn from_octet(octet: u8) -> Self {
        match octet >> 6 {
            0 => Self::Universal,
            1 => Self::Application,
            2 => Self::Context,
            _ => Self::Private,
        }
    }

    const fn into_octet(self) -> u8 {
        match self {
            Self::Universal => 0x00,
            Self::Application => 0x40,
            Self::Context => 0x80,
            Self::Private => 0xC0,
        }
    }

    /// Returns the lower-case name of the class.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Universal => "universal",
            Self::Application => "application",
            Self::Context => "context",
            Self::Private => "private",
        }
    }
}

impl TryFrom<u8> for Class {
    type Error = UnknownClass;

    /// Converts the two-bit class number.
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Universal),
            1 => Ok(Self::Application),
            2 => Ok(Self::Context),
            3 => Ok(Self::Private),
            _ => Err(UnknownClass::new(value))
        }
    }
}

impl str::FromStr for Class {
    type Err = UnknownClass;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "universal" => Ok(Self::Universal),
            "application" => Ok(Self::Application),
            "context" => Ok(Self::Context),
            "private" => Ok(Self::Private),
            _ => Err(UnknownClass::new(s))
        }
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}


//------------ Kind ----------------------------------------------------------

/// Whether a value is primitive or constructed.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Kind {
    /// The value is a string of octets.
    #[default]
    Primitive,

    /// The value is a sequence of nested values.
    Constructed,
}

impl Kind {
    const CONSTRUCTED_MASK: u8 = 0x20;

    const fn from_octet(octet: u8) -> Self {
        if octet & Self::CONSTRUCTED_MASK != 0 {
            Self::Constructed
        }
        else {
            Self::Primitive
        }
    }

    const fn into_octet(self) -> u8 {
        match self {
            Self::Primitive => 0,
            Self::Constructed => Self::CONSTRUCTED_MASK,
        }
    }

    /// Returns the lower-case name of the kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Primitive => "primitive",
            Self::Constructed => "constructed",
        }
    }
}

impl TryFrom<u8> for Kind {
    type Error = UnknownKind;

    /// Converts the constructed bit.
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Primitive),
            1 => Ok(Self::Constructed),
            _ => Err(UnknownKind::new(value))
        }
    }
}

impl str::FromStr for Kind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "primitive" => Ok(Self::Primitive),
            "constructed" => Ok(Self::Constructed),
            _ => Err(UnknownKind::new(s))
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use bytes::Bytes;
    use crate::mode::{Ber, Der};
    use super::*;

    const CLASSES: &[Class] = &[
        Class::Universal, Class::Application, Class::Context, Class::Private
    ];

    fn take<M: Mode>(data: &'static [u8]) -> Result<Ident, DecodeError> {
        let mut cursor = Cursor::new(Bytes::from_static(data));
        let res = Ident::take_from::<M>(&mut cursor)?;
        assert!(cursor.is_empty(), "trailing data");
        Ok(res)
    }

    fn encode(ident: Ident) -> Header {
        let mut res = Header::new();
        ident.append_encoded(&mut res).unwrap();
        res
    }

    #[test]
    fn take_from() {
        assert_eq!(
            take::<Ber>(b"\x00").unwrap(),
            Ident::new(Class::Universal, Kind::Primitive, 0)
        );
        assert_eq!(
            take::<Ber>(b"\xbe").unwrap(),
            Ident::new(Class::Context, Kind::Constructed, 30)
        );
        assert_eq!(
            take::<Ber>(b"\x5f\x1f").unwrap(),
            Ident::new(Class::Application, Kind::Primitive, 31)
        );
        assert_eq!(
            take::<Ber>(b"\x1f\x81\x02").unwrap(),
            Ident::new(Class::Universal, Kind::Primitive, 0x0102)
        );
        assert_eq!(
            take::<Ber>(b"\xff\xff\xff").unwrap(),
            Ident::new(Class::Private, Kind::Constructed, 0x7fff)
        );
        assert_eq!(
            take::<Ber>(b"\x1f").unwrap_err().kind(),
            DecodeErrorKind::OutOfBounds
        );
        assert_eq!(
            take::<Ber>(b"\x1f\x80").unwrap_err().kind(),
            DecodeErrorKind::OutOfBounds
        );
    }

    #[test]
    fn take_from_restricted() {
        assert_eq!(take::<Der>(b"\x1f\x1f").unwrap().number, 31);
        assert_eq!(take::<Der>(b"\x1f\x80\x80").unwrap().number, 128);
        assert_eq!(take::<Der>(b"\x1f\x81\x00").unwrap().number, 256);
        assert_eq!(
            take::<Der>(b"\x1f\x1e").unwrap_err().kind(),
            DecodeErrorKind::NonMinimalTag
        );
        assert_eq!(
            take::<Der>(b"\x1f\x80\x7f").unwrap_err().kind(),
            DecodeErrorKind::NonMinimalTag
        );

        // BER is fine with both.
        assert_eq!(take::<Ber>(b"\x1f\x1e").unwrap().number, 30);
        assert_eq!(take::<Ber>(b"\x1f\x80\x7f").unwrap().number, 127);
    }

    #[test]
    fn encoded_len() {
        assert_eq!(Ident::encoded_len(0), 1);
        assert_eq!(Ident::encoded_len(30), 1);
        assert_eq!(Ident::encoded_len(31), 2);
        assert_eq!(Ident::encoded_len(127), 2);
        assert_eq!(Ident::encoded_len(128), 3);
        assert_eq!(Ident::encoded_len(0x7fff), 3);
    }

    #[test]
    fn append_encoded() {
        for &class in CLASSES {
            for number in [0, 1, 30, 31, 127, 128, 0x0102, 0x7fff] {
                for kind in [Kind::Primitive, Kind::Constructed] {
                    let ident = Ident::new(class, kind, number);
                    let octets = encode(ident);
                    assert_eq!(octets.len(), Ident::encoded_len(number));
                    let mut cursor = Cursor::new(
                        Bytes::copy_from_slice(&octets)
                    );
                    assert_eq!(
                        Ident::take_from::<Der>(&mut cursor).unwrap(),
                        ident
                    );
                }
            }
        }
        assert_eq!(
            encode(Ident::new(Class::Universal, Kind::Primitive, 0x0102))
                .as_slice(),
            b"\x1f\x81\x02"
        );
        assert_eq!(
            encode(Ident::new(Class::Context, Kind::Constructed, 31))
                .as_slice(),
            b"\xbf\x1f"
        );
    }

    #[test]
    fn append_encoded_out_of_range() {
        let mut header = Header::new();
        assert_eq!(
            Ident::new(Class::Universal, Kind::Primitive, 0x8000)
                .append_encoded(&mut header),
            Err(EncodeError::TagOutOfRange(0x8000))
        );
        assert!(header.is_empty());
    }

    #[test]
    fn class_names() {
        for &class in CLASSES {
            assert_eq!(class.to_string().parse::<Class>().unwrap(), class);
        }
        assert_eq!("private".parse::<Class>().unwrap(), Class::Private);
        assert_eq!(
            "foo".parse::<Class>().unwrap_err().input(), "foo"
        );
        assert_eq!(Class::try_from(2).unwrap(), Class::Context);
        assert_eq!(Class::try_from(4).unwrap_err().input(), "4");
    }

    #[test]
    fn kind_names() {
        assert_eq!(
            "constructed".parse::<Kind>().unwrap(), Kind::Constructed
        );
        assert_eq!(Kind::Primitive.to_string(), "primitive");
        assert_eq!(
            "foo".parse::<Kind>().unwrap_err().to_string(),
            "Unknown kind: foo"
        );
        assert_eq!(Kind::try_from(1).unwrap(), Kind::Constructed);
        assert!(Kind::try_from(2).is_err());
    }
}

//! Tag-length-value trees in a BER-style encoding.
//!
//! This crate decodes data in a subset of the Basic Encoding Rules of ASN.1
//! into a tree of [`Tlv`] values and encodes such trees back into data. It
//! works purely structurally: a value is a class, a tag number, and either a
//! string of octets or a sequence of nested values. What a tag means is up
//! to the user.
//!
//! Only definite lengths of at most two length octets and tag numbers of
//! at most 15 bits are supported. Decoding and encoding are exact inverses
//! for data that uses the shortest possible encoding. Such data can be
//! enforced by decoding with the [`Der`] mode.
//!
//! # Example
//!
//! ```
//! use bertlv::{Class, Tlv, Value};
//!
//! let mut tlv = Tlv::new().with_value(Value::from_children([
//!     Tlv::new().with_tag(1),
//!     Tlv::new().with_tag(2),
//! ]));
//! assert_eq!(tlv.to_vec().unwrap(), b"\x20\x04\x01\x00\x02\x00");
//!
//! tlv.push_child(Tlv::primitive(Class::Context, 0, &b"ab"[..]));
//! assert_eq!(tlv.length(), 8);
//!
//! let decoded = Tlv::decode(tlv.to_vec().unwrap()).unwrap();
//! assert_eq!(decoded, [tlv]);
//! ```

pub use self::cursor::{Cursor, Pos};
pub use self::decoder::Decoder;
pub use self::error::{
    DecodeError, DecodeErrorKind, EncodeError, UnknownClass, UnknownKind
};
pub use self::ident::{Class, Kind};
pub use self::mode::{Ber, Der, Mode};
pub use self::target::{IoTarget, Target};
pub use self::tlv::{ChildrenMut, Tlv, Value, encode_chain, write_chain};

mod cursor;
mod decoder;
mod error;
mod ident;
mod length;
mod mode;
mod target;
mod tlv;

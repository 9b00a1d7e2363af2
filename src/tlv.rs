//! Tag-length-value trees.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::{mem, ops};
use bytes::{Bytes, BytesMut};
use log::trace;
use crate::cursor::Cursor;
use crate::decoder::Decoder;
use crate::error::{DecodeError, DecodeErrorKind, EncodeError};
use crate::ident::{Class, Ident, Kind};
use crate::length::Length;
use crate::mode::{Ber, Mode};
use crate::target::{Header, Target};


//------------ Tlv -----------------------------------------------------------

/// A single tag-length-value unit and everything nested inside it.
///
/// A value has a [`Class`], a [`Kind`], a tag number, and a [`Value`]. The
/// value is either a string of octets or a sequence of nested values. Values
/// that follow each other on the same level, such as the content of a
/// constructed value or several values at the top level of some data, are
/// kept in a `Vec<Tlv>` in order.
///
/// Each value caches its [`length`](Self::length), the number of content
/// octets, and its [`full_length`](Self::full_length), the number of octets
/// of its complete encoding. Since a value can only be changed through its
/// methods and nested values can only be reached mutably through the
/// value containing them, these are always current. In particular, changing
/// a deeply nested value through [`children_mut`](Self::children_mut) or
/// [`update_at`](Self::update_at) updates the lengths of every value on the
/// way up.
///
/// The lengths describe the encoding produced by this crate, which always
/// uses the shortest form. They may therefore differ from the lengths found
/// in data that was decoded in BER mode.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Tlv {
    class: Class,
    kind: Kind,
    tag: u32,
    value: Value,

    /// The number of content octets.
    length: usize,

    /// The number of identifier, length, and content octets.
    full_length: usize,
}

/// # Creation
///
impl Tlv {
    /// Creates a new empty primitive value in the universal class with tag 0.
    pub fn new() -> Self {
        Self::from_parts(
            Class::Universal, Kind::Primitive, 0, Value::default()
        )
    }

    /// Creates a primitive value.
    pub fn primitive(class: Class, tag: u32, value: impl Into<Bytes>) -> Self {
        Self::from_parts(
            class, Kind::Primitive, tag, Value::Primitive(value.into())
        )
    }

    /// Creates a constructed value from a sequence of nested values.
    pub fn constructed(
        class: Class, tag: u32, children: impl IntoIterator<Item = Tlv>
    ) -> Self {
        Self::from_parts(
            class, Kind::Constructed, tag, Value::from_children(children)
        )
    }

    fn from_parts(class: Class, kind: Kind, tag: u32, value: Value) -> Self {
        let mut res = Tlv {
            class, kind, tag, value,
            length: 0,
            full_length: 0,
        };
        res.update_length();
        res
    }

    /// Returns the value with the class changed.
    pub fn with_class(mut self, class: Class) -> Self {
        self.set_class(class);
        self
    }

    /// Returns the value with the kind changed.
    ///
    /// Since [`with_value`](Self::with_value) sets the kind to match the
    /// value, this must come after it to have an effect.
    pub fn with_kind(mut self, kind: Kind) -> Self {
        self.set_kind(kind);
        self
    }

    /// Returns the value with the tag number changed.
    pub fn with_tag(mut self, tag: u32) -> Self {
        self.set_tag(tag);
        self
    }

    /// Returns the value with the content changed.
    pub fn with_value(mut self, value: Value) -> Self {
        self.set_value(value);
        self
    }
}

/// # Access and Mutation
///
impl Tlv {
    /// Returns the class.
    pub fn class(&self) -> Class {
        self.class
    }

    /// Changes the class.
    pub fn set_class(&mut self, class: Class) {
        self.class = class
    }

    /// Returns the kind.
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Returns whether the value will be encoded as constructed.
    pub fn is_constructed(&self) -> bool {
        self.kind == Kind::Constructed
    }

    /// Overrides the kind.
    ///
    /// The kind only determines the constructed bit of the identifier octets.
    /// It does not change the content.
    pub fn set_kind(&mut self, kind: Kind) {
        self.kind = kind
    }

    /// Returns the tag number.
    pub fn tag(&self) -> u32 {
        self.tag
    }

    /// Changes the tag number.
    pub fn set_tag(&mut self, tag: u32) {
        self.tag = tag;
        self.update_length();
    }

    /// Returns the content.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Replaces the content and returns the previous one.
    ///
    /// The kind is set to match the new content.
    pub fn set_value(&mut self, value: Value) -> Value {
        self.kind = value.kind();
        let res = mem::replace(&mut self.value, value);
        self.update_length();
        res
    }

    /// Returns the octets of a primitive value.
    pub fn bytes(&self) -> Option<&Bytes> {
        match self.value {
            Value::Primitive(ref bytes) => Some(bytes),
            Value::Constructed(_) => None,
        }
    }

    /// Returns the nested values.
    ///
    /// Returns an empty slice for a primitive value.
    pub fn children(&self) -> &[Tlv] {
        match self.value {
            Value::Primitive(_) => &[],
            Value::Constructed(ref children) => children,
        }
    }

    /// Provides mutable access to the nested values.
    ///
    /// The lengths of `self` are updated when the returned guard is dropped.
    /// Returns `None` for a primitive value.
    pub fn children_mut(&mut self) -> Option<ChildrenMut<'_>> {
        ChildrenMut::new(self)
    }

    /// Appends a nested value.
    ///
    /// If `self` is primitive, its octets are dropped and it becomes a
    /// constructed value containing only `child`.
    pub fn push_child(&mut self, child: Tlv) {
        if let Value::Constructed(ref mut children) = self.value {
            children.push(child);
            self.update_length();
        }
        else {
            self.set_value(Value::from_child(child));
        }
    }

    /// Returns the nested value at the given path.
    ///
    /// Each element of `path` is an index into the children of the value
    /// reached so far. An empty path returns `self`.
    pub fn get(&self, path: &[usize]) -> Option<&Tlv> {
        match path.split_first() {
            None => Some(self),
            Some((&idx, tail)) => self.children().get(idx)?.get(tail),
        }
    }

    /// Modifies the nested value at the given path.
    ///
    /// Applies `op` to the value found as with [`get`](Self::get), then
    /// updates the lengths of all values along the path. Returns `None` if
    /// there is no value at `path`.
    pub fn update_at<R>(
        &mut self, path: &[usize], op: impl FnOnce(&mut Tlv) -> R
    ) -> Option<R> {
        match path.split_first() {
            None => Some(op(self)),
            Some((&idx, tail)) => {
                let mut children = self.children_mut()?;
                let res = children.get_mut(idx)?.update_at(tail, op);
                res
            }
        }
    }

    /// Returns the number of content octets.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Returns the number of octets of the complete encoding.
    pub fn full_length(&self) -> usize {
        self.full_length
    }

    /// Recalculates the cached lengths from scratch.
    ///
    /// For constructed values, this relies on the children being current.
    fn update_length(&mut self) {
        self.length = self.value.content_len();
        self.full_length = Ident::encoded_len(self.tag)
            + Length::new(self.length).encoded_len()
            + self.length;
    }
}

/// # Decoding
///
impl Tlv {
    /// Decodes all values contained in `data` using BER.
    ///
    /// The data must contain at least one complete value and must not
    /// contain anything but complete values. This uses the default
    /// [`Decoder`]; use that type directly for more control.
    pub fn decode(data: impl Into<Bytes>) -> Result<Vec<Tlv>, DecodeError> {
        Decoder::<Ber>::new().decode(data)
    }

    /// Decodes all values contained in a slice using BER.
    ///
    /// This copies the slice once. Primitive values of the result refer to
    /// that copy.
    pub fn decode_slice(data: &[u8]) -> Result<Vec<Tlv>, DecodeError> {
        Decoder::<Ber>::new().decode_slice(data)
    }

    /// Takes values from a cursor until it is exhausted.
    ///
    /// At least one value is taken even if the cursor is empty at the
    /// start. `depth` is the number of constructed values around the
    /// cursor’s data.
    pub(crate) fn take_all<M: Mode>(
        cursor: &mut Cursor, depth: usize, max_depth: usize,
    ) -> Result<Vec<Tlv>, DecodeError> {
        let mut res = Vec::new();
        loop {
            res.push(Self::take_from::<M>(cursor, depth, max_depth)?);
            if cursor.is_empty() {
                return Ok(res)
            }
        }
    }

    /// Takes a single value from the beginning of a cursor.
    fn take_from<M: Mode>(
        cursor: &mut Cursor, depth: usize, max_depth: usize,
    ) -> Result<Self, DecodeError> {
        let pos = cursor.pos();
        let ident = Ident::take_from::<M>(cursor)?;
        let length = Length::take_from::<M>(cursor)?.to_usize();
        let content_pos = cursor.pos();
        let content = cursor.read_slice(length)?;
        trace!(
            "decoded {} {} value with tag {} and length {} at {}",
            ident.class, ident.kind, ident.number, length, pos
        );

        let value = match ident.kind {
            Kind::Primitive => Value::Primitive(content),
            Kind::Constructed if content.is_empty() => {
                Value::Constructed(Vec::new())
            }
            Kind::Constructed => {
                if depth >= max_depth {
                    return Err(DecodeError::new(
                        DecodeErrorKind::DepthExceeded(max_depth),
                        content_pos
                    ))
                }
                let mut content = Cursor::with_pos(
                    content, content_pos.into()
                );
                Value::Constructed(
                    Self::take_all::<M>(&mut content, depth + 1, max_depth)?
                )
            }
        };
        Ok(Self::from_parts(ident.class, ident.kind, ident.number, value))
    }
}

/// # Encoding
///
impl Tlv {
    /// Returns the number of octets of the encoding.
    ///
    /// This is the same as [`full_length`](Self::full_length).
    pub fn encoded_len(&self) -> usize {
        self.full_length
    }

    /// Writes the encoding of the value to a target.
    ///
    /// Nothing is written if the value or any nested value has a tag number
    /// or length that cannot be encoded.
    pub fn write_encoded<T: Target>(
        &self, target: &mut T
    ) -> Result<(), EncodeError<T::Error>> {
        if let Err(err) = self.check_encodable() {
            return Err(err.widen())
        }
        self.write_checked(target)
    }

    /// Returns the encoding of the value in a vec.
    pub fn to_vec(&self) -> Result<Vec<u8>, EncodeError> {
        let mut res = Vec::with_capacity(self.full_length);
        self.write_encoded(&mut res)?;
        Ok(res)
    }

    /// Returns the encoding of the value as a bytes value.
    pub fn to_bytes(&self) -> Result<Bytes, EncodeError> {
        let mut res = BytesMut::with_capacity(self.full_length);
        self.write_encoded(&mut res)?;
        Ok(res.freeze())
    }

    /// Checks that the value and all nested values can be encoded.
    fn check_encodable(&self) -> Result<(), EncodeError> {
        if self.tag > Ident::MAX_NUMBER {
            return Err(EncodeError::TagOutOfRange(self.tag))
        }
        if self.length > Length::MAX {
            return Err(EncodeError::LengthOutOfRange(self.length))
        }
        self.children().iter().try_for_each(Tlv::check_encodable)
    }

    fn write_checked<T: Target>(
        &self, target: &mut T
    ) -> Result<(), EncodeError<T::Error>> {
        trace!(
            "encoding {} {} value with tag {} and length {}",
            self.class, self.kind, self.tag, self.length
        );
        let mut header = Header::new();
        Ident::new(
            self.class, self.kind, self.tag
        ).append_encoded(&mut header).map_err(
            EncodeError::widen::<T::Error>
        )?;
        Length::new(
            self.length
        ).append_encoded(&mut header).map_err(
            EncodeError::widen::<T::Error>
        )?;
        target.write_all(&header).map_err(EncodeError::Target)?;
        match self.value {
            Value::Primitive(ref bytes) => {
                target.write_all(bytes).map_err(EncodeError::Target)
            }
            Value::Constructed(ref children) => {
                children.iter().try_for_each(|child| {
                    child.write_checked(target)
                })
            }
        }
    }
}


//--- Default

impl Default for Tlv {
    fn default() -> Self {
        Self::new()
    }
}


//------------ Value ---------------------------------------------------------

/// The content of a value.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Value {
    /// The content of a primitive value: a string of octets.
    Primitive(Bytes),

    /// The content of a constructed value: a sequence of values.
    Constructed(Vec<Tlv>),
}

impl Value {
    /// Creates primitive content from a string of octets.
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Self {
        Value::Primitive(bytes.into())
    }

    /// Creates constructed content holding a single value.
    pub fn from_child(child: Tlv) -> Self {
        Value::Constructed(vec![child])
    }

    /// Creates constructed content from a sequence of values.
    ///
    /// The sequence may be empty. This results in a constructed value
    /// without any content octets.
    pub fn from_children(children: impl IntoIterator<Item = Tlv>) -> Self {
        Value::Constructed(children.into_iter().collect())
    }

    /// Returns the kind of value this content belongs to.
    pub fn kind(&self) -> Kind {
        match *self {
            Value::Primitive(_) => Kind::Primitive,
            Value::Constructed(_) => Kind::Constructed,
        }
    }

    /// Returns the number of content octets.
    fn content_len(&self) -> usize {
        match *self {
            Value::Primitive(ref bytes) => bytes.len(),
            Value::Constructed(ref children) => {
                children.iter().map(Tlv::full_length).sum()
            }
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Primitive(Bytes::new())
    }
}

impl From<Bytes> for Value {
    fn from(bytes: Bytes) -> Self {
        Value::Primitive(bytes)
    }
}

impl From<Tlv> for Value {
    fn from(child: Tlv) -> Self {
        Value::from_child(child)
    }
}

impl From<Vec<Tlv>> for Value {
    fn from(children: Vec<Tlv>) -> Self {
        Value::Constructed(children)
    }
}


//------------ ChildrenMut ---------------------------------------------------

/// Mutable access to the nested values of a constructed value.
///
/// The guard dereferences to the vec of nested values. When it is dropped,
/// the lengths of the value it was taken from are updated. Guards for
/// values further down are dropped first, so the lengths of all values
/// involved are updated bottom up.
///
/// While the guard exists, the values are moved out of the owning value
/// and its lengths are those of an empty constructed value. Leaking the
/// guard therefore leaves the owning value without children but with
/// correct lengths.
#[derive(Debug)]
pub struct ChildrenMut<'a> {
    owner: &'a mut Tlv,
    children: Vec<Tlv>,
}

impl<'a> ChildrenMut<'a> {
    fn new(owner: &'a mut Tlv) -> Option<Self> {
        let children = match owner.value {
            Value::Constructed(ref mut children) => mem::take(children),
            Value::Primitive(_) => return None,
        };
        owner.update_length();
        Some(ChildrenMut { owner, children })
    }
}

impl<'a> ops::Deref for ChildrenMut<'a> {
    type Target = Vec<Tlv>;

    fn deref(&self) -> &Self::Target {
        &self.children
    }
}

impl<'a> ops::DerefMut for ChildrenMut<'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.children
    }
}

impl<'a> Drop for ChildrenMut<'a> {
    fn drop(&mut self) {
        self.owner.value = Value::Constructed(mem::take(&mut self.children));
        self.owner.update_length();
    }
}


//------------ encode_chain --------------------------------------------------

/// Returns the encoding of a sequence of values.
///
/// This is the concatenation of the encodings of the values in order.
pub fn encode_chain(chain: &[Tlv]) -> Result<Vec<u8>, EncodeError> {
    let mut res = Vec::with_capacity(
        chain.iter().map(Tlv::full_length).sum()
    );
    write_chain(chain, &mut res)?;
    Ok(res)
}

/// Writes the encoding of a sequence of values to a target.
///
/// Nothing is written if any of the values cannot be encoded.
pub fn write_chain<T: Target>(
    chain: &[Tlv], target: &mut T
) -> Result<(), EncodeError<T::Error>> {
    if let Err(err) = chain.iter().try_for_each(Tlv::check_encodable) {
        return Err(err.widen())
    }
    chain.iter().try_for_each(|tlv| tlv.write_checked(target))
}


//============ Tests =========================================================

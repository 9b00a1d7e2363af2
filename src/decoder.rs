//! Decoding configuration.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::fmt;
use std::marker::PhantomData;
use bytes::Bytes;
use log::debug;
use crate::cursor::Cursor;
use crate::error::DecodeError;
use crate::mode::{Ber, Mode};
use crate::tlv::Tlv;


//------------ Decoder -------------------------------------------------------

/// A decoder for tag-length-value data.
///
/// The decoder is generic over the [`Mode`], which determines whether
/// non-minimal encodings are accepted. In addition, it limits how deeply
/// constructed values may be nested. Each level of nesting costs one level
/// of recursion, so untrusted data should not be decoded without a limit.
pub struct Decoder<M = Ber> {
    /// The number of constructed values that may enclose a value.
    max_depth: usize,

    /// A marker for the mode.
    marker: PhantomData<M>,
}

impl<M> Decoder<M> {
    /// The default nesting limit.
    pub const DEFAULT_MAX_DEPTH: usize = 64;

    /// Creates a decoder with the default nesting limit.
    pub fn new() -> Self {
        Decoder {
            max_depth: Self::DEFAULT_MAX_DEPTH,
            marker: PhantomData,
        }
    }

    /// Returns a decoder using a different nesting limit.
    ///
    /// With a limit of zero, constructed values must be empty.
    pub fn with_max_depth(self, max_depth: usize) -> Self {
        Decoder { max_depth, marker: PhantomData }
    }

    /// Returns the nesting limit.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

impl<M: Mode> Decoder<M> {
    /// Decodes all values contained in `data`.
    ///
    /// Returns the values found at the top level in order. The data must
    /// contain at least one value and nothing but complete values.
    /// Primitive values in the result share the memory of `data`.
    pub fn decode(
        &self, data: impl Into<Bytes>
    ) -> Result<Vec<Tlv>, DecodeError> {
        let data = data.into();
        let len = data.len();
        let mut cursor = Cursor::new(data);
        let res = Tlv::take_all::<M>(&mut cursor, 0, self.max_depth)?;
        debug!(
            "decoded {} top-level values from {} octets in {} mode",
            res.len(), len, M::NAME
        );
        Ok(res)
    }

    /// Decodes all values contained in a slice.
    ///
    /// The slice is copied once.
    pub fn decode_slice(&self, data: &[u8]) -> Result<Vec<Tlv>, DecodeError> {
        self.decode(Bytes::copy_from_slice(data))
    }
}


//--- Default, Clone, Copy, and Debug
//
//    Implemented manually to avoid bounds on `M`.

impl<M> Default for Decoder<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> Clone for Decoder<M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M> Copy for Decoder<M> { }

impl<M: Mode> fmt::Debug for Decoder<M> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Decoder")
            .field("mode", &M::NAME)
            .field("max_depth", &self.max_depth)
            .finish()
    }
}


//============ Tests =========================================================

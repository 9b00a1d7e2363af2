//! The encoding rules to decode with.
//!
//! This is a private module. Its public items are re-exported by the parent.


//------------ Ber -----------------------------------------------------------

/// Basic Encoding Rules.
///
/// These are the flexible rules. Tags and lengths may use a longer form than
/// strictly necessary.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Ber;


//------------ Der -----------------------------------------------------------

/// Distinguished Encoding Rules.
///
/// These rules require the shortest possible encoding of both the tag and
/// the length octets. Since the encoder always produces the shortest form,
/// data accepted in this mode re-encodes to exactly the same octets.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Der;


//------------ Mode ----------------------------------------------------------

/// One of the modes.
pub trait Mode {
    /// Does this mode reject non-minimal tag and length octets?
    const IS_RESTRICTED: bool;

    /// A short name for the mode used in diagnostics.
    const NAME: &'static str;
}

impl Mode for Ber {
    const IS_RESTRICTED: bool = false;
    const NAME: &'static str = "BER";
}

impl Mode for Der {
    const IS_RESTRICTED: bool = true;
    const NAME: &'static str = "DER";
}

use alloc::{string::String, vec::Vec};

use bstr::BString;

use crate::{error::DecodeError, mode::Mode, scanner::Sequence};

/// An owned element type a session can return.
///
/// The element type selects the read family: binary elements scan the buffer
/// as bytes, text elements scan it as grapheme clusters of UTF-8 text. Reading
/// an element whose [`MODE`](Element::MODE) differs from the session's mode is
/// a mode mismatch.
pub trait Element: AsRef<[u8]> + Sized {
    /// The borrowed sequence type delimiters and scans use.
    type Seq: Sequence + ?Sized;

    /// The session mode this element belongs to.
    const MODE: Mode;

    /// Takes ownership of a matched slice.
    ///
    /// # Errors
    ///
    /// Fails if the bytes are not valid for this element type.
    fn from_bytes(bytes: Vec<u8>) -> Result<Self, DecodeError>;
}

impl Element for Vec<u8> {
    type Seq = [u8];
    const MODE: Mode = Mode::Binary;

    #[inline]
    fn from_bytes(bytes: Vec<u8>) -> Result<Self, DecodeError> {
        Ok(bytes)
    }
}

impl Element for BString {
    type Seq = [u8];
    const MODE: Mode = Mode::Binary;

    #[inline]
    fn from_bytes(bytes: Vec<u8>) -> Result<Self, DecodeError> {
        Ok(BString::from(bytes))
    }
}

impl Element for String {
    type Seq = str;
    const MODE: Mode = Mode::Text;

    #[inline]
    fn from_bytes(bytes: Vec<u8>) -> Result<Self, DecodeError> {
        String::from_utf8(bytes).map_err(|e| e.utf8_error().into())
    }
}

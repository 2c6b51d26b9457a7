//! Unit stepping over byte and text sequences.
//!
//! The scanner walks a sequence one *unit* at a time. For `[u8]` a unit is a
//! single byte; for `str` it is one extended grapheme cluster. Every cursor
//! the scanner holds is a byte offset into the original slice, so matches and
//! remainders are plain sub-slices and no data is copied during a scan.

use core::ops::Range;

use memchr::{memchr2, memmem};
use unicode_segmentation::UnicodeSegmentation;

use crate::error::DecodeError;

/// The unit a measured read counts in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Unit {
    /// One byte.
    Byte,
    /// One extended grapheme cluster.
    Grapheme,
}

/// A sequence the scanner can walk.
///
/// Offsets passed to and returned from these methods are byte offsets. The
/// scanner only ever hands back offsets that lie on unit or delimiter
/// boundaries, which for `str` are always char boundaries.
pub trait Sequence {
    /// The unit the cursor advances by.
    const UNIT: Unit;

    /// Length in bytes.
    fn len(&self) -> usize;

    /// `true` when the sequence holds no bytes.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The underlying bytes.
    fn as_bytes(&self) -> &[u8];

    /// Reinterprets raw bytes as this sequence type.
    ///
    /// # Errors
    ///
    /// Fails when the bytes are not valid for the sequence type (text only).
    fn decode(bytes: &[u8]) -> Result<&Self, DecodeError>;

    /// Sub-slice by byte range.
    fn slice(&self, range: Range<usize>) -> &Self;

    /// Byte offset just past the unit starting at `at`.
    ///
    /// `at` must be less than `len()`.
    fn next_unit(&self, at: usize) -> usize;

    /// Byte offset just past the first `count` units, if that many are present.
    fn units_end(&self, count: usize) -> Option<usize>;

    /// Whether the data starting at `at` begins with `pat`.
    #[inline]
    fn starts_with_at(&self, at: usize, pat: &Self) -> bool {
        self.as_bytes()[at..].starts_with(pat.as_bytes())
    }

    /// Offset of the first unit boundary at or after `from` where `pat`
    /// occurs.
    fn find_from(&self, from: usize, pat: &Self) -> Option<usize> {
        let mut at = from;
        while at < self.len() {
            if self.starts_with_at(at, pat) {
                return Some(at);
            }
            at = self.next_unit(at);
        }
        None
    }

    /// First position at or after `at` where either `a` or `b` could start.
    ///
    /// Returns `None` when neither can occur in the rest of the sequence. The
    /// default does not skip; implementations may jump ahead only over
    /// positions at which neither pattern can match.
    #[inline]
    fn next_candidate(&self, at: usize, a: &Self, b: &Self) -> Option<usize> {
        let _ = (a, b);
        (at < self.len()).then_some(at)
    }
}

impl Sequence for [u8] {
    const UNIT: Unit = Unit::Byte;

    #[inline]
    fn len(&self) -> usize {
        <[u8]>::len(self)
    }

    #[inline]
    fn as_bytes(&self) -> &[u8] {
        self
    }

    #[inline]
    fn decode(bytes: &[u8]) -> Result<&Self, DecodeError> {
        Ok(bytes)
    }

    #[inline]
    fn slice(&self, range: Range<usize>) -> &Self {
        &self[range]
    }

    #[inline]
    fn next_unit(&self, at: usize) -> usize {
        at + 1
    }

    #[inline]
    fn units_end(&self, count: usize) -> Option<usize> {
        (count <= self.len()).then_some(count)
    }

    #[inline]
    fn find_from(&self, from: usize, pat: &Self) -> Option<usize> {
        memmem::find(&self[from..], pat).map(|i| from + i)
    }

    #[inline]
    fn next_candidate(&self, at: usize, a: &Self, b: &Self) -> Option<usize> {
        match (a.first(), b.first()) {
            (Some(&x), Some(&y)) => memchr2(x, y, self.get(at..)?).map(|i| at + i),
            _ => None,
        }
    }
}

impl Sequence for str {
    const UNIT: Unit = Unit::Grapheme;

    #[inline]
    fn len(&self) -> usize {
        str::len(self)
    }

    #[inline]
    fn as_bytes(&self) -> &[u8] {
        str::as_bytes(self)
    }

    #[inline]
    fn decode(bytes: &[u8]) -> Result<&Self, DecodeError> {
        Ok(core::str::from_utf8(bytes)?)
    }

    #[inline]
    fn slice(&self, range: Range<usize>) -> &Self {
        &self[range]
    }

    fn next_unit(&self, at: usize) -> usize {
        self[at..]
            .graphemes(true)
            .next()
            .map_or(self.len(), |g| at + g.len())
    }

    fn units_end(&self, count: usize) -> Option<usize> {
        if count == 0 {
            return Some(0);
        }
        self.grapheme_indices(true)
            .nth(count - 1)
            .map(|(start, g)| start + g.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_candidates_skip_to_first_byte_of_either_pattern() {
        let seq: &[u8] = b"xxxx<a>yy</a>";
        assert_eq!(seq.next_candidate(0, b"<a>", b"</a>"), Some(4));
        assert_eq!(seq.next_candidate(5, b"<a>", b"</a>"), Some(9));
        assert_eq!(seq.next_candidate(10, b"<a>", b"</a>"), None);
        assert_eq!(seq.next_candidate(seq.len(), b"<a>", b"</a>"), None);
    }

    #[test]
    fn text_units_are_grapheme_clusters() {
        // "e" + combining acute, then a family emoji joined with ZWJs
        let s = "e\u{301}\u{1F468}\u{200D}\u{1F469}\u{200D}\u{1F467}z";
        assert_eq!(s.next_unit(0), 3);
        assert_eq!(s.units_end(1), Some(3));
        assert_eq!(s.units_end(2), Some(s.len() - 1));
        assert_eq!(s.units_end(3), Some(s.len()));
        assert_eq!(s.units_end(4), None);
    }

    #[test]
    fn text_find_only_matches_on_cluster_boundaries() {
        let s = "e\u{301}x";
        assert_eq!(s.find_from(0, "\u{301}"), None);
        assert_eq!(s.find_from(0, "x"), Some(3));
    }

    #[test]
    fn decode_reports_incomplete_tail() {
        let err = <str as Sequence>::decode(&[b'a', 0xE2, 0x82]).unwrap_err();
        assert_eq!(err.valid_up_to, 1);
        assert!(err.incomplete);
    }
}

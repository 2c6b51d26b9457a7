//! Scanner: pure element extraction over a borrowed sequence.
//!
//! Every function here takes a sequence plus delimiter arguments and returns
//! either a [`Split`] (the complete element and the unread remainder) or
//! `None` when no complete element is present yet. Nothing is ever returned
//! for a truncated element, and no function keeps state between calls.
//!
//! Scans
//! - *Measured*: a fixed number of units ([`measured`]).
//! - *Terminated*: everything up to a terminator ([`through`], [`to`]).
//! - *Enclosed*: a `left ... right` pair. The nesting-aware variants
//!   ([`across`], [`between`]) count interior `left`s; the overlap-ignoring
//!   variants ([`across_first`], [`between_first`]) close on the first
//!   `right`.
//!
//! Invariants
//! - `rest` is always a suffix of the input, so the number of bytes consumed
//!   is `seq.len() - rest.len()`.
//! - An empty sequence or an empty delimiter yields `None` before any work.
//! - Cursors are byte offsets into the original slice; scans never build
//!   intermediate buffers, so a scan is linear in the data examined.
//!
//! Example
//! ```rust
//! use scanbuf::scanner;
//!
//! let split = scanner::across("<e>foo<e>bar</e></e>baz", "<e>", "</e>").unwrap();
//! assert_eq!(split.matched, "<e>foo<e>bar</e></e>");
//! assert_eq!(split.rest, "baz");
//! ```

mod sequence;

pub use sequence::{Sequence, Unit};

use crate::read::{Bounds, Nesting, Read};

/// A complete element and the data that follows it.
#[derive(Debug, PartialEq, Eq)]
pub struct Split<'a, S: ?Sized> {
    /// The extracted element.
    pub matched: &'a S,
    /// Unread data after the consumed prefix.
    pub rest: &'a S,
}

impl<S: ?Sized> Clone for Split<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: ?Sized> Copy for Split<'_, S> {}

impl<S: Sequence + ?Sized> Split<'_, S> {
    /// Number of bytes removed from the front of the scanned sequence.
    #[must_use]
    pub fn consumed(&self, scanned: &S) -> usize {
        scanned.len() - self.rest.len()
    }
}

/// Builds a split where the match is `seq[matched]` and the remainder starts
/// at `rest_from`.
#[inline]
fn split<S: Sequence + ?Sized>(
    seq: &S,
    matched: core::ops::Range<usize>,
    rest_from: usize,
) -> Split<'_, S> {
    Split {
        matched: seq.slice(matched),
        rest: seq.slice(rest_from..seq.len()),
    }
}

/// Consumes exactly `count` units from the front of `seq`.
///
/// Units are bytes for `[u8]` and extended grapheme clusters for `str`.
/// Returns `None` if fewer than `count` units are present or `count` is zero.
#[must_use]
pub fn measured<S: Sequence + ?Sized>(seq: &S, count: usize) -> Option<Split<'_, S>> {
    if seq.is_empty() || count == 0 {
        return None;
    }
    let end = seq.units_end(count)?;
    Some(split(seq, 0..end, end))
}

/// Byte offset of the first `terminator`, testing only unit boundaries.
fn find_terminator<S: Sequence + ?Sized>(seq: &S, terminator: &S) -> Option<usize> {
    if seq.is_empty() || terminator.is_empty() {
        return None;
    }
    seq.find_from(0, terminator)
}

/// Reads up to and including the first `terminator`.
///
/// ```rust
/// let split = scanbuf::scanner::through(&b"foo\nbar"[..], b"\n").unwrap();
/// assert_eq!(split.matched, b"foo\n");
/// assert_eq!(split.rest, b"bar");
/// ```
#[must_use]
pub fn through<'a, S: Sequence + ?Sized>(seq: &'a S, terminator: &S) -> Option<Split<'a, S>> {
    let at = find_terminator(seq, terminator)?;
    let end = at + terminator.len();
    Some(split(seq, 0..end, end))
}

/// Reads up to but excluding the first `terminator`, which stays at the front
/// of the remainder.
#[must_use]
pub fn to<'a, S: Sequence + ?Sized>(seq: &'a S, terminator: &S) -> Option<Split<'a, S>> {
    let at = find_terminator(seq, terminator)?;
    Some(split(seq, 0..at, at))
}

/// Locates the `right` that closes the `left` at the start of `seq`, counting
/// nested `left`s.
///
/// Returns the byte range of the closing `right`. At a position where both
/// delimiters match, `left` wins.
fn close_nested<S: Sequence + ?Sized>(
    seq: &S,
    left: &S,
    right: &S,
) -> Option<core::ops::Range<usize>> {
    if seq.is_empty() || left.is_empty() || right.is_empty() || !seq.starts_with_at(0, left) {
        return None;
    }

    let mut depth = 1usize;
    let mut at = left.len();
    while at < seq.len() {
        at = seq.next_candidate(at, left, right)?;
        if seq.starts_with_at(at, left) {
            depth += 1;
            at += left.len();
        } else if seq.starts_with_at(at, right) {
            depth -= 1;
            let end = at + right.len();
            if depth == 0 {
                return Some(at..end);
            }
            at = end;
        } else {
            at = seq.next_unit(at);
        }
    }
    None
}

/// Locates the first `right` after the `left` at the start of `seq`.
fn close_first<S: Sequence + ?Sized>(
    seq: &S,
    left: &S,
    right: &S,
) -> Option<core::ops::Range<usize>> {
    if seq.is_empty() || left.is_empty() || right.is_empty() || !seq.starts_with_at(0, left) {
        return None;
    }
    let at = seq.find_from(left.len(), right)?;
    Some(at..at + right.len())
}

/// Reads a nesting-aware `left ... right` element, delimiters included.
///
/// Interior occurrences of `left` must each be closed before the element
/// ends. When `left == right` the element can never close; use
/// [`across_first`] for symmetric delimiters.
#[must_use]
pub fn across<'a, S: Sequence + ?Sized>(seq: &'a S, left: &S, right: &S) -> Option<Split<'a, S>> {
    let close = close_nested(seq, left, right)?;
    Some(split(seq, 0..close.end, close.end))
}

/// Reads a nesting-aware `left ... right` element, delimiters stripped.
#[must_use]
pub fn between<'a, S: Sequence + ?Sized>(
    seq: &'a S,
    left: &S,
    right: &S,
) -> Option<Split<'a, S>> {
    let close = close_nested(seq, left, right)?;
    Some(split(seq, left.len()..close.start, close.end))
}

/// Reads `left ... right` closing on the first `right`, delimiters included.
#[must_use]
pub fn across_first<'a, S: Sequence + ?Sized>(
    seq: &'a S,
    left: &S,
    right: &S,
) -> Option<Split<'a, S>> {
    let close = close_first(seq, left, right)?;
    Some(split(seq, 0..close.end, close.end))
}

/// Reads `left ... right` closing on the first `right`, delimiters stripped.
#[must_use]
pub fn between_first<'a, S: Sequence + ?Sized>(
    seq: &'a S,
    left: &S,
    right: &S,
) -> Option<Split<'a, S>> {
    let close = close_first(seq, left, right)?;
    Some(split(seq, left.len()..close.start, close.end))
}

/// Terminated read with explicit bounds.
#[must_use]
pub fn terminated<'a, S: Sequence + ?Sized>(
    seq: &'a S,
    terminator: &S,
    bounds: Bounds,
) -> Option<Split<'a, S>> {
    match bounds {
        Bounds::Inclusive => through(seq, terminator),
        Bounds::Exclusive => to(seq, terminator),
    }
}

/// Enclosed read with explicit bounds and nesting semantics.
#[must_use]
pub fn enclosed<'a, S: Sequence + ?Sized>(
    seq: &'a S,
    left: &S,
    right: &S,
    bounds: Bounds,
    nesting: Nesting,
) -> Option<Split<'a, S>> {
    match (nesting, bounds) {
        (Nesting::Aware, Bounds::Inclusive) => across(seq, left, right),
        (Nesting::Aware, Bounds::Exclusive) => between(seq, left, right),
        (Nesting::IgnoreOverlap, Bounds::Inclusive) => across_first(seq, left, right),
        (Nesting::IgnoreOverlap, Bounds::Exclusive) => between_first(seq, left, right),
    }
}

/// Applies any read descriptor to `seq`.
#[must_use]
pub fn scan<'a, S: Sequence + ?Sized>(seq: &'a S, read: Read<'_, S>) -> Option<Split<'a, S>> {
    match read {
        Read::Measured(count) => measured(seq, count),
        Read::Terminated { terminator, bounds } => terminated(seq, terminator, bounds),
        Read::Enclosed {
            left,
            right,
            bounds,
            nesting,
        } => enclosed(seq, left, right, bounds, nesting),
    }
}

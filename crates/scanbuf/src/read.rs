use crate::{error::DecodeError, scanner::Sequence};

/// Whether delimiters are part of the returned element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Bounds {
    /// The element includes its delimiters.
    #[default]
    Inclusive,
    /// Delimiters are stripped from the element. For terminated reads the
    /// terminator stays at the front of the buffer.
    Exclusive,
}

/// How an enclosed read treats interior opening delimiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Nesting {
    /// Each interior `left` must be closed by its own `right`. Where both
    /// delimiters match at the same position, `left` is honored.
    #[default]
    Aware,
    /// The first `right` closes the element.
    IgnoreOverlap,
}

/// A read request over sequences of type `S` (`[u8]` or `str`).
#[derive(Debug)]
pub enum Read<'a, S: ?Sized> {
    /// Exactly this many units (bytes or grapheme clusters).
    Measured(usize),
    /// Everything up to the first `terminator`.
    Terminated {
        /// Terminating delimiter.
        terminator: &'a S,
        /// Whether the terminator is part of the element.
        bounds: Bounds,
    },
    /// A `left ... right` element.
    Enclosed {
        /// Opening delimiter; the buffer must start with it.
        left: &'a S,
        /// Closing delimiter.
        right: &'a S,
        /// Whether the delimiters are part of the element.
        bounds: Bounds,
        /// Nesting semantics.
        nesting: Nesting,
    },
}

impl<S: ?Sized> Clone for Read<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: ?Sized> Copy for Read<'_, S> {}

impl<'a, S: ?Sized> Read<'a, S> {
    /// Inclusive terminated read.
    #[must_use]
    pub fn through(terminator: &'a S) -> Self {
        Read::Terminated {
            terminator,
            bounds: Bounds::Inclusive,
        }
    }

    /// Exclusive terminated read.
    #[must_use]
    pub fn to(terminator: &'a S) -> Self {
        Read::Terminated {
            terminator,
            bounds: Bounds::Exclusive,
        }
    }

    /// Inclusive, nesting-aware enclosed read.
    #[must_use]
    pub fn across(left: &'a S, right: &'a S) -> Self {
        Read::Enclosed {
            left,
            right,
            bounds: Bounds::Inclusive,
            nesting: Nesting::Aware,
        }
    }

    /// Exclusive, nesting-aware enclosed read.
    #[must_use]
    pub fn between(left: &'a S, right: &'a S) -> Self {
        Read::Enclosed {
            left,
            right,
            bounds: Bounds::Exclusive,
            nesting: Nesting::Aware,
        }
    }

    /// Switches an enclosed read to overlap-ignoring semantics. Other reads
    /// are returned unchanged.
    #[must_use]
    pub fn ignoring_overlap(self) -> Self {
        match self {
            Read::Enclosed {
                left,
                right,
                bounds,
                ..
            } => Read::Enclosed {
                left,
                right,
                bounds,
                nesting: Nesting::IgnoreOverlap,
            },
            other => other,
        }
    }
}

/// An owned read request, detached from the caller's borrows so it can be
/// queued to a session worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ReadOp {
    Measured(usize),
    Terminated {
        terminator: Vec<u8>,
        bounds: Bounds,
    },
    Enclosed {
        left: Vec<u8>,
        right: Vec<u8>,
        bounds: Bounds,
        nesting: Nesting,
    },
}

impl ReadOp {
    pub(crate) fn from_read<S: Sequence + ?Sized>(read: Read<'_, S>) -> Self {
        match read {
            Read::Measured(count) => ReadOp::Measured(count),
            Read::Terminated { terminator, bounds } => ReadOp::Terminated {
                terminator: terminator.as_bytes().to_vec(),
                bounds,
            },
            Read::Enclosed {
                left,
                right,
                bounds,
                nesting,
            } => ReadOp::Enclosed {
                left: left.as_bytes().to_vec(),
                right: right.as_bytes().to_vec(),
                bounds,
                nesting,
            },
        }
    }

    /// Borrows the request back as a typed [`Read`].
    pub(crate) fn as_read<S: Sequence + ?Sized>(&self) -> Result<Read<'_, S>, DecodeError> {
        Ok(match self {
            ReadOp::Measured(count) => Read::Measured(*count),
            ReadOp::Terminated { terminator, bounds } => Read::Terminated {
                terminator: S::decode(terminator)?,
                bounds: *bounds,
            },
            ReadOp::Enclosed {
                left,
                right,
                bounds,
                nesting,
            } => Read::Enclosed {
                left: S::decode(left)?,
                right: S::decode(right)?,
                bounds: *bounds,
                nesting: *nesting,
            },
        })
    }
}

//! Single-owner session state.
//!
//! An [`Engine`] holds one buffer and its fixed [`Mode`] and applies scanner
//! reads to it with all-or-nothing commits. It is the state a
//! [`Session`](crate::Session) worker owns, and it can be used directly when
//! the caller already serializes access (for example as the scratch state of
//! a transaction).

use alloc::vec::Vec;

use bstr::BStr;

use crate::{
    buffer::Buffer,
    element::Element,
    error::{DecodeError, SessionError},
    mode::Mode,
    read::{Read, ReadOp},
    scanner::{self, Sequence},
};

/// An owned copy of a session's state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    mode: Mode,
    data: Vec<u8>,
    generation: u64,
}

impl Snapshot {
    /// Creates a snapshot for a fresh state holding `data`.
    #[must_use]
    pub fn new(mode: Mode, data: Vec<u8>) -> Self {
        Self {
            mode,
            data,
            generation: 0,
        }
    }

    /// Mode of the captured state.
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Pending bytes at capture time.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Generation at capture time.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Consumes the snapshot, returning the pending bytes.
    #[must_use]
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

/// A buffer with a fixed mode and the scanner applied on top.
#[derive(Debug, Clone)]
pub struct Engine {
    mode: Mode,
    buffer: Buffer,
    generation: u64,
}

impl Engine {
    /// Creates an empty engine.
    #[must_use]
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            buffer: Buffer::new(),
            generation: 0,
        }
    }

    /// Rebuilds an engine from a snapshot, keeping its generation.
    #[must_use]
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self {
            mode: snapshot.mode,
            buffer: Buffer::from_bytes(snapshot.data),
            generation: snapshot.generation,
        }
    }

    /// The fixed mode.
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Number of pending bytes.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Mutation counter; bumped by every non-empty write, successful
    /// read and replace.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Appends `data`. Text is not validated until read time.
    pub fn write(&mut self, data: &[u8]) {
        if data.is_empty() {
            return;
        }
        self.buffer.push(data);
        self.generation += 1;
    }

    /// Reads one element, or `Ok(None)` when none is complete yet.
    ///
    /// # Errors
    ///
    /// [`SessionError::ModeMismatch`] if `E` belongs to the other mode and
    /// [`SessionError::Decode`] if a text buffer is not valid UTF-8. The
    /// buffer is unchanged in every error case and when `Ok(None)` is
    /// returned.
    pub fn read<E: Element>(&mut self, read: Read<'_, E::Seq>) -> Result<Option<E>, SessionError> {
        self.check_mode(E::MODE)?;
        match self.apply(read)? {
            Some(bytes) => Ok(Some(E::from_bytes(bytes)?)),
            None => Ok(None),
        }
    }

    /// Measured read of `count` units.
    ///
    /// # Errors
    ///
    /// See [`Engine::read`].
    pub fn read_measured<E: Element>(&mut self, count: usize) -> Result<Option<E>, SessionError> {
        self.read::<E>(Read::Measured(count))
    }

    /// Terminated read.
    ///
    /// # Errors
    ///
    /// See [`Engine::read`].
    pub fn read_terminated<E: Element>(
        &mut self,
        terminator: &E::Seq,
        bounds: crate::Bounds,
    ) -> Result<Option<E>, SessionError> {
        self.read::<E>(Read::Terminated { terminator, bounds })
    }

    /// Enclosed read.
    ///
    /// # Errors
    ///
    /// See [`Engine::read`].
    pub fn read_enclosed<E: Element>(
        &mut self,
        left: &E::Seq,
        right: &E::Seq,
        bounds: crate::Bounds,
        nesting: crate::Nesting,
    ) -> Result<Option<E>, SessionError> {
        self.read::<E>(Read::Enclosed {
            left,
            right,
            bounds,
            nesting,
        })
    }

    /// Untyped read used by the session worker: `family` is the mode the
    /// caller's element type belongs to.
    pub(crate) fn read_op(
        &mut self,
        family: Mode,
        op: &ReadOp,
    ) -> Result<Option<Vec<u8>>, SessionError> {
        self.check_mode(family)?;
        match self.mode {
            Mode::Binary => Ok(self.apply::<[u8]>(op.as_read()?)?),
            Mode::Text => Ok(self.apply::<str>(op.as_read()?)?),
        }
    }

    /// Captures the current state.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            mode: self.mode,
            data: self.buffer.to_vec(),
            generation: self.generation,
        }
    }

    /// Consumes the engine, returning its state.
    #[must_use]
    pub fn into_snapshot(self) -> Snapshot {
        Snapshot {
            mode: self.mode,
            data: self.buffer.to_vec(),
            generation: self.generation,
        }
    }

    /// Swaps in `state`'s buffer if nothing changed since `expected`.
    ///
    /// # Errors
    ///
    /// [`SessionError::Conflict`] if the generation moved on and
    /// [`SessionError::ModeMismatch`] if `state` has the other mode. The
    /// current state is kept in both cases.
    pub fn replace(&mut self, expected: u64, state: Snapshot) -> Result<(), SessionError> {
        if self.generation != expected {
            return Err(SessionError::Conflict {
                expected,
                found: self.generation,
            });
        }
        self.check_mode(state.mode)?;
        self.buffer = Buffer::from_bytes(state.data);
        self.generation += 1;
        Ok(())
    }

    fn check_mode(&self, found: Mode) -> Result<(), SessionError> {
        if found == self.mode {
            Ok(())
        } else {
            Err(SessionError::ModeMismatch {
                expected: self.mode,
                found,
            })
        }
    }

    /// Materializes the buffer as `S`, scans it and commits the remainder.
    fn apply<S: Sequence + ?Sized>(
        &mut self,
        read: Read<'_, S>,
    ) -> Result<Option<Vec<u8>>, DecodeError> {
        let (matched, consumed) = {
            let seq = S::decode(self.buffer.contiguous())?;
            let Some(split) = scanner::scan(seq, read) else {
                log::trace!("no complete {:?}-unit element in {} bytes", S::UNIT, seq.len());
                return Ok(None);
            };
            (split.matched.as_bytes().to_vec(), split.consumed(seq))
        };
        log::trace!(
            "matched {:?}, consuming {consumed} of {} bytes",
            BStr::new(&matched),
            self.buffer.len()
        );
        self.buffer.consume(consumed);
        self.generation += 1;
        Ok(Some(matched))
    }
}

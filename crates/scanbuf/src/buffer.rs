#![expect(clippy::inline_always)]

use alloc::{collections::VecDeque, vec::Vec};

/// Ring of written but not yet consumed bytes.
///
/// Writes append at the back; successful reads drain from the front. The ring
/// is only made contiguous when a scan needs to look at it.
#[derive(Debug, Clone, Default)]
pub(crate) struct Buffer {
    pending: VecDeque<u8>,
}

impl Buffer {
    pub(crate) fn new() -> Self {
        Self {
            pending: VecDeque::new(),
        }
    }

    pub(crate) fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            pending: VecDeque::from(bytes),
        }
    }

    pub(crate) fn push(&mut self, bytes: &[u8]) {
        self.pending.extend(bytes.iter().copied());
    }

    #[inline(always)]
    pub(crate) fn len(&self) -> usize {
        self.pending.len()
    }

    /// All pending bytes as one slice, in write order.
    #[inline]
    pub(crate) fn contiguous(&mut self) -> &[u8] {
        self.pending.make_contiguous()
    }

    /// Drops `n` bytes from the front.
    #[inline]
    pub(crate) fn consume(&mut self, n: usize) {
        self.pending.drain(..n);
    }

    pub(crate) fn to_vec(&self) -> Vec<u8> {
        self.pending.iter().copied().collect()
    }
}

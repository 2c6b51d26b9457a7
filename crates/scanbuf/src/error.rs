use alloc::string::String;
use core::{str::Utf8Error, time::Duration};

use thiserror::Error;

use crate::mode::Mode;

/// Errors returned by session operations.
///
/// None of these leave the buffer modified.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// A mode name other than `binary` or `text`.
    #[error("invalid mode {0:?}, expected \"binary\" or \"text\"")]
    InvalidMode(String),
    /// A read whose element type belongs to the other mode.
    #[error("{found} read issued against a {expected} session")]
    ModeMismatch { expected: Mode, found: Mode },
    /// A text buffer that does not decode.
    #[error(transparent)]
    Decode(#[from] DecodeError),
    /// The session has stopped; no request can be served.
    #[error("session is stopped")]
    Stopped,
    /// No reply within the caller's timeout.
    #[error("no reply from session within {0:?}")]
    Timeout(Duration),
    /// A replace whose expected generation is stale.
    #[error("session changed since generation {expected} (now {found})")]
    Conflict { expected: u64, found: u64 },
    /// The worker thread could not be started.
    #[error("failed to spawn session worker: {0}")]
    Spawn(String),
}

/// The buffered bytes are not valid UTF-8.
///
/// When `incomplete` is set the invalid bytes are a truncated sequence at the
/// very end of the buffer, which more data may complete.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("buffer is not valid UTF-8 after {valid_up_to} bytes")]
pub struct DecodeError {
    /// Length of the longest valid prefix.
    pub valid_up_to: usize,
    /// Whether the invalid bytes are a truncated sequence at the end.
    pub incomplete: bool,
}

impl From<Utf8Error> for DecodeError {
    fn from(err: Utf8Error) -> Self {
        Self {
            valid_up_to: err.valid_up_to(),
            incomplete: err.error_len().is_none(),
        }
    }
}

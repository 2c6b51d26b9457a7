use alloc::string::String;
use core::time::Duration;

use crate::mode::Mode;

/// Configuration for a [`Session`](crate::Session).
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
///
/// use scanbuf::{Mode, Session, SessionOptions};
///
/// let session = Session::with_options(SessionOptions {
///     mode: Mode::Text,
///     timeout: Duration::from_secs(1),
///     ..Default::default()
/// })
/// .unwrap();
/// # session.stop().unwrap();
/// ```
///
/// # Default
///
/// Binary mode, a five second reply timeout and a generated thread name.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SessionOptions {
    /// How the buffer is interpreted. Fixed for the life of the session.
    ///
    /// # Default
    ///
    /// [`Mode::Binary`]
    pub mode: Mode,

    /// How long callers wait for a reply to reads, snapshots, replaces and
    /// stop.
    ///
    /// The timeout bounds the wait only. A scan already running inside the
    /// session is not interrupted, and its result is dropped if the caller has
    /// given up.
    ///
    /// # Default
    ///
    /// Five seconds.
    pub timeout: Duration,

    /// Name for the worker thread. When `None` the thread is named
    /// `scanbuf-session-<id>`.
    ///
    /// # Default
    ///
    /// `None`
    pub thread_name: Option<String>,
}

impl SessionOptions {
    /// Default reply timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

    /// Options for `mode` with everything else defaulted.
    #[must_use]
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            timeout: Self::DEFAULT_TIMEOUT,
            thread_name: None,
        }
    }
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;

    #[test]
    fn deserializes_with_defaults() {
        let options: SessionOptions = serde_json::from_str(r#"{"mode":"text"}"#).unwrap();
        assert_eq!(options, SessionOptions::new(Mode::Text));

        let options: SessionOptions =
            serde_json::from_str(r#"{"timeout":{"secs":2,"nanos":0},"thread_name":"rx"}"#)
                .unwrap();
        assert_eq!(options.mode, Mode::Binary);
        assert_eq!(options.timeout, Duration::from_secs(2));
        assert_eq!(options.thread_name.as_deref(), Some("rx"));
    }
}

use alloc::borrow::ToOwned;
use core::{fmt, str::FromStr};

use crate::error::SessionError;

/// How a session interprets its buffer. Fixed when the session starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Mode {
    /// Raw bytes; units are bytes.
    #[default]
    Binary,
    /// UTF-8 text; units are extended grapheme clusters.
    Text,
}

impl Mode {
    /// Lowercase name, as accepted by [`Mode::from_str`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Mode::Binary => "binary",
            Mode::Text => "text",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("binary") {
            Ok(Mode::Binary)
        } else if s.eq_ignore_ascii_case("text") {
            Ok(Mode::Text)
        } else {
            Err(SessionError::InvalidMode(s.to_owned()))
        }
    }
}

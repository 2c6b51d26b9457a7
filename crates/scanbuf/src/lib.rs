//! Pull complete elements out of an incrementally fed byte stream.
//!
//! Data arrives in arbitrary fragments (for example from a socket) and is
//! appended to a session's buffer. Each read either returns one whole element
//! and removes it from the buffer, or returns `None` and leaves the buffer
//! untouched, so a truncated element is never observed.
//!
//! ```rust
//! use scanbuf::{Bounds, Mode, Nesting, Session};
//!
//! let session = Session::start(Mode::Text).unwrap();
//! session.write("<e>foo</e").unwrap();
//! let element = session
//!     .read_enclosed::<String>("<e>", "</e>", Bounds::Inclusive, Nesting::Aware)
//!     .unwrap();
//! assert_eq!(element, None);
//!
//! session.write(">").unwrap();
//! let element = session
//!     .read_enclosed::<String>("<e>", "</e>", Bounds::Inclusive, Nesting::Aware)
//!     .unwrap();
//! assert_eq!(element.as_deref(), Some("<e>foo</e>"));
//! session.stop().unwrap();
//! ```
//!
//! Layers
//! - [`scanner`]: pure scan functions over `[u8]` and `str`.
//! - [`Engine`]: one buffer with a fixed [`Mode`], applying scans with
//!   all-or-nothing commits.
//! - [`Session`]: an engine owned by a worker thread behind a FIFO queue.
//! - `adapters` (feature `adapters`): bulk write, draining iterator and
//!   snapshot-based transactions.

extern crate alloc;

mod buffer;
mod chunk_utils;
mod element;
mod engine;
mod error;
mod mode;
mod options;
mod read;
mod session;
mod stream;

pub mod scanner;

#[cfg(feature = "adapters")]
pub mod adapters;


#[doc(hidden)]
pub use chunk_utils::{produce_chunks, produce_prefixes};
pub use element::Element;
pub use engine::{Engine, Snapshot};
pub use error::{DecodeError, SessionError};
pub use mode::Mode;
pub use options::SessionOptions;
pub use read::{Bounds, Nesting, Read};
pub use scanner::{Sequence, Split, Unit};
pub use session::Session;
pub use stream::ElementStream;

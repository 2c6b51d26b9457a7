//! Bulk write, bulk read and transactional helpers layered on the public
//! [`ElementStream`] contract.

use core::iter::FusedIterator;

use crate::{
    element::Element,
    engine::Engine,
    error::SessionError,
    read::Read,
    session::Session,
    stream::ElementStream,
};

/// Writes every chunk in order. Returns the number of bytes written.
///
/// # Errors
///
/// Stops at the first failed write.
pub fn write_all<S, I>(stream: &mut S, chunks: I) -> Result<usize, SessionError>
where
    S: ElementStream + ?Sized,
    I: IntoIterator,
    I::Item: AsRef<[u8]>,
{
    let mut written = 0;
    for chunk in chunks {
        let chunk = chunk.as_ref();
        stream.write(chunk)?;
        written += chunk.len();
    }
    Ok(written)
}

/// Iterator that repeats one read until nothing more comes out.
///
/// Iteration ends when the read yields no element or an empty element, or
/// after yielding the first error. An empty element that was produced by a
/// successful read (for example `between("<e>", "</e>")` over `<e></e>`) has
/// still been consumed from the buffer.
pub struct Drain<'s, 'r, S: ?Sized, E: Element> {
    stream: &'s mut S,
    read: Read<'r, E::Seq>,
    done: bool,
}

/// Drains every element `read` can currently produce from `stream`.
///
/// ```rust
/// use scanbuf::{Engine, Mode, Read, adapters::drain};
///
/// let mut engine = Engine::new(Mode::Text);
/// engine.write(b"one\ntwo\nthr");
/// let lines: Vec<String> = drain::<_, String>(&mut engine, Read::through("\n"))
///     .collect::<Result<_, _>>()
///     .unwrap();
/// assert_eq!(lines, ["one\n", "two\n"]);
/// assert_eq!(engine.pending(), 3);
/// ```
pub fn drain<'s, 'r, S, E>(stream: &'s mut S, read: Read<'r, E::Seq>) -> Drain<'s, 'r, S, E>
where
    S: ElementStream + ?Sized,
    E: Element,
{
    Drain {
        stream,
        read,
        done: false,
    }
}

impl<S: ElementStream + ?Sized, E: Element> Iterator for Drain<'_, '_, S, E> {
    type Item = Result<E, SessionError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.stream.read::<E>(self.read) {
            Ok(Some(element)) if !element.as_ref().is_empty() => Some(Ok(element)),
            Ok(_) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

impl<S: ElementStream + ?Sized, E: Element> FusedIterator for Drain<'_, '_, S, E> {}

/// Runs `f` against a scratch copy of the session's state and commits the
/// result only if `f` succeeds.
///
/// The scratch state is an [`Engine`] built from a snapshot. On `Ok` it
/// replaces the session's state, provided the session has not been modified
/// in the meantime; otherwise [`SessionError::Conflict`] is returned and the
/// session keeps the concurrent changes. On `Err` the scratch state is
/// discarded.
///
/// # Errors
///
/// Errors from `f`, and session errors from taking the snapshot or
/// committing.
pub fn transaction<T, Err, F>(session: &Session, f: F) -> Result<T, Err>
where
    F: FnOnce(&mut Engine) -> Result<T, Err>,
    Err: From<SessionError>,
{
    let snapshot = session.snapshot()?;
    let expected = snapshot.generation();
    let mut scratch = Engine::from_snapshot(snapshot);
    match f(&mut scratch) {
        Ok(value) => {
            session.replace(expected, scratch.into_snapshot())?;
            Ok(value)
        }
        Err(err) => {
            log::debug!("session {}: transaction discarded", session.id());
            Err(err)
        }
    }
}

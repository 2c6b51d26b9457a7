use crate::{
    element::Element,
    engine::Engine,
    error::SessionError,
    read::Read,
    session::Session,
};

/// The write/read contract shared by [`Session`] and [`Engine`].
///
/// Adapters are written against this trait so they work the same on a
/// threaded session and on a caller-owned engine.
pub trait ElementStream {
    /// Appends `data`.
    ///
    /// # Errors
    ///
    /// Implementation specific; a stopped session returns
    /// [`SessionError::Stopped`].
    fn write(&mut self, data: &[u8]) -> Result<(), SessionError>;

    /// Reads one element, or `Ok(None)` if none is complete yet.
    ///
    /// # Errors
    ///
    /// See [`Session::read`].
    fn read<E: Element>(&mut self, read: Read<'_, E::Seq>) -> Result<Option<E>, SessionError>;
}

impl ElementStream for Engine {
    #[inline]
    fn write(&mut self, data: &[u8]) -> Result<(), SessionError> {
        Engine::write(self, data);
        Ok(())
    }

    #[inline]
    fn read<E: Element>(&mut self, read: Read<'_, E::Seq>) -> Result<Option<E>, SessionError> {
        Engine::read(self, read)
    }
}

impl ElementStream for Session {
    #[inline]
    fn write(&mut self, data: &[u8]) -> Result<(), SessionError> {
        Session::write(self, data)
    }

    #[inline]
    fn read<E: Element>(&mut self, read: Read<'_, E::Seq>) -> Result<Option<E>, SessionError> {
        Session::read(self, read)
    }
}

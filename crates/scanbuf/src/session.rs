//! Session: a worker thread that owns one [`Engine`].
//!
//! Every operation on a session is a message on a single FIFO queue, so writes
//! and reads from any number of handles are applied one at a time in arrival
//! order. A read either commits a whole element or leaves the buffer exactly
//! as it was; no other request can observe the buffer mid-scan.
//!
//! Lifecycle
//! - `start` spawns the worker (`Created → Running`).
//! - `stop` asks the worker to exit and waits for the acknowledgement
//!   (`Running → Stopped`). The worker also exits once the last handle is
//!   dropped.
//! - Any operation after stop fails with [`SessionError::Stopped`].
//!
//! Timeouts
//! - Callers wait for replies at most [`SessionOptions::timeout`] (or the
//!   timeout given to [`Session::read_timeout`]). A timed-out request still
//!   runs inside the worker; only its reply is discarded.

use std::{
    sync::atomic::{AtomicU64, Ordering},
    thread,
    time::Duration,
};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};

use crate::{
    element::Element,
    engine::{Engine, Snapshot},
    error::SessionError,
    mode::Mode,
    options::SessionOptions,
    read::{Bounds, Nesting, Read, ReadOp},
};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

type Reply<T> = Sender<Result<T, SessionError>>;

enum Request {
    Write(Vec<u8>),
    Read {
        family: Mode,
        op: ReadOp,
        reply: Reply<Option<Vec<u8>>>,
    },
    Snapshot {
        reply: Reply<Snapshot>,
    },
    Replace {
        expected: u64,
        state: Snapshot,
        reply: Reply<()>,
    },
    Stop {
        reply: Reply<()>,
    },
}

/// Handle to a running session.
///
/// Handles are cheap to clone; all clones address the same buffer.
#[derive(Debug, Clone)]
pub struct Session {
    id: u64,
    mode: Mode,
    timeout: Duration,
    requests: Sender<Request>,
}

impl Session {
    /// Starts an empty session in `mode` with default options.
    ///
    /// # Errors
    ///
    /// [`SessionError::Spawn`] if the worker thread cannot be started.
    pub fn start(mode: Mode) -> Result<Self, SessionError> {
        Self::with_options(SessionOptions::new(mode))
    }

    /// Starts an empty session.
    ///
    /// # Errors
    ///
    /// [`SessionError::Spawn`] if the worker thread cannot be started.
    pub fn with_options(options: SessionOptions) -> Result<Self, SessionError> {
        let engine = Engine::new(options.mode);
        Self::spawn(engine, options)
    }

    /// Starts a session whose initial state is `snapshot`.
    ///
    /// # Errors
    ///
    /// [`SessionError::Spawn`] if the worker thread cannot be started.
    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self, SessionError> {
        let options = SessionOptions::new(snapshot.mode());
        Self::spawn(Engine::from_snapshot(snapshot), options)
    }

    fn spawn(engine: Engine, options: SessionOptions) -> Result<Self, SessionError> {
        let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
        let name = options
            .thread_name
            .unwrap_or_else(|| format!("scanbuf-session-{id}"));
        let (requests, inbox) = crossbeam_channel::unbounded();

        thread::Builder::new()
            .name(name)
            .spawn(move || run(id, engine, inbox))
            .map_err(|e| SessionError::Spawn(e.to_string()))?;

        log::debug!("session {id} started in {} mode", options.mode);
        Ok(Self {
            id,
            mode: options.mode,
            timeout: options.timeout,
            requests,
        })
    }

    /// The session's fixed mode.
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Process-unique identifier, as used in log messages.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Appends `data` to the buffer without waiting for the worker.
    ///
    /// # Errors
    ///
    /// [`SessionError::Stopped`] if the session has stopped.
    pub fn write(&self, data: impl AsRef<[u8]>) -> Result<(), SessionError> {
        self.requests
            .send(Request::Write(data.as_ref().to_vec()))
            .map_err(|_| SessionError::Stopped)
    }

    /// Reads one element using the session's default timeout.
    ///
    /// Returns `Ok(None)` when no complete element is buffered yet.
    ///
    /// # Errors
    ///
    /// [`SessionError::ModeMismatch`] if `E` belongs to the other mode,
    /// [`SessionError::Decode`] if a text buffer is not valid UTF-8,
    /// [`SessionError::Timeout`] or [`SessionError::Stopped`]. The buffer is
    /// unchanged whenever an error or `Ok(None)` is returned by the worker.
    pub fn read<E: Element>(&self, read: Read<'_, E::Seq>) -> Result<Option<E>, SessionError> {
        self.read_timeout(read, self.timeout)
    }

    /// Reads one element, waiting at most `timeout` for the reply.
    ///
    /// # Errors
    ///
    /// See [`Session::read`].
    pub fn read_timeout<E: Element>(
        &self,
        read: Read<'_, E::Seq>,
        timeout: Duration,
    ) -> Result<Option<E>, SessionError> {
        let op = ReadOp::from_read(read);
        let matched = self.call(timeout, |reply| Request::Read {
            family: E::MODE,
            op,
            reply,
        })?;
        match matched {
            Some(bytes) => Ok(Some(E::from_bytes(bytes)?)),
            None => Ok(None),
        }
    }

    /// Reads exactly `count` units: bytes for binary elements, grapheme
    /// clusters for text elements.
    ///
    /// # Errors
    ///
    /// See [`Session::read`].
    pub fn read_measured<E: Element>(&self, count: usize) -> Result<Option<E>, SessionError> {
        self.read::<E>(Read::Measured(count))
    }

    /// Reads up to the first `terminator`.
    ///
    /// # Errors
    ///
    /// See [`Session::read`].
    pub fn read_terminated<E: Element>(
        &self,
        terminator: &E::Seq,
        bounds: Bounds,
    ) -> Result<Option<E>, SessionError> {
        self.read::<E>(Read::Terminated { terminator, bounds })
    }

    /// Reads a `left ... right` element. The buffer must start with `left`.
    ///
    /// # Errors
    ///
    /// See [`Session::read`].
    pub fn read_enclosed<E: Element>(
        &self,
        left: &E::Seq,
        right: &E::Seq,
        bounds: Bounds,
        nesting: Nesting,
    ) -> Result<Option<E>, SessionError> {
        self.read::<E>(Read::Enclosed {
            left,
            right,
            bounds,
            nesting,
        })
    }

    /// Captures the current state.
    ///
    /// # Errors
    ///
    /// [`SessionError::Timeout`] or [`SessionError::Stopped`].
    pub fn snapshot(&self) -> Result<Snapshot, SessionError> {
        self.call(self.timeout, |reply| Request::Snapshot { reply })
    }

    /// Atomically replaces the state with `state` if the session's generation
    /// is still `expected`.
    ///
    /// # Errors
    ///
    /// [`SessionError::Conflict`] or [`SessionError::ModeMismatch`] leave the
    /// state untouched; [`SessionError::Timeout`] or
    /// [`SessionError::Stopped`] if no reply arrives.
    pub fn replace(&self, expected: u64, state: Snapshot) -> Result<(), SessionError> {
        self.call(self.timeout, |reply| Request::Replace {
            expected,
            state,
            reply,
        })
    }

    /// Stops the worker and discards the buffer.
    ///
    /// Requests queued before the stop are still served.
    ///
    /// # Errors
    ///
    /// [`SessionError::Stopped`] if the session was already stopped.
    pub fn stop(&self) -> Result<(), SessionError> {
        self.call(self.timeout, |reply| Request::Stop { reply })
    }

    fn call<T>(
        &self,
        timeout: Duration,
        request: impl FnOnce(Reply<T>) -> Request,
    ) -> Result<T, SessionError> {
        let (reply, response) = crossbeam_channel::bounded(1);
        self.requests
            .send(request(reply))
            .map_err(|_| SessionError::Stopped)?;
        match response.recv_timeout(timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => Err(SessionError::Timeout(timeout)),
            Err(RecvTimeoutError::Disconnected) => Err(SessionError::Stopped),
        }
    }
}

fn run(id: u64, mut engine: Engine, inbox: Receiver<Request>) {
    while let Ok(request) = inbox.recv() {
        match request {
            Request::Write(data) => engine.write(&data),
            Request::Read { family, op, reply } => {
                respond(id, &reply, engine.read_op(family, &op));
            }
            Request::Snapshot { reply } => respond(id, &reply, Ok(engine.snapshot())),
            Request::Replace {
                expected,
                state,
                reply,
            } => respond(id, &reply, engine.replace(expected, state)),
            Request::Stop { reply } => {
                // Close the queue before acknowledging so no later request is
                // accepted.
                drop(inbox);
                respond(id, &reply, Ok(()));
                log::debug!("session {id} stopped with {} bytes pending", engine.pending());
                return;
            }
        }
    }
    log::debug!("session {id} dropped by all handles");
}

fn respond<T>(id: u64, reply: &Reply<T>, result: Result<T, SessionError>) {
    if reply.send(result).is_err() {
        log::debug!("session {id}: caller gave up before the reply was ready");
    }
}

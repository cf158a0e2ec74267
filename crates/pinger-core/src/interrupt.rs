use crate::error::{IoError, IoOperation, Result};
use std::io::Write;
use std::os::fd::{AsFd, BorrowedFd};
use std::os::unix::net::UnixStream;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A cooperative termination request shared between a session and a signal handler.
///
/// Triggering the interrupt sets a flag and writes a single byte to a self-pipe.  The socket
/// transport waits on the read end of the pipe alongside the socket so that a blocked receive
/// wakes as soon as termination is requested.  The byte is never drained: once triggered every
/// subsequent wait returns immediately.
///
/// Cloning an `Interrupt` yields a handle to the same request.
#[derive(Debug, Clone)]
pub struct Interrupt {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    requested: AtomicBool,
    reader: UnixStream,
    writer: UnixStream,
}

impl Interrupt {
    /// Create a new, untriggered, `Interrupt`.
    pub fn new() -> Result<Self> {
        let (reader, writer) =
            UnixStream::pair().map_err(|err| IoError::Other(err, IoOperation::NewSelfPipe))?;
        for stream in [&reader, &writer] {
            stream
                .set_nonblocking(true)
                .map_err(|err| IoError::Other(err, IoOperation::SetNonBlocking))?;
        }
        Ok(Self {
            inner: Arc::new(Inner {
                requested: AtomicBool::new(false),
                reader,
                writer,
            }),
        })
    }

    /// Request termination.
    ///
    /// Returns `true` if termination had already been requested.
    pub fn trigger(&self) -> bool {
        let already_requested = self.inner.requested.swap(true, Ordering::SeqCst);
        if !already_requested {
            if let Err(err) = (&self.inner.writer).write_all(&[1]) {
                let err = IoError::Other(err, IoOperation::Wake);
                tracing::warn!(%err, "failed to wake receiver");
            }
        }
        already_requested
    }

    /// Has termination been requested?
    #[must_use]
    pub fn is_requested(&self) -> bool {
        self.inner.requested.load(Ordering::SeqCst)
    }

    /// The descriptor which becomes readable once the interrupt is triggered.
    pub(crate) fn as_fd(&self) -> BorrowedFd<'_> {
        self.inner.reader.as_fd()
    }
}

use std::io::{self, ErrorKind, Read, Write};
use std::time::{Duration, Instant};

use tracing::trace;

use crate::error::{Result, TransportError};
use crate::traits::Transport;

/// Streams whose blocking reads can be bounded per call.
///
/// [`StreamTransport`] sets the time left on the exchange deadline before
/// every `read`, so a silent peer costs at most the caller's timeout. The
/// setting is left in place after the call returns.
pub trait TimeoutControl {
    /// Bound the next blocking read to `remaining`, which is never zero.
    fn set_read_deadline(&mut self, remaining: Duration) -> io::Result<()>;
}

#[cfg(unix)]
impl TimeoutControl for std::os::unix::net::UnixStream {
    fn set_read_deadline(&mut self, remaining: Duration) -> io::Result<()> {
        self.set_read_timeout(Some(remaining))
    }
}

impl TimeoutControl for std::net::TcpStream {
    fn set_read_deadline(&mut self, remaining: Duration) -> io::Result<()> {
        self.set_read_timeout(Some(remaining))
    }
}

/// Adapts a blocking `Read + Write` stream to [`Transport`].
///
/// The per-call timeout is applied to the stream through [`TimeoutControl`]
/// before each read and enforced across partial reads. `TimedOut` and
/// `WouldBlock` map to [`TransportError::Timeout`].
pub struct StreamTransport<T> {
    inner: T,
}

impl<T: Read + Write + TimeoutControl> StreamTransport<T> {
    /// Wrap a stream.
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the adapter and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: Read + Write + TimeoutControl> Transport for StreamTransport<T> {
    fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        let mut offset = 0usize;
        while offset < bytes.len() {
            match self.inner.write(&bytes[offset..]) {
                Ok(0) => {
                    return Err(TransportError::Io(std::io::Error::from(
                        ErrorKind::WriteZero,
                    )))
                }
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(TransportError::Io(err)),
            }
        }

        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(TransportError::Io(err)),
            }
        }
    }

    fn read_exact(&mut self, n: usize, timeout: Duration) -> Result<Vec<u8>> {
        read_with_deadline(&mut self.inner, n, timeout)
    }
}

/// Read exactly `n` bytes from `reader`, bounded by `timeout`.
pub(crate) fn read_with_deadline<R: Read + TimeoutControl + ?Sized>(
    reader: &mut R,
    n: usize,
    timeout: Duration,
) -> Result<Vec<u8>> {
    let started = Instant::now();
    let mut buf = vec![0u8; n];
    let mut received = 0usize;

    while received < n {
        let remaining = timeout.saturating_sub(started.elapsed());
        if remaining.is_zero() {
            return Err(TransportError::Timeout {
                expected: n,
                received,
                timeout,
            });
        }
        reader.set_read_deadline(remaining)?;

        match reader.read(&mut buf[received..]) {
            Ok(0) => {
                return Err(TransportError::Closed {
                    expected: n,
                    received,
                })
            }
            Ok(read) => {
                received += read;
                trace!(read, received, expected = n, "partial read");
            }
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) if matches!(err.kind(), ErrorKind::TimedOut | ErrorKind::WouldBlock) => {
                return Err(TransportError::Timeout {
                    expected: n,
                    received,
                    timeout,
                })
            }
            Err(err) => return Err(TransportError::Io(err)),
        }
    }

    Ok(buf)
}

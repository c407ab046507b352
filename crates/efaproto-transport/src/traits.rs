use std::time::Duration;

use crate::error::Result;

/// A half-duplex byte link to the focuser.
///
/// Implementations deliver bytes in order with no reframing and must not
/// buffer across exchanges beyond what the OS does.
pub trait Transport {
    /// Write the whole buffer, blocking until it has been handed to the link.
    fn write_all(&mut self, bytes: &[u8]) -> Result<()>;

    /// Read exactly `n` bytes, failing with `TransportError::Timeout` if they
    /// do not all arrive within `timeout`.
    fn read_exact(&mut self, n: usize, timeout: Duration) -> Result<Vec<u8>>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        (**self).write_all(bytes)
    }

    fn read_exact(&mut self, n: usize, timeout: Duration) -> Result<Vec<u8>> {
        (**self).read_exact(n, timeout)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        (**self).write_all(bytes)
    }

    fn read_exact(&mut self, n: usize, timeout: Duration) -> Result<Vec<u8>> {
        (**self).read_exact(n, timeout)
    }
}

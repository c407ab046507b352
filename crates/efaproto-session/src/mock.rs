use std::collections::VecDeque;
use std::time::Duration;

use efaproto_frame::{Frame, DEVICE_PC};
use efaproto_transport::{Transport, TransportError};

/// Transport that records requests and plays back queued replies.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    pub writes: Vec<Vec<u8>>,
    pub reads: Vec<usize>,
    replies: VecDeque<Result<Vec<u8>, TransportError>>,
    pub fail_writes: bool,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a well-formed reply from `device` to the PC.
    pub fn reply(&mut self, device: u8, command: u8, payload: &[u8]) -> &mut Self {
        let frame = Frame::new(device, DEVICE_PC, command, payload.to_vec());
        self.replies.push_back(Ok(frame.to_bytes().to_vec()));
        self
    }

    /// Queue raw reply bytes.
    pub fn raw(&mut self, bytes: Vec<u8>) -> &mut Self {
        self.replies.push_back(Ok(bytes));
        self
    }

    /// Queue a read timeout.
    pub fn timeout(&mut self) -> &mut Self {
        self.replies.push_back(Err(TransportError::Timeout {
            expected: 0,
            received: 0,
            timeout: Duration::from_secs(3),
        }));
        self
    }

    pub fn pending(&self) -> usize {
        self.replies.len()
    }
}

impl Transport for ScriptedTransport {
    fn write_all(&mut self, bytes: &[u8]) -> efaproto_transport::Result<()> {
        if self.fail_writes {
            return Err(TransportError::Io(std::io::Error::from(
                std::io::ErrorKind::BrokenPipe,
            )));
        }
        self.writes.push(bytes.to_vec());
        Ok(())
    }

    fn read_exact(&mut self, n: usize, _timeout: Duration) -> efaproto_transport::Result<Vec<u8>> {
        self.reads.push(n);
        self.replies.pop_front().unwrap_or(Err(TransportError::Timeout {
            expected: n,
            received: 0,
            timeout: Duration::from_secs(3),
        }))
    }
}

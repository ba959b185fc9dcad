//! Scripted in-memory transport for exercising the session engine.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::Transport;
use crate::error::{Result, TransportError};

/// One scripted outcome of a `read_chunk` call.
#[derive(Debug, Clone)]
pub(crate) enum Step {
    /// Return this text immediately.
    Chunk(String),
    /// Nothing arrives; the read waits out its full timeout.
    Silence,
    /// The peer drops the connection.
    Drop,
}

impl Step {
    pub(crate) fn chunk(text: &str) -> Self {
        Step::Chunk(text.to_string())
    }
}

/// What the transport saw, shared with the test after the session takes
/// ownership of the transport.
#[derive(Debug, Default)]
pub(crate) struct Recording {
    pub(crate) reads: usize,
    pub(crate) timeouts: Vec<Duration>,
    pub(crate) writes: Vec<String>,
    pub(crate) close_calls: usize,
}

/// Transport that replays a fixed script of reads.
///
/// Once the script runs out every read is silent.
pub(crate) struct ScriptedTransport {
    script: VecDeque<Step>,
    recording: Arc<Mutex<Recording>>,
    connected: bool,
    fail_close: bool,
}

impl ScriptedTransport {
    pub(crate) fn new(script: Vec<Step>) -> (Self, Arc<Mutex<Recording>>) {
        let recording = Arc::new(Mutex::new(Recording::default()));
        let transport = Self {
            script: script.into(),
            recording: recording.clone(),
            connected: true,
            fail_close: false,
        };
        (transport, recording)
    }

    /// Transport that reports itself as not connected from the start.
    pub(crate) fn unconnected() -> (Self, Arc<Mutex<Recording>>) {
        let (mut transport, recording) = Self::new(vec![]);
        transport.connected = false;
        (transport, recording)
    }

    /// Make `close` return an error.
    pub(crate) fn failing_close(mut self) -> Self {
        self.fail_close = true;
        self
    }
}

impl Transport for ScriptedTransport {
    async fn read_chunk(&mut self, timeout: Duration) -> Result<String> {
        if !self.connected {
            return Err(TransportError::NotConnected.into());
        }
        {
            let mut rec = self.recording.lock().unwrap();
            rec.reads += 1;
            rec.timeouts.push(timeout);
        }
        match self.script.pop_front().unwrap_or(Step::Silence) {
            Step::Chunk(text) => {
                tokio::task::yield_now().await;
                Ok(text)
            }
            Step::Silence => {
                tokio::time::sleep(timeout).await;
                Ok(String::new())
            }
            Step::Drop => {
                self.connected = false;
                Err(TransportError::Disconnected.into())
            }
        }
    }

    async fn write_line(&mut self, line: &str) -> Result<()> {
        if !self.connected {
            return Err(TransportError::NotConnected.into());
        }
        self.recording.lock().unwrap().writes.push(line.to_string());
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        self.recording.lock().unwrap().close_calls += 1;
        let was_connected = std::mem::replace(&mut self.connected, false);
        if self.fail_close && was_connected {
            return Err(TransportError::Io(std::io::Error::other("reset by peer")).into());
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}

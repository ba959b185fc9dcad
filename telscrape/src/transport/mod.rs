//! Telnet transport layer.
//!
//! This module provides the raw line-oriented stream to the device:
//! connection setup, bounded chunk reads, line writes and close.

mod ansi;
pub mod config;
mod telnet;

#[cfg(test)]
pub(crate) mod mock;

pub use config::TelnetConfig;
pub use telnet::TelnetTransport;

use std::future::Future;
use std::time::Duration;

use crate::error::Result;

/// A connected, line-oriented byte stream to a device.
///
/// Implementations own the underlying connection exclusively. Reads are
/// bounded: `read_chunk` returns whatever text arrived before `timeout`
/// expired, which may be nothing at all.
pub trait Transport: Send {
    /// Read the next chunk of text, waiting at most `timeout`.
    ///
    /// An empty string means nothing arrived in time; that is not an error.
    fn read_chunk(&mut self, timeout: Duration) -> impl Future<Output = Result<String>> + Send;

    /// Write `line` followed by a line terminator.
    fn write_line(&mut self, line: &str) -> impl Future<Output = Result<()>> + Send;

    /// Close the connection. Closing twice is a no-op.
    fn close(&mut self) -> impl Future<Output = Result<()>> + Send;

    /// Whether the connection is still usable.
    fn is_connected(&self) -> bool;
}

//! Builder for creating device sessions.

use std::time::Duration;

use super::handshake::HandshakeTimeouts;
use super::session::{Session, SessionConfig};
use crate::channel::PollSchedule;
use crate::error::Result;
use crate::settings::Settings;

/// Builder for constructing device sessions.
///
/// # Example
///
/// ```rust,no_run
/// use telscrape::{Credentials, SessionBuilder};
///
/// # async fn example() -> Result<(), telscrape::Error> {
/// let mut session = SessionBuilder::new("192.168.1.1")
///     .port(23)
///     .build();
///
/// session.connect(&Credentials::new("admin", "secret")).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SessionBuilder {
    config: SessionConfig,
}

impl SessionBuilder {
    /// Create a new session builder for the specified host.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            config: SessionConfig::new(host),
        }
    }

    /// Create a builder for the device named in `settings`.
    ///
    /// Fails if any settings field is empty.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        settings.validate()?;
        Ok(Self::new(settings.switch_ip.trim()))
    }

    /// Set the Telnet port (default: 23).
    pub fn port(mut self, port: u16) -> Self {
        self.config.telnet.port = port;
        self
    }

    /// Set the TCP connect timeout (default: 10 s).
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.telnet.connect_timeout = timeout;
        self
    }

    /// Set the quiet gap that ends a chunk read (default: 100 ms).
    pub fn read_settle(mut self, settle: Duration) -> Self {
        self.config.telnet.settle = settle;
        self
    }

    /// Set the per-step handshake timeouts.
    pub fn handshake_timeouts(mut self, timeouts: HandshakeTimeouts) -> Self {
        self.config.handshake = timeouts;
        self
    }

    /// Set the command cycle poll schedule.
    pub fn poll_schedule(mut self, schedule: PollSchedule) -> Self {
        self.config.schedule = schedule;
        self
    }

    /// Set the pause between the two commands of a subscriber lookup.
    pub fn settle_pause(mut self, pause: Duration) -> Self {
        self.config.settle_pause = pause;
        self
    }

    /// Set a fixed end-of-output marker instead of the prompt learned at
    /// login.
    pub fn marker(mut self, marker: impl Into<String>) -> Self {
        self.config.marker = Some(marker.into());
        self
    }

    /// Get the configuration built so far.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Build the session.
    ///
    /// This creates the session but does not connect. Call `connect()` on
    /// the returned session to open the connection and log in.
    pub fn build(self) -> Session {
        Session::new(self.config)
    }
}

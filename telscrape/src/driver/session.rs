//! Session lifecycle: connect, authenticate, query, disconnect.

use std::time::Duration;

use log::{debug, info, warn};
use tokio::time::Instant;

use super::handshake::{Credentials, Handshake, HandshakeTimeouts};
use super::response::Response;
use crate::channel::{PollSchedule, ResponseCollector};
use crate::error::{Result, SessionError, TransportError};
use crate::parser::{self, SubscriberRecord};
use crate::transport::{TelnetConfig, TelnetTransport, Transport};
use crate::vendor::VendorLookup;

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No transport held.
    Disconnected,
    /// Transport open, login not yet complete.
    Connected,
    /// Logged in; commands may be sent.
    Authenticated,
}

/// Session tuning.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Telnet connection settings.
    pub telnet: TelnetConfig,

    /// Per-step handshake read ceilings.
    pub handshake: HandshakeTimeouts,

    /// Command cycle poll schedule.
    pub schedule: PollSchedule,

    /// Pause before the second command of a subscriber lookup.
    pub settle_pause: Duration,

    /// End-of-output marker. When unset, the prompt seen at login is used.
    pub marker: Option<String>,
}

impl SessionConfig {
    /// Create a configuration for `host` with default timings.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            telnet: TelnetConfig::new(host),
            handshake: HandshakeTimeouts::default(),
            schedule: PollSchedule::default(),
            settle_pause: Duration::from_millis(500),
            marker: None,
        }
    }
}

/// An interactive CLI session with one device.
///
/// All operations take `&mut self`, so commands on a session are strictly
/// sequential. Any hard failure closes the transport and leaves the session
/// [`Disconnected`](SessionState::Disconnected) before the error is
/// returned; callers never need a defensive `disconnect()`.
pub struct Session<T = TelnetTransport> {
    /// Configuration.
    config: SessionConfig,

    /// Transport (None when disconnected).
    transport: Option<T>,

    /// Lifecycle state.
    state: SessionState,

    /// Marker in effect for the current connection.
    marker: Option<String>,

    /// Command cycle collector.
    collector: ResponseCollector,
}

impl<T> Session<T> {
    /// Create a disconnected session.
    pub fn new(config: SessionConfig) -> Self {
        let collector = ResponseCollector::new(config.schedule);
        Self {
            config,
            transport: None,
            state: SessionState::Disconnected,
            marker: None,
            collector,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Whether commands may be sent.
    pub fn is_authenticated(&self) -> bool {
        self.state == SessionState::Authenticated
    }

    /// Marker used to detect the end of command output, once logged in.
    pub fn marker(&self) -> Option<&str> {
        self.marker.as_deref()
    }

    /// Get the configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }
}

impl Session<TelnetTransport> {
    /// Connect to the configured host and log in.
    pub async fn connect(&mut self, credentials: &Credentials) -> Result<()> {
        if self.transport.is_some() {
            return Err(SessionError::AlreadyConnected.into());
        }

        let transport = match TelnetTransport::connect(self.config.telnet.clone()).await {
            Ok(transport) => transport,
            Err(e) => {
                warn!("Connection failed: {}", e);
                self.reset();
                return Err(e);
            }
        };

        self.attach(transport, credentials).await
    }
}

impl<T: Transport> Session<T> {
    /// Log in over an already connected transport.
    ///
    /// The session takes ownership of the transport. On failure the
    /// transport is closed and the session is left disconnected.
    pub async fn attach(&mut self, mut transport: T, credentials: &Credentials) -> Result<()> {
        if self.transport.is_some() {
            return Err(SessionError::AlreadyConnected.into());
        }

        if !transport.is_connected() {
            warn!("Transport reported not connected");
            if let Err(e) = transport.close().await {
                warn!("Close of unconnected transport failed: {}", e);
            }
            self.reset();
            return Err(TransportError::NotConnected.into());
        }

        self.transport = Some(transport);
        self.state = SessionState::Connected;
        debug!("Connected, starting login as {}", credentials.username());

        let handshake = Handshake::new(credentials, self.config.handshake);
        let result = match self.transport.as_mut() {
            Some(transport) => handshake.run(transport).await,
            None => Err(SessionError::NotConnected.into()),
        };

        match result {
            Ok(prompt) => {
                self.marker = Some(self.config.marker.clone().unwrap_or(prompt));
                self.state = SessionState::Authenticated;
                Ok(())
            }
            Err(e) => {
                self.force_disconnect().await;
                Err(e)
            }
        }
    }

    /// Close the transport and reset to disconnected.
    ///
    /// Safe to call any number of times. If closing fails the error is
    /// returned, but the session is disconnected regardless.
    pub async fn disconnect(&mut self) -> Result<()> {
        let transport = self.transport.take();
        self.reset();

        if let Some(mut transport) = transport {
            transport.close().await?;
            info!("Disconnected");
        }
        Ok(())
    }

    /// Send a command followed by a blank line and collect its output.
    pub async fn send_command(&mut self, command: &str) -> Result<Response> {
        let result = self.exchange(command).await;
        self.fail_closed(result).await
    }

    /// Look up a subscriber by login.
    ///
    /// Returns `Ok(None)` if the device lists no session for `login`.
    pub async fn query_subscriber(&mut self, login: &str) -> Result<Option<SubscriberRecord>> {
        let result = self.lookup(login).await;
        self.fail_closed(result).await
    }

    /// Look up a subscriber and resolve the vendor of its MAC address.
    pub async fn check_authorization<V: VendorLookup>(
        &mut self,
        login: &str,
        vendors: &V,
    ) -> Result<Option<SubscriberRecord>> {
        let mut record = self.query_subscriber(login).await?;
        if let Some(record) = record.as_mut() {
            if let Some(mac) = record.mac_address {
                let vendor = vendors.lookup(&mac).await;
                debug!("Vendor for {}: {}", mac, vendor);
                record.vendor = Some(vendor);
            }
        }
        Ok(record)
    }

    async fn lookup(&mut self, login: &str) -> Result<Option<SubscriberRecord>> {
        self.ensure_authenticated()?;

        let login = login.trim();
        if login.is_empty() {
            warn!("Login field is empty");
            return Err(SessionError::InvalidArgument {
                message: "login is empty".into(),
            }
            .into());
        }

        let response = self.exchange(&parser::subscriber_command(login)).await?;
        let Some(record) = parser::parse_subscriber(&response.result) else {
            return Ok(None);
        };

        tokio::time::sleep(self.config.settle_pause).await;

        let response = self
            .exchange(&parser::pppoe_command(&record.interface))
            .await?;
        Ok(Some(parser::parse_pppoe_detail(record, &response.result)))
    }

    async fn exchange(&mut self, command: &str) -> Result<Response> {
        self.ensure_authenticated()?;
        let (Some(transport), Some(marker)) = (self.transport.as_mut(), self.marker.as_deref())
        else {
            return Err(SessionError::NotConnected.into());
        };

        let start = Instant::now();
        debug!("Sending command: {}", command);
        transport.write_line(command).await?;
        transport.write_line("").await?;

        let result = self.collector.collect(transport, marker).await?;
        debug!("Full response: {}", result);

        Ok(Response::new(command, result, start.elapsed()))
    }

    fn ensure_authenticated(&self) -> Result<()> {
        if self.state != SessionState::Authenticated || self.transport.is_none() {
            warn!("Not connected to the device");
            return Err(SessionError::NotConnected.into());
        }
        Ok(())
    }

    /// Tear the session down if `result` is a hard failure.
    async fn fail_closed<R>(&mut self, result: Result<R>) -> Result<R> {
        if let Err(e) = &result {
            if e.forces_disconnect() {
                warn!("{}; disconnecting", e);
                self.force_disconnect().await;
            }
        }
        result
    }

    async fn force_disconnect(&mut self) {
        if let Err(e) = self.disconnect().await {
            warn!("Error while disconnecting: {}", e);
        }
    }
}

impl<T> Session<T> {
    fn reset(&mut self) {
        self.state = SessionState::Disconnected;
        self.marker = None;
    }
}

impl<T> Drop for Session<T> {
    fn drop(&mut self) {
        if self.transport.is_some() {
            warn!("Session dropped while connected; call disconnect() to close cleanly");
        }
    }
}

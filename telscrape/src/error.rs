//! Error types for telscrape.

use std::fmt;
use std::io;
use std::time::Duration;

use thiserror::Error;

/// Main error type for telscrape operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Telnet transport-level errors
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Login/password exchange errors
    #[error("Handshake error: {0}")]
    Handshake(#[from] HandshakeError),

    /// Command/response cycle errors
    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    /// Session lifecycle errors
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Settings errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

impl Error {
    /// Whether this error tears the session down.
    ///
    /// Every failure of a session operation does, except a second connect
    /// on a live session and settings errors, which never reach a session.
    pub fn forces_disconnect(&self) -> bool {
        !matches!(
            self,
            Error::Session(SessionError::AlreadyConnected) | Error::Config(_)
        )
    }

    /// Whether the transport could not be established.
    pub fn is_connection_failure(&self) -> bool {
        matches!(
            self,
            Error::Transport(
                TransportError::ConnectionFailed { .. }
                    | TransportError::Timeout(_)
                    | TransportError::NotConnected
            )
        )
    }
}

/// Transport layer errors (TCP connection, stream I/O).
#[derive(Error, Debug)]
pub enum TransportError {
    /// Failed to connect to host
    #[error("Connection failed to {host}:{port}: {source}")]
    ConnectionFailed {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },

    /// Connect timed out
    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),

    /// Transport reported itself as not connected
    #[error("Transport not connected")]
    NotConnected,

    /// Peer closed the connection
    #[error("Connection disconnected")]
    Disconnected,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Step of the login exchange that was waiting for a prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeStep {
    Login,
    Password,
}

impl fmt::Display for HandshakeStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandshakeStep::Login => f.write_str("login"),
            HandshakeStep::Password => f.write_str("password"),
        }
    }
}

/// Login/password exchange errors.
#[derive(Error, Debug)]
pub enum HandshakeError {
    /// The expected prompt did not arrive within the step's time budget
    #[error("{step} prompt not received, expected '{expected}'")]
    PromptMismatch {
        step: HandshakeStep,
        expected: String,
    },

    /// No shell prompt after the credentials were sent
    #[error("Login failed: no shell prompt after sending credentials")]
    LoginFailed,
}

/// Command/response cycle errors.
#[derive(Error, Debug)]
pub enum ChannelError {
    /// Not a single byte arrived during a whole command cycle
    #[error("No response received after {attempts} poll attempts")]
    NoResponse { attempts: usize },
}

/// Session lifecycle errors.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Query attempted while not authenticated
    #[error("Session not connected - call connect() first")]
    NotConnected,

    /// Session already holds a transport
    #[error("Session already connected")]
    AlreadyConnected,

    /// Caller passed an unusable argument
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },
}

/// Settings errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required settings field is empty
    #[error("Invalid configuration: '{field}' is empty")]
    MissingField { field: &'static str },
}

/// Result type alias using telscrape's Error.
pub type Result<T> = std::result::Result<T, Error>;

//! Telnet transport over a tokio byte stream.
//!
//! Option negotiation is refused outright: every `DO` is answered with
//! `WONT` and every `WILL` with `DONT`, leaving a bare NVT line stream.

use std::time::Duration;

use bytes::{BufMut, BytesMut};
use log::{debug, info, trace, warn};
use memchr::memchr;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::{Instant, timeout_at};

use super::Transport;
use super::ansi::AnsiStripper;
use super::config::TelnetConfig;
use crate::error::{Result, TransportError};
use crate::hexdump;

const IAC: u8 = 255;
const DONT: u8 = 254;
const DO: u8 = 253;
const WONT: u8 = 252;
const WILL: u8 = 251;
const SB: u8 = 250;
const SE: u8 = 240;

const LINE_TERMINATOR: &str = "\r\n";

/// Telnet transport wrapping a byte stream (a `TcpStream` in production).
pub struct TelnetTransport<S = TcpStream> {
    /// The stream (None once closed).
    stream: Option<S>,

    /// Configuration used for this connection.
    config: TelnetConfig,

    /// Telnet command decoder state carried between reads.
    decoder: TelnetDecoder,

    /// ANSI stripper state carried between reads.
    ansi: AnsiStripper,

    /// Peer sent EOF.
    eof: bool,
}

impl TelnetTransport<TcpStream> {
    /// Open a TCP connection to the configured host.
    pub async fn connect(config: TelnetConfig) -> Result<Self> {
        let addr = config.socket_addr();
        info!("Attempting to connect to {}", addr);

        let stream = tokio::time::timeout(
            config.connect_timeout,
            TcpStream::connect((config.host.as_str(), config.port)),
        )
        .await
        .map_err(|_| TransportError::Timeout(config.connect_timeout))?
        .map_err(|source| TransportError::ConnectionFailed {
            host: config.host.clone(),
            port: config.port,
            source,
        })?;

        stream.set_nodelay(true).map_err(TransportError::Io)?;
        info!("Connected to {}", addr);

        Ok(Self::from_stream(stream, config))
    }
}

impl<S> TelnetTransport<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    /// Wrap an already connected stream.
    pub fn from_stream(stream: S, config: TelnetConfig) -> Self {
        Self {
            stream: Some(stream),
            config,
            decoder: TelnetDecoder::default(),
            ansi: AnsiStripper::new(),
            eof: false,
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &TelnetConfig {
        &self.config
    }
}

impl<S> Transport for TelnetTransport<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    async fn read_chunk(&mut self, timeout: Duration) -> Result<String> {
        if self.eof {
            return Err(TransportError::Disconnected.into());
        }
        let stream = self.stream.as_mut().ok_or(TransportError::NotConnected)?;

        let deadline = Instant::now() + timeout;
        let mut window = deadline;
        let mut buf = [0u8; 4096];
        let mut raw = BytesMut::new();
        let mut payload = BytesMut::new();
        let mut replies = BytesMut::new();

        loop {
            match timeout_at(window, stream.read(&mut buf)).await {
                Err(_) => break,
                Ok(Ok(0)) => {
                    debug!("Peer closed the connection");
                    self.eof = true;
                    if payload.is_empty() {
                        return Err(TransportError::Disconnected.into());
                    }
                    break;
                }
                Ok(Ok(n)) => {
                    raw.extend_from_slice(&buf[..n]);
                    self.decoder.decode(&buf[..n], &mut payload, &mut replies);
                    if !replies.is_empty() {
                        trace!("Refusing telnet options: {}", hexdump::HexDump(&replies[..]));
                        timeout_at(deadline, stream.write_all(&replies))
                            .await
                            .map_err(|_| TransportError::Timeout(timeout))?
                            .map_err(TransportError::Io)?;
                        replies.clear();
                    }
                    // Negotiation alone does not start the settle window.
                    if !payload.is_empty() {
                        window = deadline.min(Instant::now() + self.config.settle);
                    }
                }
                Ok(Err(e)) => return Err(TransportError::Io(e).into()),
            }
        }

        if raw.is_empty() {
            return Ok(String::new());
        }

        hexdump::log_raw(&raw);
        let text = self.ansi.strip(&payload);
        debug!("Received: {}", text.trim());
        Ok(text)
    }

    async fn write_line(&mut self, line: &str) -> Result<()> {
        let stream = self.stream.as_mut().ok_or(TransportError::NotConnected)?;

        let mut data = BytesMut::with_capacity(line.len() + LINE_TERMINATOR.len());
        data.extend_from_slice(line.as_bytes());
        data.extend_from_slice(LINE_TERMINATOR.as_bytes());

        stream.write_all(&data).await.map_err(TransportError::Io)?;
        stream.flush().await.map_err(TransportError::Io)?;
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(mut stream) = self.stream.take() {
            self.decoder = TelnetDecoder::default();
            self.ansi.reset();
            if let Err(e) = stream.shutdown().await {
                // The peer may already be gone; the stream is dropped either way.
                if !self.eof {
                    return Err(TransportError::Io(e).into());
                }
                warn!("Shutdown after peer close failed: {}", e);
            }
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.stream.is_some() && !self.eof
    }
}

/// Decoder position within the Telnet command grammar.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
enum DecodeState {
    #[default]
    Data,
    Iac,
    Negotiate(u8),
    Sub,
    SubIac,
}

/// Separates payload bytes from Telnet commands.
///
/// State survives across calls so commands split over two reads are
/// handled.
#[derive(Debug, Default)]
pub(crate) struct TelnetDecoder {
    state: DecodeState,
}

impl TelnetDecoder {
    /// Decode `input`, appending data bytes to `payload` and any
    /// option refusals to `replies`.
    pub(crate) fn decode(&mut self, input: &[u8], payload: &mut BytesMut, replies: &mut BytesMut) {
        let mut rest = input;
        while !rest.is_empty() {
            if self.state == DecodeState::Data {
                match memchr(IAC, rest) {
                    Some(pos) => {
                        payload.extend_from_slice(&rest[..pos]);
                        self.state = DecodeState::Iac;
                        rest = &rest[pos + 1..];
                    }
                    None => {
                        payload.extend_from_slice(rest);
                        rest = &[];
                    }
                }
                continue;
            }

            let byte = rest[0];
            rest = &rest[1..];
            self.state = match (self.state, byte) {
                (DecodeState::Iac, IAC) => {
                    payload.put_u8(IAC);
                    DecodeState::Data
                }
                (DecodeState::Iac, DO | DONT | WILL | WONT) => DecodeState::Negotiate(byte),
                (DecodeState::Iac, SB) => DecodeState::Sub,
                (DecodeState::Iac, _) => DecodeState::Data,
                (DecodeState::Negotiate(command), option) => {
                    match command {
                        DO => replies.extend_from_slice(&[IAC, WONT, option]),
                        WILL => replies.extend_from_slice(&[IAC, DONT, option]),
                        _ => {}
                    }
                    DecodeState::Data
                }
                (DecodeState::Sub, IAC) => DecodeState::SubIac,
                (DecodeState::Sub, _) => DecodeState::Sub,
                (DecodeState::SubIac, SE) => DecodeState::Data,
                (DecodeState::SubIac, _) => DecodeState::Sub,
                (DecodeState::Data, _) => {
                    payload.put_u8(byte);
                    DecodeState::Data
                }
            };
        }
    }
}

//! High-level session API for device interaction.
//!
//! The driver layer logs in over a transport, runs command cycles and
//! turns their output into subscriber records.

mod builder;
mod handshake;
pub(crate) mod response;
mod session;

pub use builder::SessionBuilder;
pub use handshake::{Credentials, Handshake, HandshakeTimeouts};
pub use response::Response;
pub use session::{Session, SessionConfig, SessionState};

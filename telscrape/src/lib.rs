//! # Telscrape
//!
//! Async Telnet CLI scraper for subscriber lookups on network devices.
//!
//! Telscrape logs in to a device over Telnet, runs CLI commands with a
//! bounded polling read loop, and extracts PPPoE subscriber details
//! (interface, IP address, remote MAC address and session uptime) from
//! the output.
//!
//! ## Features
//!
//! - Async Telnet transport via tokio, with option negotiation refused and
//!   ANSI escapes stripped
//! - Login handshake with configurable prompts
//! - End-of-output detection keyed on the prompt learned at login
//! - Fail-closed sessions: any hard failure disconnects
//! - Pluggable MAC vendor lookup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use telscrape::{Credentials, SessionBuilder};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), telscrape::Error> {
//!     let mut session = SessionBuilder::new("192.168.1.1").build();
//!
//!     session
//!         .connect(&Credentials::new("admin", "secret").with_prompts("login:", "Password:"))
//!         .await?;
//!
//!     if let Some(record) = session.query_subscriber("alice").await? {
//!         println!("{} {:?}", record.interface, record.ip_address);
//!     }
//!
//!     session.disconnect().await?;
//!     Ok(())
//! }
//! ```

pub mod channel;
pub mod driver;
pub mod error;
pub mod hexdump;
pub mod parser;
pub mod settings;
pub mod transport;
pub mod vendor;

// Re-export main types for convenience
pub use driver::{
    Credentials, HandshakeTimeouts, Response, Session, SessionBuilder, SessionConfig, SessionState,
};
pub use error::Error;
pub use parser::{MacAddress, SubscriberRecord};
pub use settings::Settings;
pub use transport::{TelnetConfig, TelnetTransport, Transport};
pub use vendor::{OuiTable, VENDOR_NOT_FOUND, VendorLookup};

//! Hex rendering of raw protocol bytes for log output.
//!
//! Device output is full of carriage returns, Telnet commands and escape
//! sequences that disappear when printed as text. Logging the exact bytes
//! received at each protocol step makes prompt mismatches debuggable.

use std::fmt;

/// Displays a byte slice as space-separated uppercase hex pairs.
///
/// ```
/// use telscrape::hexdump::HexDump;
///
/// assert_eq!(HexDump(b"Login:").to_string(), "4C 6F 67 69 6E 3A");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct HexDump<'a>(pub &'a [u8]);

impl fmt::Display for HexDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut bytes = self.0.iter();
        if let Some(first) = bytes.next() {
            write!(f, "{:02X}", first)?;
            for b in bytes {
                write!(f, " {:02X}", b)?;
            }
        }
        Ok(())
    }
}

/// Log the raw bytes of a chunk at trace level.
pub(crate) fn log_raw(data: &[u8]) {
    log::trace!("Raw data: {}", HexDump(data));
}

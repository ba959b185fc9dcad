//! Structured subscriber data extracted from device output.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

/// Attributes of one PPPoE subscriber session.
///
/// A record only exists if an interface was found; every other field may
/// be missing when the device output did not contain it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscriberRecord {
    /// Logical interface carrying the session, e.g. `pp0.12`.
    pub interface: String,

    /// Address assigned to the subscriber.
    pub ip_address: Option<String>,

    /// Remote (CPE) MAC address.
    pub mac_address: Option<MacAddress>,

    /// Session uptime line as printed by the device,
    /// e.g. `Session uptime: 1 day, 00:03:21`.
    pub uptime: Option<String>,

    /// Vendor of the CPE, filled in by a [`VendorLookup`](crate::vendor::VendorLookup).
    pub vendor: Option<String>,
}

impl SubscriberRecord {
    /// Create a record with only the interface set.
    pub fn new(interface: impl Into<String>) -> Self {
        Self {
            interface: interface.into(),
            ip_address: None,
            mac_address: None,
            uptime: None,
            vendor: None,
        }
    }
}

/// Error returned when a string is not a colon-separated MAC address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseMacError(String);

impl fmt::Display for ParseMacError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid MAC address '{}'", self.0)
    }
}

impl std::error::Error for ParseMacError {}

/// A 48-bit MAC address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MacAddress([u8; 6]);

impl MacAddress {
    /// Create from raw octets.
    pub fn new(octets: [u8; 6]) -> Self {
        Self(octets)
    }

    /// Get the raw octets.
    pub fn octets(&self) -> [u8; 6] {
        self.0
    }

    /// Organizationally unique identifier (first three octets).
    pub fn oui(&self) -> [u8; 3] {
        [self.0[0], self.0[1], self.0[2]]
    }

    /// Uppercase, dash-separated form used for vendor lookups
    /// (`00-11-22-33-44-55`).
    pub fn to_dashed(&self) -> String {
        self.join('-')
    }

    fn join(&self, sep: char) -> String {
        let mut out = String::with_capacity(17);
        for (i, b) in self.0.iter().enumerate() {
            if i > 0 {
                out.push(sep);
            }
            out.push_str(&format!("{:02X}", b));
        }
        out
    }
}

impl FromStr for MacAddress {
    type Err = ParseMacError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut octets = [0u8; 6];
        let mut parts = s.split([':', '-']);
        for octet in octets.iter_mut() {
            let part = parts.next().ok_or_else(|| ParseMacError(s.to_string()))?;
            if part.len() != 2 {
                return Err(ParseMacError(s.to_string()));
            }
            *octet = u8::from_str_radix(part, 16).map_err(|_| ParseMacError(s.to_string()))?;
        }
        if parts.next().is_some() {
            return Err(ParseMacError(s.to_string()));
        }
        Ok(Self(octets))
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.join(':'))
    }
}

impl Serialize for MacAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mac_parse_and_format() {
        let mac: MacAddress = "00:11:22:33:44:55".parse().unwrap();
        assert_eq!(mac.octets(), [0x00, 0x11, 0x22, 0x33, 0x44, 0x55]);
        assert_eq!(mac.to_string(), "00:11:22:33:44:55");
        assert_eq!(mac.to_dashed(), "00-11-22-33-44-55");
        assert_eq!(mac.oui(), [0x00, 0x11, 0x22]);
    }

    #[test]
    fn test_mac_lowercase_input_is_uppercased() {
        let mac: MacAddress = "aa:bb:cc:dd:ee:ff".parse().unwrap();
        assert_eq!(mac.to_dashed(), "AA-BB-CC-DD-EE-FF");
    }

    #[test]
    fn test_mac_rejects_malformed() {
        assert!("AA:BB:CC:DD:EE".parse::<MacAddress>().is_err());
        assert!("AA:BB:CC:DD:EE:FF:00".parse::<MacAddress>().is_err());
        assert!("AAB:B:CC:DD:EE:FF".parse::<MacAddress>().is_err());
        assert!("GG:BB:CC:DD:EE:FF".parse::<MacAddress>().is_err());
    }

    #[test]
    fn test_record_serializes() {
        let mut record = SubscriberRecord::new("pp0.12");
        record.ip_address = Some("192.168.10.4".into());
        record.mac_address = Some("00:11:22:33:44:55".parse().unwrap());

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["interface"], "pp0.12");
        assert_eq!(json["mac_address"], "00:11:22:33:44:55");
        assert!(json["uptime"].is_null());
    }
}

//! MAC vendor lookup contract.
//!
//! Resolving a MAC address to a manufacturer is done by an external
//! collaborator (typically an HTTP API). The session engine only needs
//! the contract below; [`OuiTable`] is an in-memory implementation for
//! offline use and tests.

use std::collections::HashMap;
use std::future::Future;

use crate::parser::MacAddress;

/// Sentinel returned when the vendor is unknown or the lookup failed.
pub const VENDOR_NOT_FOUND: &str = "Not found";

/// Resolves a MAC address to a vendor name.
///
/// Implementations receive the address and should query with
/// [`MacAddress::to_dashed`]. Failures are not errors: they resolve to
/// [`VENDOR_NOT_FOUND`].
pub trait VendorLookup: Send + Sync {
    /// Look up the vendor of `mac`.
    fn lookup(&self, mac: &MacAddress) -> impl Future<Output = String> + Send;
}

/// Vendor table keyed by OUI (the first three octets).
#[derive(Debug, Clone, Default)]
pub struct OuiTable {
    entries: HashMap<[u8; 3], String>,
}

impl OuiTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a vendor for the OUI of `prefix`, given as `AA:BB:CC` or
    /// `AA-BB-CC`. Returns `None` if the prefix is malformed.
    pub fn with_entry(mut self, prefix: &str, vendor: impl Into<String>) -> Option<Self> {
        let mac: MacAddress = format!("{}:00:00:00", prefix.replace('-', ":")).parse().ok()?;
        self.entries.insert(mac.oui(), vendor.into());
        Some(self)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl VendorLookup for OuiTable {
    async fn lookup(&self, mac: &MacAddress) -> String {
        log::debug!("Looking up vendor for MAC: {}", mac.to_dashed());
        self.entries
            .get(&mac.oui())
            .cloned()
            .unwrap_or_else(|| VENDOR_NOT_FOUND.to_string())
    }
}

//! Extraction of subscriber attributes from raw command output.
//!
//! Lookups take two round trips. Round 1 (`show subscribers | match
//! <login>`) yields the interface and IP address; round 2 (`show pppoe
//! interfaces <interface>`) adds the remote MAC address and session uptime.
//!
//! Output is filtered line by line before any pattern is applied, so the
//! echoed command and banner text cannot produce false matches. Each pass
//! builds its own filtered text; nothing is carried between rounds.

mod record;

pub use record::{MacAddress, ParseMacError, SubscriberRecord};

use std::sync::LazyLock;

use log::{debug, warn};
use regex::Regex;

/// Line prefix of PPPoE logical interfaces.
pub const INTERFACE_PREFIX: &str = "pp0.";

static INTERFACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"pp0\.\d+").unwrap());

static IPV4_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:\d{1,3}\.){3}\d{1,3}\b").unwrap());

static MAC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Remote MAC address: ([0-9A-F:]{17})").unwrap());

static UPTIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Session uptime: [^\r\n]+").unwrap());

/// Command that lists the sessions of `login`.
pub fn subscriber_command(login: &str) -> String {
    format!("show subscribers | match {}", login)
}

/// Command that shows PPPoE details for `interface`.
pub fn pppoe_command(interface: &str) -> String {
    format!("show pppoe interfaces {}", interface)
}

/// Keep the trimmed lines for which `keep` returns true, one per line.
fn filter_lines(output: &str, keep: impl Fn(&str) -> bool) -> String {
    output
        .lines()
        .map(str::trim)
        .filter(|line| keep(line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Lines of `show subscribers` output that describe a session.
pub fn filter_subscriber_lines(output: &str) -> String {
    filter_lines(output, |line| line.starts_with(INTERFACE_PREFIX))
}

/// Lines of `show pppoe interfaces` output that carry fields of interest.
pub fn filter_pppoe_lines(output: &str) -> String {
    filter_lines(output, |line| {
        line.starts_with(INTERFACE_PREFIX)
            || line.contains("Remote MAC address")
            || line.contains("Session uptime")
    })
}

/// Parse round 1 output.
///
/// Returns `None` when no subscriber was found: either no line starts
/// with `pp0.` or no `pp0.<n>` interface id could be extracted.
pub fn parse_subscriber(output: &str) -> Option<SubscriberRecord> {
    let filtered = filter_subscriber_lines(output);
    debug!("Filtered response: {}", filtered);

    if filtered.is_empty() {
        debug!("No subscribers found or command returned no data");
        return None;
    }

    let Some(interface) = INTERFACE_RE.find(&filtered) else {
        warn!("Interface (pp0.<number>) not found in response");
        return None;
    };
    debug!("Interface extracted: {}", interface.as_str());
    let mut record = SubscriberRecord::new(interface.as_str());

    match IPV4_RE.find(&filtered) {
        Some(ip) => {
            debug!("IP extracted: {}", ip.as_str());
            record.ip_address = Some(ip.as_str().to_string());
        }
        None => warn!("IP address not found in response"),
    }

    Some(record)
}

/// Parse round 2 output into `record`.
///
/// Missing fields are logged and left empty. If nothing relevant is in
/// the output the record is returned unchanged.
pub fn parse_pppoe_detail(mut record: SubscriberRecord, output: &str) -> SubscriberRecord {
    let filtered = filter_pppoe_lines(output);
    debug!("PPPoE filtered response: {}", filtered);

    if filtered.is_empty() {
        debug!("No PPPoE data received");
        return record;
    }

    match MAC_RE.captures(&filtered).and_then(|c| c.get(1)) {
        Some(m) => match m.as_str().parse::<MacAddress>() {
            Ok(mac) => {
                debug!("MAC extracted: {}", mac);
                record.mac_address = Some(mac);
            }
            Err(e) => warn!("{} in PPPoE response", e),
        },
        None => warn!("MAC address not found in PPPoE response"),
    }

    match UPTIME_RE.find(&filtered) {
        Some(m) => {
            debug!("Uptime extracted: {}", m.as_str());
            record.uptime = Some(m.as_str().to_string());
        }
        None => warn!("Session uptime not found in PPPoE response"),
    }

    record
}

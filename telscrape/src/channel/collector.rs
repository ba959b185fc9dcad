//! Bounded polling loop that collects one command's output.
//!
//! The device gives no length or end-of-message framing. Output is polled
//! in short reads until the marker (normally the shell prompt) shows up,
//! then a few more reads pick up anything printed right after it.

use std::time::Duration;

use log::{debug, warn};

use super::buffer::ResponseBuffer;
use crate::error::{ChannelError, Result};
use crate::transport::Transport;

/// Poll counts and interval for a command cycle.
///
/// The worst case duration of a cycle with no marker is
/// `attempts * interval`; once the marker is seen at most
/// `drain_attempts * interval` more is spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSchedule {
    /// Maximum reads while waiting for the marker.
    pub attempts: usize,

    /// Reads performed after the marker is first seen.
    pub drain_attempts: usize,

    /// Timeout of each read.
    pub interval: Duration,
}

impl PollSchedule {
    /// Longest time a cycle can take when the marker never appears.
    pub fn budget(&self) -> Duration {
        self.interval * self.attempts as u32
    }
}

impl Default for PollSchedule {
    fn default() -> Self {
        Self {
            attempts: 240,
            drain_attempts: 20,
            interval: Duration::from_millis(500),
        }
    }
}

/// Collects device output for a single command.
#[derive(Debug, Clone, Default)]
pub struct ResponseCollector {
    schedule: PollSchedule,
}

impl ResponseCollector {
    /// Create a collector with the given schedule.
    pub fn new(schedule: PollSchedule) -> Self {
        Self { schedule }
    }

    /// Get the poll schedule.
    pub fn schedule(&self) -> &PollSchedule {
        &self.schedule
    }

    /// Read until `marker` appears, drain trailing output, and return
    /// everything received, trimmed.
    ///
    /// A missing marker is not an error: whatever arrived is returned once
    /// the poll budget is spent. Only a cycle in which nothing at all
    /// arrived fails, with [`ChannelError::NoResponse`].
    pub async fn collect<T: Transport>(&self, transport: &mut T, marker: &str) -> Result<String> {
        let mut buffer = ResponseBuffer::new();
        let mut marker_seen = false;

        for _ in 0..self.schedule.attempts {
            let chunk = transport.read_chunk(self.schedule.interval).await?;
            if buffer.extend(&chunk) {
                debug!("Received (partial): {}", chunk.trim());
            }

            if buffer.contains(marker) {
                marker_seen = true;
                break;
            }
        }

        if marker_seen {
            for _ in 0..self.schedule.drain_attempts {
                let chunk = transport.read_chunk(self.schedule.interval).await?;
                if buffer.extend(&chunk) {
                    debug!("Received (additional): {}", chunk.trim());
                }
            }
        } else if buffer.received_any() {
            warn!(
                "Marker '{}' not seen within {:?}, returning partial output",
                marker,
                self.schedule.budget()
            );
        }

        if !buffer.received_any() {
            warn!("No response received");
            return Err(ChannelError::NoResponse {
                attempts: self.schedule.attempts,
            }
            .into());
        }

        Ok(buffer.into_trimmed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::mock::{ScriptedTransport, Step};
    use tokio::time::Instant;

    const MARKER: &str = "admin@MPLS-CORE_2>";

    fn silence(n: usize) -> Vec<Step> {
        vec![Step::Silence; n]
    }

    #[tokio::test(start_paused = true)]
    async fn test_marker_then_drain() {
        let mut script = vec![
            Step::chunk("show subscribers | match alice\r\n"),
            Step::Silence,
            Step::chunk("pp0.5  alice  10.0.0.7\r\n"),
            Step::chunk("admin@MPLS-CORE_2> "),
            Step::Silence,
            Step::chunk("\r\n"),
            Step::chunk("trailing"),
        ];
        script.extend(silence(5));
        let (mut transport, rec) = ScriptedTransport::new(script);

        let start = Instant::now();
        let output = ResponseCollector::default()
            .collect(&mut transport, MARKER)
            .await
            .unwrap();

        assert_eq!(
            output,
            "show subscribers | match alice\r\npp0.5  alice  10.0.0.7\r\nadmin@MPLS-CORE_2> \r\ntrailing"
        );
        // 4 reads to the marker, then exactly 20 drain reads
        assert_eq!(rec.lock().unwrap().reads, 24);
        // Only silent reads consume time: 1 before the marker, 18 while draining
        assert!(start.elapsed() <= Duration::from_millis(500) * (4 + 20));
        assert_eq!(start.elapsed(), Duration::from_millis(500) * 19);
    }

    #[tokio::test(start_paused = true)]
    async fn test_every_read_uses_interval() {
        let (mut transport, rec) = ScriptedTransport::new(vec![Step::chunk(MARKER)]);
        ResponseCollector::default()
            .collect(&mut transport, MARKER)
            .await
            .unwrap();

        let rec = rec.lock().unwrap();
        assert_eq!(rec.reads, 21);
        assert!(rec.timeouts.iter().all(|t| *t == Duration::from_millis(500)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_response_after_full_budget() {
        let (mut transport, rec) = ScriptedTransport::new(vec![]);

        let start = Instant::now();
        let err = ResponseCollector::default()
            .collect(&mut transport, MARKER)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            crate::Error::Channel(ChannelError::NoResponse { attempts: 240 })
        ));
        assert_eq!(rec.lock().unwrap().reads, 240);
        assert_eq!(start.elapsed(), Duration::from_secs(120));
    }

    #[tokio::test(start_paused = true)]
    async fn test_partial_output_without_marker() {
        let (mut transport, rec) =
            ScriptedTransport::new(vec![Step::chunk("pp0.5  alice  10.0.0.7\r\n")]);

        let output = ResponseCollector::default()
            .collect(&mut transport, MARKER)
            .await
            .unwrap();

        assert_eq!(output, "pp0.5  alice  10.0.0.7");
        assert_eq!(rec.lock().unwrap().reads, 240);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drain_does_not_restart_on_second_marker() {
        let script = vec![
            Step::chunk("admin@MPLS-CORE_2> "),
            Step::chunk("admin@MPLS-CORE_2> "),
        ];
        let (mut transport, rec) = ScriptedTransport::new(script);

        ResponseCollector::default()
            .collect(&mut transport, MARKER)
            .await
            .unwrap();
        assert_eq!(rec.lock().unwrap().reads, 21);
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_schedule() {
        let schedule = PollSchedule {
            attempts: 4,
            drain_attempts: 1,
            interval: Duration::from_millis(100),
        };
        assert_eq!(schedule.budget(), Duration::from_millis(400));

        let (mut transport, rec) = ScriptedTransport::new(vec![]);
        let start = Instant::now();
        let err = ResponseCollector::new(schedule)
            .collect(&mut transport, MARKER)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            crate::Error::Channel(ChannelError::NoResponse { attempts: 4 })
        ));
        assert_eq!(rec.lock().unwrap().reads, 4);
        assert_eq!(start.elapsed(), Duration::from_millis(400));
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_failure_propagates() {
        let (mut transport, _rec) =
            ScriptedTransport::new(vec![Step::chunk("pp0.5"), Step::Drop]);

        let err = ResponseCollector::default()
            .collect(&mut transport, MARKER)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Transport(crate::error::TransportError::Disconnected)
        ));
    }
}

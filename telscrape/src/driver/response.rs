//! Response type for command execution results.

use std::time::Duration;

/// Response from a command execution.
#[derive(Debug, Clone)]
pub struct Response {
    /// The command that was executed.
    pub command: String,

    /// Everything the device printed for the command, including the echoed
    /// command line and trailing prompt, trimmed of surrounding whitespace.
    pub result: String,

    /// Time taken to execute the command.
    pub elapsed: Duration,
}

impl Response {
    /// Create a new response.
    pub fn new(command: impl Into<String>, result: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            command: command.into(),
            result: result.into(),
            elapsed,
        }
    }

    /// Get the result lines as an iterator.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.result.lines()
    }

    /// Check if the result contains a substring.
    pub fn contains(&self, pattern: &str) -> bool {
        self.result.contains(pattern)
    }
}

impl std::fmt::Display for Response {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_and_contains() {
        let response = Response::new(
            "show subscribers | match alice",
            "show subscribers | match alice\r\npp0.5 10.0.0.7\r\nadmin@MPLS-CORE_2>",
            Duration::from_millis(750),
        );
        assert_eq!(response.lines().count(), 3);
        assert!(response.contains("pp0.5"));
        assert_eq!(response.to_string(), response.result);
    }
}

//! ANSI escape sequence stripping.

use vte::{Parser, Perform};

/// Strips ANSI escape sequences and decodes UTF-8.
///
/// The parser keeps its state between calls, so a sequence split across two
/// reads is still removed.
pub(crate) struct AnsiStripper {
    parser: Parser,
}

impl AnsiStripper {
    pub(crate) fn new() -> Self {
        Self {
            parser: Parser::new(),
        }
    }

    /// Return the printable text in `data`, keeping line breaks and tabs.
    pub(crate) fn strip(&mut self, data: &[u8]) -> String {
        let mut out = Printable(String::with_capacity(data.len()));
        self.parser.advance(&mut out, data);
        out.0
    }

    pub(crate) fn reset(&mut self) {
        self.parser = Parser::new();
    }
}

impl std::fmt::Debug for AnsiStripper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnsiStripper").finish_non_exhaustive()
    }
}

struct Printable(String);

impl Perform for Printable {
    fn print(&mut self, c: char) {
        self.0.push(c);
    }

    fn execute(&mut self, byte: u8) {
        if matches!(byte, b'\n' | b'\r' | b'\t') {
            self.0.push(byte as char);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_passes_through() {
        let mut stripper = AnsiStripper::new();
        assert_eq!(stripper.strip(b"Login: "), "Login: ");
        assert_eq!(stripper.strip(b"line1\r\nline2\n"), "line1\r\nline2\n");
    }

    #[test]
    fn test_color_codes_removed() {
        let mut stripper = AnsiStripper::new();
        assert_eq!(
            stripper.strip(b"\x1b[32madmin@MPLS-CORE_2>\x1b[0m "),
            "admin@MPLS-CORE_2> "
        );
    }

    #[test]
    fn test_sequence_split_across_reads() {
        let mut stripper = AnsiStripper::new();
        assert_eq!(stripper.strip(b"pp0.5\x1b[3"), "pp0.5");
        assert_eq!(stripper.strip(b"2m up"), " up");
    }
}

//! Substring matchers for prompt and marker detection.
//!
//! Device output has no framing, so every "is the device done?" decision is
//! a containment test against the text received so far.

/// Characters that end a shell prompt once login succeeds.
pub const SHELL_SENTINELS: [char; 2] = ['#', '>'];

/// Trait for prompt matching - substring tests by default.
pub trait PromptMatcher: Send + Sync {
    /// Check if the text matches.
    fn is_match(&self, text: &str) -> bool;
}

/// Case-insensitive substring match, used for login and password prompts.
#[derive(Debug, Clone)]
pub struct CaseInsensitive {
    needle: String,
}

impl CaseInsensitive {
    /// Create a matcher for `needle`.
    pub fn new(needle: &str) -> Self {
        Self {
            needle: needle.to_lowercase(),
        }
    }
}

impl PromptMatcher for CaseInsensitive {
    fn is_match(&self, text: &str) -> bool {
        !text.is_empty() && text.to_lowercase().contains(&self.needle)
    }
}

/// Matches any chunk that contains a shell prompt character.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellPrompt;

impl PromptMatcher for ShellPrompt {
    fn is_match(&self, text: &str) -> bool {
        text.contains(SHELL_SENTINELS)
    }
}

/// Case-sensitive literal marker.
impl PromptMatcher for str {
    fn is_match(&self, text: &str) -> bool {
        text.contains(self)
    }
}

/// Extract the prompt line from a chunk that ended the login exchange.
///
/// This is the last non-empty line, trimmed, provided it contains a shell
/// prompt character.
pub fn learn_prompt(text: &str) -> Option<String> {
    text.lines()
        .map(str::trim)
        .rfind(|line| !line.is_empty())
        .filter(|line| line.contains(SHELL_SENTINELS))
        .map(str::to_string)
}

/// Whether `prompt` has the shape of a shell prompt: a single word ending
/// in `#` or `>`.
///
/// A learned marker that fails this check is probably banner text and will
/// not reappear after each command.
pub fn is_plausible_prompt(prompt: &str) -> bool {
    prompt.ends_with(SHELL_SENTINELS) && !prompt.contains(char::is_whitespace)
}

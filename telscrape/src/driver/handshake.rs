//! Login/password exchange over a freshly connected transport.
//!
//! Each step is a single bounded read followed by a containment test:
//!
//! 1. wait for the login prompt, send the username
//! 2. wait for the password prompt, send the password
//! 3. wait for a shell prompt (`#` or `>`)
//!
//! The handshake itself never closes the transport; the session does that
//! when this returns an error.

use std::time::Duration;

use log::{debug, info, warn};
use secrecy::{ExposeSecret, SecretString};

use crate::channel::PromptMatcher;
use crate::channel::patterns::{
    CaseInsensitive, SHELL_SENTINELS, ShellPrompt, is_plausible_prompt, learn_prompt,
};
use crate::error::{HandshakeError, HandshakeStep, Result};
use crate::transport::Transport;

/// Login credentials and the prompts that request them.
#[derive(Debug)]
pub struct Credentials {
    username: String,
    password: SecretString,
    login_prompt: String,
    password_prompt: String,
}

impl Credentials {
    /// Create credentials with the default `Login:` / `Password:` prompts.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
            login_prompt: "Login:".to_string(),
            password_prompt: "Password:".to_string(),
        }
    }

    /// Set the prompt texts, matched case-insensitively.
    pub fn with_prompts(
        mut self,
        login_prompt: impl Into<String>,
        password_prompt: impl Into<String>,
    ) -> Self {
        self.login_prompt = login_prompt.into();
        self.password_prompt = password_prompt.into();
        self
    }

    /// Get the username.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Get the login prompt text.
    pub fn login_prompt(&self) -> &str {
        &self.login_prompt
    }

    /// Get the password prompt text.
    pub fn password_prompt(&self) -> &str {
        &self.password_prompt
    }
}

/// Read ceilings for each handshake step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandshakeTimeouts {
    /// Wait for the login prompt.
    pub login: Duration,

    /// Wait for the password prompt.
    pub password: Duration,

    /// Wait for the shell prompt after sending the password.
    pub shell: Duration,
}

impl Default for HandshakeTimeouts {
    fn default() -> Self {
        Self {
            login: Duration::from_secs(10),
            password: Duration::from_secs(5),
            shell: Duration::from_secs(5),
        }
    }
}

/// Drives the login exchange.
#[derive(Debug)]
pub struct Handshake<'a> {
    credentials: &'a Credentials,
    timeouts: HandshakeTimeouts,
}

impl<'a> Handshake<'a> {
    /// Create a handshake for `credentials`.
    pub fn new(credentials: &'a Credentials, timeouts: HandshakeTimeouts) -> Self {
        Self {
            credentials,
            timeouts,
        }
    }

    /// Run the exchange.
    ///
    /// On success returns the shell prompt the device printed, suitable
    /// as an end-of-output marker.
    pub async fn run<T: Transport>(&self, transport: &mut T) -> Result<String> {
        let creds = self.credentials;

        let login = CaseInsensitive::new(&creds.login_prompt);
        let text = transport.read_chunk(self.timeouts.login).await?;
        if !login.is_match(&text) {
            warn!("Login prompt not received, expected: {}", creds.login_prompt);
            return Err(HandshakeError::PromptMismatch {
                step: HandshakeStep::Login,
                expected: creds.login_prompt.clone(),
            }
            .into());
        }

        transport.write_line(&creds.username).await?;
        debug!("Sent login: {}", creds.username);

        let password = CaseInsensitive::new(&creds.password_prompt);
        let text = transport.read_chunk(self.timeouts.password).await?;
        if !password.is_match(&text) {
            warn!(
                "Password prompt not received, expected: {}",
                creds.password_prompt
            );
            return Err(HandshakeError::PromptMismatch {
                step: HandshakeStep::Password,
                expected: creds.password_prompt.clone(),
            }
            .into());
        }

        transport.write_line(creds.password.expose_secret()).await?;
        debug!("Sent password: [hidden]");

        let text = transport.read_chunk(self.timeouts.shell).await?;
        if !ShellPrompt.is_match(&text) {
            warn!("Login failed");
            return Err(HandshakeError::LoginFailed.into());
        }

        let prompt = learn_prompt(&text).unwrap_or_else(|| last_sentinel(&text));
        if !is_plausible_prompt(&prompt) {
            warn!(
                "Learned prompt '{}' does not look like a shell prompt; set a fixed marker if commands time out",
                prompt
            );
        }
        info!("Login successful, prompt '{}'", prompt);
        Ok(prompt)
    }
}

/// The last shell prompt character in `text`.
fn last_sentinel(text: &str) -> String {
    text.rfind(SHELL_SENTINELS)
        .map(|i| text[i..i + 1].to_string())
        .unwrap_or_else(|| SHELL_SENTINELS[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::transport::mock::{ScriptedTransport, Step};
    use tokio::time::Instant;

    fn creds() -> Credentials {
        Credentials::new("admin", "s3cret").with_prompts("Login:", "Password:")
    }

    #[tokio::test(start_paused = true)]
    async fn test_successful_login() {
        let (mut transport, rec) = ScriptedTransport::new(vec![
            Step::chunk("\r\nMPLS-CORE_2 (ttyp0)\r\n\r\nlogin: "),
            Step::chunk("Password:"),
            Step::chunk("\r\n--- JUNOS 18.4R3\r\nadmin@MPLS-CORE_2> "),
        ]);
        let creds = creds();

        let prompt = Handshake::new(&creds, HandshakeTimeouts::default())
            .run(&mut transport)
            .await
            .unwrap();

        assert_eq!(prompt, "admin@MPLS-CORE_2>");
        let rec = rec.lock().unwrap();
        assert_eq!(rec.writes, vec!["admin", "s3cret"]);
        assert_eq!(
            rec.timeouts,
            vec![
                Duration::from_secs(10),
                Duration::from_secs(5),
                Duration::from_secs(5)
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_login_prompt_timeout() {
        let (mut transport, rec) = ScriptedTransport::new(vec![]);
        let creds = creds();

        let start = Instant::now();
        let err = Handshake::new(&creds, HandshakeTimeouts::default())
            .run(&mut transport)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Handshake(HandshakeError::PromptMismatch {
                step: HandshakeStep::Login,
                ..
            })
        ));
        assert_eq!(start.elapsed(), Duration::from_secs(10));
        assert!(rec.lock().unwrap().writes.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_wrong_login_prompt() {
        let (mut transport, _rec) = ScriptedTransport::new(vec![Step::chunk("Username: ")]);
        let creds = creds();

        let err = Handshake::new(&creds, HandshakeTimeouts::default())
            .run(&mut transport)
            .await
            .unwrap_err();
        match err {
            Error::Handshake(HandshakeError::PromptMismatch { step, expected }) => {
                assert_eq!(step, HandshakeStep::Login);
                assert_eq!(expected, "Login:");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_password_prompt_missing() {
        let (mut transport, rec) =
            ScriptedTransport::new(vec![Step::chunk("LOGIN: "), Step::chunk("admin\r\n")]);
        let creds = creds();

        let err = Handshake::new(&creds, HandshakeTimeouts::default())
            .run(&mut transport)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Handshake(HandshakeError::PromptMismatch {
                step: HandshakeStep::Password,
                ..
            })
        ));
        assert_eq!(rec.lock().unwrap().writes, vec!["admin"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_shell_prompt_is_login_failure() {
        let (mut transport, _rec) = ScriptedTransport::new(vec![
            Step::chunk("login: "),
            Step::chunk("password: "),
            Step::chunk("\r\nLogin incorrect\r\nlogin: "),
        ]);
        let creds = creds();

        let err = Handshake::new(&creds, HandshakeTimeouts::default())
            .run(&mut transport)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Handshake(HandshakeError::LoginFailed)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_prompt_not_on_last_line() {
        let (mut transport, _rec) = ScriptedTransport::new(vec![
            Step::chunk("Login: "),
            Step::chunk("Password: "),
            Step::chunk("router#\r\nLast login: Mon\r\n"),
        ]);
        let creds = creds();

        let prompt = Handshake::new(&creds, HandshakeTimeouts::default())
            .run(&mut transport)
            .await
            .unwrap();
        assert_eq!(prompt, "#");
    }

    #[tokio::test(start_paused = true)]
    async fn test_banner_line_learned_as_prompt() {
        let (mut transport, _rec) = ScriptedTransport::new(vec![
            Step::chunk("Login: "),
            Step::chunk("Password: "),
            Step::chunk("admin@bras1>\r\nWelcome to <BRAS>\r\n"),
        ]);
        let creds = creds();

        let prompt = Handshake::new(&creds, HandshakeTimeouts::default())
            .run(&mut transport)
            .await
            .unwrap();
        assert_eq!(prompt, "Welcome to <BRAS>");
        assert!(!is_plausible_prompt(&prompt));
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let output = format!("{:?}", creds());
        assert!(output.contains("admin"));
        assert!(!output.contains("s3cret"));
    }
}

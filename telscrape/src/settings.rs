//! Connection settings supplied by the host application.
//!
//! Loading and saving settings, and decrypting the stored password, are
//! the application's job. This type is the boundary: it arrives here with
//! the password already in plaintext.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::driver::Credentials;
use crate::error::{ConfigError, Result};

/// Connection settings for one device.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Device address.
    pub switch_ip: String,

    /// Login username.
    pub username: String,

    /// Login password (plaintext).
    pub password: String,

    /// Text of the device's login prompt, e.g. `login:`.
    pub login_prompt: String,

    /// Text of the device's password prompt, e.g. `Password:`.
    pub password_prompt: String,
}

impl Settings {
    /// Check that every field is filled in.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("switchIp", &self.switch_ip),
            ("username", &self.username),
            ("password", &self.password),
            ("loginPrompt", &self.login_prompt),
            ("passwordPrompt", &self.password_prompt),
        ];
        for (field, value) in fields {
            if value.trim().is_empty() {
                return Err(ConfigError::MissingField { field }.into());
            }
        }
        Ok(())
    }

    /// Build login credentials from these settings.
    pub fn credentials(&self) -> Result<Credentials> {
        self.validate()?;
        Ok(Credentials::new(&self.username, self.password.as_str())
            .with_prompts(&self.login_prompt, &self.password_prompt))
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("switch_ip", &self.switch_ip)
            .field("username", &self.username)
            .field("password", &"[hidden]")
            .field("login_prompt", &self.login_prompt)
            .field("password_prompt", &self.password_prompt)
            .finish()
    }
}

//! Session configuration.
//!
//! All knobs of the engine live in a single [`Config`] value that is handed to
//! [`Shell::new`](crate::shell::Shell::new). The same engine serves both the
//! full-featured build (users, passwords, variables) and the reduced one
//! (commands and keys only); the difference is expressed through
//! [`Capabilities`].
//!
//! Configurations are plain serde types, so a device can keep them in flash as
//! a small JSON document:
//!
//! ```rust
//! use libshell::config::{Config, LineEnding};
//!
//! let json = br#"{"default_user":"admin","history_depth":3,"line_ending":"crlf"}"#;
//! let config = Config::from_json(json).unwrap();
//!
//! assert_eq!(config.default_user.as_str(), "admin");
//! assert_eq!(config.history_depth, 3);
//! assert_eq!(config.line_ending, LineEnding::CrLf);
//! assert!(config.echo);
//! ```

use heapless::String;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Maximum number of tokens on a command line, including the command name.
pub const MAX_PARAMETERS: usize = 16;

/// Maximum number of history entries a session can keep.
pub const MAX_HISTORY: usize = 16;

/// Maximum length of a value written to a text variable, after escapes.
pub const MAX_TEXT_VALUE: usize = 128;

/// Maximum length of the configured default user name.
pub const MAX_USER_NAME: usize = 32;

/// Name of the user a session logs in as when nothing else is configured.
pub const DEFAULT_USER: &str = "root";

/// Which input bytes terminate a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineEnding {
    /// Carriage return only.
    Cr,
    /// Line feed only.
    Lf,
    /// Either a carriage return or a line feed.
    #[default]
    CrOrLf,
    /// The two byte sequence CR LF. Cannot be combined with the others.
    #[serde(rename = "crlf")]
    CrLf,
}

/// Optional engine features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Capabilities {
    /// User descriptors, passwords and the login gate.
    pub users: bool,
    /// Variable descriptors, `$name` references and `setVar`.
    pub variables: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            users: true,
            variables: true,
        }
    }
}

impl Capabilities {
    /// Commands and key bindings only.
    pub const fn reduced() -> Self {
        Self {
            users: false,
            variables: false,
        }
    }
}

/// Shell configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// User to log in as when the session starts.
    pub default_user: String<MAX_USER_NAME>,
    /// Number of history entries (0 disables history).
    pub history_depth: usize,
    /// Maximum number of tokens parsed from one line.
    pub max_params: usize,
    /// Line terminator recognised by the built-in enter key bindings.
    pub line_ending: LineEnding,
    /// Treat `[` ... `]` as a non-splitting region like a quoted string.
    pub array_params: bool,
    /// Echo keystrokes back to the transport.
    pub echo: bool,
    /// Remember the return value of the last command in `RETVAL`.
    pub keep_return_value: bool,
    /// Lock the session after this many idle milliseconds (0 disables).
    pub lock_timeout_ms: u32,
    /// Window for a Tab double-tap, in milliseconds.
    pub double_tap_ms: u32,
    /// A Tab double-tap prints the command description instead of
    /// rewriting the line to `help <command>`.
    pub quick_help: bool,
    /// Include users in the `help` listing.
    pub list_users: bool,
    /// Include variables in the `help` listing.
    pub list_variables: bool,
    /// Include key bindings in the `help` listing.
    pub list_keys: bool,
    /// Render the permission bits in listings.
    pub show_permission: bool,
    /// Enabled engine features.
    pub capabilities: Capabilities,
}

impl Default for Config {
    fn default() -> Self {
        let mut default_user = String::new();
        // DEFAULT_USER is shorter than MAX_USER_NAME
        let _ = default_user.push_str(DEFAULT_USER);

        Self {
            default_user,
            history_depth: 5,
            max_params: 8,
            line_ending: LineEnding::default(),
            array_params: false,
            echo: true,
            keep_return_value: false,
            lock_timeout_ms: 0,
            double_tap_ms: 200,
            quick_help: true,
            list_users: false,
            list_variables: false,
            list_keys: false,
            show_permission: true,
            capabilities: Capabilities::default(),
        }
    }
}

impl Config {
    /// Configuration of the reduced engine: no users, no variables.
    pub fn reduced() -> Self {
        Self {
            capabilities: Capabilities::reduced(),
            ..Self::default()
        }
    }

    /// Check that all values are within the engine's fixed limits.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the history is deeper than
    /// [`MAX_HISTORY`] or `max_params` is outside `1..=MAX_PARAMETERS`.
    pub fn validate(&self) -> Result<(), Error> {
        if self.history_depth > MAX_HISTORY {
            return Err(Error::InvalidConfig);
        }
        if self.max_params == 0 || self.max_params > MAX_PARAMETERS {
            return Err(Error::InvalidConfig);
        }
        Ok(())
    }

    /// Parse and validate a configuration from a JSON document.
    ///
    /// Missing fields take their default values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the document is malformed or the
    /// resulting configuration fails [`validate`](Self::validate).
    pub fn from_json(json: &[u8]) -> Result<Self, Error> {
        let (config, _) =
            serde_json_core::from_slice::<Config>(json).map_err(|_| Error::InvalidConfig)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration into `buf`, returning the number of bytes
    /// written.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferOverflow`] if `buf` is too small.
    pub fn to_json(&self, buf: &mut [u8]) -> Result<usize, Error> {
        serde_json_core::to_slice(self, buf).map_err(|_| Error::BufferOverflow)
    }
}

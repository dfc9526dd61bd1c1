//! Fixed strings written to the transport.

pub(crate) const BANNER: &str = concat!(
    "\r\n",
    "  libshell ",
    env!("CARGO_PKG_VERSION"),
    "\r\n",
    "  type 'help' to list commands, Tab to complete\r\n",
);

pub(crate) const LINE_TOO_LONG: &str = "\r\nWarning: Command is too long\r\n";
pub(crate) const COMMAND_LIST: &str = "\r\nCommand List:\r\n";
pub(crate) const VARIABLE_LIST: &str = "\r\nVar List:\r\n";
pub(crate) const USER_LIST: &str = "\r\nUser List:\r\n";
pub(crate) const KEY_LIST: &str = "\r\nKey List:\r\n";
pub(crate) const COMMAND_NOT_FOUND: &str = "\r\nCommand not Found\r\n";
pub(crate) const POINTER_NOT_WRITABLE: &str = "can't set pointer\r\n";
pub(crate) const READ_ONLY: &str = "can't set read only var\r\n";
pub(crate) const NOT_A_VARIABLE: &str = " is not a var\r\n";
pub(crate) const VARIABLE_NOT_FOUND: &str = "Var not Found\r\n";
pub(crate) const HELP_HEADER: &str = "command help of ";
pub(crate) const PASSWORD_HINT: &str = "Please input password:";
pub(crate) const PASSWORD_ERROR: &str = "\r\npassword error\r\n";

pub(crate) const CLEAR_ALL: &str = "\x1b[2J\x1b[3J\x1b[1H";
pub(crate) const CLEAR_SCREEN: &str = "\x1b[2J\x1b[1H";
pub(crate) const CLEAR_LINE: &str = "\x1b[2K\r";

pub(crate) const TAG_COMMAND: &str = "CMD ";
pub(crate) const TAG_VARIABLE: &str = "VAR ";
pub(crate) const TAG_USER: &str = "USER";
pub(crate) const TAG_KEY: &str = "KEY ";

/// Column the type tag starts at in listings.
pub(crate) const NAME_COLUMN: usize = 22;

/// Listed descriptions are cut to this many bytes, then `...`.
pub(crate) const DESC_COLUMN: usize = 36;

use core::fmt;

use crate::error::Error;

/// Which descriptors a listing shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Listing {
    /// The `help` listing: commands, plus users, variables and keys as
    /// configured.
    All,
    /// Main and function commands.
    Commands,
    /// Variables.
    Variables,
    /// Users.
    Users,
    /// Key bindings.
    Keys,
}

/// The session a command runs in.
///
/// Handlers receive the executing session explicitly instead of looking it
/// up. `write!` works on `&mut dyn Context` through its [`fmt::Write`]
/// implementation.
///
/// ```rust
/// use core::fmt::Write;
/// use libshell::shell::Context;
///
/// fn whoami(ctx: &mut dyn Context, _argv: &[&str]) -> i32 {
///     let name = ctx.user().unwrap_or("nobody");
///     let _ = write!(ctx, "{}\r\n", name);
///     0
/// }
/// ```
pub trait Context {
    /// Write text to the session's transport.
    fn print(&mut self, text: &str);

    /// Name of the active user, if any.
    fn user(&self) -> Option<&'static str>;

    /// `true` once the session has authenticated.
    fn is_checked(&self) -> bool;

    /// Print a descriptor listing.
    fn list(&mut self, listing: Listing);

    /// Print the description of the named command.
    fn command_help(&mut self, name: &str);

    /// Set the named variable from a textual value and show the result.
    ///
    /// Text variables take `value` verbatim; all others parse it as a
    /// number, character literal or `$name` reference.
    ///
    /// # Errors
    ///
    /// Returns the error that was reported on the transport.
    fn set_var(&mut self, name: &str, value: &str) -> Result<i32, Error>;

    /// Clear the screen, optionally with the scrollback.
    fn clear(&mut self, scrollback: bool);

    /// Return value of the last reported command.
    fn last_return(&self) -> i32;

    /// Print the message for `error`.
    fn report(&mut self, error: Error);
}

impl fmt::Write for dyn Context + '_ {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.print(s);
        Ok(())
    }
}

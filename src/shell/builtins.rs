//! Built-in key bindings and commands.
//!
//! These tables are placed in front of the application table by
//! [`Registry::with_builtins`](crate::registry::Registry::with_builtins).

use crate::registry::{Descriptor, KeyAction, VarBacking};
use crate::shell::{Context, Listing};

/// Editing keys. History and completion need an authenticated session.
pub static EDIT_KEYS: [Descriptor; 8] = [
    Descriptor::key(0x1B5B_4100, "up", KeyAction::HistoryUp),
    Descriptor::key(0x1B5B_4200, "down", KeyAction::HistoryDown),
    Descriptor::key(0x1B5B_4300, "right", KeyAction::CursorRight).unchecked(),
    Descriptor::key(0x1B5B_4400, "left", KeyAction::CursorLeft).unchecked(),
    Descriptor::key(0x0900_0000, "tab", KeyAction::Tab),
    Descriptor::key(0x0800_0000, "backspace", KeyAction::Backspace).unchecked(),
    Descriptor::key(0x7F00_0000, "backspace", KeyAction::Backspace).unchecked(),
    Descriptor::key(0x1B5B_337E, "delete", KeyAction::Delete).unchecked(),
];

/// Enter on carriage return.
pub static ENTER_CR: [Descriptor; 1] =
    [Descriptor::key(0x0D00_0000, "enter", KeyAction::Enter).unchecked()];

/// Enter on line feed.
pub static ENTER_LF: [Descriptor; 1] =
    [Descriptor::key(0x0A00_0000, "enter", KeyAction::Enter).unchecked()];

/// Enter on either carriage return or line feed.
pub static ENTER_CR_OR_LF: [Descriptor; 2] = [
    Descriptor::key(0x0D00_0000, "enter", KeyAction::Enter).unchecked(),
    Descriptor::key(0x0A00_0000, "enter", KeyAction::Enter).unchecked(),
];

/// Enter on CR LF.
pub static ENTER_CRLF: [Descriptor; 1] =
    [Descriptor::key(0x0D0A_0000, "enter", KeyAction::Enter).unchecked()];

/// Session management commands every engine has.
pub static COMMANDS: [Descriptor; 5] = [
    Descriptor::main("help", "show command info", help).no_return(),
    Descriptor::main("cmds", "list all cmd", cmds).no_return(),
    Descriptor::main("keys", "list all key", keys).no_return(),
    Descriptor::main("clear", "clear console", clear).no_return(),
    Descriptor::main("cclear", "clear console and scrollback", clear_all).no_return(),
];

/// Commands that need user support.
pub static USER_COMMANDS: [Descriptor; 1] =
    [Descriptor::main("users", "list all user", users).no_return()];

/// Commands that need variable support.
pub static VARIABLE_COMMANDS: [Descriptor; 2] = [
    Descriptor::main("vars", "list all var", vars).no_return(),
    Descriptor::main("setVar", "set var", set_var).no_return(),
];

/// The `RETVAL` variable. Each session reads its own last return value.
pub static RETVAL: [Descriptor; 1] = [Descriptor::variable(
    "RETVAL",
    "return value of last command",
    VarBacking::ReturnValue,
)
.read_only()];

fn help(ctx: &mut dyn Context, argv: &[&str]) -> i32 {
    match argv.get(1) {
        Some(name) => ctx.command_help(name),
        None => ctx.list(Listing::All),
    }
    0
}

fn users(ctx: &mut dyn Context, _argv: &[&str]) -> i32 {
    ctx.list(Listing::Users);
    0
}

fn cmds(ctx: &mut dyn Context, _argv: &[&str]) -> i32 {
    ctx.list(Listing::Commands);
    0
}

fn vars(ctx: &mut dyn Context, _argv: &[&str]) -> i32 {
    ctx.list(Listing::Variables);
    0
}

fn keys(ctx: &mut dyn Context, _argv: &[&str]) -> i32 {
    ctx.list(Listing::Keys);
    0
}

fn clear(ctx: &mut dyn Context, _argv: &[&str]) -> i32 {
    ctx.clear(false);
    0
}

fn clear_all(ctx: &mut dyn Context, _argv: &[&str]) -> i32 {
    ctx.clear(true);
    0
}

fn set_var(ctx: &mut dyn Context, argv: &[&str]) -> i32 {
    let (Some(name), Some(value)) = (argv.get(1), argv.get(2)) else {
        ctx.report(crate::error::Error::ArityMismatch);
        return -1;
    };
    ctx.set_var(name, value).unwrap_or(-1)
}

//! Descriptor types: one registered command, variable, user or key binding.

use core::fmt;

use super::var::VarBacking;
use crate::shell::Context;

/// Handler of a [`Kind::Main`] command.
///
/// Receives the session context and the raw argument vector, command name
/// included, with surrounding quotes already stripped.
pub type MainFn = fn(ctx: &mut dyn Context, argv: &[&str]) -> i32;

/// Handler of a [`KeyAction::Custom`] binding.
pub type KeyFn = fn(ctx: &mut dyn Context);

/// A parsed command parameter, as passed to [`Kind::Function`] handlers.
///
/// Numbers, character literals and `$name` references become machine words.
/// Floating point literals are passed by bit pattern; use
/// [`as_f32`](Param::as_f32) to get them back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Param<'a> {
    /// A machine word.
    Word(u32),
    /// An unescaped string, borrowed from the line buffer.
    Str(&'a str),
}

impl<'a> Param<'a> {
    /// The word value, or 0 for a string.
    pub fn as_u32(&self) -> u32 {
        match self {
            Param::Word(word) => *word,
            Param::Str(_) => 0,
        }
    }

    /// The word value reinterpreted as signed.
    pub fn as_i32(&self) -> i32 {
        self.as_u32() as i32
    }

    /// The word value reinterpreted as an IEEE-754 single.
    pub fn as_f32(&self) -> f32 {
        f32::from_bits(self.as_u32())
    }

    /// The low byte of the word value, as produced by a `'c'` literal.
    pub fn as_char(&self) -> u8 {
        self.as_u32() as u8
    }

    /// The string value, if this parameter is a string.
    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            Param::Str(text) => Some(text),
            Param::Word(_) => None,
        }
    }
}

/// Typed signature of a [`Kind::Function`] handler.
///
/// Fixed-arity variants are only invoked when the effective parameter count
/// equals their arity. [`Invoke::Variadic`] accepts any count.
#[derive(Clone, Copy)]
pub enum Invoke {
    /// No parameters.
    Args0(fn() -> i32),
    /// One parameter.
    Args1(for<'a> fn(Param<'a>) -> i32),
    /// Two parameters.
    Args2(for<'a> fn(Param<'a>, Param<'a>) -> i32),
    /// Three parameters.
    Args3(for<'a> fn(Param<'a>, Param<'a>, Param<'a>) -> i32),
    /// Four parameters.
    Args4(for<'a> fn(Param<'a>, Param<'a>, Param<'a>, Param<'a>) -> i32),
    /// Five parameters.
    Args5(for<'a> fn(Param<'a>, Param<'a>, Param<'a>, Param<'a>, Param<'a>) -> i32),
    /// Six parameters.
    Args6(for<'a> fn(Param<'a>, Param<'a>, Param<'a>, Param<'a>, Param<'a>, Param<'a>) -> i32),
    /// Seven parameters.
    Args7(
        for<'a> fn(
            Param<'a>,
            Param<'a>,
            Param<'a>,
            Param<'a>,
            Param<'a>,
            Param<'a>,
            Param<'a>,
        ) -> i32,
    ),
    /// Eight parameters.
    Args8(
        for<'a> fn(
            Param<'a>,
            Param<'a>,
            Param<'a>,
            Param<'a>,
            Param<'a>,
            Param<'a>,
            Param<'a>,
            Param<'a>,
        ) -> i32,
    ),
    /// Any number of parameters.
    Variadic(for<'a, 'b> fn(&'b [Param<'a>]) -> i32),
}

impl Invoke {
    /// Number of parameters a fixed-arity handler takes, `None` if variadic.
    pub const fn arity(&self) -> Option<usize> {
        match self {
            Invoke::Args0(_) => Some(0),
            Invoke::Args1(_) => Some(1),
            Invoke::Args2(_) => Some(2),
            Invoke::Args3(_) => Some(3),
            Invoke::Args4(_) => Some(4),
            Invoke::Args5(_) => Some(5),
            Invoke::Args6(_) => Some(6),
            Invoke::Args7(_) => Some(7),
            Invoke::Args8(_) => Some(8),
            Invoke::Variadic(_) => None,
        }
    }
}

impl fmt::Debug for Invoke {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.arity() {
            Some(n) => write!(f, "Invoke::Args{}", n),
            None => f.write_str("Invoke::Variadic"),
        }
    }
}

/// What a key binding does when its sequence completes.
#[derive(Clone, Copy)]
pub enum KeyAction {
    /// Recall the previous history entry.
    HistoryUp,
    /// Recall the next history entry, or the empty live line.
    HistoryDown,
    /// Move the cursor one position left.
    CursorLeft,
    /// Move the cursor one position right.
    CursorRight,
    /// Complete the command name, or list candidates.
    Tab,
    /// Delete the byte before the cursor.
    Backspace,
    /// Delete the byte at the cursor.
    Delete,
    /// Submit the line.
    Enter,
    /// Host-defined action.
    Custom(KeyFn),
}

impl fmt::Debug for KeyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            KeyAction::HistoryUp => "HistoryUp",
            KeyAction::HistoryDown => "HistoryDown",
            KeyAction::CursorLeft => "CursorLeft",
            KeyAction::CursorRight => "CursorRight",
            KeyAction::Tab => "Tab",
            KeyAction::Backspace => "Backspace",
            KeyAction::Delete => "Delete",
            KeyAction::Enter => "Enter",
            KeyAction::Custom(_) => "Custom",
        };
        f.write_str(name)
    }
}

/// Flags shared by every descriptor variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Attributes {
    /// Required permission bits; 0 means everyone. For users, the bits the
    /// user holds.
    pub permission: u8,
    /// Usable before the session has authenticated.
    pub enable_unchecked: bool,
    /// Do not print a `Return:` line after the command runs.
    pub disable_return: bool,
    /// Variables only: refuse writes.
    pub read_only: bool,
    /// Functions only: minimum number of parameters passed to the handler.
    pub param_count: u8,
}

impl Attributes {
    /// All flags cleared.
    pub const fn new() -> Self {
        Self {
            permission: 0,
            enable_unchecked: false,
            disable_return: false,
            read_only: false,
            param_count: 0,
        }
    }
}

/// The variant-specific part of a descriptor.
#[derive(Debug, Clone, Copy)]
pub enum Kind {
    /// A command taking `(argc, argv)`.
    Main {
        /// Command name.
        name: &'static str,
        /// One-line description.
        desc: &'static str,
        /// Handler.
        handler: MainFn,
    },
    /// A command taking parsed, typed parameters.
    Function {
        /// Command name.
        name: &'static str,
        /// One-line description.
        desc: &'static str,
        /// Handler and its signature.
        handler: Invoke,
    },
    /// An inspectable variable.
    Variable {
        /// Variable name.
        name: &'static str,
        /// One-line description.
        desc: &'static str,
        /// Where the value lives.
        backing: VarBacking,
    },
    /// A user account.
    User {
        /// User name.
        name: &'static str,
        /// Password; empty means no password.
        password: &'static str,
        /// One-line description.
        desc: &'static str,
    },
    /// A key sequence binding.
    Key {
        /// Up to four input bytes, most significant byte first.
        code: u32,
        /// One-line description.
        desc: &'static str,
        /// Action to run.
        action: KeyAction,
    },
}

/// A registered entry.
///
/// Descriptors are immutable and usually live in `static` tables built with
/// the `const` constructors below:
///
/// ```rust
/// use libshell::registry::{Descriptor, Invoke, Param};
/// use libshell::shell::Context;
///
/// fn reboot(_ctx: &mut dyn Context, _argv: &[&str]) -> i32 {
///     0
/// }
///
/// fn add(a: Param, b: Param) -> i32 {
///     a.as_i32() + b.as_i32()
/// }
///
/// static COMMANDS: [Descriptor; 3] = [
///     Descriptor::main("reboot", "restart the device", reboot).permission(0x80),
///     Descriptor::function("add", "add two numbers", Invoke::Args2(add)),
///     Descriptor::user("admin", "secret", "administrator").permission(0xFF),
/// ];
/// # assert_eq!(COMMANDS.len(), 3);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Descriptor {
    /// Flags.
    pub attr: Attributes,
    /// Variant data.
    pub kind: Kind,
}

impl Descriptor {
    /// A command taking the raw argument vector.
    pub const fn main(name: &'static str, desc: &'static str, handler: MainFn) -> Self {
        Self {
            attr: Attributes::new(),
            kind: Kind::Main {
                name,
                desc,
                handler,
            },
        }
    }

    /// A command taking typed parameters.
    pub const fn function(name: &'static str, desc: &'static str, handler: Invoke) -> Self {
        Self {
            attr: Attributes::new(),
            kind: Kind::Function {
                name,
                desc,
                handler,
            },
        }
    }

    /// A variable.
    pub const fn variable(name: &'static str, desc: &'static str, backing: VarBacking) -> Self {
        Self {
            attr: Attributes::new(),
            kind: Kind::Variable {
                name,
                desc,
                backing,
            },
        }
    }

    /// A user account.
    pub const fn user(name: &'static str, password: &'static str, desc: &'static str) -> Self {
        Self {
            attr: Attributes::new(),
            kind: Kind::User {
                name,
                password,
                desc,
            },
        }
    }

    /// A key binding.
    pub const fn key(code: u32, desc: &'static str, action: KeyAction) -> Self {
        Self {
            attr: Attributes::new(),
            kind: Kind::Key { code, desc, action },
        }
    }

    /// Set the permission bits.
    pub const fn permission(mut self, permission: u8) -> Self {
        self.attr.permission = permission;
        self
    }

    /// Allow use before authentication.
    pub const fn unchecked(mut self) -> Self {
        self.attr.enable_unchecked = true;
        self
    }

    /// Suppress the `Return:` report.
    pub const fn no_return(mut self) -> Self {
        self.attr.disable_return = true;
        self
    }

    /// Refuse writes to a variable.
    pub const fn read_only(mut self) -> Self {
        self.attr.read_only = true;
        self
    }

    /// Minimum number of parameters passed to a function handler.
    pub const fn params(mut self, count: u8) -> Self {
        self.attr.param_count = count;
        self
    }

    /// Name of the active variant. Keys are named by their code.
    pub fn name(&self) -> Name<'static> {
        match self.kind {
            Kind::Main { name, .. }
            | Kind::Function { name, .. }
            | Kind::Variable { name, .. }
            | Kind::User { name, .. } => Name::Text(name),
            Kind::Key { code, .. } => Name::Key(code),
        }
    }

    /// Description of the active variant.
    pub fn desc(&self) -> &'static str {
        match self.kind {
            Kind::Main { desc, .. }
            | Kind::Function { desc, .. }
            | Kind::Variable { desc, .. }
            | Kind::User { desc, .. }
            | Kind::Key { desc, .. } => desc,
        }
    }

    /// `true` for main and function commands.
    pub fn is_command(&self) -> bool {
        matches!(self.kind, Kind::Main { .. } | Kind::Function { .. })
    }

    /// `true` for variables.
    pub fn is_variable(&self) -> bool {
        matches!(self.kind, Kind::Variable { .. })
    }

    /// `true` for users.
    pub fn is_user(&self) -> bool {
        matches!(self.kind, Kind::User { .. })
    }

    /// `true` for key bindings.
    pub fn is_key(&self) -> bool {
        matches!(self.kind, Kind::Key { .. })
    }

    /// The user's password, for user descriptors.
    pub fn password(&self) -> Option<&'static str> {
        match self.kind {
            Kind::User { password, .. } => Some(password),
            _ => None,
        }
    }
}

/// Name of a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Name<'a> {
    /// Commands, variables and users.
    Text(&'a str),
    /// Key bindings, rendered as eight lowercase hex digits.
    Key(u32),
}

impl<'a> Name<'a> {
    /// The textual name, `None` for key bindings.
    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            Name::Text(text) => Some(text),
            Name::Key(_) => None,
        }
    }

    /// Rendered length in bytes.
    pub fn len(&self) -> usize {
        match self {
            Name::Text(text) => text.len(),
            Name::Key(_) => 8,
        }
    }

    /// `true` if the rendered name is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for Name<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Name::Text(text) => f.write_str(text),
            Name::Key(code) => write!(f, "{:08x}", code),
        }
    }
}

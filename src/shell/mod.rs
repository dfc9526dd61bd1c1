//! Interactive command-line session.
//!
//! A [`Shell`] turns a byte stream into command invocations. It is created
//! over a transport, a caller-supplied working buffer and a
//! [`Registry`], and is driven one byte at a time with
//! [`handle_byte`](Shell::handle_byte) or [`poll`](Shell::poll).
//!
//! # Architecture
//!
//! ```text
//! byte ──▶ KeyDecoder ──▶ key action ──▶ LineBuffer / History / Tab
//!               │
//!               └──▶ literal ──▶ LineBuffer
//!
//! Enter ──▶ tokenizer ──▶ Registry lookup (permission gate) ──▶ dispatch
//! ```
//!
//! The working buffer is split into `history_depth + 1` equal slots: the
//! first is the edit line, the others hold history entries.
//!
//! # Example
//!
//! ```rust
//! use libshell::config::Config;
//! use libshell::io::Write;
//! use libshell::registry::{Descriptor, Invoke, Param, Registry};
//! use libshell::shell::Shell;
//!
//! struct Sink(Vec<u8>);
//!
//! impl Write for Sink {
//!     type Error = ();
//!     fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
//!         self.0.extend_from_slice(buf);
//!         Ok(buf.len())
//!     }
//!     fn flush(&mut self) -> Result<(), Self::Error> {
//!         Ok(())
//!     }
//! }
//!
//! fn add(a: Param, b: Param) -> i32 {
//!     a.as_i32() + b.as_i32()
//! }
//!
//! static APP: [Descriptor; 2] = [
//!     Descriptor::user("root", "", "administrator").permission(0xFF),
//!     Descriptor::function("add", "add two numbers", Invoke::Args2(add)),
//! ];
//!
//! let config = Config::default();
//! let registry = Registry::with_builtins(&APP, &config).unwrap();
//! let mut buffer = [0u8; 512];
//! let mut shell = Shell::new(Sink(Vec::new()), &mut buffer, &registry, config).unwrap();
//!
//! shell.run("add 2 3").unwrap();
//! let output = String::from_utf8_lossy(&shell.transport().0);
//! assert!(output.contains("Return: 5, 0x00000005"));
//! ```

pub mod builtins;
mod complete;
mod context;
mod dispatch;
mod editor;
mod history;
mod keys;
mod terminal;
mod text;

pub use complete::{Completion, common_prefix, complete};
pub use context::{Context, Listing};
pub use dispatch::invoke;
pub use editor::{Direction, Echo, LineBuffer};
pub use history::{History, Navigation, Step};
pub use keys::{Decoded, KeyDecoder};
pub use terminal::Terminal;

use crate::config::{Config, MAX_PARAMETERS};
use crate::error::Error;
use crate::io::{Read, TickFn, Write};
use crate::parser::tokenizer;
use crate::registry::{KeyAction, Registry};

/// Prefix inserted by a Tab double-tap when quick help is off.
const HELP_PREFIX: &[u8] = b"help ";

/// One interactive session.
#[derive(Debug)]
pub struct Shell<'a, T: Write> {
    term: Terminal<'a, T>,
    line: LineBuffer<'a>,
    history: History<'a>,
    decoder: KeyDecoder,
    tick: Option<TickFn>,
    active_time: u32,
    tab_flag: bool,
}

impl<'a, T: Write> Shell<'a, T> {
    /// Create a session, log in as the default user and print the prompt.
    ///
    /// `buffer` is split into the edit line and `config.history_depth`
    /// history slots of equal size.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `config` fails validation or
    /// `buffer` is too small to hold a line.
    pub fn new(
        io: T,
        buffer: &'a mut [u8],
        registry: &'a Registry<'a>,
        config: Config,
    ) -> Result<Self, Error> {
        config.validate()?;

        let depth = config.history_depth;
        let line_size = buffer.len() / (depth + 1);
        if line_size < 2 {
            return Err(Error::InvalidConfig);
        }
        let (line, rest) = buffer.split_at_mut(line_size);
        debug!("shell line size {=usize}, history depth {=usize}", line_size, depth);

        let mut shell = Self {
            term: Terminal::new(io, registry, config),
            line: LineBuffer::new(line),
            history: History::new(rest, line_size, depth),
            decoder: KeyDecoder::new(),
            tick: None,
            active_time: 0,
            tab_flag: false,
        };
        shell.term.start();
        shell.term.prompt(true);
        Ok(shell)
    }

    /// Install the millisecond tick source used for Tab double-tap and the
    /// lock timeout. The idle timer starts from the tick read here.
    pub fn set_tick_function(&mut self, tick: TickFn) {
        self.tick = Some(tick);
        if let Some(now) = self.now() {
            self.active_time = now;
        }
    }

    /// The transport.
    pub fn transport(&self) -> &T {
        self.term.transport()
    }

    /// The transport, mutably.
    pub fn transport_mut(&mut self) -> &mut T {
        self.term.transport_mut()
    }

    /// The line being edited.
    pub fn line(&self) -> &[u8] {
        self.line.as_bytes()
    }

    /// Cursor position within [`line`](Self::line).
    pub fn cursor(&self) -> usize {
        self.line.cursor()
    }

    /// `true` once the session has authenticated.
    pub fn is_checked(&self) -> bool {
        self.term.is_checked()
    }

    /// Name of the active user.
    pub fn user(&self) -> Option<&'static str> {
        self.term.user()
    }

    /// Return value of the last reported command.
    pub fn last_return(&self) -> i32 {
        self.term.last_return()
    }

    fn now(&self) -> Option<u32> {
        self.tick.map(|tick| tick()).filter(|&now| now != 0)
    }

    /// Process one input byte.
    ///
    /// NUL bytes are ignored.
    pub fn handle_byte(&mut self, byte: u8) {
        if byte == 0 {
            debug!("dropping NUL input byte");
            return;
        }

        let timeout = self.term.config().lock_timeout_ms;
        if timeout > 0 && self.term.has_password() {
            if let Some(now) = self.now() {
                if now.wrapping_sub(self.active_time) > timeout {
                    self.term.lock();
                }
            }
        }

        match self.decoder.feed(byte, self.term.keys()) {
            Decoded::Pending => {}
            Decoded::Action(action) => self.perform(action),
            Decoded::Literal(byte) => self.input(byte),
        }

        if let Some(now) = self.now() {
            self.active_time = now;
        }
    }

    /// Process a run of input bytes.
    pub fn handle_bytes(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.handle_byte(byte);
        }
    }

    /// Execute `command` as if it had been typed and submitted.
    ///
    /// The line being edited is replaced. No prompt is printed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LineTooLong`] if `command` does not fit the line.
    pub fn run(&mut self, command: &str) -> Result<(), Error> {
        if command.len() >= self.line.capacity() {
            self.term.report(Error::LineTooLong);
            return Err(Error::LineTooLong);
        }
        let active = self.term.is_active();
        self.line.replace(command.as_bytes());
        self.exec();
        self.term.set_active(active);
        Ok(())
    }

    /// Write output that did not come from a command without breaking the
    /// line being edited.
    ///
    /// Outside command execution the current line is cleared, `bytes` are
    /// written and the prompt and line are drawn again.
    pub fn print_above(&mut self, bytes: &[u8]) {
        let active = self.term.is_active();
        if !active {
            self.term.print(text::CLEAR_LINE);
        }
        self.term.write_bytes(bytes);
        if !active {
            self.term.prompt(false);
            if !self.line.is_empty() {
                self.line.redraw(&mut self.term);
            }
        }
    }

    fn input(&mut self, byte: u8) {
        self.tab_flag = false;
        if self.line.insert(byte, &mut self.term).is_err() {
            self.term.report(Error::LineTooLong);
            self.term.prompt(true);
            self.line.redraw(&mut self.term);
        }
    }

    fn perform(&mut self, action: KeyAction) {
        trace!("key action {}", defmt::Debug2Format(&action));
        match action {
            KeyAction::HistoryUp => self.recall(Step::Up),
            KeyAction::HistoryDown => self.recall(Step::Down),
            KeyAction::CursorLeft => self.line.move_left(&mut self.term),
            KeyAction::CursorRight => self.line.move_right(&mut self.term),
            KeyAction::Tab => self.tab(),
            KeyAction::Backspace => self.line.delete(Direction::Backward, &mut self.term),
            KeyAction::Delete => self.line.delete(Direction::Forward, &mut self.term),
            KeyAction::Enter => {
                self.exec();
                self.term.prompt(true);
            }
            KeyAction::Custom(action) => action(&mut self.term),
        }
    }

    fn recall(&mut self, step: Step) {
        match self.history.navigate(step) {
            Navigation::Unchanged => {}
            Navigation::Live => {
                self.line.clear_line(&mut self.term);
                self.line.reset();
            }
            Navigation::Entry(entry) => {
                self.line.clear_line(&mut self.term);
                self.line.replace(entry);
                self.term.text(self.line.as_bytes());
            }
        }
    }

    fn exec(&mut self) {
        if self.line.is_empty() {
            return;
        }

        if !self.term.is_checked() {
            self.term.check_password(self.line.as_bytes());
            self.line.reset();
            return;
        }

        self.history.push(self.line.as_bytes());

        let len = self.line.len();
        let max_params = self.term.config().max_params;
        let split_key = b' ';
        let array_params = self.term.config().array_params;

        let mut found = [None; MAX_PARAMETERS];
        let raw = &mut self.line.raw_mut()[..len];
        let count = tokenizer::split(raw, split_key, array_params, &mut found[..max_params]);
        self.line.reset();
        if count == 0 {
            return;
        }

        let mut starts = [0usize; MAX_PARAMETERS];
        for (start, slot) in starts.iter_mut().zip(&found[..count]) {
            *start = slot.unwrap_or(0);
        }

        self.term.print("\r\n");
        let raw = &mut self.line.raw_mut()[..len];
        self.term.execute(raw, &starts[..count]);
    }

    fn tab(&mut self) {
        let mut count = 0;

        if self.line.is_empty() {
            self.term.list(Listing::All);
            self.term.prompt(true);
        } else {
            let registry = self.term.registry();
            let completion = complete(
                registry.iter().filter(|desc| self.term.visible(desc)),
                self.line.as_bytes(),
            );
            count = completion.count;
            let Some(last) = completion.last else {
                return;
            };

            if count == 1 {
                self.line.clear_line(&mut self.term);
            } else {
                self.term.print("\r\n");
                let prefix = self.line.as_bytes();
                for desc in registry.iter() {
                    if self.term.visible(desc) && complete::is_candidate(desc, prefix) {
                        self.term.list_item(desc);
                    }
                }
            }

            self.line.replace(last.name().as_str().unwrap_or("").as_bytes());
            if count > 1 {
                self.term.prompt(true);
                self.line.truncate(completion.common_len);
            }
            self.term.text(self.line.as_bytes());
        }

        let Some(now) = self.now() else {
            return;
        };
        let double_tap = now.wrapping_sub(self.active_time) < self.term.config().double_tap_ms;
        if count == 1 && self.tab_flag && double_tap {
            if self.term.config().quick_help {
                self.term.print("\r\n");
                let name = self.line.as_bytes();
                if let Ok(name) = core::str::from_utf8(name) {
                    self.term.command_help(name);
                }
                self.term.prompt(true);
                self.term.text(self.line.as_bytes());
            } else {
                self.line.clear_line(&mut self.term);
                if self.line.prepend(HELP_PREFIX).is_ok() {
                    self.term.text(self.line.as_bytes());
                } else {
                    self.line.redraw(&mut self.term);
                }
            }
        } else {
            self.tab_flag = true;
        }
    }
}

impl<'a, T: Read + Write> Shell<'a, T> {
    /// Read at most one byte from the transport and process it.
    ///
    /// Returns `Ok(true)` if a byte was processed.
    ///
    /// # Errors
    ///
    /// Propagates the transport's read error.
    pub fn poll(&mut self) -> Result<bool, <T as Read>::Error> {
        let mut byte = [0u8; 1];
        let read = self.term.transport_mut().read(&mut byte)?;
        if read == 0 {
            return Ok(false);
        }
        self.handle_byte(byte[0]);
        Ok(true)
    }
}

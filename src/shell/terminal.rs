//! Session output and the permission gate.
//!
//! [`Terminal`] owns the transport and everything a running command may
//! observe: the active user, the checked state and the registry. It is the
//! [`Context`] handed to command handlers.

use core::fmt;
use core::fmt::Write as _;
use core::str;

use heapless::Vec;

use super::context::{Context, Listing};
use super::dispatch::invoke;
use super::editor::Echo;
use super::text;
use crate::config::{Config, MAX_PARAMETERS, MAX_TEXT_VALUE};
use crate::error::Error;
use crate::io::Write;
use crate::parser::tokenizer::{token, token_mut};
use crate::parser::{parse_param, parse_word, unescape_str, Slot};
use crate::registry::{Attributes, Descriptor, Invoke, KeyAction, Kind, Param, Registry, VarBacking};

/// Transport plus session state visible to commands.
pub struct Terminal<'a, T: Write> {
    io: T,
    registry: &'a Registry<'a>,
    config: Config,
    user: Option<&'a Descriptor>,
    checked: bool,
    active: bool,
    last_return: i32,
}

impl<T: Write> fmt::Debug for Terminal<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Terminal")
            .field("user", &self.user.map(|u| u.name()))
            .field("checked", &self.checked)
            .field("active", &self.active)
            .field("last_return", &self.last_return)
            .finish_non_exhaustive()
    }
}

fn strip_quotes(token: &[u8]) -> &[u8] {
    let token = token.strip_prefix(b"\"").unwrap_or(token);
    token.strip_suffix(b"\"").unwrap_or(token)
}

impl<'a, T: Write> Terminal<'a, T> {
    pub(crate) fn new(io: T, registry: &'a Registry<'a>, config: Config) -> Self {
        Self {
            io,
            registry,
            config,
            user: None,
            checked: true,
            active: false,
            last_return: 0,
        }
    }

    /// The transport.
    pub fn transport(&self) -> &T {
        &self.io
    }

    /// The transport, mutably.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.io
    }

    pub(crate) fn config(&self) -> &Config {
        &self.config
    }

    pub(crate) fn registry(&self) -> &'a Registry<'a> {
        self.registry
    }

    pub(crate) fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Write everything or give up on the first transport error.
    pub(crate) fn write_bytes(&mut self, mut bytes: &[u8]) {
        while !bytes.is_empty() {
            match self.io.write(bytes) {
                Ok(0) => {
                    warn!("transport accepted no bytes");
                    return;
                }
                Ok(n) => bytes = &bytes[n.min(bytes.len())..],
                Err(_) => {
                    warn!("transport write failed");
                    return;
                }
            }
        }
    }

    /// Permission and authentication check for one descriptor.
    pub(crate) fn visible(&self, desc: &Descriptor) -> bool {
        let caps = self.config.capabilities;
        if (desc.is_user() && !caps.users) || (desc.is_variable() && !caps.variables) {
            return false;
        }

        let permission = desc.attr.permission;
        let permitted = !caps.users
            || permission == 0
            || desc.is_user()
            || self
                .user
                .is_some_and(|user| user.attr.permission & permission != 0);

        permitted && (self.checked || desc.attr.enable_unchecked)
    }

    /// Key bindings the session may use, in registry order.
    pub(crate) fn keys(&self) -> impl Iterator<Item = (u32, KeyAction)> + '_ {
        self.registry
            .iter()
            .filter(|desc| self.visible(desc))
            .filter_map(|desc| match desc.kind {
                Kind::Key { code, action, .. } => Some((code, action)),
                _ => None,
            })
    }

    /// Log in as the configured default user, or run anonymously.
    pub(crate) fn start(&mut self) {
        let user = if self.config.capabilities.users {
            let name = self.config.default_user.clone();
            self.registry
                .seek(&name, 0, 0, Descriptor::is_user)
                .map(|(_, desc)| desc)
        } else {
            None
        };

        trace!("session start");
        match user {
            Some(user) => self.set_user(user, None),
            None => {
                if self.config.capabilities.users {
                    warn!("default user not registered, running anonymously");
                }
                self.user = None;
                self.checked = true;
                self.print(text::CLEAR_SCREEN);
                self.print(text::BANNER);
            }
        }
    }

    /// Switch to `user`.
    ///
    /// The session stays checked only if the user has no password or
    /// `password` matches it.
    pub(crate) fn set_user(&mut self, user: &'a Descriptor, password: Option<&str>) {
        let expected = user.password().unwrap_or("");
        self.user = Some(user);
        self.checked = expected.is_empty() || password == Some(expected);
        debug!("user switched, checked={=bool}", self.checked);

        self.print(text::CLEAR_SCREEN);
        if self.checked {
            self.print(text::BANNER);
        }
    }

    /// `true` if the active user has a password.
    pub(crate) fn has_password(&self) -> bool {
        self.user
            .and_then(Descriptor::password)
            .is_some_and(|password| !password.is_empty())
    }

    /// Require the password again.
    pub(crate) fn lock(&mut self) {
        if self.checked {
            debug!("session locked");
        }
        self.checked = false;
    }

    /// Authenticate with the submitted line.
    pub(crate) fn check_password(&mut self, attempt: &[u8]) {
        let expected = self.user.and_then(Descriptor::password).unwrap_or("");
        if attempt == expected.as_bytes() {
            self.checked = true;
            self.print(text::BANNER);
        } else {
            warn!("password rejected");
            self.print(text::PASSWORD_ERROR);
        }
    }

    /// Write the prompt for the current state.
    pub(crate) fn prompt(&mut self, newline: bool) {
        if !self.checked {
            self.print(text::PASSWORD_HINT);
            return;
        }
        if newline {
            self.print("\r\n");
        }
        match self.user.and_then(|user| user.name().as_str()) {
            Some(name) => self.print(name),
            None => {
                let name = self.config.default_user.clone();
                self.print(&name);
            }
        }
        self.print(":~$ ");
    }

    /// Print `Return: <dec>, 0x<hex>` and remember the value.
    pub(crate) fn report_return(&mut self, value: i32) {
        let _ = write!(self, "Return: {}, 0x{:08x}\r\n", value, value);
        self.last_return = value;
    }

    fn var_value(&self, backing: VarBacking) -> i32 {
        match backing {
            VarBacking::ReturnValue => self.last_return,
            other => other.value(),
        }
    }

    /// Print `name = value` for a variable and return its value.
    pub(crate) fn show_var(&mut self, desc: &Descriptor) -> i32 {
        let Kind::Variable { name, backing, .. } = desc.kind else {
            return 0;
        };
        let value = self.var_value(backing);

        self.print(name);
        self.print(" = ");
        match backing {
            VarBacking::String(slot) => {
                self.print("\"");
                slot.with_text(&mut |text| self.print(text));
                self.print("\"");
            }
            _ => {
                let _ = write!(self, "{}, 0x{:08x}", value, value);
            }
        }
        self.print("\r\n");
        value
    }

    fn write_var(&mut self, desc: &Descriptor, value: &str) -> Result<i32, Error> {
        let Kind::Variable { backing, .. } = desc.kind else {
            return Err(Error::NotAVariable);
        };

        let written = if desc.attr.read_only {
            Err(Error::ReadOnlyVariable)
        } else {
            match backing {
                VarBacking::String(slot) => {
                    let mut buf = [0u8; MAX_TEXT_VALUE];
                    unescape_str(value, &mut buf).and_then(|text| slot.set_text(text))
                }
                VarBacking::Pointer(_) => Err(Error::PointerNotWritable),
                _ => parse_word(value.as_bytes(), &|name: &str| self.lookup_value(name))
                    .and_then(|word| backing.set(word as i32)),
            }
        };

        if let Err(error) = written {
            self.report(error);
        }
        let shown = self.show_var(desc);
        written.map(|()| shown)
    }

    /// Value of a `$name` reference. Non-variables read as 0.
    pub(crate) fn lookup_value(&self, name: &str) -> Option<i32> {
        if !self.config.capabilities.variables {
            return None;
        }
        self.registry
            .seek(name, 0, 0, |desc| self.visible(desc))
            .map(|(_, desc)| match desc.kind {
                Kind::Variable { backing, .. } => self.var_value(backing),
                _ => 0,
            })
    }

    /// One listing line: name, type tag, permission bits, description.
    pub(crate) fn list_item(&mut self, desc: &Descriptor) {
        let name = desc.name();
        let _ = write!(self, "{}", name);

        let pad = text::NAME_COLUMN
            .checked_sub(name.len())
            .filter(|&pad| pad > 0)
            .unwrap_or(4);
        for _ in 0..pad {
            self.print(" ");
        }

        self.print(match desc.kind {
            Kind::Main { .. } | Kind::Function { .. } => text::TAG_COMMAND,
            Kind::Variable { .. } => text::TAG_VARIABLE,
            Kind::User { .. } => text::TAG_USER,
            Kind::Key { .. } => text::TAG_KEY,
        });

        if self.config.show_permission {
            let mut bits = [b'-'; 8];
            for (i, bit) in bits.iter_mut().enumerate() {
                if desc.attr.permission & (0x80 >> i) != 0 {
                    *bit = b'x';
                }
            }
            self.print("  ");
            self.write_bytes(&bits);
        }

        self.print("  ");
        let about = desc.desc().as_bytes();
        let end = about
            .iter()
            .position(|&byte| byte == b'\r' || byte == b'\n')
            .unwrap_or(about.len());
        if end > text::DESC_COLUMN {
            self.write_bytes(&about[..text::DESC_COLUMN]);
            self.print("...");
        } else {
            self.write_bytes(&about[..end]);
        }
        self.print("\r\n");
    }

    fn list_section(&mut self, header: &str, include: fn(&Descriptor) -> bool) {
        self.print(header);
        let registry = self.registry;
        for desc in registry.iter() {
            if include(desc) && self.visible(desc) {
                self.list_item(desc);
            }
        }
    }

    /// Run a tokenized line. `starts` holds the token offsets, command name
    /// first.
    pub(crate) fn execute(&mut self, line: &mut [u8], starts: &[usize]) {
        let Some(&first) = starts.first() else {
            return;
        };
        let found = str::from_utf8(token(line, first))
            .ok()
            .and_then(|name| self.registry.seek(name, 0, 0, |desc| self.visible(desc)));
        let Some((_, desc)) = found else {
            debug!("command not found");
            self.print(text::COMMAND_NOT_FOUND);
            return;
        };

        self.active = true;
        match desc.kind {
            Kind::Main { handler, .. } => {
                let mut argv: Vec<&str, MAX_PARAMETERS> = Vec::new();
                for &start in starts {
                    match str::from_utf8(strip_quotes(token(line, start))) {
                        Ok(arg) => {
                            let _ = argv.push(arg);
                        }
                        Err(_) => {
                            self.report(Error::ParameterParseFailure);
                            self.active = false;
                            return;
                        }
                    }
                }
                let value = handler(self, &argv);
                if !desc.attr.disable_return {
                    self.report_return(value);
                }
            }
            Kind::Function { handler, .. } => match self.call(&handler, desc.attr, line, &starts[1..]) {
                Ok(value) => {
                    if !desc.attr.disable_return {
                        self.report_return(value);
                    }
                }
                Err(error) => self.report(error),
            },
            Kind::Variable { .. } => {
                self.show_var(desc);
            }
            Kind::User { .. } => {
                let password = starts
                    .get(1)
                    .and_then(|&start| str::from_utf8(token(line, start)).ok());
                self.set_user(desc, password);
            }
            Kind::Key { .. } => self.print(text::COMMAND_NOT_FOUND),
        }
        self.active = false;
    }

    /// Parse every parameter, then invoke. Nothing is called if any
    /// parameter fails.
    fn call(
        &self,
        handler: &Invoke,
        attr: Attributes,
        line: &mut [u8],
        starts: &[usize],
    ) -> Result<i32, Error> {
        let mut slots = [(0usize, Slot::Word(0)); MAX_PARAMETERS];
        let count = starts.len().min(MAX_PARAMETERS);
        let lookup = |name: &str| self.lookup_value(name);
        for (slot, &start) in slots.iter_mut().zip(&starts[..count]) {
            *slot = (start, parse_param(token_mut(line, start), &lookup)?);
        }

        let line: &[u8] = line;
        let mut params = [Param::Word(0); MAX_PARAMETERS];
        for (param, &(start, slot)) in params.iter_mut().zip(&slots[..count]) {
            *param = match slot {
                Slot::Word(word) => Param::Word(word),
                Slot::Text { start: offset, len } => {
                    let bytes = &line[start + offset..start + offset + len];
                    Param::Str(str::from_utf8(bytes).map_err(|_| Error::ParameterParseFailure)?)
                }
            };
        }

        let arity = count.max(usize::from(attr.param_count)).min(MAX_PARAMETERS);
        invoke(handler, &params[..arity])
    }
}

impl<T: Write> fmt::Write for Terminal<'_, T> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.write_bytes(s.as_bytes());
        Ok(())
    }
}

impl<T: Write> Echo for Terminal<'_, T> {
    fn text(&mut self, bytes: &[u8]) {
        if !self.config.echo {
            return;
        }
        if self.checked {
            self.write_bytes(bytes);
        } else {
            for _ in bytes {
                self.write_bytes(b"*");
            }
        }
    }

    fn control(&mut self, bytes: &[u8]) {
        if self.config.echo {
            self.write_bytes(bytes);
        }
    }
}

impl<T: Write> Context for Terminal<'_, T> {
    fn print(&mut self, text: &str) {
        self.write_bytes(text.as_bytes());
    }

    fn user(&self) -> Option<&'static str> {
        self.user.and_then(|user| user.name().as_str())
    }

    fn is_checked(&self) -> bool {
        self.checked
    }

    fn list(&mut self, listing: Listing) {
        match listing {
            Listing::All => {
                if self.config.list_users {
                    self.list(Listing::Users);
                }
                self.list(Listing::Commands);
                if self.config.list_variables {
                    self.list(Listing::Variables);
                }
                if self.config.list_keys {
                    self.list(Listing::Keys);
                }
            }
            Listing::Commands => self.list_section(text::COMMAND_LIST, Descriptor::is_command),
            Listing::Variables => self.list_section(text::VARIABLE_LIST, Descriptor::is_variable),
            Listing::Users => self.list_section(text::USER_LIST, Descriptor::is_user),
            Listing::Keys => self.list_section(text::KEY_LIST, Descriptor::is_key),
        }
    }

    fn command_help(&mut self, name: &str) {
        match self.registry.seek(name, 0, 0, |desc| self.visible(desc)) {
            Some((_, desc)) => {
                self.print(text::HELP_HEADER);
                let _ = write!(self, "{}", desc.name());
                self.print("\r\n");
                self.print(desc.desc());
                self.print("\r\n");
            }
            None => self.print(text::COMMAND_NOT_FOUND),
        }
    }

    fn set_var(&mut self, name: &str, value: &str) -> Result<i32, Error> {
        let Some((_, desc)) = self.registry.seek(name, 0, 0, |desc| self.visible(desc)) else {
            self.report(Error::VariableNotFound);
            return Err(Error::VariableNotFound);
        };
        if !desc.is_variable() {
            self.print(name);
            self.print(text::NOT_A_VARIABLE);
            return Err(Error::NotAVariable);
        }
        self.write_var(desc, value)
    }

    fn clear(&mut self, scrollback: bool) {
        self.print(if scrollback {
            text::CLEAR_ALL
        } else {
            text::CLEAR_SCREEN
        });
    }

    fn last_return(&self) -> i32 {
        self.last_return
    }

    fn report(&mut self, error: Error) {
        debug!("reporting {}", error);
        match error {
            Error::LineTooLong => self.print(text::LINE_TOO_LONG),
            Error::CommandNotFound | Error::PermissionDenied => {
                self.print(text::COMMAND_NOT_FOUND)
            }
            Error::ReadOnlyVariable => self.print(text::READ_ONLY),
            Error::PointerNotWritable => self.print(text::POINTER_NOT_WRITABLE),
            Error::VariableNotFound => self.print(text::VARIABLE_NOT_FOUND),
            Error::AuthFailure => self.print(text::PASSWORD_ERROR),
            other => {
                let _ = write!(self, "{}\r\n", other);
            }
        }
    }
}

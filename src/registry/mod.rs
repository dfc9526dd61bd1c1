//! Command registry.
//!
//! A [`Registry`] is an ordered list of static descriptor tables. The shell
//! never mutates it; lookups walk the sections in order and the first match
//! wins, so built-in tables placed first shadow application entries of the
//! same name.

mod descriptor;
mod var;

pub use descriptor::{Attributes, Descriptor, Invoke, Kind, KeyAction, KeyFn, MainFn, Name, Param};
pub use var::{NodeVar, StaticText, TextSlot, VarBacking};

use heapless::Vec;

use crate::config::{Config, LineEnding};
use crate::error::Error;
use crate::shell::builtins;

/// Maximum number of descriptor tables in one registry.
pub const MAX_SECTIONS: usize = 8;

/// Ordered collection of descriptor tables.
#[derive(Debug, Clone, Default)]
pub struct Registry<'a> {
    sections: Vec<&'a [Descriptor], MAX_SECTIONS>,
}

impl<'a> Registry<'a> {
    /// An empty registry.
    pub const fn new() -> Self {
        Self {
            sections: Vec::new(),
        }
    }

    /// A registry holding exactly one table.
    pub fn from_table(table: &'a [Descriptor]) -> Self {
        let mut registry = Self::new();
        // one section always fits
        let _ = registry.sections.push(table);
        registry
    }

    /// A registry with the built-in key bindings and commands followed by
    /// `table`.
    ///
    /// The enter bindings follow `config.line_ending`. `users` needs the
    /// user capability; `vars`, `setVar` and `RETVAL` need variables, and
    /// `RETVAL` is only added when `config.keep_return_value` is set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferOverflow`] if the sections do not fit.
    pub fn with_builtins(table: &'a [Descriptor], config: &Config) -> Result<Self, Error> {
        let mut registry = Self::new();
        registry.push(&builtins::EDIT_KEYS)?;
        match config.line_ending {
            LineEnding::Cr => registry.push(&builtins::ENTER_CR)?,
            LineEnding::Lf => registry.push(&builtins::ENTER_LF)?,
            LineEnding::CrOrLf => registry.push(&builtins::ENTER_CR_OR_LF)?,
            LineEnding::CrLf => registry.push(&builtins::ENTER_CRLF)?,
        }
        registry.push(&builtins::COMMANDS)?;
        let caps = config.capabilities;
        if caps.users {
            registry.push(&builtins::USER_COMMANDS)?;
        }
        if caps.variables {
            registry.push(&builtins::VARIABLE_COMMANDS)?;
            if config.keep_return_value {
                registry.push(&builtins::RETVAL)?;
            }
        }
        registry.push(table)?;
        Ok(registry)
    }

    /// Append a table after the existing ones.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferOverflow`] if [`MAX_SECTIONS`] tables are
    /// already registered.
    pub fn push(&mut self, table: &'a [Descriptor]) -> Result<(), Error> {
        self.sections.push(table).map_err(|_| Error::BufferOverflow)
    }

    /// Total number of descriptors.
    pub fn len(&self) -> usize {
        self.sections.iter().map(|section| section.len()).sum()
    }

    /// `true` if no descriptor is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Descriptor at a flat index across all sections.
    pub fn get(&self, mut index: usize) -> Option<&'a Descriptor> {
        for section in self.sections.iter().copied() {
            if index < section.len() {
                return section.get(index);
            }
            index -= section.len();
        }
        None
    }

    /// All descriptors in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &'a Descriptor> + '_ {
        self.sections
            .iter()
            .copied()
            .flat_map(|section: &'a [Descriptor]| section.iter())
    }

    /// Find a named descriptor starting at flat index `start`.
    ///
    /// With `compare_len == 0` names must match exactly; otherwise only the
    /// first `compare_len` bytes of both names are compared. Key bindings
    /// are never returned, and neither is anything `visible` rejects.
    pub fn seek<F>(
        &self,
        name: &str,
        start: usize,
        compare_len: usize,
        visible: F,
    ) -> Option<(usize, &'a Descriptor)>
    where
        F: Fn(&Descriptor) -> bool,
    {
        self.iter()
            .enumerate()
            .skip(start)
            .filter(|(_, desc)| !desc.is_key() && visible(desc))
            .find(|(_, desc)| {
                desc.name()
                    .as_str()
                    .is_some_and(|candidate| names_match(name, candidate, compare_len))
            })
    }
}

fn names_match(name: &str, candidate: &str, compare_len: usize) -> bool {
    if compare_len == 0 {
        return name == candidate;
    }
    let a = &name.as_bytes()[..name.len().min(compare_len)];
    let b = &candidate.as_bytes()[..candidate.len().min(compare_len)];
    a == b
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::Context;

    fn nop(_ctx: &mut dyn Context, _argv: &[&str]) -> i32 {
        0
    }

    static FIRST: [Descriptor; 2] = [
        Descriptor::main("status", "", nop),
        Descriptor::key(0x1B000000, "", KeyAction::Tab),
    ];
    static SECOND: [Descriptor; 2] = [
        Descriptor::main("stop", "", nop).permission(0x01),
        Descriptor::main("status", "shadowed", nop),
    ];

    fn registry() -> Registry<'static> {
        let mut registry = Registry::from_table(&FIRST);
        registry.push(&SECOND).unwrap();
        registry
    }

    #[test]
    fn flat_indexing_spans_sections() {
        let registry = registry();
        assert_eq!(registry.len(), 4);
        assert_eq!(registry.get(2).map(|d| d.name()), Some(Name::Text("stop")));
        assert!(registry.get(4).is_none());
    }

    #[test]
    fn first_match_wins_and_keys_are_skipped() {
        let registry = registry();
        let (index, found) = registry.seek("status", 0, 0, |_| true).unwrap();
        assert_eq!(index, 0);
        assert_eq!(found.desc(), "");

        let (index, found) = registry.seek("status", 1, 0, |_| true).unwrap();
        assert_eq!(index, 3);
        assert_eq!(found.desc(), "shadowed");
    }

    #[test]
    fn prefix_compare_and_visibility() {
        let registry = registry();
        assert_eq!(registry.seek("sto", 0, 3, |_| true).map(|(i, _)| i), Some(2));
        assert!(registry.seek("sto", 0, 0, |_| true).is_none());
        assert!(
            registry
                .seek("stop", 0, 0, |d| d.attr.permission == 0)
                .is_none()
        );
    }

    #[test]
    fn too_many_sections() {
        let mut registry = Registry::new();
        for _ in 0..MAX_SECTIONS {
            registry.push(&FIRST).unwrap();
        }
        assert_eq!(registry.push(&FIRST), Err(Error::BufferOverflow));
    }

    #[test]
    fn builtins_follow_line_ending() {
        let config = Config {
            line_ending: LineEnding::CrOrLf,
            ..Config::default()
        };
        let registry = Registry::with_builtins(&SECOND, &config).unwrap();
        let enters = registry
            .iter()
            .filter(|d| matches!(d.kind, Kind::Key { action: KeyAction::Enter, .. }))
            .count();
        assert_eq!(enters, 2);
        assert!(registry.seek("RETVAL", 0, 0, |_| true).is_none());

        let config = Config {
            keep_return_value: true,
            ..Config::default()
        };
        let registry = Registry::with_builtins(&SECOND, &config).unwrap();
        assert!(registry.seek("RETVAL", 0, 0, |_| true).is_some());
    }

    #[test]
    fn reduced_builtins_leave_out_user_and_variable_commands() {
        let config = Config {
            keep_return_value: true,
            ..Config::reduced()
        };
        let registry = Registry::with_builtins(&SECOND, &config).unwrap();
        for name in ["users", "vars", "setVar", "RETVAL"] {
            assert!(registry.seek(name, 0, 0, |_| true).is_none(), "{name}");
        }
        for name in ["help", "cmds", "keys", "clear", "cclear"] {
            assert!(registry.seek(name, 0, 0, |_| true).is_some(), "{name}");
        }
    }
}

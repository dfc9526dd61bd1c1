//! # libshell - embeddable command shell
//!
//! An interactive command line for firmware and other constrained hosts. A
//! session reads bytes from any transport, edits a line in place, and runs
//! commands looked up in a static registry. No heap is required: every
//! buffer is supplied by the caller.
//!
//! ## Features
//!
//! - Line editing with cursor movement, insert and delete
//! - Command history with up/down recall
//! - Tab completion with double-tap help
//! - Typed parameters: decimal, hex, binary, octal, float, char literal,
//!   quoted string and `$variable` references
//! - Users with permission bits and password login
//! - Variables backed by atomics, text slots or application nodes
//! - Multi-byte key bindings, including application-defined ones
//!
//! ## Usage
//!
//! ```rust
//! use libshell::{Config, Registry, Shell};
//! use libshell::io::Write;
//! use libshell::registry::{Descriptor, VarBacking};
//! use core::sync::atomic::AtomicI32;
//!
//! struct Console(Vec<u8>);
//!
//! impl Write for Console {
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
//! static SPEED: AtomicI32 = AtomicI32::new(42);
//! static APP: [Descriptor; 2] = [
//!     Descriptor::user("root", "", "administrator").permission(0xFF),
//!     Descriptor::variable("speed", "motor speed", VarBacking::Int(&SPEED)),
//! ];
//!
//! let config = Config::default();
//! let registry = Registry::with_builtins(&APP, &config).unwrap();
//! let mut buffer = [0u8; 256];
//! let mut shell = Shell::new(Console(Vec::new()), &mut buffer, &registry, config).unwrap();
//!
//! shell.handle_bytes(b"speed\r");
//! let output = String::from_utf8_lossy(&shell.transport().0);
//! assert!(output.contains("speed = 42, 0x0000002a"));
//! ```
//!
//! ## Optional Features
//!
//! - `std`: Enable standard library support (default: disabled)
//! - `defmt`: Enable defmt logging support for embedded debugging

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(missing_docs)]
#![warn(missing_debug_implementations)]

#[macro_use]
mod macros;

/// Session configuration and compile-time limits.
pub mod config;

/// Error type shared by every module.
pub mod error;

/// Transport traits the session reads from and writes to.
pub mod io;

/// Number and literal parsing, and the line tokenizer.
pub mod parser;

/// Descriptors and the registry they are looked up in.
pub mod registry;

/// The interactive session.
pub mod shell;

pub use config::Config;
pub use error::Error;
pub use registry::Registry;
pub use shell::Shell;

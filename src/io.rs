//! Byte transport abstraction.
//!
//! A shell session talks to the outside world through a single transport,
//! typically a UART, a USB CDC endpoint or a telnet socket. The transport is
//! supplied by the host when the session is created and must be synchronous:
//! both calls either complete or fail within a bounded time.
//!
//! ```rust
//! use libshell::io::{Read, Write};
//!
//! struct Uart;
//!
//! impl Read for Uart {
//!     type Error = ();
//!     fn read(&mut self, _buf: &mut [u8]) -> Result<usize, Self::Error> {
//!         Ok(0)
//!     }
//! }
//!
//! impl Write for Uart {
//!     type Error = ();
//!     fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
//!         Ok(buf.len())
//!     }
//!     fn flush(&mut self) -> Result<(), Self::Error> {
//!         Ok(())
//!     }
//! }
//! ```

#![deny(unsafe_code)]

/// Re-exports of the transport traits
pub mod prelude {
    pub use super::{Read, TickFn, Write};
}

/// Source of input bytes.
pub trait Read {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Read up to `buf.len()` bytes, returning how many were read.
    ///
    /// Returning `Ok(0)` means no byte is currently available.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

/// Sink for output bytes.
pub trait Write {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Write data to the transport, returning how many bytes were accepted.
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error>;
    /// Flush the write buffer
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// Monotonic millisecond counter.
///
/// Used only for Tab double-tap detection and the login lock timeout. When no
/// tick function is installed both features are disabled.
pub type TickFn = fn() -> u32;

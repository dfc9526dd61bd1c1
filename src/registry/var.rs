//! Storage behind variable descriptors.

use core::any::Any;
use core::cell::RefCell;
use core::fmt;
use core::sync::atomic::{AtomicI8, AtomicI16, AtomicI32, Ordering};

use critical_section::Mutex;

use crate::error::Error;

/// A variable computed by host callbacks instead of stored in memory.
pub trait NodeVar: Sync {
    /// Current value.
    fn get(&self) -> i32;
    /// Store a new value. Ignored unless overridden.
    fn set(&self, _value: i32) {}
}

/// Text storage that can be shared with the shell.
pub trait TextSlot: Sync {
    /// Run `f` on the current text.
    fn with_text(&self, f: &mut dyn FnMut(&str));
    /// Replace the text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferOverflow`] if `text` does not fit.
    fn set_text(&self, text: &str) -> Result<(), Error>;
}

/// A fixed-capacity string that can live in a `static`.
///
/// ```rust
/// use libshell::registry::StaticText;
///
/// static HOSTNAME: StaticText<16> = StaticText::new();
///
/// HOSTNAME.set("sensor-7").unwrap();
/// assert_eq!(HOSTNAME.get().as_str(), "sensor-7");
/// assert!(HOSTNAME.set("a-name-much-longer-than-sixteen").is_err());
/// ```
pub struct StaticText<const N: usize> {
    inner: Mutex<RefCell<heapless::String<N>>>,
}

impl<const N: usize> StaticText<N> {
    /// An empty string.
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(heapless::String::new())),
        }
    }

    /// A copy of the current text.
    pub fn get(&self) -> heapless::String<N> {
        critical_section::with(|cs| self.inner.borrow_ref(cs).clone())
    }

    /// Replace the text. The old value is kept if `text` does not fit.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferOverflow`] if `text` is longer than `N` bytes.
    pub fn set(&self, text: &str) -> Result<(), Error> {
        let mut value = heapless::String::new();
        value.push_str(text).map_err(|_| Error::BufferOverflow)?;
        critical_section::with(|cs| *self.inner.borrow_ref_mut(cs) = value);
        Ok(())
    }
}

impl<const N: usize> Default for StaticText<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> fmt::Debug for StaticText<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StaticText").field(&self.get()).finish()
    }
}

impl<const N: usize> TextSlot for StaticText<N> {
    fn with_text(&self, f: &mut dyn FnMut(&str)) {
        let text = self.get();
        f(&text);
    }

    fn set_text(&self, text: &str) -> Result<(), Error> {
        self.set(text)
    }
}

/// Where a variable's value lives.
#[derive(Clone, Copy)]
pub enum VarBacking {
    /// 32-bit signed integer.
    Int(&'static AtomicI32),
    /// 16-bit signed integer, sign-extended when read.
    Short(&'static AtomicI16),
    /// 8-bit signed integer, sign-extended when read.
    Char(&'static AtomicI8),
    /// Text.
    String(&'static dyn TextSlot),
    /// Opaque object, shown by address only and never writable.
    Pointer(&'static (dyn Any + Sync)),
    /// Host callbacks.
    Node(&'static dyn NodeVar),
    /// Return value of the last command, resolved by the session reading it.
    ReturnValue,
}

impl VarBacking {
    /// Current value as a machine word.
    ///
    /// Integers are sign-extended. Strings and pointers yield their address.
    pub fn value(&self) -> i32 {
        match self {
            VarBacking::Int(cell) => cell.load(Ordering::Relaxed),
            VarBacking::Short(cell) => i32::from(cell.load(Ordering::Relaxed)),
            VarBacking::Char(cell) => i32::from(cell.load(Ordering::Relaxed)),
            VarBacking::String(slot) => address(*slot),
            VarBacking::Pointer(object) => address(*object),
            VarBacking::Node(node) => node.get(),
            VarBacking::ReturnValue => 0,
        }
    }

    /// Store a machine word, truncating to the backing width.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PointerNotWritable`] for pointers,
    /// [`Error::ParameterParseFailure`] for strings and
    /// [`Error::ReadOnlyVariable`] for the return value.
    pub fn set(&self, value: i32) -> Result<(), Error> {
        match self {
            VarBacking::Int(cell) => cell.store(value, Ordering::Relaxed),
            VarBacking::Short(cell) => cell.store(value as i16, Ordering::Relaxed),
            VarBacking::Char(cell) => cell.store(value as i8, Ordering::Relaxed),
            VarBacking::Node(node) => node.set(value),
            VarBacking::String(_) => return Err(Error::ParameterParseFailure),
            VarBacking::Pointer(_) => return Err(Error::PointerNotWritable),
            VarBacking::ReturnValue => return Err(Error::ReadOnlyVariable),
        }
        Ok(())
    }

    /// `true` for text variables.
    pub fn is_text(&self) -> bool {
        matches!(self, VarBacking::String(_))
    }

    /// `true` for pointer variables.
    pub fn is_pointer(&self) -> bool {
        matches!(self, VarBacking::Pointer(_))
    }
}

impl fmt::Debug for VarBacking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VarBacking::Int(cell) => f.debug_tuple("Int").field(cell).finish(),
            VarBacking::Short(cell) => f.debug_tuple("Short").field(cell).finish(),
            VarBacking::Char(cell) => f.debug_tuple("Char").field(cell).finish(),
            VarBacking::String(_) => f.write_str("String"),
            VarBacking::Pointer(_) => f.write_str("Pointer"),
            VarBacking::Node(node) => f.debug_tuple("Node").field(&node.get()).finish(),
            VarBacking::ReturnValue => f.write_str("ReturnValue"),
        }
    }
}

fn address<T: ?Sized>(object: &T) -> i32 {
    (object as *const T).cast::<()>() as usize as i32
}

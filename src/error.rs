//! Common error type for shell operations

use core::fmt;

/// A common error type for shell operations.
///
/// Every variant is reported locally on the session's transport; none of them
/// is fatal to the session. The enum is kept small and `Copy` so that it is
/// portable to `no_std` targets.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// The input line does not fit into the edit buffer.
    LineTooLong,
    /// No visible descriptor matches the command name.
    CommandNotFound,
    /// A parameter token could not be converted into a value.
    ParameterParseFailure,
    /// The number of parameters does not match the handler's signature.
    ArityMismatch,
    /// The descriptor exists but the session may not see it.
    ///
    /// Never shown to the user, who sees [`Error::CommandNotFound`] instead.
    PermissionDenied,
    /// The variable is marked read-only.
    ReadOnlyVariable,
    /// Pointer variables cannot be written.
    PointerNotWritable,
    /// The variable named by `setVar` does not exist.
    VariableNotFound,
    /// The name given to `setVar` refers to something that is not a variable.
    NotAVariable,
    /// The supplied password does not match.
    AuthFailure,
    /// A value does not fit into its fixed-size storage.
    BufferOverflow,
    /// The configuration or the supplied buffers are unusable.
    InvalidConfig,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Error::LineTooLong => "command is too long",
            Error::CommandNotFound | Error::PermissionDenied => "command not found",
            Error::ParameterParseFailure => "parameter parse failed",
            Error::ArityMismatch => "parameter count mismatch",
            Error::ReadOnlyVariable => "can't set read only var",
            Error::PointerNotWritable => "can't set pointer",
            Error::VariableNotFound => "var not found",
            Error::NotAVariable => "not a var",
            Error::AuthFailure => "password error",
            Error::BufferOverflow => "value too long",
            Error::InvalidConfig => "invalid configuration",
        };
        f.write_str(text)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::LineTooLong => defmt::write!(f, "LineTooLong"),
            Error::CommandNotFound => defmt::write!(f, "CommandNotFound"),
            Error::ParameterParseFailure => defmt::write!(f, "ParameterParseFailure"),
            Error::ArityMismatch => defmt::write!(f, "ArityMismatch"),
            Error::PermissionDenied => defmt::write!(f, "PermissionDenied"),
            Error::ReadOnlyVariable => defmt::write!(f, "ReadOnlyVariable"),
            Error::PointerNotWritable => defmt::write!(f, "PointerNotWritable"),
            Error::VariableNotFound => defmt::write!(f, "VariableNotFound"),
            Error::NotAVariable => defmt::write!(f, "NotAVariable"),
            Error::AuthFailure => defmt::write!(f, "AuthFailure"),
            Error::BufferOverflow => defmt::write!(f, "BufferOverflow"),
            Error::InvalidConfig => defmt::write!(f, "InvalidConfig"),
        }
    }
}

//! Logging shims.
//!
//! With the `defmt` feature enabled these forward to the `defmt` macros of the
//! same name. Without it they expand to nothing, so arguments must not have
//! side effects.

#[cfg(feature = "defmt")]
macro_rules! trace {
    ($($arg:tt)+) => { defmt::trace!($($arg)+) };
}

#[cfg(not(feature = "defmt"))]
macro_rules! trace {
    ($($arg:tt)+) => {{}};
}

#[cfg(feature = "defmt")]
macro_rules! debug {
    ($($arg:tt)+) => { defmt::debug!($($arg)+) };
}

#[cfg(not(feature = "defmt"))]
macro_rules! debug {
    ($($arg:tt)+) => {{}};
}

#[cfg(feature = "defmt")]
macro_rules! warn {
    ($($arg:tt)+) => { defmt::warn!($($arg)+) };
}

#[cfg(not(feature = "defmt"))]
macro_rules! warn {
    ($($arg:tt)+) => {{}};
}

//! # Command line parsing
//!
//! Two stages turn a submitted line into handler arguments:
//!
//! 1. [`tokenizer::split`] cuts the line into tokens in place, honouring
//!    `"..."` (and optionally `[...]`) regions and `\` escapes.
//! 2. [`parse_param`] converts one token into a typed value: a machine word
//!    for numbers, character literals and `$name` references, or a string
//!    view for everything else.
//!
//! ## Literal syntax
//!
//! | Token        | Result                                   |
//! |--------------|------------------------------------------|
//! | `42`, `-42`  | decimal                                  |
//! | `0x1F`       | hexadecimal                              |
//! | `0b101`      | binary                                   |
//! | `017`        | octal                                    |
//! | `3.5`        | `f32` bit pattern                        |
//! | `'a'`, `'\n'`| character code                           |
//! | `$name`      | current value of a variable              |
//! | `"a b"`, `x` | string, with `\` escapes resolved        |
//!
//! ```rust
//! use libshell::parser::parse_number;
//!
//! assert_eq!(parse_number(b"0x1F"), 31);
//! assert_eq!(parse_number(b"-42") as i32, -42);
//! assert_eq!(f32::from_bits(parse_number(b"3.5")), 3.5);
//! ```

pub mod tokenizer;


use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumberType {
    Decimal,
    Hexadecimal,
    Octal,
    Binary,
    Float,
}

/// A parsed parameter, before it is bound to the line buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// A machine word.
    Word(u32),
    /// An unescaped string at `start..start + len` within the token.
    Text {
        /// Offset of the first byte.
        start: usize,
        /// Length in bytes.
        len: usize,
    },
}

fn number_type(digits: &[u8]) -> NumberType {
    let mut kind = match digits {
        [b'0', b'x' | b'X', ..] => NumberType::Hexadecimal,
        [b'0', b'b' | b'B', ..] => NumberType::Binary,
        [b'0', ..] => NumberType::Octal,
        _ => NumberType::Decimal,
    };
    // a '.' with something after it makes a float whatever the prefix
    if digits
        .windows(2)
        .skip(1)
        .any(|pair| pair[0] == b'.' && pair[1] != 0)
    {
        kind = NumberType::Float;
    }
    kind
}

fn digit_value(code: u8) -> u32 {
    match code {
        b'0'..=b'9' => u32::from(code - b'0'),
        b'a'..=b'f' => u32::from(code - b'a') + 10,
        b'A'..=b'F' => u32::from(code - b'A') + 10,
        _ => 0,
    }
}

/// Convert a numeric token into a machine word.
///
/// Never fails: characters outside the radix contribute their hex digit
/// value, or 0, and arithmetic wraps. Floats are returned by bit pattern.
pub fn parse_number(token: &[u8]) -> u32 {
    let negative = token.first() == Some(&b'-');
    let digits = if negative { &token[1..] } else { token };

    let kind = number_type(digits);
    let (radix, offset) = match kind {
        NumberType::Hexadecimal => (16, 2),
        NumberType::Octal => (8, 1),
        NumberType::Binary => (2, 2),
        NumberType::Decimal | NumberType::Float => (10, 0),
    };

    let mut value: u32 = 0;
    let mut divide: u32 = 0;
    for &code in digits.iter().skip(offset).take_while(|&&code| code != 0) {
        if code == b'.' {
            divide = 1;
            continue;
        }
        value = value.wrapping_mul(radix).wrapping_add(digit_value(code));
        divide = divide.wrapping_mul(10);
    }

    if kind == NumberType::Float && divide != 0 {
        let sign = if negative { -1.0 } else { 1.0 };
        (value as f32 / divide as f32 * sign).to_bits()
    } else if negative {
        value.wrapping_neg()
    } else {
        value
    }
}

/// Decode a character literal.
///
/// A leading `'` is skipped. `\b`, `\r`, `\n`, `\t` and `\0` are escapes;
/// any other escaped byte stands for itself.
pub fn parse_char(token: &[u8]) -> u8 {
    let body = match token {
        [b'\'', rest @ ..] => rest,
        _ => token,
    };
    match body {
        [b'\\', escaped, ..] => match escaped {
            b'b' => 0x08,
            b'r' => b'\r',
            b'n' => b'\n',
            b't' => b'\t',
            b'0' => 0,
            other => *other,
        },
        [b'\\'] | [] => 0,
        [code, ..] => *code,
    }
}

/// Resolve escapes of a string token in place.
///
/// A leading `"` is skipped and a `"` ends the string. Returns the start
/// offset and length of the result within `token`. Bytes are only ever
/// moved towards the front, so the scan never reads what it has written.
pub fn unescape_in_place(token: &mut [u8]) -> (usize, usize) {
    let start = usize::from(token.first() == Some(&b'"'));
    let mut read = start;
    let mut write = start;
    let mut end = None;

    while read < token.len() && token[read] != 0 {
        let code = match token[read] {
            b'\\' => {
                let code = parse_char(&token[read..]);
                read += 1;
                code
            }
            b'"' => 0,
            code => code,
        };
        token[write] = code;
        if code == 0 && end.is_none() {
            end = Some(write);
        }
        read += 1;
        write += 1;
    }

    let end = end.unwrap_or(write);
    (start, end - start)
}

/// Resolve escapes of `text` into `buf` and return the result.
///
/// # Errors
///
/// Returns [`Error::BufferOverflow`] when `text` does not fit in `buf` and
/// [`Error::ParameterParseFailure`] when an escape yields invalid UTF-8.
pub fn unescape_str<'b>(text: &str, buf: &'b mut [u8]) -> Result<&'b str, Error> {
    let raw = text.as_bytes();
    let scratch = buf.get_mut(..raw.len()).ok_or(Error::BufferOverflow)?;
    scratch.copy_from_slice(raw);
    let (start, len) = unescape_in_place(scratch);
    core::str::from_utf8(&scratch[start..start + len]).map_err(|_| Error::ParameterParseFailure)
}

/// Convert one token into a machine word without touching it.
///
/// `lookup` resolves `$name` references to variable values.
///
/// # Errors
///
/// Returns [`Error::ParameterParseFailure`] for empty tokens, string tokens
/// and unresolved references.
pub fn parse_word(token: &[u8], lookup: &dyn Fn(&str) -> Option<i32>) -> Result<u32, Error> {
    match token {
        [b'\'', next, ..] if *next != 0 => Ok(u32::from(parse_char(token))),
        [b'-' | b'0'..=b'9', ..] => Ok(parse_number(token)),
        [b'$', name @ ..] if !name.is_empty() => {
            let name = core::str::from_utf8(name).map_err(|_| Error::ParameterParseFailure)?;
            lookup(name)
                .map(|value| value as u32)
                .ok_or(Error::ParameterParseFailure)
        }
        _ => Err(Error::ParameterParseFailure),
    }
}

/// Convert one token into a [`Slot`].
///
/// Character literals, numbers and `$name` references become words. Any
/// other non-empty token is a string and is unescaped in place; nothing is
/// modified when parsing fails.
///
/// # Errors
///
/// Returns [`Error::ParameterParseFailure`] for an empty token or a
/// reference `lookup` cannot resolve.
pub fn parse_param(token: &mut [u8], lookup: &dyn Fn(&str) -> Option<i32>) -> Result<Slot, Error> {
    match token {
        [] => Err(Error::ParameterParseFailure),
        [b'\'', next, ..] if *next != 0 => parse_word(token, lookup).map(Slot::Word),
        [b'-' | b'0'..=b'9', ..] => parse_word(token, lookup).map(Slot::Word),
        [b'$', rest @ ..] if !rest.is_empty() => parse_word(token, lookup).map(Slot::Word),
        _ => {
            let (start, len) = unescape_in_place(token);
            Ok(Slot::Text { start, len })
        }
    }
}

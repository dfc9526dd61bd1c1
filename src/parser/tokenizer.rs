//! In-place line tokenizer.

/// Depth of the open-pair stack. Deeper nesting wraps around.
const PAIR_DEPTH: usize = 16;

const QUOTES: (u8, u8) = (b'"', b'"');
const BRACKETS: (u8, u8) = (b'[', b']');

/// Split `line` into tokens in place.
///
/// Separators (`split_key` or a space) outside any open `"..."` region are
/// overwritten with 0 and the start offset of each token is stored in
/// `out`. With `array_params`, `[...]` regions are kept together as well.
/// A `\` protects the byte after it.
///
/// Every slot of `out` is written: unused ones become `None`. Tokens past
/// `out.len()` are not recorded. Returns the number of tokens recorded.
///
/// ```rust
/// use libshell::parser::tokenizer::{split, token};
///
/// let mut line = *b"echo \"hello world\" 42";
/// let mut out = [None; 4];
///
/// assert_eq!(split(&mut line, b' ', false, &mut out), 3);
/// assert_eq!(token(&line, out[1].unwrap()), b"\"hello world\"");
/// assert_eq!(out[3], None);
/// ```
pub fn split(line: &mut [u8], split_key: u8, array_params: bool, out: &mut [Option<usize>]) -> usize {
    out.iter_mut().for_each(|slot| *slot = None);

    let pairs: &[(u8, u8)] = if array_params {
        &[QUOTES, BRACKETS]
    } else {
        &[QUOTES]
    };

    let mut record = true;
    let mut open = [0u8; PAIR_DEPTH];
    let mut depth = 0usize;
    let mut count = 0usize;

    let mut i = 0;
    while i < line.len() {
        let code = line[i];
        let next = line.get(i + 1).copied().unwrap_or(0);

        if depth == 0 {
            if code != split_key && record && count < out.len() {
                out[count] = Some(i);
                count += 1;
                record = false;
            } else if (code == split_key || code == b' ') && !record {
                line[i] = 0;
                if next != b' ' {
                    record = true;
                }
                i += 1;
                continue;
            }
        }

        for &(left, right) in pairs {
            if depth > 0 && code == right && open[depth - 1] == left {
                depth -= 1;
                break;
            } else if code == left {
                open[depth] = left;
                depth = (depth + 1) & (PAIR_DEPTH - 1);
                break;
            }
        }

        if code == b'\\' && next != 0 {
            i += 1;
        }
        i += 1;
    }

    count
}

/// The token starting at `start`, up to its terminator or the line end.
pub fn token(line: &[u8], start: usize) -> &[u8] {
    let rest = line.get(start..).unwrap_or(&[]);
    let len = rest.iter().position(|&code| code == 0).unwrap_or(rest.len());
    &rest[..len]
}

/// Mutable view of the token starting at `start`.
pub fn token_mut(line: &mut [u8], start: usize) -> &mut [u8] {
    let rest = line.get_mut(start..).unwrap_or(&mut []);
    let len = rest.iter().position(|&code| code == 0).unwrap_or(rest.len());
    &mut rest[..len]
}

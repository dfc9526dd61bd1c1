//! Arity-checked invocation of function handlers.

use crate::error::Error;
use crate::registry::{Invoke, Param};

/// Call `handler` with `params`.
///
/// Fixed-arity handlers are only called when `params.len()` equals their
/// arity; the caller is expected to have padded the list to the declared
/// minimum already.
///
/// # Errors
///
/// Returns [`Error::ArityMismatch`] without calling the handler if the
/// counts differ.
pub fn invoke(handler: &Invoke, params: &[Param<'_>]) -> Result<i32, Error> {
    let value = match (handler, params) {
        (Invoke::Args0(f), []) => f(),
        (Invoke::Args1(f), [a]) => f(*a),
        (Invoke::Args2(f), [a, b]) => f(*a, *b),
        (Invoke::Args3(f), [a, b, c]) => f(*a, *b, *c),
        (Invoke::Args4(f), [a, b, c, d]) => f(*a, *b, *c, *d),
        (Invoke::Args5(f), [a, b, c, d, e]) => f(*a, *b, *c, *d, *e),
        (Invoke::Args6(f), [a, b, c, d, e, g]) => f(*a, *b, *c, *d, *e, *g),
        (Invoke::Args7(f), [a, b, c, d, e, g, h]) => f(*a, *b, *c, *d, *e, *g, *h),
        (Invoke::Args8(f), [a, b, c, d, e, g, h, i]) => f(*a, *b, *c, *d, *e, *g, *h, *i),
        (Invoke::Variadic(f), all) => f(all),
        _ => {
            debug!("arity mismatch: {=usize} parameters", params.len());
            return Err(Error::ArityMismatch);
        }
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add(a: Param, b: Param) -> i32 {
        a.as_i32() + b.as_i32()
    }

    fn count(params: &[Param]) -> i32 {
        params.len() as i32
    }

    fn greet(name: Param) -> i32 {
        name.as_str().map_or(-1, |s| s.len() as i32)
    }

    #[test]
    fn exact_arity_is_invoked() {
        let params = [Param::Word(2), Param::Word(3)];
        assert_eq!(invoke(&Invoke::Args2(add), &params), Ok(5));
        assert_eq!(invoke(&Invoke::Args1(greet), &[Param::Str("bob")]), Ok(3));
    }

    #[test]
    fn wrong_arity_is_rejected() {
        assert_eq!(
            invoke(&Invoke::Args2(add), &[Param::Word(1)]),
            Err(Error::ArityMismatch)
        );
        assert_eq!(
            invoke(&Invoke::Args0(|| 0), &[Param::Word(1)]),
            Err(Error::ArityMismatch)
        );
    }

    #[test]
    fn variadic_takes_anything() {
        assert_eq!(invoke(&Invoke::Variadic(count), &[]), Ok(0));
        let params = [Param::Word(0); 12];
        assert_eq!(invoke(&Invoke::Variadic(count), &params), Ok(12));
    }
}

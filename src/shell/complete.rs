//! Tab completion over descriptor names.

use crate::registry::Descriptor;

/// Summary of the names matching a prefix.
#[derive(Debug, Clone, Copy, Default)]
pub struct Completion<'a> {
    /// Number of matching descriptors.
    pub count: usize,
    /// The last match in registry order.
    pub last: Option<&'a Descriptor>,
    /// Longest prefix shared by all matches. Only meaningful when
    /// `count > 1`.
    pub common_len: usize,
}

/// Number of leading bytes `a` and `b` have in common.
pub fn common_prefix(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

/// `true` if `desc` is a named descriptor that starts with `prefix`.
pub fn is_candidate(desc: &Descriptor, prefix: &[u8]) -> bool {
    desc.name()
        .as_str()
        .is_some_and(|name| common_prefix(prefix, name.as_bytes()) == prefix.len())
}

/// Fold the descriptors starting with `prefix`.
///
/// `candidates` should already be restricted to what the session may see.
pub fn complete<'a, I>(candidates: I, prefix: &[u8]) -> Completion<'a>
where
    I: IntoIterator<Item = &'a Descriptor>,
{
    let mut completion = Completion {
        count: 0,
        last: None,
        common_len: usize::MAX,
    };

    for desc in candidates {
        if !is_candidate(desc, prefix) {
            continue;
        }
        if let Some(last) = completion.last {
            let shared = match (last.name().as_str(), desc.name().as_str()) {
                (Some(a), Some(b)) => common_prefix(a.as_bytes(), b.as_bytes()),
                _ => 0,
            };
            completion.common_len = completion.common_len.min(shared);
        }
        completion.last = Some(desc);
        completion.count += 1;
    }

    if completion.count < 2 {
        completion.common_len = completion
            .last
            .and_then(|d| d.name().as_str())
            .map_or(0, str::len);
    }
    completion
}

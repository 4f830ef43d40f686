use crate::Name;
use std::collections::BTreeMap;
use ustr::ustr;

/// A source of fresh variable names.
///
/// Every prefix counts independently from zero, so drawing from `t` and `h`
/// yields `t0, t1, ..` and `h0, h1, ..`. The stream is a plain value: drawing
/// a name returns the advanced stream and leaves this one as it was.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FreshVariableStream {
    counters: BTreeMap<Name, u32>,
}

impl FreshVariableStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draws the next name for `prefix`.
    #[must_use]
    pub fn next(&self, prefix: &str) -> (Self, Name) {
        let key = ustr(prefix);
        let n = self.counters.get(&key).copied().unwrap_or(0);
        let mut counters = self.counters.clone();
        counters.insert(key, n + 1);
        (Self { counters }, ustr(&format!("{prefix}{n}")))
    }

    /// Draws `count` names for `prefix`, in order.
    #[must_use]
    pub fn take(&self, prefix: &str, count: usize) -> (Self, Vec<Name>) {
        let mut fresh = self.clone();
        let mut names = Vec::with_capacity(count);
        for _ in 0..count {
            let (next, name) = fresh.next(prefix);
            fresh = next;
            names.push(name);
        }
        (fresh, names)
    }

    /// How many names have been drawn for `prefix` so far.
    pub fn drawn(&self, prefix: &str) -> u32 {
        self.counters.get(&ustr(prefix)).copied().unwrap_or(0)
    }
}

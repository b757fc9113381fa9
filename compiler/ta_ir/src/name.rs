//! Interned identifiers.
//!
//! IDL sources are small, single-file, and compiled once, so unlike the
//! sharded interner this is grounded on, a single flat table is enough —
//! no concurrent interning across threads is ever needed here.

use rustc_hash::FxHashMap;
use std::fmt;

/// An interned identifier (method name, variable name, callback name, ...).
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct Name(u32);

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({})", self.0)
    }
}

/// Owns the interned strings; `Name` values are only meaningful relative
/// to the `StringInterner` that produced them.
#[derive(Default)]
pub struct StringInterner {
    strings: Vec<String>,
    lookup: FxHashMap<String, Name>,
}

impl StringInterner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern `text`, returning the existing `Name` if already interned.
    pub fn intern(&mut self, text: &str) -> Name {
        if let Some(&name) = self.lookup.get(text) {
            return name;
        }
        let id = Name(crate::limits::to_u32(self.strings.len(), "identifier table"));
        self.strings.push(text.to_string());
        self.lookup.insert(text.to_string(), id);
        id
    }

    #[must_use]
    pub fn resolve(&self, name: Name) -> &str {
        &self.strings[name.0 as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_is_stable_and_deduplicates() {
        let mut interner = StringInterner::new();
        let a = interner.intern("foo");
        let b = interner.intern("bar");
        let a2 = interner.intern("foo");
        assert_eq!(a, a2);
        assert_ne!(a, b);
        assert_eq!(interner.resolve(a), "foo");
        assert_eq!(interner.resolve(b), "bar");
    }
}

//! Source location spans.
//!
//! Compact byte-offset span, independent of any particular source buffer.
//! Line/column are *not* stored here: they are derived on demand from a
//! source string by `ta_diagnostic::span_utils`, so a `Span` stays 8 bytes
//! and cheap to carry on every AST node.

use std::fmt;

/// A half-open byte range `[start, end)` into the original IDL source.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default, Debug)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    /// Dummy span for synthesized nodes that have no source position.
    pub const DUMMY: Span = Span { start: 0, end: 0 };

    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Span { start, end }
    }

    /// Smallest span covering both `self` and `other`.
    #[inline]
    #[must_use]
    pub fn cover(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

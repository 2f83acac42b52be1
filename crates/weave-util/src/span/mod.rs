//! Source location tracking.
//!
//! A [`Span`] is a byte range plus the 1-based line/column of its start,
//! sufficient for the single-file, single-pass front end this crate serves.

use std::fmt;

/// A range of source text, with human-readable position of its start.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Span {
    /// Start byte offset in source.
    pub start: usize,
    /// End byte offset in source (exclusive).
    pub end: usize,
    /// Line number of `start` (1-based).
    pub line: u32,
    /// Column number of `start` (1-based).
    pub column: u32,
}

impl Span {
    /// A span with no meaningful location, used in tests and defaults.
    pub const DUMMY: Span = Span {
        start: 0,
        end: 0,
        line: 0,
        column: 0,
    };

    #[inline]
    pub fn new(start: usize, end: usize, line: u32, column: u32) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }

    /// A zero-width span at a single line/column, used for synthetic tokens
    /// (e.g. the end-of-input marker) that have no backing source range.
    #[inline]
    pub fn point(line: u32, column: u32) -> Self {
        Self {
            start: 0,
            end: 0,
            line,
            column,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// The smallest span covering both `self` and `other`.
    #[inline]
    pub fn merge(self, other: Span) -> Span {
        let start_span = if self.start <= other.start { self } else { other };
        Span {
            start: start_span.start,
            end: self.end.max(other.end),
            line: start_span.line,
            column: start_span.column,
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}


#[cfg(test)]
mod properties {
    use super::*;
    use proptest::prelude::*;

    fn arb_span() -> impl Strategy<Value = Span> {
        (0usize..500, 0usize..500, 1u32..100, 1u32..100).prop_map(|(a, b, line, column)| {
            let (start, end) = if a <= b { (a, b) } else { (b, a) };
            Span::new(start, end, line, column)
        })
    }

    proptest! {
        // The merge of two spans always covers both: its start is at most
        // either input's start and its end is at least either input's end.
        #[test]
        fn merge_covers_both_inputs(a in arb_span(), b in arb_span()) {
            let merged = a.merge(b);
            prop_assert!(merged.start <= a.start && merged.start <= b.start);
            prop_assert!(merged.end >= a.end && merged.end >= b.end);
        }

        #[test]
        fn merge_with_self_is_a_no_op(a in arb_span()) {
            let merged = a.merge(a);
            prop_assert_eq!(merged.start, a.start);
            prop_assert_eq!(merged.end, a.end);
        }
    }
}

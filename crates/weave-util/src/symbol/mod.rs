//! String interning for identifiers, variable names and node names.
//!
//! A [`Symbol`] is a 4-byte handle into a global, thread-safe string table.
//! Comparing two symbols is an integer comparison; looking up the backing
//! string is a hash-table read. The table is built once (lazily) per
//! process and is safe to read from any number of threads, which is the
//! concurrency guarantee the front end as a whole relies on: many
//! independent `parse` calls may run at once.
//!
//! # Examples
//!
//! ```
//! use weave_util::Symbol;
//!
//! let a = Symbol::intern("$health");
//! let b = Symbol::intern("$health");
//! assert_eq!(a, b);
//! assert_eq!(a.as_str(), "$health");
//! ```

mod interner;

pub use interner::STRING_TABLE;

/// Statistics about the interner, exposed for diagnostics and benchmarking.
#[derive(Clone, Copy, Debug, Default)]
pub struct InternerStats {
    pub count: usize,
    pub capacity: usize,
    pub hits: usize,
    pub misses: usize,
}

impl InternerStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// An interned string identifier.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol {
    pub(crate) index: u32,
}

/// Indices below this are reserved for the keywords below, pre-interned at
/// startup so they have stable indices without a hash lookup on the first use.
const RESERVED_SYMBOLS_END: u32 = 64;

pub const KW_IF: Symbol = Symbol { index: 0 };
pub const KW_ELSEIF: Symbol = Symbol { index: 1 };
pub const KW_ELSE: Symbol = Symbol { index: 2 };
pub const KW_ENDIF: Symbol = Symbol { index: 3 };
pub const KW_SET: Symbol = Symbol { index: 4 };
pub const KW_TRUE: Symbol = Symbol { index: 5 };
pub const KW_FALSE: Symbol = Symbol { index: 6 };
pub const KW_NULL: Symbol = Symbol { index: 7 };

impl Symbol {
    pub const MAX_INDEX: u32 = u32::MAX;

    /// Intern a string, returning its symbol. Thread-safe.
    #[inline]
    pub fn intern(string: &str) -> Self {
        STRING_TABLE.intern(string)
    }

    /// The string this symbol was interned from. O(1) hash lookup.
    #[inline]
    pub fn as_str(&self) -> &'static str {
        STRING_TABLE.get(*self).unwrap_or("")
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.as_str().is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.as_str().len()
    }

    #[inline]
    pub fn eq_str(&self, other: &str) -> bool {
        self.as_str() == other
    }

    /// True if this is one of the pre-interned keywords above.
    #[inline]
    pub fn is_known(&self) -> bool {
        self.index < RESERVED_SYMBOLS_END
    }

    #[inline]
    pub fn as_u32(&self) -> u32 {
        self.index
    }

    /// # Safety
    /// `index` must correspond to an entry already present in the string
    /// table, or `as_str` on the result is unspecified.
    #[inline]
    pub unsafe fn from_u32_unchecked(index: u32) -> Self {
        Self { index }
    }

    /// Intern `string`, returning the pre-reserved keyword symbol when it
    /// names one of the lexer's keywords, avoiding a hash lookup.
    #[inline]
    pub fn intern_known(string: &str) -> Self {
        match string {
            "if" => KW_IF,
            "elseif" => KW_ELSEIF,
            "else" => KW_ELSE,
            "endif" => KW_ENDIF,
            "set" => KW_SET,
            "true" => KW_TRUE,
            "false" => KW_FALSE,
            "null" => KW_NULL,
            _ => Self::intern(string),
        }
    }

    pub fn stats_struct() -> InternerStats {
        STRING_TABLE.stats()
    }
}

impl std::fmt::Debug for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Symbol({})", self.as_str())
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

static_assertions::assert_impl_all!(Symbol: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn intern_dedupes() {
        let a = Symbol::intern("Start");
        let b = Symbol::intern("Start");
        let c = Symbol::intern("Start.Epilogue");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.as_str(), "Start");
    }

    #[test]
    fn known_keywords_are_stable() {
        assert_eq!(Symbol::intern_known("if"), KW_IF);
        assert_eq!(Symbol::intern_known("endif"), KW_ENDIF);
        assert!(KW_SET.is_known());
        assert!(!Symbol::intern("NorthRoom").is_known());
    }

    #[test]
    fn concurrent_intern_is_consistent() {
        let handles: Vec<_> = (0..8)
            .map(|i| thread::spawn(move || Symbol::intern(&format!("node_{i}"))))
            .collect();
        let symbols: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for (i, s) in symbols.iter().enumerate() {
            assert_eq!(s.as_str(), format!("node_{i}"));
        }
    }
}

//! Interned name symbols.
//!
//! Every name in the engine — proc instances, proc classes, parameters,
//! ports, published aliases, properties — is a [`Symbol`]: an index into a
//! process-wide interner. Comparing two symbols compares two integers, so
//! symbol-keyed lookups on the audio thread never touch string data.
//!
//! Interning takes a lock and may allocate, so it belongs on the control
//! thread at graph-build time. The interner is an explicit lazily-initialized
//! global rather than a static-init-time registry, so there is no
//! initialization-order hazard.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, OnceLock};

/// An interned, comparison-cheap name identifier.
///
/// `Symbol::default()` is the empty symbol, which every empty string interns
/// to. Equality and ordering are by interner id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(u32);

struct Interner {
    by_name: HashMap<&'static str, u32>,
    names: Vec<&'static str>,
}

fn interner() -> &'static Mutex<Interner> {
    static INTERNER: OnceLock<Mutex<Interner>> = OnceLock::new();
    INTERNER.get_or_init(|| {
        Mutex::new(Interner {
            by_name: HashMap::from([("", 0)]),
            names: vec![""],
        })
    })
}

impl Symbol {
    /// Interns a name, returning its symbol.
    ///
    /// Interning the same string twice yields the same symbol.
    pub fn new(name: &str) -> Self {
        if name.is_empty() {
            return Self(0);
        }
        let mut interner = interner().lock().expect("symbol interner poisoned");
        if let Some(&id) = interner.by_name.get(name) {
            return Self(id);
        }
        let id = interner.names.len() as u32;
        // Interned names live for the rest of the process; leaking them lets
        // `as_str` hand out `&'static str` without holding the lock.
        let leaked: &'static str = Box::leak(name.to_owned().into_boxed_str());
        interner.names.push(leaked);
        interner.by_name.insert(leaked, id);
        Self(id)
    }

    /// The interned string for this symbol.
    ///
    /// An id that was never produced by the interner resolves to `""`.
    pub fn as_str(self) -> &'static str {
        let interner = interner().lock().expect("symbol interner poisoned");
        interner.names.get(self.0 as usize).copied().unwrap_or("")
    }

    /// Returns true for the empty symbol.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Raw interner id, for transports that move symbols as words.
    #[inline]
    pub fn to_raw(self) -> u32 {
        self.0
    }

    /// Rebuilds a symbol from a raw interner id.
    ///
    /// Only meaningful for ids previously obtained from [`to_raw`](Self::to_raw).
    #[inline]
    pub fn from_raw(id: u32) -> Self {
        Self(id)
    }
}

impl From<&str> for Symbol {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<&String> for Symbol {
    fn from(name: &String) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_is_idempotent() {
        let a = Symbol::new("frequency");
        let b = Symbol::new("frequency");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "frequency");
    }

    #[test]
    fn distinct_names_differ() {
        assert_ne!(Symbol::new("in"), Symbol::new("out"));
    }

    #[test]
    fn empty_symbol_is_default() {
        assert_eq!(Symbol::new(""), Symbol::default());
        assert!(Symbol::default().is_empty());
        assert_eq!(Symbol::default().as_str(), "");
    }

    #[test]
    fn raw_roundtrip() {
        let sym = Symbol::new("roundtrip_raw");
        assert_eq!(Symbol::from_raw(sym.to_raw()), sym);
    }
}

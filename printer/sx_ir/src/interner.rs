//! String interner for symbol names.
//!
//! Provides O(1) interning and lookup with thread-safe access via a single
//! `RwLock`-protected table. Interned strings are leaked so lookups hand out
//! `&'static str` without holding the lock.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::sync::OnceLock;

/// Interned symbol name.
///
/// A `Name` is a dense `u32` id into the process-wide interner. Equality and
/// hashing are O(1) and never touch string contents.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Name(u32);

impl Name {
    /// Resolve the name back to its string.
    #[inline]
    pub fn as_str(self) -> &'static str {
        interner().lookup(self)
    }
}

impl std::fmt::Display for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error when interning a string fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternError {
    /// The table exceeded capacity (over 4 billion strings).
    Overflow { count: usize },
}

impl std::fmt::Display for InternError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InternError::Overflow { count } => write!(
                f,
                "interner exceeded capacity: {count} strings, max is {}",
                u32::MAX
            ),
        }
    }
}

impl std::error::Error for InternError {}

struct InternerInner {
    /// Map from string content to index.
    map: FxHashMap<&'static str, u32>,
    /// Storage for string contents.
    strings: Vec<&'static str>,
}

/// Process-wide symbol interner.
///
/// Obtained via [`interner`]; there is exactly one per process so `Name`
/// equality is meaningful everywhere.
pub struct Interner {
    inner: RwLock<InternerInner>,
}

impl Interner {
    fn new() -> Self {
        Interner {
            inner: RwLock::new(InternerInner {
                map: FxHashMap::default(),
                strings: Vec::with_capacity(256),
            }),
        }
    }

    /// Try to intern a string, returning its `Name` or an error on overflow.
    pub fn try_intern(&self, s: &str) -> Result<Name, InternError> {
        // Fast path: already interned.
        {
            let guard = self.inner.read();
            if let Some(&id) = guard.map.get(s) {
                return Ok(Name(id));
            }
        }

        let mut guard = self.inner.write();

        // Double-check after acquiring the write lock.
        if let Some(&id) = guard.map.get(s) {
            return Ok(Name(id));
        }

        // Leak the string to get a 'static lifetime.
        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());

        let id = u32::try_from(guard.strings.len()).map_err(|_| InternError::Overflow {
            count: guard.strings.len(),
        })?;
        guard.strings.push(leaked);
        guard.map.insert(leaked, id);
        Ok(Name(id))
    }

    /// Intern a string.
    ///
    /// Panics only on table overflow (more than `u32::MAX` distinct strings).
    #[inline]
    pub fn intern(&self, s: &str) -> Name {
        match self.try_intern(s) {
            Ok(name) => name,
            Err(e) => panic!("{e}"),
        }
    }

    /// Resolve a `Name` back to its string.
    #[inline]
    pub fn lookup(&self, name: Name) -> &'static str {
        self.inner.read().strings[name.0 as usize]
    }

    /// Number of distinct interned strings.
    pub fn len(&self) -> usize {
        self.inner.read().strings.len()
    }

    /// Whether the interner holds no strings.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The process-wide interner instance.
pub fn interner() -> &'static Interner {
    static INSTANCE: OnceLock<Interner> = OnceLock::new();
    INSTANCE.get_or_init(Interner::new)
}

/// Intern a string in the process-wide interner.
#[inline]
pub fn intern(s: &str) -> Name {
    interner().intern(s)
}

/// Pre-interned names the printer special-cases.
pub struct WellKnown {
    pub quote: Name,
    pub quasiquote: Name,
    pub unquote: Name,
    pub unquote_splicing: Name,
}

/// Names for the quote family, interned once.
pub fn well_known() -> &'static WellKnown {
    static INSTANCE: OnceLock<WellKnown> = OnceLock::new();
    INSTANCE.get_or_init(|| WellKnown {
        quote: intern("quote"),
        quasiquote: intern("quasiquote"),
        unquote: intern("unquote"),
        unquote_splicing: intern("unquote-splicing"),
    })
}

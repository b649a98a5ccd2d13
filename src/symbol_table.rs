use std::sync::{Arc, LazyLock, OnceLock};

use tracing::trace;

/// Slots in the global identifier table.
pub const GLOBAL_SIZE: usize = 32768;
/// Slots in the quote-delimited identifier table.
pub const QUOTE_SIZE: usize = 8192;

static GLOBAL: LazyLock<SymbolTable> = LazyLock::new(|| SymbolTable::new(GLOBAL_SIZE));
static QUOTE: LazyLock<SymbolTable> = LazyLock::new(|| SymbolTable::new(QUOTE_SIZE));

#[derive(Debug)]
struct Entry {
    hash: u64,
    len: usize,
    value: Arc<str>,
}

/// Fixed-size interning cache with one slot per bucket.
///
/// A bucket is written once and never replaced. When two symbols collide on
/// a bucket the later one is handed back as a fresh, uninterned `Arc<str>`,
/// so callers compare symbols by value and use `Arc::ptr_eq` only as a
/// shortcut.
#[derive(Debug)]
pub struct SymbolTable {
    slots: Box<[OnceLock<Entry>]>,
    mask: usize,
}

impl SymbolTable {
    /// `size` is rounded up to a power of two.
    pub fn new(size: usize) -> Self {
        let size = size.max(1).next_power_of_two();
        let slots = (0..size).map(|_| OnceLock::new()).collect();
        Self {
            slots,
            mask: size - 1,
        }
    }

    pub fn global() -> &'static SymbolTable {
        &GLOBAL
    }

    pub fn quote() -> &'static SymbolTable {
        &QUOTE
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    fn slot(&self, hash: u64) -> &OnceLock<Entry> {
        &self.slots[(hash as usize) & self.mask]
    }

    /// Intern `text` under `hash`, the case-sensitive hash of `text`.
    pub fn add_symbol(&self, text: &str, hash: u64) -> Arc<str> {
        let slot = self.slot(hash);
        if let Some(entry) = slot.get() {
            return self.resolve(entry, text, hash);
        }
        let fresh: Arc<str> = Arc::from(text);
        let winner = slot.get_or_init(|| Entry {
            hash,
            len: text.len(),
            value: Arc::clone(&fresh),
        });
        self.resolve(winner, text, hash)
    }

    #[inline]
    fn resolve(&self, entry: &Entry, text: &str, hash: u64) -> Arc<str> {
        if entry.hash == hash && entry.len == text.len() {
            Arc::clone(&entry.value)
        } else {
            trace!(bucket = (hash as usize) & self.mask, "symbol table collision");
            Arc::from(text)
        }
    }

    /// Look up an interned symbol without inserting.
    pub fn find_symbol(&self, hash: u64) -> Option<Arc<str>> {
        self.slot(hash)
            .get()
            .filter(|entry| entry.hash == hash)
            .map(|entry| Arc::clone(&entry.value))
    }
}

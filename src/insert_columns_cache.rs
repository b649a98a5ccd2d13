use std::sync::{Arc, LazyLock, OnceLock};

use compact_str::CompactString;
use tracing::debug;

use crate::fnv::fnv1a_64_lower;

/// Bucket count of the process-wide cache.
pub const GLOBAL_BUCKETS: usize = 8192;

static GLOBAL: LazyLock<InsertColumnsCache> =
    LazyLock::new(|| InsertColumnsCache::new(GLOBAL_BUCKETS));

/// A parsed INSERT column list keyed by the hash of its raw text.
#[derive(Debug)]
pub struct ColumnsEntry {
    pub hash: u64,
    /// Source text from `(` through `)`.
    pub raw: Arc<str>,
    /// Column names joined by `", "`.
    pub formatted: Arc<str>,
    pub formatted_hash_lower: u64,
    pub columns: Arc<[CompactString]>,
    next: OnceLock<Box<ColumnsEntry>>,
}

impl ColumnsEntry {
    fn new(hash: u64, raw: &str, columns: Arc<[CompactString]>) -> Self {
        let formatted = columns
            .iter()
            .map(CompactString::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        Self {
            hash,
            raw: Arc::from(raw),
            formatted_hash_lower: fnv1a_64_lower(&formatted),
            formatted: Arc::from(formatted),
            columns,
            next: OnceLock::new(),
        }
    }
}

/// Insert-only cache of INSERT column lists.
///
/// Each bucket is a chain of entries linked through `OnceLock`, so readers
/// never lock and a hash is bound to the first list published under it.
#[derive(Debug)]
pub struct InsertColumnsCache {
    buckets: Box<[OnceLock<Box<ColumnsEntry>>]>,
    mask: usize,
}

impl InsertColumnsCache {
    /// Create a cache with `buckets` rounded up to a power of two.
    pub fn new(buckets: usize) -> Self {
        let size = buckets.max(1).next_power_of_two();
        Self {
            buckets: (0..size).map(|_| OnceLock::new()).collect(),
            mask: size - 1,
        }
    }

    pub fn global() -> &'static InsertColumnsCache {
        &GLOBAL
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    fn head(&self, hash: u64) -> &OnceLock<Box<ColumnsEntry>> {
        &self.buckets[(hash as usize) & self.mask]
    }

    pub fn get(&self, hash: u64) -> Option<&ColumnsEntry> {
        let mut link = self.head(hash);
        while let Some(entry) = link.get() {
            if entry.hash == hash {
                debug!(hash, columns = entry.columns.len(), "insert columns cache hit");
                return Some(entry);
            }
            link = &entry.next;
        }
        None
    }

    /// Publish `columns` under `hash`. Returns `true` when the hash was
    /// already present, in which case the existing entry is kept.
    pub fn put(&self, hash: u64, raw: &str, columns: Arc<[CompactString]>) -> bool {
        let mut pending = Some(Box::new(ColumnsEntry::new(hash, raw, columns)));
        let mut link = self.head(hash);
        loop {
            if let Some(entry) = link.get() {
                if entry.hash == hash {
                    return true;
                }
                link = &entry.next;
                continue;
            }
            let Some(entry) = pending.take() else {
                return true;
            };
            match link.set(entry) {
                Ok(()) => {
                    debug!(hash, raw, "insert columns cached");
                    return false;
                }
                // Lost the race for this link: inspect the winner and go on.
                Err(entry) => pending = Some(entry),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Arc<[CompactString]> {
        names.iter().map(|n| CompactString::from(*n)).collect()
    }

    #[test]
    fn test_put_and_get() {
        let cache = InsertColumnsCache::new(16);
        assert!(cache.get(42).is_none());
        assert!(!cache.put(42, "(a, b)", cols(&["a", "b"])));

        let entry = cache.get(42).unwrap();
        assert_eq!(&*entry.raw, "(a, b)");
        assert_eq!(&*entry.formatted, "a, b");
        assert_eq!(entry.formatted_hash_lower, fnv1a_64_lower("a, b"));
        assert_eq!(entry.columns.len(), 2);
    }

    #[test]
    fn test_first_writer_wins() {
        let cache = InsertColumnsCache::new(16);
        assert!(!cache.put(7, "(a)", cols(&["a"])));
        assert!(cache.put(7, "(b)", cols(&["b"])));
        assert_eq!(cache.get(7).unwrap().columns[0], "a");
    }

    #[test]
    fn test_bucket_chaining() {
        let cache = InsertColumnsCache::new(4);
        // Same bucket, different hashes.
        for hash in [1u64, 5, 9, 13] {
            assert!(!cache.put(hash, "(x)", cols(&["x"])));
        }
        for hash in [1u64, 5, 9, 13] {
            assert_eq!(cache.get(hash).unwrap().hash, hash);
        }
        assert!(cache.get(17).is_none());
    }

    #[test]
    fn test_concurrent_puts_agree() {
        let cache = InsertColumnsCache::new(8);
        std::thread::scope(|s| {
            for i in 0..8 {
                let cache = &cache;
                s.spawn(move || {
                    let name = format!("c{}", i);
                    cache.put(99, "(c)", cols(&[name.as_str()]));
                });
            }
        });
        let winner = cache.get(99).unwrap().columns[0].clone();
        assert!(winner.starts_with('c'));
        for _ in 0..4 {
            assert_eq!(cache.get(99).unwrap().columns[0], winner);
        }
    }

    #[test]
    fn test_global_size() {
        assert_eq!(InsertColumnsCache::global().bucket_count(), GLOBAL_BUCKETS);
    }
}

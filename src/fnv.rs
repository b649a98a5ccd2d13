//! FNV-1a 64-bit hashing of SQL words.
//!
//! Both variants mix each character's scalar value once. The lower variant folds
//! ASCII `A-Z` first, so `Select`, `SELECT` and `select` share a hash.

pub const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
pub const PRIME: u64 = 0x0000_0100_0000_01b3;

#[inline(always)]
pub const fn mix(hash: u64, ch: char) -> u64 {
    (hash ^ ch as u64).wrapping_mul(PRIME)
}

#[inline(always)]
pub const fn fold(ch: char) -> char {
    if ch.is_ascii_uppercase() {
        ch.to_ascii_lowercase()
    } else {
        ch
    }
}

pub fn fnv1a_64(text: &str) -> u64 {
    text.chars().fold(OFFSET_BASIS, mix)
}

pub fn fnv1a_64_lower(text: &str) -> u64 {
    text.chars().fold(OFFSET_BASIS, |h, c| mix(h, fold(c)))
}

/// Compile-time form of [`fnv1a_64_lower`] for ASCII words.
pub const fn fnv1a_64_lower_const(text: &str) -> u64 {
    let bytes = text.as_bytes();
    let mut hash = OFFSET_BASIS;
    let mut i = 0;
    while i < bytes.len() {
        hash = mix(hash, fold(bytes[i] as char));
        i += 1;
    }
    hash
}

/// Case-folded hashes of words the parser tests by hash instead of by token.
pub mod constants {
    use super::fnv1a_64_lower_const as h;

    pub const LIMIT: u64 = h("limit");
    pub const OFFSET: u64 = h("offset");
    pub const START: u64 = h("start");
    pub const CONNECT: u64 = h("connect");
    pub const NATURAL: u64 = h("natural");
    pub const CROSS: u64 = h("cross");
    pub const MODEL: u64 = h("model");
    pub const WINDOW: u64 = h("window");
    pub const DISTRIBUTE: u64 = h("distribute");
    pub const SORT: u64 = h("sort");
    pub const CLUSTER: u64 = h("cluster");
    pub const DIMENSION: u64 = h("dimension");
    pub const IGNORE: u64 = h("ignore");
    pub const KEEP: u64 = h("keep");
}

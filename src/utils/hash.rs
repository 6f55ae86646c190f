use std::collections::{HashMap, HashSet};
use std::hash::{BuildHasherDefault, Hash, Hasher};

/// A speedy, non-cryptographic hasher (FNV-1a) for in-memory tables keyed by
/// short strings like asset identifiers.
#[derive(Debug, Clone, Copy)]
pub struct FastHasher(u64);

const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const PRIME: u64 = 0x0000_0100_0000_01b3;

impl Default for FastHasher {
    #[inline]
    fn default() -> Self {
        FastHasher(OFFSET_BASIS)
    }
}

impl Hasher for FastHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.0
    }

    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 ^= u64::from(b);
            self.0 = self.0.wrapping_mul(PRIME);
        }
    }
}

pub type FastHashMap<K, V> = HashMap<K, V, BuildHasherDefault<FastHasher>>;
pub type FastHashSet<K> = HashSet<K, BuildHasherDefault<FastHasher>>;

/// Hashes a value with `FastHasher`.
#[inline]
pub fn hash<T: Hash + ?Sized>(v: &T) -> u64 {
    let mut state = FastHasher::default();
    v.hash(&mut state);
    state.finish()
}

//! Optimized collection types for Plotweave.
//!
//! This module provides:
//! - The AHash-backed `HashMap` alias
//! - `OrderedMap`, an insertion-ordered map for definition sets
//! - `HandleArena` for generational renderer handles

pub mod handle_arena;

pub use ahash::{AHashMap as HashMap, RandomState};
pub use handle_arena::{Handle, HandleArena};

/// Insertion-ordered map keyed with AHash.
///
/// Definition sets are iterated in submission order so that z-order
/// assignment and logging stay deterministic.
pub type OrderedMap<K, V> = indexmap::IndexMap<K, V, RandomState>;

/// Create an empty [`OrderedMap`].
pub fn ordered_map<K, V>() -> OrderedMap<K, V> {
    OrderedMap::with_hasher(RandomState::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hashmap_ahash() {
        let mut map = HashMap::new();
        map.insert("key", "value");
        assert_eq!(map.get("key"), Some(&"value"));
    }

    #[test]
    fn test_ordered_map_keeps_insertion_order() {
        let mut map = ordered_map();
        map.insert("zeta", 1);
        map.insert("alpha", 2);
        map.insert("mid", 3);
        let keys: Vec<_> = map.keys().copied().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }
}

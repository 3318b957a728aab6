use std::collections::BTreeSet;

use proptest::prelude::*;
use claims_core::KeySet;

fn key_set() -> impl Strategy<Value = KeySet<u8>> {
    let keys = || prop::collection::btree_set(0u8..8, 0..5);
    prop_oneof![
        Just(KeySet::All),
        Just(KeySet::None),
        keys().prop_map(|k| KeySet::some(k)),
        keys().prop_map(|k| KeySet::all_except_some(k)),
    ]
}

// Materialize over a small universe that covers every generated key.
fn materialize(set: &KeySet<u8>) -> BTreeSet<u8> {
    (0u8..8).filter(|k| set.contains(k)).collect()
}

proptest! {
    /// `remove` agrees with plain set difference.
    #[test]
    fn prop_remove_is_difference(a in key_set(), b in key_set()) {
        let expected: BTreeSet<u8> = materialize(&a).difference(&materialize(&b)).copied().collect();
        prop_assert_eq!(materialize(&a.remove(&b)), expected);
    }

    /// `intersect` and `union` agree with plain set operations.
    #[test]
    fn prop_intersect_union(a in key_set(), b in key_set()) {
        let (ma, mb) = (materialize(&a), materialize(&b));
        prop_assert_eq!(materialize(&a.intersect(&b)), ma.intersection(&mb).copied().collect::<BTreeSet<_>>());
        prop_assert_eq!(materialize(&a.union(&b)), ma.union(&mb).copied().collect::<BTreeSet<_>>());
    }

    /// Removing something and its complement leaves nothing.
    #[test]
    fn prop_remove_self_and_complement(a in key_set()) {
        prop_assert_eq!(a.remove(&a), KeySet::None);
        prop_assert_eq!(a.remove(&a.invert()), a.clone());
    }
}

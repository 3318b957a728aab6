use proptest::prelude::*;
use claims_core::{build_ability, build_claim_set, ClaimError, ClaimSet, Rules};

fn literal() -> impl Strategy<Value = String> {
    (
        prop::sample::select(vec!["read", "admin"]),
        prop::collection::vec("[a-c]{1,2}", 0..4),
    )
        .prop_map(|(verb, path)| {
            if path.is_empty() {
                format!("{verb}:*")
            } else {
                format!("{verb}:{}", path.join("."))
            }
        })
}

fn literals() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(literal(), 0..8)
}

proptest! {
    /// The serialized form parses back to the same bytes.
    #[test]
    fn prop_json_round_trip(raws in literals()) {
        let set = build_claim_set(&raws).unwrap();
        let json = set.to_json_string().to_string();
        let parsed = ClaimSet::from_json_str(&Rules::default(), &json).unwrap();
        prop_assert_eq!(parsed.to_json_string(), json.as_str());
    }

    /// Claim order in the input never changes the set or the cache id.
    #[test]
    fn prop_order_independent(raws in literals(), prohibited in literals()) {
        let mut reversed = raws.clone();
        reversed.reverse();
        let first = build_ability(&raws, &prohibited).unwrap();
        let second = build_ability(&reversed, &prohibited).unwrap();
        prop_assert_eq!(first.cache_id(), second.cache_id());
        prop_assert_eq!(first, second);
    }

    /// `can` and `cannot` never agree.
    #[test]
    fn prop_can_cannot_complementary(permitted in literals(), prohibited in literals(), query in literal()) {
        let ability = build_ability(&permitted, &prohibited).unwrap();
        prop_assert_ne!(ability.can(&query).unwrap(), ability.cannot(&query).unwrap());
    }

    /// Adding something the set already checks is a no-op; anything else ends up checked.
    #[test]
    fn prop_add_if_not_checked(raws in literals(), candidate in literal()) {
        let mut set = build_claim_set(&raws).unwrap();
        let covered = set.check(&candidate).unwrap();
        let before = set.len();

        set.unfreeze();
        let inserted = set.add_if_not_checked(&candidate).unwrap();
        set.freeze();

        prop_assert_eq!(inserted, !covered);
        prop_assert_eq!(set.len(), before + usize::from(inserted));
        prop_assert!(set.check(&candidate).unwrap());
    }

    /// Only an identical claim blocks `add_if_not_exact`.
    #[test]
    fn prop_add_if_not_exact(raws in literals(), candidate in literal()) {
        let mut set = build_claim_set(&raws).unwrap();
        let present = set.has_exact(&candidate).unwrap();

        set.unfreeze();
        prop_assert_eq!(set.add_if_not_exact(&candidate).unwrap(), !present);
        prop_assert!(set.has_exact(&candidate).unwrap());
    }

    /// A frozen set refuses every mutation and keeps its serialized form.
    #[test]
    fn prop_frozen_set_unchanged(raws in literals(), candidate in literal()) {
        let mut set = build_claim_set(&raws).unwrap();
        let before = set.to_json_string().to_string();
        prop_assert_eq!(set.add_if_not_checked(&candidate), Err(ClaimError::FrozenClaimSet));
        prop_assert_eq!(set.add_if_not_exact(&candidate), Err(ClaimError::FrozenClaimSet));
        prop_assert_eq!(set.to_json_string(), before.as_str());
    }

    /// Sorted, distinct output regardless of input order.
    #[test]
    fn prop_direct_children_sorted(raws in literals(), query in literal()) {
        let set = build_claim_set(&raws).unwrap();
        for found in [set.direct_children(&query).unwrap(), set.direct_descendants(&query).unwrap()] {
            let mut expected = found.clone();
            expected.sort();
            expected.dedup();
            prop_assert_eq!(found, expected);
        }
    }
}

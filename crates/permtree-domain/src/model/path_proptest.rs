//! Property-based tests for path keys.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::model::PathKey;

    /// Strategy to generate well-formed keys of depth 1..=6.
    fn key_strategy() -> impl Strategy<Value = String> {
        prop::collection::vec(1u32..500, 1..6).prop_map(|segments| {
            segments
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>()
                .join(":")
        })
    }

    proptest! {
        #[test]
        fn test_well_formed_keys_roundtrip(raw in key_strategy()) {
            let key = PathKey::parse(raw.clone());
            prop_assert!(key.is_ok(), "Failed for key: {}", raw);
            prop_assert_eq!(key.unwrap().to_string(), raw);
        }

        #[test]
        fn test_parent_is_strict_ancestor(raw in key_strategy()) {
            let key = PathKey::parse(raw).unwrap();
            if let Some(parent) = key.parent() {
                prop_assert!(key.is_descendant_of(&parent));
                prop_assert!(parent.is_ancestor_of(&key));
                prop_assert_eq!(parent.depth() + 1, key.depth());
            } else {
                prop_assert!(key.is_root());
            }
        }

        #[test]
        fn test_next_segment_lies_between(
            base in key_strategy(),
            tail in prop::collection::vec(1u32..500, 1..4)
        ) {
            let ancestor = PathKey::parse(base).unwrap();
            let mut descendant = ancestor.clone();
            for segment in &tail {
                descendant = descendant.child(u64::from(*segment)).unwrap();
            }
            let next = descendant.next_segment_after(&ancestor).unwrap();
            prop_assert_eq!(next.parent(), Some(ancestor.clone()));
            prop_assert!(descendant.is_self_or_descendant_of(&next));
        }

        #[test]
        fn test_order_matches_numeric_segments(
            a in prop::collection::vec(1u32..500, 1..6),
            b in prop::collection::vec(1u32..500, 1..6)
        ) {
            let join = |segments: &[u32]| {
                segments.iter().map(|s| s.to_string()).collect::<Vec<_>>().join(":")
            };
            let left = PathKey::parse(join(&a)).unwrap();
            let right = PathKey::parse(join(&b)).unwrap();
            prop_assert_eq!(left.cmp(&right), a.cmp(&b));
        }

        #[test]
        fn test_numeric_prefix_is_not_ancestry(a in 1u32..100, b in 0u32..10) {
            // "1" vs "10": textual prefix, different nodes
            let short = PathKey::parse(a.to_string()).unwrap();
            let long = PathKey::parse(format!("{a}{b}")).unwrap();
            prop_assert!(!long.is_descendant_of(&short));
            prop_assert!(!short.is_ancestor_of(&long));
        }
    }
}

//! Property-based tests for the entropy math and chunk mixing.
//!
//! These check the invariants the synthesizer leans on:
//! - measured entropy always lies in [0, 8]
//! - entropy of split buffers matches entropy of their concatenation
//! - chunk shuffling preserves length, symbol multiset, and entropy

use proptest::prelude::*;

use dantalion::mix::shuffle_chunks;
use dantalion::shannon_entropy;
use dantalion_core::entropy_of_parts;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn byte_buffer() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 1..4096)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        ..ProptestConfig::default()
    })]

    #[test]
    fn prop_entropy_is_bounded(data in byte_buffer()) {
        let h = shannon_entropy(&data).unwrap();
        prop_assert!((0.0..=8.0).contains(&h), "entropy {h} out of range");
    }

    #[test]
    fn prop_parts_match_concatenation(
        a in byte_buffer(),
        b in byte_buffer(),
    ) {
        let mut joined = a.clone();
        joined.extend_from_slice(&b);

        prop_assert_eq!(
            entropy_of_parts(&[&a, &b]).unwrap(),
            shannon_entropy(&joined).unwrap()
        );
    }

    #[test]
    fn prop_shuffle_preserves_entropy(
        data in byte_buffer(),
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mixed = shuffle_chunks(&mut rng, &data);

        prop_assert_eq!(mixed.len(), data.len());

        let mut sorted_mixed = mixed.clone();
        let mut sorted_data = data.clone();
        sorted_mixed.sort_unstable();
        sorted_data.sort_unstable();
        prop_assert_eq!(sorted_mixed, sorted_data);

        prop_assert_eq!(
            shannon_entropy(&mixed).unwrap(),
            shannon_entropy(&data).unwrap()
        );
    }
}

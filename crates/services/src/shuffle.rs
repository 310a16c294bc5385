//! Unbiased sequence shuffling.
//!
//! Question pooling and answer-option presentation share the same
//! Fisher–Yates shuffle.

use rand::Rng;
use rand::seq::SliceRandom;

/// Shuffle a slice in place into a uniformly random permutation.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    items.shuffle(rng);
}

/// Return a new vector with the same elements in uniformly random order,
/// leaving the input unmodified. Empty and single-element inputs come back
/// as-is.
#[must_use]
pub fn shuffled<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut out = items.to_vec();
    out.shuffle(rng);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashMap;

    fn counts(items: &[u32]) -> HashMap<u32, usize> {
        let mut map = HashMap::new();
        for &item in items {
            *map.entry(item).or_insert(0) += 1;
        }
        map
    }

    #[test]
    fn shuffled_is_a_permutation() {
        let input: Vec<u32> = (0..50).chain(0..10).collect();
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let output = shuffled(&input, &mut rng);
            assert_eq!(output.len(), input.len());
            assert_eq!(counts(&output), counts(&input));
        }
    }

    #[test]
    fn shuffled_leaves_input_unmodified() {
        let input = vec![1_u32, 2, 3, 4];
        let mut rng = StdRng::seed_from_u64(7);
        let _ = shuffled(&input, &mut rng);
        assert_eq!(input, vec![1, 2, 3, 4]);
    }

    #[test]
    fn handles_empty_and_singleton() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(shuffled::<u32, _>(&[], &mut rng).is_empty());
        assert_eq!(shuffled(&[9_u32], &mut rng), vec![9]);
    }

    #[test]
    fn in_place_shuffle_keeps_multiset() {
        let mut items: Vec<u32> = (0..32).collect();
        let mut rng = StdRng::seed_from_u64(11);
        shuffle(&mut items, &mut rng);
        assert_eq!(counts(&items), counts(&(0..32).collect::<Vec<_>>()));
    }
}

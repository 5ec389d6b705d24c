use rand::Rng;
use rand::seq::SliceRandom;

/// A uniformly shuffled copy of `items`.
pub fn shuffled<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut items = items.to_vec();
    items.shuffle(rng);
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_shuffle_is_a_permutation() {
        let original = vec!["あ", "い", "う", "え", "お", "あ"];
        let mut rng = StdRng::seed_from_u64(3);

        for _ in 0..20 {
            let mut result = shuffled(&original, &mut rng);
            assert_eq!(result.len(), original.len());
            result.sort();
            let mut expected = original.clone();
            expected.sort();
            assert_eq!(result, expected);
        }
    }
}

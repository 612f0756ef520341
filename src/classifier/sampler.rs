use rand::Rng;

use crate::models::AggregateKey;

/// Uniform sample of `k` distinct items without replacement. Picked items keep
/// their original relative order; asking for more than available returns all.
pub fn sample<T: Clone, R: Rng + ?Sized>(items: &[T], k: usize, rng: &mut R) -> Vec<T> {
    if k >= items.len() {
        return items.to_vec();
    }

    let mut indices = rand::seq::index::sample(rng, items.len(), k).into_vec();
    indices.sort_unstable();
    indices.into_iter().map(|i| items[i].clone()).collect()
}

/// Applies [`sample`] to each language group of a key list sorted by language.
pub fn sample_per_language<R: Rng + ?Sized>(
    keys: &[AggregateKey],
    k: usize,
    rng: &mut R,
) -> Vec<AggregateKey> {
    let mut selected = Vec::new();
    for group in keys.chunk_by(|a, b| a.language == b.language) {
        let picked = sample(group, k, rng);
        tracing::info!(
            "Selected {} of {} file(s) for language {}",
            picked.len(),
            group.len(),
            group[0].language
        );
        selected.extend(picked);
    }
    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_sample_is_distinct_and_sized() {
        let items: Vec<u32> = (0..20).collect();
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let picked = sample(&items, 7, &mut rng);
            assert_eq!(picked.len(), 7);
            assert_eq!(picked.iter().collect::<HashSet<_>>().len(), 7);
            assert!(picked.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn test_oversized_request_returns_everything() {
        let items = vec!["a", "b", "c"];
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(sample(&items, 10, &mut rng), items);
        assert_eq!(sample(&items, 3, &mut rng), items);
        assert!(sample(&items, 0, &mut rng).is_empty());
    }

    #[test]
    fn test_same_seed_same_sample() {
        let items: Vec<u32> = (0..100).collect();
        let a = sample(&items, 5, &mut StdRng::seed_from_u64(42));
        let b = sample(&items, 5, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_sample_per_language() {
        let mut keys = Vec::new();
        for i in 0..6 {
            keys.push(AggregateKey::new("go", format!("o_go{}", i)));
        }
        keys.push(AggregateKey::new("python", "o_py0"));

        let picked = sample_per_language(&keys, 2, &mut StdRng::seed_from_u64(1));
        assert_eq!(picked.iter().filter(|k| k.language == "go").count(), 2);
        assert_eq!(picked.iter().filter(|k| k.language == "python").count(), 1);
    }
}

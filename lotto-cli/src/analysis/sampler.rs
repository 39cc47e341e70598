use rand::rngs::StdRng;
use rand::{Rng, RngExt, SeedableRng};

use lotto_db::models::{DrawResult, POOL_SIZE};

/// Grille aléatoire depuis le générateur du thread courant.
pub fn generate() -> DrawResult {
    generate_with(&mut rand::rng())
}

/// Tirage uniforme dans [1, 45] jusqu'à obtenir 6 numéros distincts.
pub fn generate_with(rng: &mut impl Rng) -> DrawResult {
    DrawResult::collect_from(|| rng.random_range(1..=POOL_SIZE))
}

/// `count` grilles indépendantes ; avec un seed, la série est reproductible.
pub fn generate_many(count: usize, seed: Option<u64>) -> Vec<DrawResult> {
    let mut rng: StdRng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_rng(&mut rand::rng()),
    };
    (0..count).map(|_| generate_with(&mut rng)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lotto_db::models::PICK_COUNT;

    #[test]
    fn test_generate_invariants() {
        for _ in 0..1000 {
            let draw = generate();
            let numbers = draw.numbers();
            assert_eq!(numbers.len(), PICK_COUNT);
            assert!(numbers.iter().all(|&n| (1..=45).contains(&n)));
            assert!(numbers.windows(2).all(|w| w[0] < w[1]), "{:?}", numbers);
        }
    }

    #[test]
    fn test_seed_reproducible() {
        let a = generate_many(5, Some(42));
        let b = generate_many(5, Some(42));
        assert_eq!(a, b);
        assert_eq!(a.len(), 5);
    }

    #[test]
    fn test_successive_draws_differ() {
        let draws = generate_many(20, Some(7));
        let distinct: std::collections::HashSet<_> = draws.iter().collect();
        assert!(distinct.len() > 1);
    }

    #[test]
    fn test_uniform_frequency() {
        let n = 20_000;
        let mut counts = [0u32; 45];
        for draw in generate_many(n, Some(2024)) {
            for &x in draw.numbers() {
                counts[(x - 1) as usize] += 1;
            }
        }
        let expected = 6.0 / 45.0;
        for (i, &c) in counts.iter().enumerate() {
            let freq = c as f64 / n as f64;
            assert!(
                (freq - expected).abs() < 0.015,
                "numéro {} : fréquence {} trop loin de {}",
                i + 1,
                freq,
                expected
            );
        }
    }
}

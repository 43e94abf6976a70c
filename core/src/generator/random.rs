use alloc::vec::Vec;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::*;

/// Uniform in-place Fisher-Yates shuffle.
pub fn shuffle<T, R: Rng>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}

/// Deals the first `pairs` catalog faces twice each, in a uniformly random order.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomDeckGenerator {
    seed: u64,
}

impl RandomDeckGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl DeckGenerator for RandomDeckGenerator {
    fn generate(self, config: BoardConfig) -> Deck {
        let pairs: Vec<Face> = Face::catalog(config.pairs()).collect();
        if pairs.len() != usize::from(config.pairs()) {
            log::warn!(
                "Face catalog too small, requested {} pairs but only has {}",
                config.pairs(),
                pairs.len()
            );
        }

        let mut faces: Vec<Face> = pairs.iter().chain(pairs.iter()).copied().collect();
        let mut rng = SmallRng::seed_from_u64(self.seed);
        shuffle(&mut faces, &mut rng);

        log::debug!("dealt {} cards with seed {}", faces.len(), self.seed);
        Deck::from_shuffled(faces)
    }
}

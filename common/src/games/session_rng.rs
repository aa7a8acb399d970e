use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Seeded source of placement randomness; one per game session.
pub struct SessionRng {
    rng: StdRng,
    seed: u64,
}

impl SessionRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    pub fn from_random() -> Self {
        let seed: u64 = rand::rng().random();
        Self::new(seed)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn random_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distr::uniform::SampleUniform,
        R: rand::distr::uniform::SampleRange<T>,
    {
        self.rng.random_range(range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut first = SessionRng::new(7);
        let mut second = SessionRng::new(7);
        let a: Vec<usize> = (0..16).map(|_| first.random_range(0..24)).collect();
        let b: Vec<usize> = (0..16).map(|_| second.random_range(0..24)).collect();
        assert_eq!(a, b);
        assert_eq!(first.seed(), 7);
    }
}

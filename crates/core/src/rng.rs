use rand::{rngs::StdRng, seq::index, seq::SliceRandom, Rng, SeedableRng};

/// The single pseudo-random source of a run. Every shuffle and shop roll goes
/// through here so a seed fully determines the run.
#[derive(Debug, Clone)]
pub struct RngState {
    seed: u64,
    rng: StdRng,
}

impl RngState {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }

    pub fn pick_index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        Some(self.rng.gen_range(0..len))
    }

    /// Distinct indices into `0..len`, at most `amount` of them.
    pub fn sample_indices(&mut self, len: usize, amount: usize) -> Vec<usize> {
        let amount = amount.min(len);
        index::sample(&mut self.rng, len, amount).into_vec()
    }

    pub fn coin_flip(&mut self) -> bool {
        self.rng.gen_bool(0.5)
    }
}

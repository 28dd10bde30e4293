use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};

/// Fisher-Yates shuffle. A seed makes the order reproducible for the same input; without one
/// the thread-local generator is used.
pub fn shuffle<T>(items: &mut [T], seed: Option<u64>) {
	match seed {
		Some(seed) => items.shuffle(&mut StdRng::seed_from_u64(seed)),
		None => items.shuffle(&mut rand::thread_rng()),
	}
}

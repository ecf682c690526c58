//! Provides the numeric computation context owned by every autoencoder.
//!
//! All stochastic parts of training (weight filling, noise injection) draw from the
//! random number generator held here. A Backend is never shared between models, so two
//! nodes seeded identically train identically no matter how the graph interleaves
//! them. The context is released when its model is dropped.
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug)]
/// Exclusive computation context of one model.
pub struct Backend {
    owner: String,
    seed: Option<u64>,
    rng: StdRng,
}

impl Backend {
    /// Create a context for `owner`.
    ///
    /// With a `seed` the generator is reproducible, otherwise it is seeded from the OS.
    pub fn new(owner: &str, seed: Option<u64>) -> Backend {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        debug!("Acquired computation context for {}", owner);

        Backend {
            owner: owner.to_owned(),
            seed: seed,
            rng: rng,
        }
    }

    /// The random number generator of this context.
    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// The seed the context was created with, if any.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Draw a random 32 bit identifier, used to make model names unique.
    pub fn next_tag(&mut self) -> u32 {
        self.rng.gen()
    }

    /// Rename the owner reported in logs.
    pub fn set_owner(&mut self, owner: &str) {
        self.owner = owner.to_owned();
    }
}

impl Drop for Backend {
    fn drop(&mut self) {
        debug!("Autoencoder {} deallocated, released computation context", self.owner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_contexts_are_reproducible() {
        let mut one = Backend::new("one", Some(7));
        let mut two = Backend::new("two", Some(7));
        assert_eq!(one.next_tag(), two.next_tag());
        assert_eq!(Some(7), one.seed());
    }
}

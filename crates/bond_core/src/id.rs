//! Random order and trade identifiers.
//!
//! Identifiers are 12 characters drawn uniformly from a fixed alphanumeric
//! alphabet. They need to be collision-resistant, not reproducible, so the
//! default source is entropy-seeded. Tests and sample-data generators inject
//! a seeded source instead.

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

/// Alphabet identifiers are drawn from.
///
/// Some letters appear twice; draws are uniform over positions, not over
/// distinct characters.
pub const ID_ALPHABET: &[u8] = b"1234567890QWERTYUIOPASDFERMDJGKCVBNM";

/// Length of every generated identifier.
pub const ID_LENGTH: usize = 12;

/// Identifier generator over an injectable randomness source.
///
/// # Examples
///
/// ```
/// use bond_core::id::{IdGenerator, ID_LENGTH};
///
/// let mut ids = IdGenerator::from_seed(7);
/// let id = ids.next_id();
/// assert_eq!(id.len(), ID_LENGTH);
///
/// // Same seed, same identifiers
/// assert_eq!(IdGenerator::from_seed(7).next_id(), id);
/// ```
pub struct IdGenerator {
    source: Box<dyn RngCore>,
}

impl IdGenerator {
    /// Entropy-seeded generator.
    pub fn new() -> Self {
        Self::with_source(StdRng::from_entropy())
    }

    /// Deterministic generator for fixtures and sample data.
    pub fn from_seed(seed: u64) -> Self {
        Self::with_source(StdRng::seed_from_u64(seed))
    }

    /// Generator drawing from the given source.
    pub fn with_source(source: impl RngCore + 'static) -> Self {
        Self {
            source: Box::new(source),
        }
    }

    /// Draws the next identifier.
    pub fn next_id(&mut self) -> String {
        (0..ID_LENGTH)
            .map(|_| char::from(ID_ALPHABET[self.source.gen_range(0..ID_ALPHABET.len())]))
            .collect()
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for IdGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdGenerator").finish_non_exhaustive()
    }
}

/// One-off identifier from the thread-local entropy source.
pub fn generate_id() -> String {
    let mut rng = rand::thread_rng();
    (0..ID_LENGTH)
        .map(|_| char::from(ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_alphabet_size() {
        assert_eq!(ID_ALPHABET.len(), 36);
    }

    #[test]
    fn test_ids_use_alphabet_only() {
        let mut ids = IdGenerator::new();
        for _ in 0..100 {
            let id = ids.next_id();
            assert_eq!(id.len(), ID_LENGTH);
            assert!(id.bytes().all(|b| ID_ALPHABET.contains(&b)));
        }
        assert!(generate_id().bytes().all(|b| ID_ALPHABET.contains(&b)));
    }

    #[test]
    fn test_entropy_ids_do_not_collide() {
        let ids: HashSet<String> = (0..1000).map(|_| generate_id()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_seeded_ids_repeat() {
        let a: Vec<String> = {
            let mut g = IdGenerator::from_seed(99);
            (0..5).map(|_| g.next_id()).collect()
        };
        let b: Vec<String> = {
            let mut g = IdGenerator::from_seed(99);
            (0..5).map(|_| g.next_id()).collect()
        };
        assert_eq!(a, b);
    }
}

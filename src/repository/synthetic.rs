use super::ContactRepository;
use crate::error::RepositoryError;
use crate::index::types::RawContact;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHasher;
use std::hash::Hasher;

/// Mix a user id into the base seed
///
/// FxHasher is a fixed algorithm, unlike std's `DefaultHasher`, so a given
/// `--seed` yields the same contacts on every toolchain.
fn user_seed(seed: u64, user_id: &str) -> u64 {
    let mut hasher = FxHasher::default();
    hasher.write(user_id.as_bytes());
    seed ^ hasher.finish()
}

const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Generates random mixed-case contacts
///
/// With a seed, the same user id always yields the same contacts.
#[derive(Debug, Clone)]
pub struct SyntheticRepository {
    contacts_per_user: usize,
    seed: Option<u64>,
}

impl SyntheticRepository {
    pub fn new(contacts_per_user: usize) -> Self {
        Self {
            contacts_per_user,
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn contacts_per_user(&self) -> usize {
        self.contacts_per_user
    }

    fn rng_for(&self, user_id: &str) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(user_seed(seed, user_id)),
            None => StdRng::from_rng(&mut rand::rng()),
        }
    }
}

impl ContactRepository for SyntheticRepository {
    fn fetch(&self, user_id: &str) -> Result<Vec<RawContact>, RepositoryError> {
        let mut rng = self.rng_for(user_id);
        Ok((0..self.contacts_per_user)
            .map(|_| random_contact(&mut rng))
            .collect())
    }
}

fn random_contact<R: Rng>(rng: &mut R) -> RawContact {
    RawContact {
        id: format!("id:{}", random_letters(rng, 10)),
        email: format!("{}@{}.com", random_letters(rng, 10), random_letters(rng, 5)),
        first_name: random_letters(rng, 8),
        last_name: random_letters(rng, 10),
    }
}

fn random_letters<R: Rng>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| LETTERS[rng.random_range(0..LETTERS.len())] as char)
        .collect()
}

/// Random mixed-case query of `0..=max_len` letters
pub fn random_query<R: Rng>(rng: &mut R, max_len: usize) -> String {
    let len = rng.random_range(0..=max_len);
    random_letters(rng, len)
}

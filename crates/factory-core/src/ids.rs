//! Identity generation for profile entities.
//!
//! Ids are drawn once when an entity is constructed and never recomputed.
//! Constructors take an [`IdGenerator`] so fixtures can be deterministic;
//! `Default` impls use [`RandomIds`].

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use uuid::{Builder, Uuid};

/// Source of fresh entity identifiers.
pub trait IdGenerator {
    /// Produce the next identifier. Must never return an empty string.
    fn next_id(&mut self) -> String;
}

/// Random UUID v4 ids in hyphenated form.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn next_id(&mut self) -> String {
        Uuid::new_v4().hyphenated().to_string()
    }
}

/// Reproducible UUID-shaped ids from a seeded ChaCha stream.
#[derive(Clone, Debug)]
pub struct SeededIds {
    rng: ChaCha8Rng,
}

impl SeededIds {
    /// Create a generator from a seed; equal seeds yield equal sequences.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl IdGenerator for SeededIds {
    fn next_id(&mut self) -> String {
        let mut bytes = [0u8; 16];
        self.rng.fill_bytes(&mut bytes);
        Builder::from_random_bytes(bytes)
            .into_uuid()
            .hyphenated()
            .to_string()
    }
}

/// Readable `"{prefix}-{n}"` ids, counting from 1.
#[derive(Clone, Debug)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    /// Start a counter with the given prefix.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> String {
        let id = format!("{}-{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}

/// Fresh random id, used by `Default` impls.
pub fn fresh_id() -> String {
    RandomIds.next_id()
}

//! Opaque identifiers, seeds and timestamps
//!
//! Everything random in a conversion run comes from a [`TokenSource`], so a
//! run with a deterministic source is fully reproducible.

use std::time::{SystemTime, UNIX_EPOCH};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};

const ID_LENGTH: usize = 20;
const MAX_SEED: i64 = 2_147_483_647;

/// Source of the randomized fields of a document element
pub trait TokenSource {
    /// A fresh, collision-resistant element id
    fn id(&mut self) -> String;

    /// A fresh element seed in `1..=2147483647`
    fn seed(&mut self) -> i64;

    /// The `updated` timestamp, milliseconds since the Unix epoch
    fn timestamp(&mut self) -> i64;
}

/// Tokens drawn from a random number generator
#[derive(Debug)]
pub struct RandomTokens<R: Rng> {
    rng: R,
}

impl<R: Rng> RandomTokens<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomTokens<ThreadRng> {
    /// Tokens from the thread-local generator
    pub fn thread() -> Self {
        Self::new(rand::rng())
    }
}

impl RandomTokens<StdRng> {
    /// Reproducible ids and seeds from a fixed seed
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> TokenSource for RandomTokens<R> {
    fn id(&mut self) -> String {
        let bytes: [u8; 15] = self.rng.random();
        let mut id = URL_SAFE_NO_PAD.encode(bytes);
        id.truncate(ID_LENGTH);
        id
    }

    fn seed(&mut self) -> i64 {
        self.rng.random_range(1..=MAX_SEED)
    }

    fn timestamp(&mut self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0)
    }
}

/// Predictable tokens: `el-0001`, `el-0002`, ... with counting seeds and a
/// zero timestamp
#[derive(Debug, Default)]
pub struct SequentialTokens {
    next_id: usize,
    next_seed: i64,
}

impl SequentialTokens {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenSource for SequentialTokens {
    fn id(&mut self) -> String {
        self.next_id += 1;
        format!("el-{:04}", self.next_id)
    }

    fn seed(&mut self) -> i64 {
        self.next_seed += 1;
        self.next_seed
    }

    fn timestamp(&mut self) -> i64 {
        0
    }
}

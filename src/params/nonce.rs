use std::ops::Range;
use std::sync::atomic::{AtomicU64, Ordering};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Length of the generated `msToken`.
pub const MS_TOKEN_LEN: usize = 128;

const MS_TOKEN_CHARSET: &[u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789_-";

const WEBID_RANGE: Range<u64> = 7_000_000_000_000_000_000..8_000_000_000_000_000_000;

/// The two per-call random fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nonces {
    pub ms_token: String,
    pub webid: String,
}

/// Source of per-call nonces.
///
/// Production generators draw from the thread-local RNG. Seeded generators
/// derive a fresh `StdRng` per draw from `seed + draw_index`, so tests get
/// reproducible sequences without sharing a locked RNG between calls.
#[derive(Debug, Default)]
pub struct NonceGenerator {
    seed: Option<u64>,
    draws: AtomicU64,
}

impl NonceGenerator {
    pub fn from_entropy() -> Self {
        Self::default()
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            draws: AtomicU64::new(0),
        }
    }

    pub fn generate(&self) -> Nonces {
        match self.seed {
            Some(seed) => {
                let draw = self.draws.fetch_add(1, Ordering::Relaxed);
                Self::generate_with(&mut StdRng::seed_from_u64(seed.wrapping_add(draw)))
            }
            None => Self::generate_with(&mut rand::thread_rng()),
        }
    }

    pub fn generate_with<R: Rng + ?Sized>(rng: &mut R) -> Nonces {
        Nonces {
            ms_token: ms_token(rng),
            webid: webid(rng),
        }
    }
}

/// 128 characters drawn from letters, digits, `_` and `-`.
pub fn ms_token<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..MS_TOKEN_LEN)
        .map(|_| MS_TOKEN_CHARSET[rng.gen_range(0..MS_TOKEN_CHARSET.len())] as char)
        .collect()
}

/// 19-digit decimal identifier in `[7e18, 8e18)`.
pub fn webid<R: Rng + ?Sized>(rng: &mut R) -> String {
    rng.gen_range(WEBID_RANGE).to_string()
}

//! RNG oracle for combat rolls.
//!
//! Rules never touch a global generator. Each action receives an
//! `action_seed` from its caller and derives one seed per independent roll
//! with [`compute_seed`], so an action replays identically given the same
//! seed and tests can script every roll.

/// Seed context for the critical-hit roll.
pub const CRIT_ROLL: u32 = 0;
/// Seed context for the infection spread roll.
pub const INFECTION_ROLL: u32 = 1;

/// RNG oracle for deterministic random number generation.
///
/// Implementations must be deterministic and produce the same values
/// given the same seed.
pub trait RngOracle: Send + Sync {
    /// Generate a random u32 value from a seed.
    fn next_u32(&self, seed: u64) -> u32;

    /// Roll a d100 (1-100 inclusive).
    fn roll_d100(&self, seed: u64) -> u32 {
        (self.next_u32(seed) % 100) + 1
    }

    /// Percentage check: true with probability `pct / 100`.
    ///
    /// `0` never succeeds, `100` or more always does.
    fn chance(&self, seed: u64, pct: u32) -> bool {
        pct > 0 && self.roll_d100(seed) <= pct
    }
}

impl<R: RngOracle + ?Sized> RngOracle for &R {
    fn next_u32(&self, seed: u64) -> u32 {
        (**self).next_u32(seed)
    }

    fn roll_d100(&self, seed: u64) -> u32 {
        (**self).roll_d100(seed)
    }

    fn chance(&self, seed: u64, pct: u32) -> bool {
        (**self).chance(seed, pct)
    }
}

/// PCG random number generator (PCG-XSH-RR, 64-bit state, 32-bit output).
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&self, seed: u64) -> u32 {
        Self::pcg_output(Self::pcg_step(seed))
    }
}

/// Derives the seed of one roll inside an action.
///
/// * `action_seed` - fresh per action, drawn by the caller
/// * `entity_hash` - stable hash of the acting entity ([`crate::EntityId::seed_hash`])
/// * `context` - which roll ([`CRIT_ROLL`], [`INFECTION_ROLL`])
pub fn compute_seed(action_seed: u64, entity_hash: u64, context: u32) -> u64 {
    let mut hash = action_seed;
    hash ^= entity_hash.wrapping_mul(0x517cc1b727220a95);
    hash ^= (context as u64).wrapping_mul(0x85ebca6b);

    // SplitMix-style avalanche
    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;

    hash
}

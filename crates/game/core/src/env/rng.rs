//! Seeded randomness for enemy wandering.
//!
//! The simulation never holds RNG state. Each roll derives a seed from the
//! game seed, the tick, the rolling entity and a context slot, and asks the
//! oracle for a value. The same inputs always give the same walk, which is
//! what replays and tests rely on.

use crate::state::Facing;

/// Stateless random source.
pub trait RngOracle: Send + Sync {
    fn next_u32(&self, seed: u64) -> u32;

    /// Value in `[min, max]` inclusive.
    fn range(&self, seed: u64, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        min + self.next_u32(seed) % (max - min + 1)
    }

    /// One of the four orthogonal facings.
    fn facing(&self, seed: u64) -> Facing {
        Facing::all()[(self.next_u32(seed) % 4) as usize]
    }
}

/// PCG-XSH-RR over a single LCG step: 64-bit state in, 32 bits out.
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    #[inline]
    fn step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    #[inline]
    fn output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&self, seed: u64) -> u32 {
        Self::output(Self::step(seed))
    }
}

/// Mixes the roll inputs into one seed.
///
/// `context` separates independent rolls made by the same entity on the same
/// tick (a new heading, then the retries after a blocked step).
pub fn compute_seed(game_seed: u64, tick: u64, entity: u32, context: u32) -> u64 {
    let mut hash = game_seed;
    hash ^= tick.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= u64::from(entity).wrapping_mul(0x517cc1b727220a95);
    hash ^= u64::from(context).wrapping_mul(0x85ebca6b);

    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;
    hash
}

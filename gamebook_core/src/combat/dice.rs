//! Roll sources - where the d10 rolls of a session come from

use super::table::ROLL_SIDES;
use rand::Rng;
use std::collections::VecDeque;

/// Source of uniformly distributed rolls in `0..=9`
///
/// Each session owns its own source, so concurrent sessions never share
/// random state.
pub trait RollSource {
    /// Draw the next roll
    fn roll(&mut self) -> u8;
}

/// Rolls drawn from any `rand` generator
#[derive(Debug, Clone)]
pub struct RngRolls<R> {
    rng: R,
}

impl<R: Rng> RngRolls<R> {
    pub fn new(rng: R) -> Self {
        RngRolls { rng }
    }
}

impl RngRolls<rand::rngs::ThreadRng> {
    /// Unseeded rolls from the thread-local generator
    pub fn from_entropy() -> Self {
        RngRolls::new(rand::thread_rng())
    }
}

impl<R: Rng> RollSource for RngRolls<R> {
    fn roll(&mut self) -> u8 {
        self.rng.gen_range(0..ROLL_SIDES)
    }
}

/// A fixed sequence of rolls, replayed in order
///
/// Once the script runs out the last roll repeats. Rolls are reduced
/// modulo 10 so every scripted value stays inside the table's domain.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRolls {
    rolls: VecDeque<u8>,
    last: u8,
}

impl ScriptedRolls {
    pub fn new(rolls: impl IntoIterator<Item = u8>) -> Self {
        ScriptedRolls {
            rolls: rolls.into_iter().map(|r| r % ROLL_SIDES).collect(),
            last: 0,
        }
    }

    /// Always roll the same value
    pub fn constant(roll: u8) -> Self {
        let mut rolls = Self::new([]);
        rolls.last = roll % ROLL_SIDES;
        rolls
    }

    /// Rolls left before the script starts repeating
    pub fn remaining(&self) -> usize {
        self.rolls.len()
    }
}

impl RollSource for ScriptedRolls {
    fn roll(&mut self) -> u8 {
        if let Some(next) = self.rolls.pop_front() {
            self.last = next;
        }
        self.last
    }
}

impl<T: RollSource + ?Sized> RollSource for Box<T> {
    fn roll(&mut self) -> u8 {
        (**self).roll()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_rng_rolls_in_range() {
        let mut rolls = RngRolls::new(ChaCha8Rng::seed_from_u64(42));
        for _ in 0..1000 {
            assert!(rolls.roll() < 10);
        }
    }

    #[test]
    fn test_seeded_rolls_repeat() {
        let mut a = RngRolls::new(ChaCha8Rng::seed_from_u64(7));
        let mut b = RngRolls::new(ChaCha8Rng::seed_from_u64(7));
        let first: Vec<u8> = (0..20).map(|_| a.roll()).collect();
        let second: Vec<u8> = (0..20).map(|_| b.roll()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_scripted_rolls_replay_then_repeat() {
        let mut rolls = ScriptedRolls::new([3, 7, 12]);
        assert_eq!(rolls.roll(), 3);
        assert_eq!(rolls.roll(), 7);
        assert_eq!(rolls.roll(), 2);
        assert_eq!(rolls.remaining(), 0);
        assert_eq!(rolls.roll(), 2);
    }

    #[test]
    fn test_constant_rolls() {
        let mut rolls = ScriptedRolls::constant(9);
        assert_eq!(rolls.roll(), 9);
        assert_eq!(rolls.roll(), 9);
    }
}
